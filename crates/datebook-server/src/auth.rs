//! Cookie-based auth gate: shared-secret comparison and the request
//! extractor.
//!
//! The session cookie's value *is* the shared secret — there is no
//! separate session id, expiry, or rotation. See DESIGN.md for the
//! hardening notes.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use crate::{AppState, error::Error};
use datebook_core::store::EventStore;

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "auth";

/// The shared secret, injected once at startup from configuration.
#[derive(Clone)]
pub struct AuthConfig {
  pub secret: String,
}

/// Zero-size marker: present in the handler means the request was
/// authenticated.
pub struct Authenticated;

/// Verify the session cookie against the configured secret.
pub fn verify_auth(jar: &CookieJar, config: &AuthConfig) -> Result<(), Error> {
  // An unconfigured secret rejects everything (the server binary refuses
  // to start in that state; the gate still fails closed if reached).
  if config.secret.is_empty() {
    return Err(Error::Unauthorized);
  }

  let value = jar
    .get(AUTH_COOKIE)
    .map(|c| c.value())
    .ok_or(Error::Unauthorized)?;

  if value != config.secret {
    return Err(Error::Unauthorized);
  }
  Ok(())
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let jar = CookieJar::from_headers(&parts.headers);
    verify_auth(&jar, &state.auth)?;
    Ok(Authenticated)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::http::{Request, header};

  use super::*;
  use crate::AppState;

  // A minimal no-op store for testing auth only.
  #[derive(Clone)]
  struct NoopStore;

  impl EventStore for NoopStore {
    type Error = std::convert::Infallible;
    async fn create(&self, _: datebook_core::NewEvent) -> Result<datebook_core::Event, Self::Error> { unimplemented!() }
    async fn list(&self) -> Result<Vec<datebook_core::Event>, Self::Error> { unimplemented!() }
    async fn get(&self, _: uuid::Uuid) -> Result<Option<datebook_core::Event>, Self::Error> { unimplemented!() }
    async fn update(&self, _: uuid::Uuid, _: datebook_core::EventPatch) -> Result<datebook_core::Event, Self::Error> { unimplemented!() }
    async fn delete(&self, _: uuid::Uuid) -> Result<(), Self::Error> { unimplemented!() }
  }

  fn make_state(secret: &str) -> AppState<NoopStore> {
    AppState {
      store: Arc::new(NoopStore),
      auth:  Arc::new(AuthConfig { secret: secret.to_string() }),
    }
  }

  async fn extract(
    req: Request<axum::body::Body>,
    state: &AppState<NoopStore>,
  ) -> Result<Authenticated, Error> {
    let (mut parts, _) = req.into_parts();
    Authenticated::from_request_parts(&mut parts, state).await
  }

  #[tokio::test]
  async fn correct_cookie() {
    let state = make_state("secret123");
    let req = Request::builder()
      .header(header::COOKIE, "auth=secret123")
      .body(axum::body::Body::empty()).unwrap();
    assert!(extract(req, &state).await.is_ok());
  }

  #[tokio::test]
  async fn wrong_cookie_value() {
    let state = make_state("secret123");
    let req = Request::builder()
      .header(header::COOKIE, "auth=wrong")
      .body(axum::body::Body::empty()).unwrap();
    assert!(matches!(extract(req, &state).await, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn missing_cookie() {
    let state = make_state("secret123");
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(matches!(extract(req, &state).await, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn empty_secret_rejects_everything() {
    let state = make_state("");
    let req = Request::builder()
      .header(header::COOKIE, "auth=")
      .body(axum::body::Body::empty()).unwrap();
    assert!(matches!(extract(req, &state).await, Err(Error::Unauthorized)));
  }
}
