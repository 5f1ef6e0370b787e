//! Handlers for `/auth` — login and logout.

use axum::{Json, extract::State};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::{Value, json};

use datebook_core::store::EventStore;

use crate::{AppState, auth::AUTH_COOKIE, error::Error};

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub password: Option<String>,
}

/// `POST /auth` — body: `{"password": "..."}`.
///
/// 400 when the password is missing or empty, 401 on mismatch (no rate
/// limiting, no lockout), otherwise sets the session cookie.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  jar: CookieJar,
  Json(body): Json<LoginBody>,
) -> Result<(CookieJar, Json<Value>), Error>
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let password = match body.password.as_deref() {
    Some(p) if !p.is_empty() => p,
    _ => return Err(Error::MissingField("password")),
  };

  if password != state.auth.secret {
    return Err(Error::Unauthorized);
  }

  // The cookie value is the secret itself; it doubles as the session.
  let jar = jar.add(
    Cookie::build((AUTH_COOKIE, state.auth.secret.clone())).path("/"),
  );
  Ok((jar, Json(json!({ "success": true }))))
}

/// `DELETE /auth` — drop the session cookie.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
  let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
  (jar, Json(json!({ "success": true })))
}
