//! HTTP JSON resource layer for datebook.
//!
//! Exposes an axum [`Router`] implementing the calendar API (login/logout
//! plus cookie-gated event CRUD) backed by any [`EventStore`].

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use datebook_core::store::EventStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` or the
/// `DATEBOOK_*` environment.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Shared application secret. The binary refuses to start when empty.
  pub secret:     String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: EventStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the calendar API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route(
      "/auth",
      post(handlers::auth::login::<S>).delete(handlers::auth::logout),
    )
    .route(
      "/events",
      get(handlers::events::list::<S>).post(handlers::events::create::<S>),
    )
    .route(
      "/events/{id}",
      get(handlers::events::get_one::<S>)
        .put(handlers::events::update_one::<S>)
        .delete(handlers::events::delete_one::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use datebook_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  const SECRET: &str = "secret123";

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      store: Arc::new(store),
      auth:  Arc::new(AuthConfig { secret: SECRET.to_string() }),
    }
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
    body:    &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  /// Authenticated JSON request with the session cookie attached.
  async fn oneshot_authed(
    state:  AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   &str,
  ) -> axum::response::Response {
    oneshot_raw(
      state,
      method,
      uri,
      vec![
        (header::COOKIE, "auth=secret123"),
        (header::CONTENT_TYPE, "application/json"),
      ],
      body,
    )
    .await
  }

  async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn lunch_body() -> String {
    json!({
      "title": "Lunch",
      "start_time": "2024-06-01T12:00:00Z",
      "end_time": "2024-06-01T13:00:00Z",
    })
    .to_string()
  }

  // ── Login ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn login_with_wrong_password_returns_401_without_cookie() {
    let state = make_state().await;
    let resp = oneshot_raw(
      state,
      "POST",
      "/auth",
      vec![(header::CONTENT_TYPE, "application/json")],
      r#"{"password": "wrong"}"#,
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
  }

  #[tokio::test]
  async fn login_with_missing_password_returns_400() {
    let state = make_state().await;
    for body in ["{}", r#"{"password": ""}"#] {
      let resp = oneshot_raw(
        state.clone(),
        "POST",
        "/auth",
        vec![(header::CONTENT_TYPE, "application/json")],
        body,
      )
      .await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
  }

  #[tokio::test]
  async fn login_sets_cookie_that_authorizes_later_requests() {
    let state = make_state().await;
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/auth",
      vec![(header::CONTENT_TYPE, "application/json")],
      r#"{"password": "secret123"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp
      .headers()
      .get(header::SET_COOKIE)
      .unwrap()
      .to_str()
      .unwrap()
      .to_string();
    let pair = set_cookie.split(';').next().unwrap().to_string();
    assert_eq!(pair, "auth=secret123");

    // The cookie alone authorizes; no credentials are re-sent.
    let resp = oneshot_raw(
      state,
      "GET",
      "/events",
      vec![(header::COOKIE, pair.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn logout_expires_the_cookie() {
    let state = make_state().await;
    let resp = oneshot_raw(state, "DELETE", "/auth", vec![], "").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp
      .headers()
      .get(header::SET_COOKIE)
      .unwrap()
      .to_str()
      .unwrap();
    assert!(set_cookie.starts_with("auth="), "set-cookie: {set_cookie}");
    assert!(set_cookie.contains("Max-Age=0"), "set-cookie: {set_cookie}");
  }

  // ── Auth gate ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unauthenticated_requests_return_401() {
    let state = make_state().await;

    for (method, uri) in [
      ("GET", "/events"),
      ("POST", "/events"),
      ("GET", "/events/00000000-0000-0000-0000-000000000000"),
      ("PUT", "/events/00000000-0000-0000-0000-000000000000"),
      ("DELETE", "/events/00000000-0000-0000-0000-000000000000"),
    ] {
      let resp = oneshot_raw(
        state.clone(),
        method,
        uri,
        vec![(header::CONTENT_TYPE, "application/json")],
        "{}",
      )
      .await;
      assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
  }

  #[tokio::test]
  async fn stale_cookie_value_returns_401() {
    let state = make_state().await;
    let resp = oneshot_raw(
      state,
      "GET",
      "/events",
      vec![(header::COOKIE, "auth=old-secret")],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_event_with_generated_id() {
    let state = make_state().await;
    let resp = oneshot_authed(state, "POST", "/events", &lunch_body()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let event = body_json(resp).await;
    assert_eq!(event["title"], "Lunch");
    assert_eq!(event["start_time"], "2024-06-01T12:00:00Z");
    assert_eq!(event["end_time"], "2024-06-01T13:00:00Z");
    assert_eq!(event["attendees"], json!([]));
    assert!(event["id"].as_str().unwrap().parse::<uuid::Uuid>().is_ok());
  }

  #[tokio::test]
  async fn create_with_missing_required_field_returns_400() {
    let state = make_state().await;

    let missing_title = json!({
      "start_time": "2024-06-01T12:00:00Z",
      "end_time": "2024-06-01T13:00:00Z",
    });
    let missing_end = json!({
      "title": "Lunch",
      "start_time": "2024-06-01T12:00:00Z",
    });

    for body in [missing_title, missing_end] {
      let resp =
        oneshot_authed(state.clone(), "POST", "/events", &body.to_string())
          .await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
  }

  // ── List ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_returns_events_sorted_by_start_time() {
    let state = make_state().await;

    for day in [20, 3, 11] {
      let body = json!({
        "title": format!("Day {day}"),
        "start_time": format!("2024-06-{day:02}T09:00:00Z"),
        "end_time": format!("2024-06-{day:02}T10:00:00Z"),
      });
      let resp =
        oneshot_authed(state.clone(), "POST", "/events", &body.to_string())
          .await;
      assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = oneshot_authed(state, "GET", "/events", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let events = body_json(resp).await;
    let titles: Vec<_> = events
      .as_array()
      .unwrap()
      .iter()
      .map(|e| e["title"].as_str().unwrap().to_string())
      .collect();
    assert_eq!(titles, ["Day 3", "Day 11", "Day 20"]);
  }

  // ── Get one ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_unknown_event_returns_404() {
    let state = make_state().await;
    let uri = format!("/events/{}", uuid::Uuid::new_v4());
    let resp = oneshot_authed(state, "GET", &uri, "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn get_with_malformed_id_returns_404() {
    let state = make_state().await;
    let resp = oneshot_authed(state, "GET", "/events/unknown-id", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn get_returns_created_event() {
    let state = make_state().await;
    let created =
      body_json(oneshot_authed(state.clone(), "POST", "/events", &lunch_body()).await)
        .await;
    let id = created["id"].as_str().unwrap();

    let resp = oneshot_authed(state, "GET", &format!("/events/{id}"), "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, created);
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn put_applies_partial_update() {
    let state = make_state().await;
    let created =
      body_json(oneshot_authed(state.clone(), "POST", "/events", &lunch_body()).await)
        .await;
    let id = created["id"].as_str().unwrap();

    let patch = json!({
      "title": "Brunch",
      "start_time": "2024-06-01T11:00:00Z",
    });
    let resp = oneshot_authed(
      state,
      "PUT",
      &format!("/events/{id}"),
      &patch.to_string(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let updated = body_json(resp).await;
    assert_eq!(updated["title"], "Brunch");
    assert_eq!(updated["start_time"], "2024-06-01T11:00:00Z");
    // Fields left out of the patch are untouched.
    assert_eq!(updated["end_time"], created["end_time"]);
    assert_eq!(updated["id"], created["id"]);
  }

  #[tokio::test]
  async fn put_unknown_event_returns_404() {
    let state = make_state().await;
    let uri = format!("/events/{}", uuid::Uuid::new_v4());
    let resp =
      oneshot_authed(state, "PUT", &uri, r#"{"title": "Brunch"}"#).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_then_get_returns_404() {
    let state = make_state().await;
    let created =
      body_json(oneshot_authed(state.clone(), "POST", "/events", &lunch_body()).await)
        .await;
    let id = created["id"].as_str().unwrap().to_string();

    let resp =
      oneshot_authed(state.clone(), "DELETE", &format!("/events/{id}"), "")
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "success": true }));

    let resp =
      oneshot_authed(state.clone(), "GET", &format!("/events/{id}"), "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // A second delete surfaces the error; it does not succeed silently.
    let resp =
      oneshot_authed(state, "DELETE", &format!("/events/{id}"), "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_unknown_event_returns_404() {
    let state = make_state().await;
    let uri = format!("/events/{}", uuid::Uuid::new_v4());
    let resp = oneshot_authed(state, "DELETE", &uri, "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
