//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,

  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("event not found")]
  NotFound,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      Error::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "unauthorized".to_string())
      }
      Error::MissingField(field) => {
        (StatusCode::BAD_REQUEST, format!("{field} is required"))
      }
      Error::NotFound => (StatusCode::NOT_FOUND, "event not found".to_string()),
      Error::Store(e) => {
        // The cause goes to the log; the client gets a generic message.
        tracing::error!(error = %e, "store operation failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "internal server error".to_string(),
        )
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
