//! Error type for `datebook-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to update or delete an event that was not found.
  #[error("event not found: {0}")]
  EventNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
