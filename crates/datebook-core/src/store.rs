//! The `EventStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `datebook-store-sqlite`). Higher layers (`datebook-server`,
//! `datebook-cli`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use uuid::Uuid;

use crate::event::{Event, EventPatch, NewEvent};

/// Abstraction over a datebook storage backend.
///
/// Every operation is a direct pass-through to the backing table; the
/// backend surfaces its failures unchanged through `Self::Error`. There is
/// no transactional coupling across operations and no pagination —
/// `list` returns the whole table, which is acceptable for a single
/// user's personal calendar.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait EventStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create and persist a new event. The backend assigns `id` and
  /// `created_at`.
  fn create(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  /// All events, ordered by `start_time` ascending.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  /// Retrieve an event by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  /// Apply a partial update and return the updated event.
  ///
  /// Fields left `None` in `patch` are untouched. Errors if `id` does not
  /// exist.
  fn update(
    &self,
    id: Uuid,
    patch: EventPatch,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  /// Delete an event permanently. Errors if `id` does not exist — a
  /// second delete of the same id is a failure, not a silent success.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
