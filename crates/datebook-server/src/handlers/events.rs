//! Handlers for `/events` endpoints.
//!
//! | Method   | Path           | Notes                                     |
//! |----------|----------------|-------------------------------------------|
//! | `GET`    | `/events`      | Full list, ordered by start time          |
//! | `POST`   | `/events`      | 400 unless title/start_time/end_time set  |
//! | `GET`    | `/events/{id}` | 404 if not found                          |
//! | `PUT`    | `/events/{id}` | Partial update; absent fields untouched   |
//! | `DELETE` | `/events/{id}` | 404 if not found, also on a second delete |
//!
//! Every route sits behind the auth gate.

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use datebook_core::{
  event::{Event, EventPatch, NewEvent},
  store::EventStore,
};

use crate::{AppState, auth::Authenticated, error::Error};

/// Path ids are opaque to clients: anything that does not parse as a UUID
/// cannot exist in the store, so it surfaces as 404 rather than 400.
fn parse_id(id: &str) -> Result<Uuid, Error> {
  Uuid::parse_str(id).map_err(|_| Error::NotFound)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /events`
pub async fn list<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Event>>, Error>
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let events = state
    .store
    .list()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Json(events))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// Wire shape for `POST /events`. Required fields are options here so a
/// missing field surfaces as a 400 with its name rather than a
/// deserialisation rejection.
#[derive(Debug, Deserialize)]
pub struct CreateEventBody {
  pub title:       Option<String>,
  pub start_time:  Option<DateTime<Utc>>,
  pub end_time:    Option<DateTime<Utc>>,
  pub description: Option<String>,
  pub location:    Option<String>,
  pub attendees:   Option<Vec<String>>,
}

/// `POST /events`
pub async fn create<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Json(body): Json<CreateEventBody>,
) -> Result<Json<Event>, Error>
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let title = match body.title {
    Some(t) if !t.is_empty() => t,
    _ => return Err(Error::MissingField("title")),
  };
  let start_time = body.start_time.ok_or(Error::MissingField("start_time"))?;
  let end_time = body.end_time.ok_or(Error::MissingField("end_time"))?;

  let event = state
    .store
    .create(NewEvent {
      title,
      start_time,
      end_time,
      description: body.description,
      location: body.location,
      attendees: body.attendees.unwrap_or_default(),
    })
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(Json(event))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /events/{id}`
pub async fn get_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Event>, Error>
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = parse_id(&id)?;
  let event = state
    .store
    .get(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound)?;
  Ok(Json(event))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /events/{id}` — body: any subset of event fields.
pub async fn update_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  Json(patch): Json<EventPatch>,
) -> Result<Json<Event>, Error>
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = parse_id(&id)?;

  // Existence check first so an unknown id is a 404, not a backend error.
  state
    .store
    .get(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound)?;

  let event = state
    .store
    .update(id, patch)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Json(event))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /events/{id}`
pub async fn delete_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, Error>
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = parse_id(&id)?;

  state
    .store
    .get(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound)?;

  state
    .store
    .delete(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Json(json!({ "success": true })))
}
