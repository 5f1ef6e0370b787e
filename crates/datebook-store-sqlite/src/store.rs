//! [`SqliteStore`] — the SQLite implementation of [`EventStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use datebook_core::{
  event::{Event, EventPatch, NewEvent},
  store::EventStore,
};

use crate::{
  Error, Result,
  encode::{RawEvent, encode_attendees, encode_dt, encode_uuid},
  schema::SCHEMA,
};

const EVENT_COLUMNS: &str = "event_id, title, description, location, \
                             start_time, end_time, attendees, created_at";

fn raw_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEvent> {
  Ok(RawEvent {
    event_id:    row.get(0)?,
    title:       row.get(1)?,
    description: row.get(2)?,
    location:    row.get(3)?,
    start_time:  row.get(4)?,
    end_time:    row.get(5)?,
    attendees:   row.get(6)?,
    created_at:  row.get(7)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A datebook event store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`Event`] into the `events` table.
  async fn insert_event(&self, event: &Event) -> Result<()> {
    let id_str         = encode_uuid(event.id);
    let title          = event.title.clone();
    let description    = event.description.clone();
    let location       = event.location.clone();
    let start_str      = encode_dt(event.start_time);
    let end_str        = encode_dt(event.end_time);
    let attendees_str  = encode_attendees(&event.attendees)?;
    let created_at_str = encode_dt(event.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (
             event_id, title, description, location,
             start_time, end_time, attendees, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            title,
            description,
            location,
            start_str,
            end_str,
            attendees_str,
            created_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── EventStore impl ─────────────────────────────────────────────────────────

impl EventStore for SqliteStore {
  type Error = Error;

  async fn create(&self, input: NewEvent) -> Result<Event> {
    let event = Event {
      id:          Uuid::new_v4(),
      title:       input.title,
      description: input.description,
      location:    input.location,
      start_time:  input.start_time.trunc_subsecs(3),
      end_time:    input.end_time.trunc_subsecs(3),
      attendees:   input.attendees,
      // Truncate to the stored column precision so the returned entity
      // equals what a later read yields.
      created_at:  Utc::now().trunc_subsecs(3),
    };

    self.insert_event(&event).await?;
    Ok(event)
  }

  async fn list(&self) -> Result<Vec<Event>> {
    let raws: Vec<RawEvent> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EVENT_COLUMNS} FROM events ORDER BY start_time ASC"
        ))?;
        let rows = stmt
          .query_map([], raw_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn get(&self, id: Uuid) -> Result<Option<Event>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = ?1"),
              rusqlite::params![id_str],
              raw_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  async fn update(&self, id: Uuid, patch: EventPatch) -> Result<Event> {
    let current = self.get(id).await?.ok_or(Error::EventNotFound(id))?;

    // Merge: unset patch fields keep the stored value.
    let updated = Event {
      id:          current.id,
      title:       patch.title.unwrap_or(current.title),
      description: patch.description.or(current.description),
      location:    patch.location.or(current.location),
      start_time:  patch
        .start_time
        .map(|t| t.trunc_subsecs(3))
        .unwrap_or(current.start_time),
      end_time:    patch
        .end_time
        .map(|t| t.trunc_subsecs(3))
        .unwrap_or(current.end_time),
      attendees:   patch.attendees.unwrap_or(current.attendees),
      created_at:  current.created_at,
    };

    let id_str        = encode_uuid(updated.id);
    let title         = updated.title.clone();
    let description   = updated.description.clone();
    let location      = updated.location.clone();
    let start_str     = encode_dt(updated.start_time);
    let end_str       = encode_dt(updated.end_time);
    let attendees_str = encode_attendees(&updated.attendees)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE events SET
             title = ?2, description = ?3, location = ?4,
             start_time = ?5, end_time = ?6, attendees = ?7
           WHERE event_id = ?1",
          rusqlite::params![
            id_str,
            title,
            description,
            location,
            start_str,
            end_str,
            attendees_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(updated)
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM events WHERE event_id = ?1", rusqlite::params![id_str])?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::EventNotFound(id));
    }
    Ok(())
  }
}
