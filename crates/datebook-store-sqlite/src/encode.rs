//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings with
//! millisecond precision, which makes `ORDER BY start_time` sort
//! chronologically. Attendees are stored as a compact JSON array. UUIDs
//! are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use datebook_core::Event;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Attendees ───────────────────────────────────────────────────────────────

pub fn encode_attendees(attendees: &[String]) -> Result<String> {
  Ok(serde_json::to_string(attendees)?)
}

pub fn decode_attendees(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw strings read directly from an `events` row.
pub struct RawEvent {
  pub event_id:    String,
  pub title:       String,
  pub description: Option<String>,
  pub location:    Option<String>,
  pub start_time:  String,
  pub end_time:    String,
  pub attendees:   String,
  pub created_at:  String,
}

impl RawEvent {
  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      id:          decode_uuid(&self.event_id)?,
      title:       self.title,
      description: self.description,
      location:    self.location,
      start_time:  decode_dt(&self.start_time)?,
      end_time:    decode_dt(&self.end_time)?,
      attendees:   decode_attendees(&self.attendees)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
