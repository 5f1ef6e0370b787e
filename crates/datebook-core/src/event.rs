//! Event — the calendar entry.
//!
//! An event is a self-contained row: title, a time range, optional
//! description/location, and an ordered list of attendee names. Attendees
//! are free text with no identity linkage; the calendar has exactly one
//! user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single calendar entry.
///
/// `start_time` and `end_time` carry no ordering invariant; the store and
/// the API accept any pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
  pub id:          Uuid,
  pub title:       String,
  pub description: Option<String>,
  pub location:    Option<String>,
  pub start_time:  DateTime<Utc>,
  pub end_time:    DateTime<Utc>,
  pub attendees:   Vec<String>,
  pub created_at:  DateTime<Utc>,
}

/// Input for creating an event. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
  pub title:      String,
  pub start_time: DateTime<Utc>,
  pub end_time:   DateTime<Utc>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub location:    Option<String>,
  #[serde(default)]
  pub attendees:   Vec<String>,
}

/// A partial update. `None` fields are left untouched by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
  pub title:       Option<String>,
  pub start_time:  Option<DateTime<Utc>>,
  pub end_time:    Option<DateTime<Utc>>,
  pub description: Option<String>,
  pub location:    Option<String>,
  pub attendees:   Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn event_wire_roundtrip_preserves_fields() {
    let event = Event {
      id:          Uuid::new_v4(),
      title:       "Lunch".into(),
      description: Some("Team lunch".into()),
      location:    None,
      start_time:  Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
      end_time:    Utc.with_ymd_and_hms(2024, 6, 1, 13, 0, 0).unwrap(),
      attendees:   vec!["Alice".into(), "Bob".into()],
      created_at:  Utc.with_ymd_and_hms(2024, 5, 30, 8, 15, 0).unwrap(),
    };

    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
  }

  #[test]
  fn new_event_attendees_default_to_empty() {
    let input: NewEvent = serde_json::from_str(
      r#"{
        "title": "Lunch",
        "start_time": "2024-06-01T12:00:00Z",
        "end_time": "2024-06-01T13:00:00Z"
      }"#,
    )
    .unwrap();

    assert!(input.attendees.is_empty());
    assert!(input.description.is_none());
    assert!(input.location.is_none());
  }

  #[test]
  fn patch_defaults_to_all_unset() {
    let patch: EventPatch = serde_json::from_str("{}").unwrap();
    assert!(patch.title.is_none());
    assert!(patch.start_time.is_none());
    assert!(patch.attendees.is_none());
  }
}
