//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone, Utc};
use datebook_core::{
  event::{EventPatch, NewEvent},
  store::EventStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn lunch(day: u32) -> NewEvent {
  NewEvent {
    title:       format!("Lunch on the {day}th"),
    start_time:  Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
    end_time:    Utc.with_ymd_and_hms(2024, 6, day, 13, 0, 0).unwrap(),
    description: None,
    location:    None,
    attendees:   vec![],
  }
}

// ─── Create / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_event() {
  let s = store().await;

  let created = s
    .create(NewEvent {
      title:       "Lunch".into(),
      start_time:  Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
      end_time:    Utc.with_ymd_and_hms(2024, 6, 1, 13, 0, 0).unwrap(),
      description: Some("Team lunch".into()),
      location:    Some("Cafe".into()),
      attendees:   vec!["Alice".into(), "Bob".into()],
    })
    .await
    .unwrap();

  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
  assert_eq!(fetched.title, "Lunch");
  assert_eq!(fetched.description.as_deref(), Some("Team lunch"));
  assert_eq!(fetched.location.as_deref(), Some("Cafe"));
  assert_eq!(fetched.attendees, &["Alice", "Bob"]);
}

#[tokio::test]
async fn create_assigns_unique_ids() {
  let s = store().await;
  let a = s.create(lunch(1)).await.unwrap();
  let b = s.create(lunch(1)).await.unwrap();
  assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  let result = s.get(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn unordered_time_range_is_accepted() {
  // end before start is stored verbatim; nothing validates the ordering.
  let s = store().await;
  let mut input = lunch(1);
  std::mem::swap(&mut input.start_time, &mut input.end_time);

  let created = s.create(input).await.unwrap();
  assert!(created.end_time < created.start_time);
}

// ─── List ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_empty_store() {
  let s = store().await;
  assert!(s.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_is_sorted_by_start_time() {
  let s = store().await;
  // Insert out of order.
  s.create(lunch(20)).await.unwrap();
  s.create(lunch(3)).await.unwrap();
  s.create(lunch(11)).await.unwrap();

  let events = s.list().await.unwrap();
  assert_eq!(events.len(), 3);
  assert!(events.windows(2).all(|w| w[0].start_time <= w[1].start_time));
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_applies_only_set_fields() {
  let s = store().await;
  let created = s
    .create(NewEvent {
      description: Some("original".into()),
      location:    Some("Cafe".into()),
      attendees:   vec!["Alice".into()],
      ..lunch(1)
    })
    .await
    .unwrap();

  let updated = s
    .update(
      created.id,
      EventPatch {
        title: Some("Brunch".into()),
        start_time: Some(Utc.with_ymd_and_hms(2024, 6, 1, 11, 0, 0).unwrap()),
        ..Default::default()
      },
    )
    .await
    .unwrap();

  assert_eq!(updated.title, "Brunch");
  assert_eq!(
    updated.start_time,
    Utc.with_ymd_and_hms(2024, 6, 1, 11, 0, 0).unwrap()
  );
  // Untouched fields survive.
  assert_eq!(updated.end_time, created.end_time);
  assert_eq!(updated.description.as_deref(), Some("original"));
  assert_eq!(updated.location.as_deref(), Some("Cafe"));
  assert_eq!(updated.attendees, &["Alice"]);
  assert_eq!(updated.created_at, created.created_at);

  // And the merge is persisted, not just returned.
  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_replaces_attendee_list() {
  let s = store().await;
  let created = s
    .create(NewEvent { attendees: vec!["Alice".into()], ..lunch(1) })
    .await
    .unwrap();

  let updated = s
    .update(
      created.id,
      EventPatch {
        attendees: Some(vec!["Bob".into(), "Carol".into()]),
        ..Default::default()
      },
    )
    .await
    .unwrap();

  assert_eq!(updated.attendees, &["Bob", "Carol"]);
}

#[tokio::test]
async fn update_missing_event_errors() {
  let s = store().await;
  let err = s
    .update(Uuid::new_v4(), EventPatch::default())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::EventNotFound(_)));
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_event() {
  let s = store().await;
  let created = s.create(lunch(1)).await.unwrap();

  s.delete(created.id).await.unwrap();
  assert!(s.get(created.id).await.unwrap().is_none());
  assert!(s.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_event_errors() {
  let s = store().await;
  let err = s.delete(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, crate::Error::EventNotFound(_)));
}

#[tokio::test]
async fn second_delete_errors() {
  let s = store().await;
  let created = s.create(lunch(1)).await.unwrap();

  s.delete(created.id).await.unwrap();
  let err = s.delete(created.id).await.unwrap_err();
  assert!(matches!(err, crate::Error::EventNotFound(_)));
}
