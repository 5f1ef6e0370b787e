//! Core types and trait definitions for the datebook calendar.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod event;
pub mod store;
pub mod view;

pub use event::{Event, EventPatch, NewEvent};
pub use view::{CalendarView, DayKind, ViewMode, events_on_day};
