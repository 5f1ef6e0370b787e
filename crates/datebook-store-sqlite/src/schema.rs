//! SQL schema for the datebook SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS events (
    event_id    TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    location    TEXT,
    start_time  TEXT NOT NULL,   -- RFC 3339 UTC, millisecond precision
    end_time    TEXT NOT NULL,   -- no ordering constraint against start_time
    attendees   TEXT NOT NULL DEFAULT '[]',  -- JSON array of names
    created_at  TEXT NOT NULL
);

-- list() always orders by start time.
CREATE INDEX IF NOT EXISTS events_start_idx ON events(start_time);

PRAGMA user_version = 1;
";
