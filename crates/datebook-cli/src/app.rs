//! Application state machine and event dispatcher.

use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use chrono::{
  DateTime, Days, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use datebook_core::{
  CalendarView, Event, EventPatch, NewEvent, ViewMode, events_on_day,
};
use uuid::Uuid;

use crate::client::ApiClient;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// The month grid or 5-day strip.
  Calendar,
  /// The event editor modal (create or edit).
  Editor,
}

// ─── Editor form ──────────────────────────────────────────────────────────────

/// Input focus within the editor form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Title,
  Description,
  Location,
  Start,
  End,
  Attendees,
}

impl Field {
  pub fn next(self) -> Self {
    match self {
      Field::Title => Field::Description,
      Field::Description => Field::Location,
      Field::Location => Field::Start,
      Field::Start => Field::End,
      Field::End => Field::Attendees,
      Field::Attendees => Field::Title,
    }
  }

  pub fn previous(self) -> Self {
    match self {
      Field::Title => Field::Attendees,
      Field::Description => Field::Title,
      Field::Location => Field::Description,
      Field::Start => Field::Location,
      Field::End => Field::Start,
      Field::Attendees => Field::End,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Field::Title => "Title",
      Field::Description => "Description",
      Field::Location => "Location",
      Field::Start => "Start",
      Field::End => "End",
      Field::Attendees => "Attendees",
    }
  }
}

/// Times are edited as local wall-clock strings in this format.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The modal form, bound to an existing event (edit mode) or a target day
/// (create mode).
#[derive(Debug, Clone)]
pub struct EditorForm {
  /// `Some` in edit mode.
  pub editing:      Option<Uuid>,
  pub title:        String,
  pub description:  String,
  pub location:     String,
  pub start:        String,
  pub end:          String,
  pub attendees:    Vec<String>,
  /// Pending attendee entry, committed with Enter.
  pub new_attendee: String,
  pub focus:        Field,
}

impl EditorForm {
  /// Create mode: an empty form on `day`, defaulting to 09:00–10:00.
  pub fn create(day: NaiveDate) -> Self {
    Self {
      editing:      None,
      title:        String::new(),
      description:  String::new(),
      location:     String::new(),
      start:        format!("{} 09:00", day.format("%Y-%m-%d")),
      end:          format!("{} 10:00", day.format("%Y-%m-%d")),
      attendees:    Vec::new(),
      new_attendee: String::new(),
      focus:        Field::Title,
    }
  }

  /// Edit mode: pre-filled from `event`, times shown in the local offset.
  pub fn edit(event: &Event, offset: FixedOffset) -> Self {
    Self {
      editing:      Some(event.id),
      title:        event.title.clone(),
      description:  event.description.clone().unwrap_or_default(),
      location:     event.location.clone().unwrap_or_default(),
      start:        event
        .start_time
        .with_timezone(&offset)
        .format(TIME_FORMAT)
        .to_string(),
      end:          event
        .end_time
        .with_timezone(&offset)
        .format(TIME_FORMAT)
        .to_string(),
      attendees:    event.attendees.clone(),
      new_attendee: String::new(),
      focus:        Field::Title,
    }
  }

  pub fn to_new_event(&self, offset: FixedOffset) -> anyhow::Result<NewEvent> {
    if self.title.is_empty() {
      bail!("title is required");
    }
    Ok(NewEvent {
      title:       self.title.clone(),
      start_time:  parse_local(&self.start, offset)?,
      end_time:    parse_local(&self.end, offset)?,
      description: Some(self.description.clone()),
      location:    Some(self.location.clone()),
      attendees:   self.attendees.clone(),
    })
  }

  /// The editor resends every field on save, so the wire-level patch is a
  /// full replacement.
  pub fn to_patch(&self, offset: FixedOffset) -> anyhow::Result<EventPatch> {
    if self.title.is_empty() {
      bail!("title is required");
    }
    Ok(EventPatch {
      title:       Some(self.title.clone()),
      start_time:  Some(parse_local(&self.start, offset)?),
      end_time:    Some(parse_local(&self.end, offset)?),
      description: Some(self.description.clone()),
      location:    Some(self.location.clone()),
      attendees:   Some(self.attendees.clone()),
    })
  }

  /// The text buffer for the focused field.
  fn buffer_mut(&mut self) -> &mut String {
    match self.focus {
      Field::Title => &mut self.title,
      Field::Description => &mut self.description,
      Field::Location => &mut self.location,
      Field::Start => &mut self.start,
      Field::End => &mut self.end,
      Field::Attendees => &mut self.new_attendee,
    }
  }
}

/// Parse `YYYY-MM-DD HH:MM` in the given local offset to UTC.
fn parse_local(s: &str, offset: FixedOffset) -> anyhow::Result<DateTime<Utc>> {
  let naive = NaiveDateTime::parse_from_str(s.trim(), TIME_FORMAT)
    .with_context(|| format!("invalid time {s:?}, expected YYYY-MM-DD HH:MM"))?;
  let local = offset
    .from_local_datetime(&naive)
    .single()
    .ok_or_else(|| anyhow!("ambiguous local time {s:?}"))?;
  Ok(local.with_timezone(&Utc))
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// Visible-range state (reference month, 5-day anchor, today).
  pub view: CalendarView,

  /// Local UTC offset captured at startup; all day bucketing and editor
  /// times use it.
  pub offset: FixedOffset,

  /// Full event list from the last fetch, ordered by start time.
  pub events: Vec<Event>,

  /// The selected day in the grid.
  pub cursor: NaiveDate,

  /// Index into the cursor day's event bucket.
  pub event_cursor: usize,

  /// The open editor form, if any.
  pub editor: Option<EditorForm>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  /// Create an [`App`] with an empty event list, anchored on the local
  /// current date.
  pub fn new(client: ApiClient, mode: ViewMode) -> Self {
    let now = Local::now();
    let today = now.date_naive();
    Self {
      screen: Screen::Calendar,
      view: CalendarView::new(today, mode),
      offset: *now.offset(),
      events: Vec::new(),
      cursor: today,
      event_cursor: 0,
      editor: None,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Full refetch — the server's list replaces the local copy wholesale.
  pub async fn load_events(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading events…".into();
    match self.client.list_events().await {
      Ok(events) => {
        self.events = events;
        self.status_msg = String::new();
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  // ── Selection ─────────────────────────────────────────────────────────────

  /// Events bucketed under the cursor day.
  pub fn events_under_cursor(&self) -> Vec<&Event> {
    events_on_day(&self.events, self.cursor, self.offset)
  }

  fn clamp_event_cursor(&mut self) {
    let len = self.events_under_cursor().len();
    if self.event_cursor >= len {
      self.event_cursor = len.saturating_sub(1);
    }
  }

  fn move_cursor(&mut self, days: i64) {
    self.cursor = if days < 0 {
      self.cursor - Days::new(days.unsigned_abs())
    } else {
      self.cursor + Days::new(days as u64)
    };
    self.event_cursor = 0;
    self.align_view_to_cursor();
  }

  /// Shift the visible period when the cursor walks off its edge.
  fn align_view_to_cursor(&mut self) {
    let days = self.view.visible_days();
    let outside = days.first().is_some_and(|d| self.cursor < *d)
      || days.last().is_some_and(|d| self.cursor > *d);
    if !outside {
      return;
    }
    match self.view.mode {
      ViewMode::Month => self.view.reference = self.cursor,
      ViewMode::FiveDay => {
        if self.cursor < self.view.anchor {
          self.view.anchor = self.view.anchor - Days::new(5);
        } else {
          self.view.anchor = self.view.anchor + Days::new(5);
        }
      }
    }
  }

  /// Pull the cursor back into view after period navigation.
  fn snap_cursor_to_view(&mut self) {
    let days = self.view.visible_days();
    let outside = days.first().is_some_and(|d| self.cursor < *d)
      || days.last().is_some_and(|d| self.cursor > *d);
    if outside {
      self.cursor = match self.view.mode {
        ViewMode::Month => self.view.reference,
        ViewMode::FiveDay => self.view.anchor,
      };
    }
    self.event_cursor = 0;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.screen {
      Screen::Calendar => Ok(self.handle_calendar_key(key).await),
      Screen::Editor => {
        self.handle_editor_key(key).await;
        Ok(true)
      }
    }
  }

  async fn handle_calendar_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      // Quit
      KeyCode::Char('q') => return false,

      // Day cursor
      KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1),
      KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1),
      KeyCode::Down | KeyCode::Char('j') => {
        let step = match self.view.mode {
          ViewMode::Month => 7,
          ViewMode::FiveDay => 1,
        };
        self.move_cursor(step);
      }
      KeyCode::Up | KeyCode::Char('k') => {
        let step = match self.view.mode {
          ViewMode::Month => -7,
          ViewMode::FiveDay => -1,
        };
        self.move_cursor(step);
      }

      // Event selection within the cursor day
      KeyCode::Char(']') => {
        let len = self.events_under_cursor().len();
        if len > 0 && self.event_cursor + 1 < len {
          self.event_cursor += 1;
        }
      }
      KeyCode::Char('[') => {
        if self.event_cursor > 0 {
          self.event_cursor -= 1;
        }
      }

      // Period navigation
      KeyCode::Char('p') | KeyCode::PageUp => {
        self.view.previous();
        self.snap_cursor_to_view();
      }
      KeyCode::Char('n') | KeyCode::PageDown => {
        self.view.next();
        self.snap_cursor_to_view();
      }
      KeyCode::Char('t') => {
        let today = Local::now().date_naive();
        self.view.go_to_today(today);
        self.cursor = today;
        self.event_cursor = 0;
      }

      // View mode toggle (month grid ↔ 5-day strip)
      KeyCode::Char('m') => {
        self.view.mode = match self.view.mode {
          ViewMode::Month => ViewMode::FiveDay,
          ViewMode::FiveDay => ViewMode::Month,
        };
        self.view.anchor = self.cursor;
        self.view.reference = self.cursor;
      }

      // Refetch
      KeyCode::Char('r') => {
        // Failure already lands in the status bar.
        let _ = self.load_events().await;
        self.clamp_event_cursor();
      }

      // New event on the cursor day
      KeyCode::Enter => {
        self.editor = Some(EditorForm::create(self.cursor));
        self.screen = Screen::Editor;
      }

      // Edit the selected event
      KeyCode::Char('e') => {
        let selected = self
          .events_under_cursor()
          .get(self.event_cursor)
          .map(|e| (*e).clone());
        if let Some(event) = selected {
          self.editor = Some(EditorForm::edit(&event, self.offset));
          self.screen = Screen::Editor;
        }
      }

      _ => {}
    }
    true
  }

  async fn handle_editor_key(&mut self, key: KeyEvent) {
    let Some(form) = self.editor.as_mut() else {
      self.screen = Screen::Calendar;
      return;
    };

    // Ctrl-S saves, Ctrl-D deletes (edit mode only).
    if key.modifiers.contains(KeyModifiers::CONTROL) {
      match key.code {
        KeyCode::Char('s') => self.save_editor().await,
        KeyCode::Char('d') => self.delete_editor().await,
        _ => {}
      }
      return;
    }

    match key.code {
      KeyCode::Esc => {
        self.editor = None;
        self.screen = Screen::Calendar;
      }
      KeyCode::Tab => form.focus = form.focus.next(),
      KeyCode::BackTab => form.focus = form.focus.previous(),
      KeyCode::Enter => {
        if form.focus == Field::Attendees {
          // Commit the pending attendee entry.
          if !form.new_attendee.is_empty() {
            let name = std::mem::take(&mut form.new_attendee);
            form.attendees.push(name);
          }
        } else {
          self.save_editor().await;
        }
      }
      KeyCode::Backspace => {
        let buffer = form.buffer_mut();
        if buffer.pop().is_none() && form.focus == Field::Attendees {
          // Empty pending entry: remove the last committed attendee.
          form.attendees.pop();
        }
      }
      KeyCode::Char(c) => form.buffer_mut().push(c),
      _ => {}
    }
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  async fn save_editor(&mut self) {
    let Some(form) = self.editor.clone() else { return };

    let result = match form.editing {
      None => match form.to_new_event(self.offset) {
        Ok(input) => self
          .client
          .create_event(&input)
          .await
          .map(|_| "Event created"),
        Err(e) => Err(e),
      },
      Some(id) => match form.to_patch(self.offset) {
        Ok(patch) => self
          .client
          .update_event(id, &patch)
          .await
          .map(|_| "Event updated"),
        Err(e) => Err(e),
      },
    };

    self.finish_mutation(result).await;
  }

  async fn delete_editor(&mut self) {
    let Some(id) = self.editor.as_ref().and_then(|f| f.editing) else {
      return;
    };
    let result = self.client.delete_event(id).await.map(|_| "Event deleted");
    self.finish_mutation(result).await;
  }

  /// On success: close the modal, refetch everything, show the toast. On
  /// failure: keep the form open and show the error; prior state is
  /// unchanged.
  async fn finish_mutation(&mut self, result: anyhow::Result<&'static str>) {
    match result {
      Ok(msg) => {
        self.editor = None;
        self.screen = Screen::Calendar;
        let _ = self.load_events().await;
        if self.status_msg.is_empty() {
          self.status_msg = msg.to_string();
        }
        self.clamp_event_cursor();
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
      }
    }
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
