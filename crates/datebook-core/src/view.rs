//! Calendar view model — which dates are visible and which events belong
//! to each visible date.
//!
//! Pure date arithmetic; rendering lives in the client. The view tracks a
//! reference date (month mode) and an anchor date (5-day mode) and derives
//! everything else.

use chrono::{Datelike, Days, FixedOffset, Months, NaiveDate};

use crate::event::Event;

// ─── View mode ───────────────────────────────────────────────────────────────

/// Which layout the calendar is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
  /// Full month grid, padded to whole weeks.
  Month,
  /// A strip of 5 consecutive days starting at the anchor.
  FiveDay,
}

/// Styling classification for a visible day. Purely derived; carries no
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
  Today,
  InMonth,
  BeforeMonth,
  AfterMonth,
}

// ─── CalendarView ────────────────────────────────────────────────────────────

/// Tracks the visible period and answers date queries for the calendar UI.
///
/// `today` is supplied by the caller (the client captures it from the
/// local clock once at startup and again on explicit "today" navigation)
/// so the model itself stays deterministic.
#[derive(Debug, Clone)]
pub struct CalendarView {
  pub mode:      ViewMode,
  pub today:     NaiveDate,
  /// Decides the visible month in [`ViewMode::Month`].
  pub reference: NaiveDate,
  /// First day of the strip in [`ViewMode::FiveDay`].
  pub anchor:    NaiveDate,
}

impl CalendarView {
  pub fn new(today: NaiveDate, mode: ViewMode) -> Self {
    Self { mode, today, reference: today, anchor: today }
  }

  /// The inclusive run of visible days, in order.
  ///
  /// Month mode spans the calendar-grid superset of the month: from the
  /// Sunday of the week containing the 1st through the Saturday of the
  /// week containing the last day. 5-day mode is exactly the anchor and
  /// the four days after it.
  pub fn visible_days(&self) -> Vec<NaiveDate> {
    match self.mode {
      ViewMode::Month => {
        let month_start = self.month_start();
        let month_end = month_start + Months::new(1) - Days::new(1);

        let grid_start = month_start
          - Days::new(u64::from(month_start.weekday().num_days_from_sunday()));
        let grid_end = month_end
          + Days::new(u64::from(6 - month_end.weekday().num_days_from_sunday()));

        grid_start.iter_days().take_while(|d| *d <= grid_end).collect()
      }
      ViewMode::FiveDay => {
        self.anchor.iter_days().take(5).collect()
      }
    }
  }

  /// Shift back one month (month mode) or 5 days (5-day mode).
  ///
  /// Month arithmetic clamps the day-of-month when the target month is
  /// shorter (Mar 31 → Feb 29).
  pub fn previous(&mut self) {
    match self.mode {
      ViewMode::Month => self.reference = self.reference - Months::new(1),
      ViewMode::FiveDay => self.anchor = self.anchor - Days::new(5),
    }
  }

  /// Shift forward one month (month mode) or 5 days (5-day mode).
  pub fn next(&mut self) {
    match self.mode {
      ViewMode::Month => self.reference = self.reference + Months::new(1),
      ViewMode::FiveDay => self.anchor = self.anchor + Days::new(5),
    }
  }

  /// Jump back to the current date, resetting both the reference and the
  /// anchor.
  pub fn go_to_today(&mut self, today: NaiveDate) {
    self.today = today;
    self.reference = today;
    self.anchor = today;
  }

  /// Classify a visible day relative to today and the reference month.
  pub fn day_kind(&self, day: NaiveDate) -> DayKind {
    if day == self.today {
      DayKind::Today
    } else if day.year() == self.reference.year()
      && day.month() == self.reference.month()
    {
      DayKind::InMonth
    } else if day < self.month_start() {
      DayKind::BeforeMonth
    } else {
      DayKind::AfterMonth
    }
  }

  /// Header label: `"June 2024"` in month mode, `"Jun 3 - Jun 7, 2024"`
  /// in 5-day mode.
  pub fn heading(&self) -> String {
    match self.mode {
      ViewMode::Month => self.reference.format("%B %Y").to_string(),
      ViewMode::FiveDay => {
        let end = self.anchor + Days::new(4);
        format!("{} - {}", self.anchor.format("%b %-d"), end.format("%b %-d, %Y"))
      }
    }
  }

  fn month_start(&self) -> NaiveDate {
    // Day 1 exists in every month.
    self.reference.with_day(1).unwrap()
  }
}

// ─── Bucketing ───────────────────────────────────────────────────────────────

/// The events whose start timestamp falls on `day` in the given local
/// offset, in input order.
///
/// A multi-day event appears only under its start day — it is not
/// replicated across the days it spans.
pub fn events_on_day<'a>(
  events: &'a [Event],
  day: NaiveDate,
  offset: FixedOffset,
) -> Vec<&'a Event> {
  events
    .iter()
    .filter(|e| e.start_time.with_timezone(&offset).date_naive() == day)
    .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
