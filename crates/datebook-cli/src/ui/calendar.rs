//! Calendar body — month grid and 5-day strip.

use chrono::NaiveDate;
use datebook_core::{DayKind, ViewMode, events_on_day};
use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Render the calendar into `area` according to the current view mode.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  match app.view.mode {
    ViewMode::Month => draw_month(f, area, app),
    ViewMode::FiveDay => draw_strip(f, area, app),
  }
}

// ─── Month grid ───────────────────────────────────────────────────────────────

fn draw_month(f: &mut Frame, area: Rect, app: &App) {
  let days = app.view.visible_days();
  let weeks: Vec<&[NaiveDate]> = days.chunks(7).collect();

  // One header line, then evenly-sized week rows.
  let mut constraints = vec![Constraint::Length(1)];
  constraints.extend(
    std::iter::repeat(Constraint::Ratio(1, weeks.len() as u32)).take(weeks.len()),
  );
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints(constraints)
    .split(area);

  draw_weekday_header(f, rows[0]);

  for (i, week) in weeks.iter().enumerate() {
    let cols = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Ratio(1, 7); 7])
      .split(rows[i + 1]);
    for (j, day) in week.iter().enumerate() {
      draw_day_cell(f, cols[j], app, *day, false);
    }
  }
}

fn draw_weekday_header(f: &mut Frame, area: Rect) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Ratio(1, 7); 7])
    .split(area);

  for (i, name) in WEEKDAYS.iter().enumerate() {
    f.render_widget(
      Paragraph::new(*name)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan)),
      cols[i],
    );
  }
}

// ─── 5-day strip ──────────────────────────────────────────────────────────────

fn draw_strip(f: &mut Frame, area: Rect, app: &App) {
  let days = app.view.visible_days();

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Ratio(1, 5); 5])
    .split(area);

  for (i, day) in days.iter().enumerate() {
    draw_day_cell(f, cols[i], app, *day, true);
  }
}

// ─── Day cell ─────────────────────────────────────────────────────────────────

fn draw_day_cell(
  f: &mut Frame,
  area: Rect,
  app: &App,
  day: NaiveDate,
  full_date_title: bool,
) {
  let kind = app.view.day_kind(day);
  let is_cursor = day == app.cursor;

  let border_style = if is_cursor {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::DarkGray)
  };

  let title_style = match kind {
    DayKind::Today => Style::default()
      .fg(Color::Magenta)
      .add_modifier(Modifier::BOLD),
    DayKind::InMonth => Style::default().fg(Color::White),
    DayKind::BeforeMonth | DayKind::AfterMonth => {
      Style::default().fg(Color::DarkGray)
    }
  };

  let title = if full_date_title {
    format!(" {} ", day.format("%a %b %-d"))
  } else {
    format!(" {} ", day.format("%-d"))
  };

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(border_style)
    .title(Span::styled(title, title_style));
  let inner = block.inner(area);
  f.render_widget(block, area);

  // One line per event, clipped to the cell height.
  let events = events_on_day(&app.events, day, app.offset);
  let lines: Vec<Line> = events
    .iter()
    .take(inner.height as usize)
    .enumerate()
    .map(|(i, event)| {
      let time = event.start_time.with_timezone(&app.offset).format("%H:%M");
      let selected = is_cursor && i == app.event_cursor;
      let style = if selected {
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(Color::Magenta)
      };
      Line::from(Span::styled(format!("{time} {}", event.title), style))
    })
    .collect();

  f.render_widget(Paragraph::new(lines), inner);
}
