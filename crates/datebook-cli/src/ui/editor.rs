//! Event editor modal — create and edit forms.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, Field};

const FIELDS: [Field; 6] = [
  Field::Title,
  Field::Description,
  Field::Location,
  Field::Start,
  Field::End,
  Field::Attendees,
];

/// Render the editor as a centered modal over `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(form) = &app.editor else { return };

  // Tall enough for the fields plus the attendee list.
  let height = (FIELDS.len() + form.attendees.len() + 4).min(area.height as usize);
  let modal = centered(area, 60, height as u16);

  let title = if form.editing.is_some() {
    " Edit Event "
  } else {
    " New Event "
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Magenta));
  let inner = block.inner(modal);

  f.render_widget(Clear, modal);
  f.render_widget(block, modal);

  let mut lines: Vec<Line> = Vec::new();
  for field in FIELDS {
    let focused = form.focus == field;
    let label_style = if focused {
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };

    let value = match field {
      Field::Title => form.title.as_str(),
      Field::Description => form.description.as_str(),
      Field::Location => form.location.as_str(),
      Field::Start => form.start.as_str(),
      Field::End => form.end.as_str(),
      Field::Attendees => form.new_attendee.as_str(),
    };

    // A trailing underscore marks the input cursor on the focused field.
    let shown = if focused {
      format!("{value}_")
    } else {
      value.to_string()
    };

    lines.push(Line::from(vec![
      Span::styled(format!("{:>12}: ", field.label()), label_style),
      Span::raw(shown),
    ]));
  }

  for name in &form.attendees {
    lines.push(Line::from(vec![
      Span::raw("              - "),
      Span::styled(name.clone(), Style::default().fg(Color::Magenta)),
    ]));
  }

  lines.push(Line::default());
  let hint = if form.editing.is_some() {
    "Enter save  ^D delete  Esc cancel"
  } else {
    "Enter save  Esc cancel"
  };
  lines.push(Line::from(Span::styled(
    hint,
    Style::default().fg(Color::DarkGray),
  )));

  f.render_widget(Paragraph::new(lines), inner);
}

/// A `width`×`height` rect centered inside `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}
