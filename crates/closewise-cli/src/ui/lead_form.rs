//! New-lead form pane — top panel.

use closewise_core::lead::DraftField;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use strum::IntoEnumIterator;

use crate::app::{App, Screen};

/// Three rows of two fields, plus borders.
pub const HEIGHT: u16 = 5;

pub fn label(field: DraftField) -> &'static str {
  match field {
    DraftField::Name => "Business Name",
    DraftField::Contact => "Contact Person",
    DraftField::Phone => "Phone Number",
    DraftField::Email => "Email",
    DraftField::FollowUpDate => "Follow-Up Date",
    DraftField::Notes => "Notes",
  }
}

/// Render the draft form into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let focused = app.screen == Screen::Form
    && app.editing.is_none()
    && !app.filter_active;

  let block = Block::default()
    .title(" Add New Lead ")
    .borders(Borders::ALL)
    .border_style(if focused {
      Style::default().fg(Color::Yellow)
    } else {
      Style::default().fg(Color::DarkGray)
    });
  let inner = block.inner(area);
  f.render_widget(block, area);

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(inner);

  // Lay the fields out left-to-right, top-to-bottom.
  let mut left = Vec::new();
  let mut right = Vec::new();
  for (i, field) in DraftField::iter().enumerate() {
    let is_cursor = focused && i == app.form_cursor;
    let line = field_line(field, app.store.draft().field(field), is_cursor);
    if i % 2 == 0 {
      left.push(line);
    } else {
      right.push(line);
    }
  }

  f.render_widget(Paragraph::new(left), cols[0]);
  f.render_widget(Paragraph::new(right), cols[1]);
}

fn field_line(field: DraftField, value: &str, is_cursor: bool) -> Line<'static> {
  let label_style = if is_cursor {
    Style::default()
      .fg(Color::Yellow)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Cyan)
  };

  let value = if is_cursor {
    format!("{value}_")
  } else {
    value.to_owned()
  };

  Line::from(vec![
    Span::styled(format!(" {:<16}", label(field)), label_style),
    Span::raw(value),
  ])
}
