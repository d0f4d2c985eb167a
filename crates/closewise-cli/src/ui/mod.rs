//! TUI rendering — orchestrates all panes.

pub mod lead_form;
pub mod lead_table;

use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, form, table, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(lead_form::HEIGHT),
      Constraint::Min(0), // table
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  lead_form::draw(f, rows[1], app);
  lead_table::draw(f, rows[2], app);
  draw_status(f, rows[3], app);

  if let Some(reminder) = &app.reminder {
    draw_reminder(f, area, &reminder.to_string());
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  // Same day the due rows and the reminder are computed against.
  let date = app.store.today_key();

  let left = Span::styled(
    " closewise  Smart Sales. Smarter CRM.",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::Blue));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = if app.reminder.is_some() {
    ("REMIND", "any key to dismiss")
  } else if app.editing.is_some() {
    ("EDIT", "Enter save  Esc cancel")
  } else if app.filter_active {
    ("SEARCH", "Type to filter  Esc cancel  Enter done")
  } else {
    match app.screen {
      Screen::Form => (
        "FORM",
        "Tab/↑↓ field  Enter add lead  Esc table  Ctrl-C quit",
      ),
      Screen::Table => (
        "TABLE",
        "↑↓/jk row  ←→/hl column  Enter edit  / search  a add  q quit",
      ),
    }
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Yellow)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::Gray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Reminder modal ───────────────────────────────────────────────────────────

fn draw_reminder(f: &mut Frame, area: Rect, message: &str) {
  let popup = centered(area, 50, 5);
  let block = Block::default()
    .title(" Follow-up ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow))
    .style(Style::default().bg(Color::Black));

  f.render_widget(Clear, popup);
  f.render_widget(
    Paragraph::new(vec![
      Line::from(message.to_owned()),
      Line::from(Span::styled(
        "press any key",
        Style::default().fg(Color::DarkGray),
      )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(block),
    popup,
  );
}

/// A `width` x `height` rectangle centred in `area`, clamped to fit.
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

#[cfg(test)]
mod tests {
  use closewise_core::{lead::DraftField, store::LeadStore};
  use ratatui::{Terminal, backend::TestBackend};

  use super::*;

  fn render(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(140, 24)).unwrap();
    terminal.draw(|f| draw(f, app)).unwrap();
    terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect()
  }

  #[test]
  fn renders_form_and_table() {
    let mut store = LeadStore::default();
    store.set_draft_field(DraftField::Name, "Acme");
    store.add_lead();
    store.set_draft_field(DraftField::Contact, "Jo Draft");
    let app = App::new(store);

    let screen = render(&app);
    assert!(screen.contains("Add New Lead"));
    assert!(screen.contains("Jo Draft"));
    assert!(screen.contains("Leads (1)"));
    assert!(screen.contains("Acme"));
    assert!(screen.contains("New"));
  }

  #[test]
  fn renders_reminder_modal() {
    let mut store = LeadStore::default();
    let today = store.today_key();
    store.set_draft_field(DraftField::FollowUpDate, today);
    let outcome = store.add_lead();
    let mut app = App::new(store);
    app.reminder = outcome.reminder;

    let screen = render(&app);
    assert!(screen.contains("You have 1 leads to follow up today."));
  }

  #[test]
  fn header_date_matches_due_highlighting() {
    let app = App::new(LeadStore::default());
    let today = app.store.today_key();
    let header: String = render(&app).chars().take(140).collect();
    assert!(header.contains(&today), "{header}");
  }

  #[test]
  fn centered_clamps_to_area() {
    let area = Rect::new(0, 0, 10, 3);
    assert_eq!(centered(area, 50, 5), area);
  }
}
