//! Lead table pane — bottom panel.

use closewise_core::lead::{Lead, LeadField};
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::Span,
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::app::{App, Screen};

/// One visible column. Status and Date Called are shown but never focused.
#[derive(Clone, Copy)]
enum Column {
  Field(LeadField),
  Status,
  DateCalled,
}

const COLUMNS: [(Column, &str, u16); 9] = [
  (Column::Field(LeadField::Name), "Business", 16),
  (Column::Field(LeadField::Contact), "Contact", 14),
  (Column::Field(LeadField::Phone), "Phone", 12),
  (Column::Field(LeadField::Email), "Email", 18),
  (Column::Status, "Status", 7),
  (Column::Field(LeadField::FollowUpDate), "Follow-Up Date", 14),
  (Column::Field(LeadField::ActivityLog), "Activity Log", 20),
  (Column::Field(LeadField::Score), "Score", 6),
  (Column::DateCalled, "Date Called", 11),
];

/// Render the lead table into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_leads();
  let total = app.store.leads().len();
  let focused = app.screen == Screen::Table;

  // Title with count.
  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" Leads ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Leads ({}) ", total)
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(if focused {
      Style::default().fg(Color::Yellow)
    } else {
      Style::default().fg(Color::DarkGray)
    });

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Filter bar along the bottom of the pane.
  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  if total == 0 {
    f.render_widget(
      Paragraph::new("No leads yet. Fill in the form and press Enter.")
        .style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let due = app.store.today_key();
  let focused_field = app.focused_column();

  let header = Row::new(COLUMNS.iter().map(|(column, title, _)| {
    let style = match column {
      Column::Field(field) if focused && *field == focused_field => Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD),
      _ => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    };
    Cell::from(Span::styled(*title, style))
  }));

  let rows = filtered.iter().enumerate().map(|(i, lead)| {
    let on_cursor = focused && i == app.row_cursor;
    let row_style = if lead.follow_up_date == due {
      Style::default().fg(Color::LightRed)
    } else {
      Style::default()
    };
    Row::new(
      COLUMNS
        .iter()
        .map(|(column, _, _)| cell(app, lead, *column, on_cursor, focused_field)),
    )
    .style(row_style)
  });

  let widths = COLUMNS.iter().map(|(_, _, w)| Constraint::Min(*w));

  let mut state = TableState::default();
  state.select(if filtered.is_empty() || !focused {
    None
  } else {
    Some(app.row_cursor)
  });

  f.render_stateful_widget(
    Table::new(rows, widths)
      .header(header)
      .column_spacing(1)
      .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White)),
    inner_area,
    &mut state,
  );
}

fn cell(
  app: &App,
  lead: &Lead,
  column: Column,
  on_cursor: bool,
  focused_field: LeadField,
) -> Cell<'static> {
  match column {
    Column::Status => Cell::from(lead.status.clone()),
    Column::DateCalled => Cell::from(lead.date_called.clone()),
    Column::Field(field) => {
      let editing = app
        .editing
        .as_ref()
        .filter(|e| e.id == lead.id && e.field == field);
      match editing {
        Some(edit) => Cell::from(Span::styled(
          format!("{}_", edit.buffer),
          Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        None if on_cursor && field == focused_field => Cell::from(Span::styled(
          lead.field(field),
          Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
        None => Cell::from(lead.field(field)),
      }
    }
  }
}
