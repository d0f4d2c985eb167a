//! Application state machine and event dispatcher.

use closewise_core::{
  lead::{DraftField, Lead, LeadField, LeadId},
  reminder::Reminder,
  store::{Action, LeadStore, Outcome},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use strum::IntoEnumIterator;
use tracing::debug;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Keyboard focus on the new-lead form.
  Form,
  /// Keyboard focus on the lead table.
  Table,
}

/// An in-progress inline edit of one table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
  pub id:     LeadId,
  pub field:  LeadField,
  pub buffer: String,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  pub store: LeadStore,

  /// Index into [`DraftField::iter`] of the focused form field.
  pub form_cursor: usize,

  /// Cursor position within the *filtered* lead list.
  pub row_cursor: usize,

  /// Index into [`LeadField::iter`] of the focused table column.
  pub column_cursor: usize,

  pub editing: Option<CellEdit>,

  /// Current fuzzy-filter string (only being typed when `filter_active`).
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// A pending reminder. While set, it is drawn as a modal and the next key
  /// press only dismisses it.
  pub reminder: Option<Reminder>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl App {
  pub fn new(store: LeadStore) -> Self {
    Self {
      screen: Screen::Form,
      store,
      form_cursor: 0,
      row_cursor: 0,
      column_cursor: 0,
      editing: None,
      filter: String::new(),
      filter_active: false,
      reminder: None,
      status_msg: String::new(),
    }
  }

  /// Run the follow-up check once, as on first render.
  pub fn check_on_load(&mut self) {
    self.reminder = self.store.check_follow_ups();
  }

  // ── Derived state ─────────────────────────────────────────────────────────

  pub fn focused_draft_field(&self) -> DraftField {
    DraftField::iter()
      .nth(self.form_cursor)
      .unwrap_or(DraftField::Name)
  }

  pub fn focused_column(&self) -> LeadField {
    LeadField::iter()
      .nth(self.column_cursor)
      .unwrap_or(LeadField::Name)
  }

  /// Leads that match the current filter query, in insertion order.
  pub fn filtered_leads(&self) -> Vec<&Lead> {
    if self.filter.is_empty() {
      return self.store.leads().iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .store
      .leads()
      .iter()
      .filter(|l| {
        matcher.fuzzy_match(&l.name, &self.filter).is_some()
          || matcher.fuzzy_match(&l.contact, &self.filter).is_some()
      })
      .collect()
  }

  /// The lead under the row cursor in the filtered view, if any.
  pub fn cursor_lead(&self) -> Option<&Lead> {
    self.filtered_leads().get(self.row_cursor).copied()
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    // The reminder blocks until acknowledged.
    if self.reminder.take().is_some() {
      return Ok(true);
    }

    if self.editing.is_some() {
      return self.handle_edit_key(key);
    }

    if self.filter_active {
      return Ok(self.handle_filter_key(key));
    }

    match self.screen {
      Screen::Form => self.handle_form_key(key),
      Screen::Table => Ok(self.handle_table_key(key)),
    }
  }

  fn handle_form_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let field_count = DraftField::iter().len();
    match key.code {
      KeyCode::Esc => self.screen = Screen::Table,

      KeyCode::Tab | KeyCode::Down => {
        self.form_cursor = (self.form_cursor + 1) % field_count;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.form_cursor = (self.form_cursor + field_count - 1) % field_count;
      }

      KeyCode::Enter => {
        let outcome = self.store.dispatch(Action::AddLead)?;
        self.form_cursor = 0;
        self.status_msg = match outcome.added {
          Some(id) => format!("Added lead {id}"),
          None => String::new(),
        };
        self.absorb(outcome);
      }

      KeyCode::Backspace => {
        let field = self.focused_draft_field();
        let mut value = self.store.draft().field(field).to_owned();
        value.pop();
        self.store.dispatch(Action::EditDraft { field, value })?;
      }
      KeyCode::Char(c) => {
        let field = self.focused_draft_field();
        let mut value = self.store.draft().field(field).to_owned();
        value.push(c);
        self.store.dispatch(Action::EditDraft { field, value })?;
      }

      _ => {}
    }
    Ok(true)
  }

  fn handle_filter_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.row_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.row_cursor = 0;
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.row_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.row_cursor = 0;
      }
      _ => {}
    }
    true
  }

  fn handle_table_key(&mut self, key: KeyEvent) -> bool {
    let column_count = LeadField::iter().len();
    match key.code {
      // Quit
      KeyCode::Char('q') => return false,

      // Back to the form
      KeyCode::Char('a') | KeyCode::Tab => self.screen = Screen::Form,

      // Rows
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_leads().len();
        if len > 0 && self.row_cursor + 1 < len {
          self.row_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.row_cursor = self.row_cursor.saturating_sub(1);
      }

      // Columns
      KeyCode::Right | KeyCode::Char('l') => {
        if self.column_cursor + 1 < column_count {
          self.column_cursor += 1;
        }
      }
      KeyCode::Left | KeyCode::Char('h') => {
        self.column_cursor = self.column_cursor.saturating_sub(1);
      }

      // Inline edit
      KeyCode::Enter | KeyCode::Char('e') => {
        let field = self.focused_column();
        if let Some(lead) = self.cursor_lead() {
          self.editing = Some(CellEdit {
            id: lead.id,
            field,
            buffer: lead.field(field),
          });
          self.status_msg.clear();
        }
      }

      // Filter
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.row_cursor = 0;
      }
      KeyCode::Esc => {
        self.filter.clear();
        self.row_cursor = 0;
      }

      _ => {}
    }
    true
  }

  fn handle_edit_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let Some(edit) = self.editing.as_mut() else {
      return Ok(true);
    };
    match key.code {
      KeyCode::Esc => {
        self.editing = None;
        self.status_msg.clear();
      }
      KeyCode::Backspace => {
        edit.buffer.pop();
      }
      KeyCode::Char(c) => edit.buffer.push(c),
      KeyCode::Enter => {
        let action = Action::UpdateField {
          id:    edit.id,
          field: edit.field,
          value: edit.buffer.clone(),
        };
        match self.store.dispatch(action) {
          Ok(outcome) => {
            self.editing = None;
            self.status_msg.clear();
            self.absorb(outcome);
          }
          // Keep the edit open so the value can be corrected.
          Err(e) => self.status_msg = format!("Error: {e}"),
        }
      }
      _ => {}
    }
    Ok(true)
  }

  fn absorb(&mut self, outcome: Outcome) {
    if let Some(reminder) = outcome.reminder {
      debug!(count = reminder.count, "showing reminder");
      self.reminder = Some(reminder);
    }
  }
}
