//! [`LeadStore`] — the owned, in-memory lead collection and its draft.
//!
//! Every mutation of the collection runs the follow-up check afterwards and
//! hands any resulting [`Reminder`] back to the caller in an [`Outcome`].
//! The store takes `&mut self` for all writes and is meant to be driven from
//! a single event loop.

use std::fmt::Write as _;

use chrono::NaiveDate;
use rand_core::{OsRng, RngCore};
use tracing::{debug, info, trace, warn};

use crate::{
  Error, Result,
  clock::{Clock, SystemClock},
  lead::{DEFAULT_STATUS, Draft, DraftField, Lead, LeadField, LeadId},
  reminder::{Reminder, ReminderGate, ReminderPolicy},
};

/// Upper bound (exclusive) of the random offset added to the timestamp when
/// generating an id.
pub const ID_OFFSET_RANGE: u32 = 10_000;

/// `M/D/YYYY`, e.g. `1/5/2024`.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

// ─── Options ─────────────────────────────────────────────────────────────────

/// Store-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
  date_format:         String,
  pub reminder_policy: ReminderPolicy,
}

impl Default for StoreOptions {
  fn default() -> Self {
    Self {
      date_format:     DEFAULT_DATE_FORMAT.to_owned(),
      reminder_policy: ReminderPolicy::default(),
    }
  }
}

impl StoreOptions {
  /// Use `format` (a chrono strftime string) for `date_called`.
  ///
  /// The format must render a bare calendar date: unknown specifiers and
  /// time or timezone fields (`%H`, `%S`, `%z`, ...) are rejected.
  pub fn with_date_format(mut self, format: impl Into<String>) -> Result<Self> {
    let format = format.into();
    let mut rendered = String::new();
    if write!(rendered, "{}", NaiveDate::default().format(&format)).is_err() {
      return Err(Error::InvalidDateFormat(format));
    }
    self.date_format = format;
    Ok(self)
  }

  pub fn with_reminder_policy(mut self, policy: ReminderPolicy) -> Self {
    self.reminder_policy = policy;
    self
  }

  pub fn date_format(&self) -> &str { &self.date_format }
}

// ─── Reducer types ───────────────────────────────────────────────────────────

/// A user intent forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  EditDraft { field: DraftField, value: String },
  AddLead,
  UpdateField {
    id:    LeadId,
    field: LeadField,
    value: String,
  },
}

/// What a dispatched action did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
  /// `false` when the action targeted a lead that does not exist.
  pub applied:  bool,
  /// Id of the lead that was added, for [`Action::AddLead`].
  pub added:    Option<LeadId>,
  /// Set when the post-mutation follow-up check fired.
  pub reminder: Option<Reminder>,
}

// ─── Store ───────────────────────────────────────────────────────────────────

pub struct LeadStore<C = SystemClock, R = OsRng> {
  leads:   Vec<Lead>,
  draft:   Draft,
  clock:   C,
  rng:     R,
  options: StoreOptions,
  gate:    ReminderGate,
}

impl LeadStore {
  /// A store on the wall clock and the OS random source.
  pub fn new(options: StoreOptions) -> Self {
    Self::with_parts(SystemClock, OsRng, options)
  }
}

impl Default for LeadStore {
  fn default() -> Self { Self::new(StoreOptions::default()) }
}

impl<C: Clock, R: RngCore> LeadStore<C, R> {
  pub fn with_parts(clock: C, rng: R, options: StoreOptions) -> Self {
    let gate = ReminderGate::new(options.reminder_policy);
    Self {
      leads: Vec::new(),
      draft: Draft::default(),
      clock,
      rng,
      options,
      gate,
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All leads in insertion order.
  pub fn leads(&self) -> &[Lead] { &self.leads }

  pub fn lead(&self, id: LeadId) -> Option<&Lead> {
    self.leads.iter().find(|l| l.id == id)
  }

  pub fn draft(&self) -> &Draft { &self.draft }

  pub fn options(&self) -> &StoreOptions { &self.options }

  pub fn clock(&self) -> &C { &self.clock }

  pub fn clock_mut(&mut self) -> &mut C { &mut self.clock }

  /// The follow-up day (UTC) as stored in `follow_up_date`.
  pub fn today_key(&self) -> String {
    self.clock.follow_up_today().format("%Y-%m-%d").to_string()
  }

  /// Leads whose follow-up date is exactly today.
  pub fn due_follow_ups(&self) -> Vec<&Lead> {
    let today = self.today_key();
    self
      .leads
      .iter()
      .filter(|l| l.follow_up_date == today)
      .collect()
  }

  // ── Writes ────────────────────────────────────────────────────────────

  /// An id not used by any current lead: the clock's millisecond timestamp
  /// plus a random offset, resampled on collision.
  ///
  /// After `ID_OFFSET_RANGE` consecutive collisions (a clock that does not
  /// advance) the search walks upwards from the end of the offset range.
  pub fn generate_unique_id(&mut self) -> LeadId {
    let base = self.clock.now_millis();
    for _ in 0..ID_OFFSET_RANGE {
      let offset = i64::from(self.rng.next_u32() % ID_OFFSET_RANGE);
      let candidate = LeadId(base + offset);
      if !self.is_taken(candidate) {
        return candidate;
      }
      trace!(id = %candidate, "id collision, resampling");
    }

    let mut candidate = LeadId(base + i64::from(ID_OFFSET_RANGE));
    while self.is_taken(candidate) {
      candidate.0 += 1;
    }
    debug!(id = %candidate, "offset range exhausted, id taken past it");
    candidate
  }

  fn is_taken(&self, id: LeadId) -> bool { self.leads.iter().any(|l| l.id == id) }

  pub fn set_draft_field(&mut self, field: DraftField, value: impl Into<String>) {
    *self.draft.field_mut(field) = value.into();
  }

  /// Replace the whole draft.
  pub fn set_draft(&mut self, draft: Draft) { self.draft = draft; }

  /// Append a lead built from the draft, then reset the draft.
  ///
  /// The new lead always starts with status `"New"`, an empty activity log,
  /// and a score of zero, whatever the draft holds for those fields.
  pub fn add_lead(&mut self) -> Outcome {
    let id = self.generate_unique_id();
    let date_called = self
      .clock
      .today()
      .format(&self.options.date_format)
      .to_string();
    let draft = std::mem::take(&mut self.draft);

    self.leads.push(Lead {
      id,
      name: draft.name,
      contact: draft.contact,
      phone: draft.phone,
      email: draft.email,
      status: DEFAULT_STATUS.to_owned(),
      follow_up_date: draft.follow_up_date,
      date_called,
      activity_log: String::new(),
      notes: draft.notes,
      score: 0,
    });
    debug!(%id, total = self.leads.len(), "lead added");

    Outcome {
      applied:  true,
      added:    Some(id),
      reminder: self.check_follow_ups(),
    }
  }

  /// Replace one field of the lead with `id`.
  ///
  /// An unknown id is not an error: the returned outcome has
  /// `applied == false` and nothing changes. A score that does not parse is
  /// rejected with [`Error::InvalidScore`].
  pub fn update_field(
    &mut self,
    id: LeadId,
    field: LeadField,
    value: &str,
  ) -> Result<Outcome> {
    let Some(lead) = self.leads.iter_mut().find(|l| l.id == id) else {
      debug!(%id, %field, "update for unknown lead ignored");
      return Ok(Outcome::default());
    };

    if let Err(e) = lead.apply(field, value) {
      warn!(%id, %field, error = %e, "edit rejected");
      return Err(e);
    }
    debug!(%id, %field, "lead updated");

    Ok(Outcome {
      applied:  true,
      added:    None,
      reminder: self.check_follow_ups(),
    })
  }

  /// Reducer entry point for the presentation layer.
  pub fn dispatch(&mut self, action: Action) -> Result<Outcome> {
    match action {
      Action::EditDraft { field, value } => {
        self.set_draft_field(field, value);
        Ok(Outcome { applied: true, ..Outcome::default() })
      }
      Action::AddLead => Ok(self.add_lead()),
      Action::UpdateField { id, field, value } => {
        self.update_field(id, field, &value)
      }
    }
  }

  // ── Post-mutation hook ────────────────────────────────────────────────

  /// Run the follow-up check. Called after every applied mutation of the
  /// collection; callers also run it once on startup.
  pub fn check_follow_ups(&mut self) -> Option<Reminder> {
    let count = self.due_follow_ups().len();
    if count == 0 {
      return None;
    }
    let date = self.clock.follow_up_today();
    if !self.gate.admit(date) {
      trace!(count, "reminder suppressed by policy");
      return None;
    }
    info!(count, %date, "follow-ups due today");
    Some(Reminder { date, count })
  }
}
