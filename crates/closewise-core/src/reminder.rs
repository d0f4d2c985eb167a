//! Same-day follow-up reminders.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Produced when at least one lead is due for follow-up today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reminder {
  pub date:  NaiveDate,
  pub count: usize,
}

impl fmt::Display for Reminder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Reminder: You have {} leads to follow up today.",
      self.count
    )
  }
}

/// How often a reminder may fire.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Display,
  EnumString,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ReminderPolicy {
  /// Fire after every change that leaves a lead due, including repeatedly
  /// for the same lead.
  #[default]
  EveryChange,
  /// Fire at most once per calendar day.
  OncePerDay,
}

/// Applies a [`ReminderPolicy`] across successive checks.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReminderGate {
  policy:     ReminderPolicy,
  last_fired: Option<NaiveDate>,
}

impl ReminderGate {
  pub(crate) fn new(policy: ReminderPolicy) -> Self {
    Self { policy, last_fired: None }
  }

  /// Whether a reminder for `today` may fire now. Records the firing.
  pub(crate) fn admit(&mut self, today: NaiveDate) -> bool {
    let admitted = match self.policy {
      ReminderPolicy::EveryChange => true,
      ReminderPolicy::OncePerDay => self.last_fired != Some(today),
    };
    if admitted {
      self.last_fired = Some(today);
    }
    admitted
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 3, d).unwrap() }

  #[test]
  fn message_reports_count() {
    let r = Reminder { date: day(1), count: 2 };
    assert_eq!(
      r.to_string(),
      "Reminder: You have 2 leads to follow up today."
    );
  }

  #[test]
  fn policy_names_are_kebab_case() {
    assert_eq!(
      "once-per-day".parse::<ReminderPolicy>().unwrap(),
      ReminderPolicy::OncePerDay
    );
    assert_eq!(ReminderPolicy::EveryChange.to_string(), "every-change");
    assert!("daily".parse::<ReminderPolicy>().is_err());
  }

  #[test]
  fn every_change_always_admits() {
    let mut gate = ReminderGate::new(ReminderPolicy::EveryChange);
    assert!(gate.admit(day(1)));
    assert!(gate.admit(day(1)));
  }

  #[test]
  fn once_per_day_admits_again_on_a_new_day() {
    let mut gate = ReminderGate::new(ReminderPolicy::OncePerDay);
    assert!(gate.admit(day(1)));
    assert!(!gate.admit(day(1)));
    assert!(gate.admit(day(2)));
    assert!(!gate.admit(day(2)));
  }
}
