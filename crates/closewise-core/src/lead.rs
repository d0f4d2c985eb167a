//! Lead records and the draft they are created from.
//!
//! A lead is created once from the draft and afterwards edited field by
//! field. Leads are never removed.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

/// Status assigned to every freshly added lead.
pub const DEFAULT_STATUS: &str = "New";

// ─── Identity ────────────────────────────────────────────────────────────────

/// A lead identifier: a millisecond timestamp plus a random offset, unique
/// within its store.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LeadId(pub i64);

impl fmt::Display for LeadId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

// ─── Fields ──────────────────────────────────────────────────────────────────

/// The lead fields that can be edited after creation.
///
/// `status`, `date_called`, and `notes` are deliberately absent.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum LeadField {
  Name,
  Contact,
  Phone,
  Email,
  FollowUpDate,
  ActivityLog,
  Score,
}

impl LeadField {
  /// Parse a camelCase field name such as `"followUpDate"`.
  pub fn from_name(name: &str) -> Result<Self> {
    name.parse().map_err(|_| Error::UnknownField(name.to_owned()))
  }
}

/// The fields the draft form exposes.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum DraftField {
  Name,
  Contact,
  Phone,
  Email,
  FollowUpDate,
  Notes,
}

// ─── Lead ────────────────────────────────────────────────────────────────────

/// One prospective customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
  pub id:             LeadId,
  pub name:           String,
  pub contact:        String,
  pub phone:          String,
  pub email:          String,
  pub status:         String,
  /// `YYYY-MM-DD`, or empty when no follow-up is scheduled.
  pub follow_up_date: String,
  /// Creation date in the store's configured display format.
  pub date_called:    String,
  pub activity_log:   String,
  pub notes:          String,
  pub score:          i64,
}

impl Lead {
  /// The current value of `field` as text, the way an edit box shows it.
  pub fn field(&self, field: LeadField) -> String {
    match field {
      LeadField::Name => self.name.clone(),
      LeadField::Contact => self.contact.clone(),
      LeadField::Phone => self.phone.clone(),
      LeadField::Email => self.email.clone(),
      LeadField::FollowUpDate => self.follow_up_date.clone(),
      LeadField::ActivityLog => self.activity_log.clone(),
      LeadField::Score => self.score.to_string(),
    }
  }

  /// Replace `field` with `value`. On error the lead is unchanged.
  pub fn apply(&mut self, field: LeadField, value: &str) -> Result<()> {
    let slot = match field {
      LeadField::Score => {
        self.score = parse_score(value)?;
        return Ok(());
      }
      LeadField::Name => &mut self.name,
      LeadField::Contact => &mut self.contact,
      LeadField::Phone => &mut self.phone,
      LeadField::Email => &mut self.email,
      LeadField::FollowUpDate => &mut self.follow_up_date,
      LeadField::ActivityLog => &mut self.activity_log,
    };
    value.clone_into(slot);
    Ok(())
  }
}

/// Parse score text. Surrounding whitespace is ignored; anything else that
/// is not an integer (including the empty string) is rejected.
pub fn parse_score(value: &str) -> Result<i64> {
  value.trim().parse().map_err(|source| Error::InvalidScore {
    value: value.to_owned(),
    source,
  })
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// The in-progress lead form. `activity_log` and `score` are carried for
/// shape only; [`crate::store::LeadStore::add_lead`] overrides both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
  pub name:           String,
  pub contact:        String,
  pub phone:          String,
  pub email:          String,
  pub follow_up_date: String,
  pub notes:          String,
  pub activity_log:   String,
  pub score:          i64,
}

impl Draft {
  pub fn field(&self, field: DraftField) -> &str {
    match field {
      DraftField::Name => &self.name,
      DraftField::Contact => &self.contact,
      DraftField::Phone => &self.phone,
      DraftField::Email => &self.email,
      DraftField::FollowUpDate => &self.follow_up_date,
      DraftField::Notes => &self.notes,
    }
  }

  pub fn field_mut(&mut self, field: DraftField) -> &mut String {
    match field {
      DraftField::Name => &mut self.name,
      DraftField::Contact => &mut self.contact,
      DraftField::Phone => &mut self.phone,
      DraftField::Email => &mut self.email,
      DraftField::FollowUpDate => &mut self.follow_up_date,
      DraftField::Notes => &mut self.notes,
    }
  }

  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  fn lead() -> Lead {
    Lead {
      id:             LeadId(1),
      name:           "Acme".into(),
      contact:        "Jo".into(),
      phone:          "555".into(),
      email:          "a@b.c".into(),
      status:         DEFAULT_STATUS.into(),
      follow_up_date: String::new(),
      date_called:    "1/1/2024".into(),
      activity_log:   String::new(),
      notes:          "met at expo".into(),
      score:          0,
    }
  }

  #[test]
  fn field_names_are_camel_case() {
    assert_eq!(LeadField::FollowUpDate.to_string(), "followUpDate");
    assert_eq!(LeadField::ActivityLog.to_string(), "activityLog");
    assert_eq!(LeadField::from_name("score").unwrap(), LeadField::Score);
  }

  #[test]
  fn read_only_fields_are_not_editable() {
    for name in ["status", "dateCalled", "notes", "id", ""] {
      let err = LeadField::from_name(name).unwrap_err();
      assert!(matches!(err, Error::UnknownField(n) if n == name));
    }
  }

  #[test]
  fn every_field_reads_back_what_was_applied() {
    for field in LeadField::iter() {
      let mut l = lead();
      l.apply(field, "17").unwrap();
      assert_eq!(l.field(field), "17", "{field}");
    }
  }

  #[test]
  fn score_accepts_padded_integers() {
    assert_eq!(parse_score(" 42 ").unwrap(), 42);
    assert_eq!(parse_score("-3").unwrap(), -3);
  }

  #[test]
  fn invalid_score_leaves_lead_unchanged() {
    let mut l = lead();
    l.score = 9;
    for bad in ["", "abc", "4.5", "12abc"] {
      let err = l.apply(LeadField::Score, bad).unwrap_err();
      assert!(matches!(err, Error::InvalidScore { .. }), "{bad:?}");
    }
    assert_eq!(l, Lead { score: 9, ..lead() });
  }

  #[test]
  fn draft_fields_round_through_accessors() {
    let mut draft = Draft::default();
    assert!(draft.is_empty());
    *draft.field_mut(DraftField::Notes) = "call after lunch".into();
    assert_eq!(draft.field(DraftField::Notes), "call after lunch");
    assert_eq!(draft.notes, "call after lunch");
    assert!(!draft.is_empty());
  }

  #[test]
  fn lead_serialises_with_camel_case_keys() {
    let json = serde_json::to_value(lead()).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["followUpDate"], "");
    assert_eq!(json["dateCalled"], "1/1/2024");
    assert_eq!(json["activityLog"], "");
    assert_eq!(json["status"], "New");
  }

  #[test]
  fn lead_deserialises_from_camel_case_json() {
    let json = serde_json::json!({
      "id": 1,
      "name": "Acme",
      "contact": "Jo",
      "phone": "555",
      "email": "a@b.c",
      "status": "New",
      "followUpDate": "",
      "dateCalled": "1/1/2024",
      "activityLog": "",
      "notes": "met at expo",
      "score": 0
    });
    assert_eq!(serde_json::from_value::<Lead>(json).unwrap(), lead());
  }

  #[test]
  fn draft_deserialises_from_camel_case_json() {
    let json = serde_json::json!({
      "name": "Acme",
      "contact": "",
      "phone": "",
      "email": "",
      "followUpDate": "2024-01-05",
      "notes": "",
      "activityLog": "",
      "score": 3
    });
    let draft: Draft = serde_json::from_value(json).unwrap();
    assert_eq!(draft.follow_up_date, "2024-01-05");
    assert_eq!(draft.score, 3);
    assert_eq!(draft.field(DraftField::Name), "Acme");
  }
}
