//! Error types for `closewise-core`.

use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A score edit that does not parse as an integer. The stored score is
  /// left untouched.
  #[error("score must be a whole number, got {value:?}")]
  InvalidScore {
    value:  String,
    #[source]
    source: ParseIntError,
  },

  #[error("unknown lead field: {0:?}")]
  UnknownField(String),

  #[error("invalid date format string: {0:?}")]
  InvalidDateFormat(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
