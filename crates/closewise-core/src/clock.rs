//! Time sources for the store.

use chrono::{Local, NaiveDate, NaiveTime, Utc};

/// Where the store reads dates and the current timestamp from.
pub trait Clock {
  /// The local calendar date, used for the `date_called` stamp.
  fn today(&self) -> NaiveDate;

  /// The UTC calendar date that `follow_up_date` values are matched
  /// against.
  fn follow_up_today(&self) -> NaiveDate;

  /// Milliseconds since the Unix epoch, used as the base for lead ids.
  fn now_millis(&self) -> i64;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate { Local::now().date_naive() }

  fn follow_up_today(&self) -> NaiveDate { Utc::now().date_naive() }

  fn now_millis(&self) -> i64 { Utc::now().timestamp_millis() }
}

/// A clock frozen at one instant. Every call to [`Clock::now_millis`]
/// returns the same value, so ids generated through it only differ by their
/// random offset until the offset range runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
  today:     NaiveDate,
  utc_today: NaiveDate,
  millis:    i64,
}

impl FixedClock {
  /// Freeze the clock at midnight UTC of `today`, with the local and UTC
  /// dates agreeing.
  pub fn new(today: NaiveDate) -> Self {
    let millis = today.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    Self { today, utc_today: today, millis }
  }

  /// Let the UTC date differ from the local one, as it does near midnight
  /// away from UTC.
  pub fn with_utc_today(mut self, utc_today: NaiveDate) -> Self {
    self.utc_today = utc_today;
    self
  }

  /// Move the clock to a different day.
  pub fn set_today(&mut self, today: NaiveDate) { *self = Self::new(today); }
}

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate { self.today }

  fn follow_up_today(&self) -> NaiveDate { self.utc_today }

  fn now_millis(&self) -> i64 { self.millis }
}
