//! Timezone-less calendar date.
//!
//! # Responsibility
//! - Parse and format the ISO `YYYY-MM-DD` representation used on disk.
//! - Provide whole-day arithmetic for cycle statistics.
//! - Provide the display formats used by summaries and exports.
//!
//! # Invariants
//! - Parsing is strict: four-digit year, two-digit month and day.
//! - Ordering is chronological, which matches ISO string ordering.

use chrono::{Datelike, Local, NaiveDate, TimeDelta, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Error returned when a value is not a valid ISO calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    /// Input does not have the `YYYY-MM-DD` shape.
    InvalidFormat(String),
    /// Input has the right shape but names a day that does not exist.
    InvalidDate(String),
}

impl Display for DateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat(value) => {
                write!(f, "invalid date format `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidDate(value) => write!(f, "invalid calendar date `{value}`"),
        }
    }
}

impl Error for DateParseError {}

/// A calendar day without time-of-day or timezone.
///
/// Serialized as an ISO `YYYY-MM-DD` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Builds a date from year, month (1-12) and day (1-31).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateParseError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DateParseError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
    }

    /// Parses a strict ISO `YYYY-MM-DD` string.
    pub fn parse(value: &str) -> Result<Self, DateParseError> {
        if !ISO_DATE_RE.is_match(value) {
            return Err(DateParseError::InvalidFormat(value.to_string()));
        }
        NaiveDate::parse_from_str(value, ISO_FORMAT)
            .map(Self)
            .map_err(|_| DateParseError::InvalidDate(value.to_string()))
    }

    /// Returns the current local calendar day.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// Whole days from `self` to `later`; negative when `later` is earlier.
    pub fn days_until(self, later: CalendarDate) -> i64 {
        (later.0 - self.0).num_days()
    }

    /// Adds `days` (may be negative), clamping at the supported date range.
    pub fn saturating_add_days(self, days: i64) -> Self {
        let shifted = TimeDelta::try_days(days).and_then(|delta| self.0.checked_add_signed(delta));
        match shifted {
            Some(date) => Self(date),
            None if days >= 0 => Self(NaiveDate::MAX),
            None => Self(NaiveDate::MIN),
        }
    }

    /// Short display label, e.g. `Jan 5`.
    pub fn short_label(self) -> String {
        self.0.format("%b %-d").to_string()
    }

    /// US numeric display, e.g. `1/5/2024`.
    pub fn us_numeric(self) -> String {
        self.0.format("%-m/%-d/%Y").to_string()
    }

    pub(crate) fn as_naive(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl Display for CalendarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(ISO_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = DateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CalendarDate> for String {
    fn from(value: CalendarDate) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{CalendarDate, DateParseError};

    fn date(value: &str) -> CalendarDate {
        CalendarDate::parse(value).expect("valid test date")
    }

    #[test]
    fn parse_accepts_iso_dates_and_formats_back() {
        let parsed = date("2024-02-29");
        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.month(), 2);
        assert_eq!(parsed.day(), 29);
        assert_eq!(parsed.to_string(), "2024-02-29");
    }

    #[test]
    fn parse_rejects_loose_shapes() {
        for value in ["2024-1-05", "24-01-05", "2024/01/05", " 2024-01-05", "2024-01-05T00:00"] {
            assert_eq!(
                CalendarDate::parse(value),
                Err(DateParseError::InvalidFormat(value.to_string())),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn parse_rejects_days_that_do_not_exist() {
        assert_eq!(
            CalendarDate::parse("2023-02-29"),
            Err(DateParseError::InvalidDate("2023-02-29".to_string()))
        );
    }

    #[test]
    fn days_until_counts_whole_days_across_month_and_leap_boundaries() {
        assert_eq!(date("2024-01-01").days_until(date("2024-01-11")), 10);
        assert_eq!(date("2024-02-28").days_until(date("2024-03-01")), 2);
        assert_eq!(date("2024-03-01").days_until(date("2024-02-28")), -2);
    }

    #[test]
    fn saturating_add_days_moves_forward_and_back() {
        assert_eq!(date("2024-01-11").saturating_add_days(10), date("2024-01-21"));
        assert_eq!(date("2024-03-01").saturating_add_days(-1), date("2024-02-29"));
    }

    #[test]
    fn saturating_add_days_clamps_instead_of_overflowing() {
        let far = date("2024-01-01").saturating_add_days(i64::MAX);
        assert!(far > date("9999-12-31"));
    }

    #[test]
    fn display_formats_match_us_locale() {
        assert_eq!(date("2024-01-05").short_label(), "Jan 5");
        assert_eq!(date("2024-11-25").us_numeric(), "11/25/2024");
    }

    #[test]
    fn serde_uses_iso_string() {
        let json = serde_json::to_string(&date("2024-07-04")).unwrap();
        assert_eq!(json, "\"2024-07-04\"");
        let decoded: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, date("2024-07-04"));
        assert!(serde_json::from_str::<CalendarDate>("\"July 4\"").is_err());
    }
}
