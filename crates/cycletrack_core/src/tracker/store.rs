//! In-memory period store and its storage blob codec.
//!
//! # Responsibility
//! - Keep periods in insertion order and expose sorted views.
//! - Encode/decode the JSON array blob handed to persistence.
//!
//! # Invariants
//! - The store never writes to persistence itself.
//! - Loading never fails: unreadable blobs produce an empty store.
//! - `sorted_by_start` is stable, so equal starts keep insertion order.

use crate::model::date::CalendarDate;
use crate::model::period::Period;
use log::warn;
use serde_json::error::Category;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for store mutations and blob encoding.
#[derive(Debug)]
pub enum StoreError {
    IndexOutOfRange { index: usize, len: usize },
    Codec(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "period index {index} out of range (len {len})")
            }
            Self::Codec(err) => write!(f, "period blob codec failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IndexOutOfRange { .. } => None,
            Self::Codec(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value)
    }
}

/// Insertion-ordered sequence of tracked periods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodStore {
    periods: Vec<Period>,
}

impl PeriodStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_periods(periods: Vec<Period>) -> Self {
        Self { periods }
    }

    /// Builds a store from a persisted blob, falling back to empty.
    ///
    /// `None` (nothing persisted yet) and malformed JSON both yield an empty
    /// store; the latter is logged without echoing blob contents.
    pub fn load(blob: Option<&str>) -> Self {
        let Some(blob) = blob else {
            return Self::new();
        };
        match Self::from_blob(blob) {
            Ok(store) => store,
            Err(err) => {
                warn!(
                    "event=store_load module=tracker status=fallback reason=parse_failed blob_len={} {}",
                    blob.len(),
                    redacted_failure(&err)
                );
                Self::new()
            }
        }
    }

    /// Strict blob decoder; prefer [`PeriodStore::load`] at startup.
    pub fn from_blob(blob: &str) -> StoreResult<Self> {
        let periods: Vec<Period> = serde_json::from_str(blob)?;
        Ok(Self { periods })
    }

    /// Encodes periods in insertion order as a JSON array.
    pub fn to_blob(&self) -> StoreResult<String> {
        Ok(serde_json::to_string(&self.periods)?)
    }

    /// Appends without dedup or overlap checks.
    pub fn add(&mut self, period: Period) {
        self.periods.push(period);
    }

    /// Removes the period at `index` (insertion order).
    pub fn remove_at(&mut self, index: usize) -> StoreResult<Period> {
        if index >= self.periods.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.periods.len(),
            });
        }
        Ok(self.periods.remove(index))
    }

    pub fn clear(&mut self) {
        self.periods.clear();
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Periods in insertion order.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// New sequence ordered ascending by start.
    pub fn sorted_by_start(&self) -> Vec<Period> {
        sorted_by_start(&self.periods)
    }

    /// First period (insertion order) whose range contains `date`.
    pub fn find_containing(&self, date: CalendarDate) -> Option<(usize, Period)> {
        self.periods
            .iter()
            .enumerate()
            .find(|(_, period)| period.contains(date))
            .map(|(index, period)| (index, *period))
    }

    pub fn is_marked(&self, date: CalendarDate) -> bool {
        self.periods.iter().any(|period| period.contains(date))
    }

    /// Index of the first period equal to `period`.
    pub fn position_of(&self, period: &Period) -> Option<usize> {
        self.periods.iter().position(|stored| stored == period)
    }
}

/// Log fields for a load failure; codec messages quote stored dates, so
/// only the error class and position are kept.
fn redacted_failure(err: &StoreError) -> String {
    match err {
        StoreError::Codec(err) => {
            let class = match err.classify() {
                Category::Io => "io",
                Category::Syntax => "syntax",
                Category::Data => "data",
                Category::Eof => "eof",
            };
            format!(
                "error_class={class} line={} column={}",
                err.line(),
                err.column()
            )
        }
        StoreError::IndexOutOfRange { index, len } => {
            format!("error_class=index index={index} len={len}")
        }
    }
}

/// Stable ascending sort by start date.
pub fn sorted_by_start(periods: &[Period]) -> Vec<Period> {
    let mut sorted = periods.to_vec();
    sorted.sort_by_key(Period::start);
    sorted
}
