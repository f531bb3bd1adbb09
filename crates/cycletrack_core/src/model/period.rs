//! Period domain model.
//!
//! # Responsibility
//! - Represent one tracked span of calendar days, inclusive of both ends.
//! - Normalize endpoint order at construction time.
//!
//! # Invariants
//! - `start <= end` for every constructed or deserialized value.
//! - Fields stay private so the invariant cannot be bypassed.

use crate::model::date::CalendarDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation error for period payloads read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodValidationError {
    EndBeforeStart {
        start: CalendarDate,
        end: CalendarDate,
    },
}

impl Display for PeriodValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndBeforeStart { start, end } => {
                write!(f, "period end ({end}) must be >= start ({start})")
            }
        }
    }
}

impl Error for PeriodValidationError {}

/// Closed range of calendar days.
///
/// Serialized as `{"start": "YYYY-MM-DD", "end": "YYYY-MM-DD"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    start: CalendarDate,
    end: CalendarDate,
}

#[derive(Deserialize)]
struct RawPeriod {
    start: CalendarDate,
    end: CalendarDate,
}

impl TryFrom<RawPeriod> for Period {
    type Error = PeriodValidationError;

    fn try_from(value: RawPeriod) -> Result<Self, Self::Error> {
        Self::try_new(value.start, value.end)
    }
}

impl Period {
    /// Builds a period from two picked days in either order.
    pub fn new(first: CalendarDate, second: CalendarDate) -> Self {
        Self {
            start: first.min(second),
            end: first.max(second),
        }
    }

    /// Builds a period, rejecting `end < start` instead of swapping.
    pub fn try_new(start: CalendarDate, end: CalendarDate) -> Result<Self, PeriodValidationError> {
        if end < start {
            return Err(PeriodValidationError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> CalendarDate {
        self.start
    }

    pub fn end(&self) -> CalendarDate {
        self.end
    }

    /// Whether `date` falls inside `[start, end]`.
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, counting both endpoints.
    pub fn length_days(&self) -> i64 {
        self.start.days_until(self.end) + 1
    }
}
