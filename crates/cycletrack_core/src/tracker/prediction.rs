//! Cycle statistics derived from stored periods.
//!
//! # Responsibility
//! - Compute the average gap between consecutive period starts.
//! - Project the next start date from the latest period.
//!
//! # Invariants
//! - Functions are pure; inputs are sorted internally by start.
//! - Fewer than two periods means no average and no prediction.

use crate::model::date::CalendarDate;
use crate::model::period::Period;
use crate::tracker::store::sorted_by_start;

/// Derived statistics for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Period with the latest start.
    pub last_period: Option<Period>,
    /// Mean days between consecutive starts.
    pub average_cycle_days: Option<f64>,
    /// Latest start plus the rounded average.
    pub next_predicted: Option<CalendarDate>,
}

/// Mean of consecutive start-date gaps in whole days.
///
/// Returns `None` for fewer than two periods.
pub fn average_cycle_length(periods: &[Period]) -> Option<f64> {
    if periods.len() < 2 {
        return None;
    }

    let sorted = sorted_by_start(periods);
    let gaps = sorted
        .windows(2)
        .map(|pair| pair[0].start().days_until(pair[1].start()))
        .collect::<Vec<_>>();
    let total: i64 = gaps.iter().sum();
    Some(total as f64 / gaps.len() as f64)
}

/// Adds the average cycle length, rounded half away from zero, to `last_start`.
pub fn predict_next_date(last_start: CalendarDate, average_cycle_days: f64) -> CalendarDate {
    last_start.saturating_add_days(average_cycle_days.round() as i64)
}

/// Period with the greatest start; the last one on ties.
pub fn last_period(periods: &[Period]) -> Option<Period> {
    sorted_by_start(periods).last().copied()
}

/// Computes all derived statistics in one pass over `periods`.
pub fn summarize(periods: &[Period]) -> Prediction {
    let last_period = last_period(periods);
    let average_cycle_days = average_cycle_length(periods);
    let next_predicted = match (last_period, average_cycle_days) {
        (Some(last), Some(average)) => Some(predict_next_date(last.start(), average)),
        _ => None,
    };

    Prediction {
        last_period,
        average_cycle_days,
        next_predicted,
    }
}
