//! Display strings for tracker statistics.

use crate::model::period::Period;
use crate::tracker::prediction::Prediction;

/// Shown when a statistic is unavailable.
pub const PLACEHOLDER: &str = "-";

/// Formatted statistics panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// e.g. `Jan 1 - Jan 5`.
    pub last_period: String,
    /// e.g. `28 days`.
    pub average_cycle: String,
    /// e.g. `Jan 29`.
    pub next_predicted: String,
}

impl Summary {
    pub fn from_prediction(prediction: &Prediction) -> Self {
        Self {
            last_period: prediction
                .last_period
                .map_or_else(|| PLACEHOLDER.to_string(), |period| range_label(&period)),
            average_cycle: prediction.average_cycle_days.map_or_else(
                || PLACEHOLDER.to_string(),
                |days| format!("{} days", days.round() as i64),
            ),
            next_predicted: prediction
                .next_predicted
                .map_or_else(|| PLACEHOLDER.to_string(), |date| date.short_label()),
        }
    }
}

/// `start - end` using short labels.
pub fn range_label(period: &Period) -> String {
    format!(
        "{} - {}",
        period.start().short_label(),
        period.end().short_label()
    )
}

/// Confirmation prompt shown before removing `period`.
pub fn removal_prompt(period: &Period) -> String {
    format!(
        "Do you want to delete the period from {} to {}?",
        period.start().short_label(),
        period.end().short_label()
    )
}
