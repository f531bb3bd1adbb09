//! Calendar-day domain model shared by tracking, prediction and rendering.
//!
//! # Responsibility
//! - Define the timezone-less `CalendarDate` value and the `Period` range.
//! - Own the ISO `YYYY-MM-DD` wire format for both.
//!
//! # Invariants
//! - A `Period` never stores `end < start`.
//! - Dates carry no time-of-day, so day differences are exact integers.

pub mod date;
pub mod period;
