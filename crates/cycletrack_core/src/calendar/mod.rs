//! Calendar view models consumed by rendering front ends.
//!
//! # Responsibility
//! - Lay out one month as a Sunday-first grid with per-day flags.
//! - Track which month is visible and navigate between months.

pub mod month_view;
