//! Display and export projections of tracker state.
//!
//! # Responsibility
//! - Format derived statistics for display, with `-` placeholders.
//! - Build spreadsheet-style export rows ordered by start date.
//!
//! # See also
//! - `tracker::prediction` for the underlying values.

pub mod export;
pub mod summary;
