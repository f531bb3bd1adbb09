//! Core domain logic for the cycle tracker.
//! This crate is the single source of truth for tracking invariants.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod service;
pub mod tracker;

pub use calendar::month_view::{CalendarCell, DayCell, MonthView, VisibleMonth};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::date::{CalendarDate, DateParseError};
pub use model::period::{Period, PeriodValidationError};
pub use report::export::{export_rows, ExportError, ExportRow};
pub use report::summary::{removal_prompt, Summary};
pub use repo::blob_repo::{
    BlobRepository, MemoryBlobRepository, RepoError, RepoResult, SqliteBlobRepository,
    PERIODS_BLOB_NAME,
};
pub use service::tracker_service::{PickOutcome, RemovalConfirmer, TrackerService, TrackerState};
pub use tracker::prediction::{
    average_cycle_length, last_period, predict_next_date, summarize, Prediction,
};
pub use tracker::selection::{SelectionMachine, SelectionState, Transition};
pub use tracker::store::{PeriodStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
