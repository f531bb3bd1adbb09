//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose tracker use cases to Dart via FRB.
//! - Keep one process-wide tracker session so the selection cursor survives
//!   between calls.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Periods are loaded from storage once per process; later calls reuse the
//!   in-memory session and persist after each mutation.
//! - Removal is two-step: `tracker_pick` reports the matched period and the
//!   UI confirms with `tracker_remove_period`.

use cycletrack_core::db::open_db;
use cycletrack_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, removal_prompt,
    report::export::{to_csv, EXPORT_FILE_NAME, EXPORT_TITLE},
    CalendarCell, CalendarDate, MonthView, Period, PickOutcome, SqliteBlobRepository,
    TrackerService, TrackerState,
};
use log::warn;
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const TRACKER_DB_FILE_NAME: &str = "cycletrack.sqlite3";
const TRACKER_DB_PATH_ENV: &str = "CYCLETRACK_DB_PATH";
static TRACKER_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static TRACKER_SESSION: Lazy<Mutex<Option<TrackerState>>> = Lazy::new(|| Mutex::new(None));

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One stored period as ISO date strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodItem {
    pub start: String,
    pub end: String,
}

/// Response envelope for one calendar pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickResponse {
    /// Whether the pick was processed.
    pub ok: bool,
    /// `range_started|period_added|removal_requested` on success.
    pub outcome: String,
    /// Period added, or matched period awaiting removal confirmation.
    pub period: Option<PeriodItem>,
    /// Confirmation text when `outcome == removal_requested`.
    pub prompt: Option<String>,
    /// Human-readable diagnostics.
    pub message: String,
}

impl PickResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            outcome: String::new(),
            period: None,
            prompt: None,
            message: message.into(),
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerActionResponse {
    pub ok: bool,
    pub message: String,
}

impl TrackerActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Statistics panel strings; `-` marks unavailable values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSummary {
    pub last_period: String,
    pub average_cycle: String,
    pub next_predicted: String,
}

/// One day cell of the visible month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthDayItem {
    pub date: String,
    pub day: u32,
    pub marked: bool,
    pub pending_start: bool,
}

/// Visible month grid; `leading_blanks` pads the first week (Sunday-first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthResponse {
    pub ok: bool,
    pub title: String,
    pub leading_blanks: u32,
    pub days: Vec<MonthDayItem>,
    pub message: String,
}

impl MonthResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            title: String::new(),
            leading_blanks: 0,
            days: Vec::new(),
            message: message.into(),
        }
    }
}

/// CSV export payload; the UI decides where to save it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub ok: bool,
    pub file_name: String,
    pub title: String,
    pub content: String,
    pub message: String,
}

/// Feeds one clicked calendar day (`YYYY-MM-DD`) into the tracker.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - A click inside a stored period never deletes directly; it returns
///   `removal_requested` with a prompt.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_pick(date: String) -> PickResponse {
    let date = match CalendarDate::parse(date.trim()) {
        Ok(date) => date,
        Err(err) => return PickResponse::failure(format!("tracker_pick failed: {err}")),
    };

    let result = with_tracker(|tracker| tracker.pick(date, &|_: &Period| false));
    match result {
        Ok(Ok(outcome)) => to_pick_response(outcome),
        Ok(Err(err)) => PickResponse::failure(format!("tracker_pick failed: {err}")),
        Err(err) => PickResponse::failure(err),
    }
}

/// Removes a stored period after the user confirmed the prompt.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_remove_period(start: String, end: String) -> TrackerActionResponse {
    let period = match parse_period(&start, &end) {
        Ok(period) => period,
        Err(err) => return TrackerActionResponse::failure(err),
    };
    match with_tracker(|tracker| tracker.remove_period(&period)) {
        Ok(true) => TrackerActionResponse::success("Period removed."),
        Ok(false) => TrackerActionResponse::failure("Period not found."),
        Err(err) => TrackerActionResponse::failure(err),
    }
}

/// Drops a pending range start without touching stored periods.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_cancel_selection() -> TrackerActionResponse {
    match with_tracker(|tracker| tracker.cancel_selection()) {
        Ok(()) => TrackerActionResponse::success("Selection cleared."),
        Err(err) => TrackerActionResponse::failure(err),
    }
}

/// Deletes every stored period.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_clear_all() -> TrackerActionResponse {
    match with_tracker(|tracker| tracker.clear_all()) {
        Ok(()) => TrackerActionResponse::success("All periods cleared."),
        Err(err) => TrackerActionResponse::failure(err),
    }
}

/// Lists stored periods ascending by start; empty on storage failure.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_list_periods() -> Vec<PeriodItem> {
    match with_tracker(|tracker| tracker.periods()) {
        Ok(periods) => periods.iter().map(to_period_item).collect(),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=tracker_list_periods error={err}");
            Vec::new()
        }
    }
}

/// Returns the statistics panel strings.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_summary() -> TrackerSummary {
    match with_tracker(|tracker| tracker.summary()) {
        Ok(summary) => TrackerSummary {
            last_period: summary.last_period,
            average_cycle: summary.average_cycle,
            next_predicted: summary.next_predicted,
        },
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=tracker_summary error={err}");
            TrackerSummary {
                last_period: "-".to_string(),
                average_cycle: "-".to_string(),
                next_predicted: "-".to_string(),
            }
        }
    }
}

/// Returns the visible month grid.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_month_view() -> MonthResponse {
    month_response(with_tracker(|tracker| tracker.month_view()))
}

/// Moves the visible month back by one and returns its grid.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_show_previous_month() -> MonthResponse {
    month_response(with_tracker(|tracker| {
        tracker.show_previous_month();
        tracker.month_view()
    }))
}

/// Moves the visible month forward by one and returns its grid.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_show_next_month() -> MonthResponse {
    month_response(with_tracker(|tracker| {
        tracker.show_next_month();
        tracker.month_view()
    }))
}

/// Renders stored periods as CSV with the default export file name.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_export_csv() -> ExportResponse {
    match with_tracker(|tracker| tracker.export_rows()) {
        Ok(rows) => ExportResponse {
            ok: true,
            file_name: EXPORT_FILE_NAME.to_string(),
            title: EXPORT_TITLE.to_string(),
            content: to_csv(&rows),
            message: format!("Exported {} period(s).", rows.len()),
        },
        Err(err) => ExportResponse {
            ok: false,
            file_name: EXPORT_FILE_NAME.to_string(),
            title: EXPORT_TITLE.to_string(),
            content: String::new(),
            message: err,
        },
    }
}

fn resolve_tracker_db_path() -> PathBuf {
    TRACKER_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(TRACKER_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(TRACKER_DB_FILE_NAME)
        })
        .clone()
}

fn with_tracker<T>(
    f: impl FnOnce(&mut TrackerService<SqliteBlobRepository<'_>>) -> T,
) -> Result<T, String> {
    let conn = open_db(resolve_tracker_db_path())
        .map_err(|err| format!("tracker DB open failed: {err}"))?;
    let repo = SqliteBlobRepository::new(&conn);

    let mut session = TRACKER_SESSION
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut tracker = match session.take() {
        Some(state) => TrackerService::from_state(repo, state),
        None => TrackerService::open(repo, CalendarDate::today()),
    };
    let result = f(&mut tracker);
    *session = Some(tracker.into_state());
    Ok(result)
}

fn parse_period(start: &str, end: &str) -> Result<Period, String> {
    let start = CalendarDate::parse(start.trim()).map_err(|err| err.to_string())?;
    let end = CalendarDate::parse(end.trim()).map_err(|err| err.to_string())?;
    Ok(Period::new(start, end))
}

fn to_period_item(period: &Period) -> PeriodItem {
    PeriodItem {
        start: period.start().to_string(),
        end: period.end().to_string(),
    }
}

fn to_pick_response(outcome: PickOutcome) -> PickResponse {
    let (outcome, period, prompt, message) = match outcome {
        PickOutcome::RangeStarted(_) => ("range_started", None, None, "Range start selected."),
        PickOutcome::PeriodAdded(period) => {
            ("period_added", Some(period), None, "Period added.")
        }
        PickOutcome::RemovalDeclined(period) => (
            "removal_requested",
            Some(period),
            Some(removal_prompt(&period)),
            "Confirm removal with tracker_remove_period.",
        ),
        // Not reachable with a declining confirmer; reported for completeness.
        PickOutcome::PeriodRemoved(period) => {
            ("period_removed", Some(period), None, "Period removed.")
        }
    };
    PickResponse {
        ok: true,
        outcome: outcome.to_string(),
        period: period.as_ref().map(to_period_item),
        prompt,
        message: message.to_string(),
    }
}

fn month_response(result: Result<MonthView, String>) -> MonthResponse {
    let view = match result {
        Ok(view) => view,
        Err(err) => return MonthResponse::failure(err),
    };
    let leading_blanks = view
        .cells
        .iter()
        .take_while(|cell| matches!(cell, CalendarCell::Blank))
        .count() as u32;
    let days = view
        .days()
        .map(|day| MonthDayItem {
            date: day.date.to_string(),
            day: day.date.day(),
            marked: day.marked,
            pending_start: day.pending_start,
        })
        .collect();
    MonthResponse {
        ok: true,
        title: view.title,
        leading_blanks,
        days,
        message: String::new(),
    }
}
