//! Tracker use-case service.
//!
//! # Responsibility
//! - Own the application state (periods, selection cursor, visible month).
//! - Apply selection transitions and persist after every store mutation.
//! - Expose derived statistics, month grids and export rows on demand.
//!
//! # Invariants
//! - The store is loaded from the repository once, when the service opens.
//! - Persistence failures are logged and never fail the user operation.
//! - Declined removals leave both store and cursor untouched.

use crate::calendar::month_view::{MonthView, VisibleMonth};
use crate::model::date::CalendarDate;
use crate::model::period::Period;
use crate::report::export::{export_rows, ExportRow};
use crate::report::summary::Summary;
use crate::repo::blob_repo::{BlobRepository, PERIODS_BLOB_NAME};
use crate::tracker::prediction::{summarize, Prediction};
use crate::tracker::selection::{SelectionMachine, Transition};
use crate::tracker::store::{PeriodStore, StoreResult};
use log::{error, info, warn};

/// Confirmation collaborator asked before a picked period is removed.
pub trait RemovalConfirmer {
    fn confirm_removal(&self, period: &Period) -> bool;
}

impl<F> RemovalConfirmer for F
where
    F: Fn(&Period) -> bool,
{
    fn confirm_removal(&self, period: &Period) -> bool {
        self(period)
    }
}

/// Result of one pick as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    RangeStarted(CalendarDate),
    PeriodAdded(Period),
    PeriodRemoved(Period),
    RemovalDeclined(Period),
}

/// In-memory application state, detachable from any repository.
#[derive(Debug, Clone)]
pub struct TrackerState {
    store: PeriodStore,
    selection: SelectionMachine,
    visible: VisibleMonth,
}

impl TrackerState {
    pub fn new(store: PeriodStore, today: CalendarDate) -> Self {
        Self {
            store,
            selection: SelectionMachine::new(),
            visible: VisibleMonth::containing(today),
        }
    }
}

/// Tracker facade over an injected blob repository.
pub struct TrackerService<R: BlobRepository> {
    repo: R,
    state: TrackerState,
}

impl<R: BlobRepository> TrackerService<R> {
    /// Loads persisted periods and shows the month containing `today`.
    ///
    /// Unreadable storage yields an empty tracker.
    pub fn open(repo: R, today: CalendarDate) -> Self {
        let blob = match repo.read_blob(PERIODS_BLOB_NAME) {
            Ok(blob) => blob,
            Err(err) => {
                warn!(
                    "event=tracker_open module=service status=fallback reason=read_failed error={}",
                    err
                );
                None
            }
        };
        let store = PeriodStore::load(blob.as_deref());
        info!(
            "event=tracker_open module=service status=ok periods={}",
            store.len()
        );

        Self {
            repo,
            state: TrackerState::new(store, today),
        }
    }

    /// Resumes a session whose state was detached with [`Self::into_state`].
    pub fn from_state(repo: R, state: TrackerState) -> Self {
        Self { repo, state }
    }

    pub fn into_state(self) -> TrackerState {
        self.state
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Feeds one picked date through the selection machine.
    ///
    /// # Errors
    /// - `StoreError::IndexOutOfRange` if a confirmed removal targets a
    ///   stale index; the interactive flow never produces this.
    pub fn pick(
        &mut self,
        date: CalendarDate,
        confirmer: &impl RemovalConfirmer,
    ) -> StoreResult<PickOutcome> {
        let transition = self.state.selection.evaluate(date, &self.state.store);
        let outcome = match transition {
            Transition::ConfirmRemoval { index, period } => {
                if confirmer.confirm_removal(&period) {
                    let removed = self.state.store.remove_at(index)?;
                    self.persist();
                    PickOutcome::PeriodRemoved(removed)
                } else {
                    PickOutcome::RemovalDeclined(period)
                }
            }
            Transition::BeginRange(start) => PickOutcome::RangeStarted(start),
            Transition::Commit(period) => {
                self.state.store.add(period);
                self.persist();
                PickOutcome::PeriodAdded(period)
            }
        };
        self.state.selection.apply(&transition);

        info!(
            "event=period_pick module=service status=ok outcome={} periods={}",
            outcome_label(&outcome),
            self.state.store.len()
        );
        Ok(outcome)
    }

    /// Removes the first stored period equal to `period`.
    ///
    /// Returns `false` when no such period is stored.
    pub fn remove_period(&mut self, period: &Period) -> bool {
        let Some(index) = self.state.store.position_of(period) else {
            return false;
        };
        if self.state.store.remove_at(index).is_err() {
            return false;
        }
        self.persist();
        info!(
            "event=period_remove module=service status=ok index={} periods={}",
            index,
            self.state.store.len()
        );
        true
    }

    /// Abandons a half-picked range; stored periods are untouched.
    pub fn cancel_selection(&mut self) {
        self.state.selection.reset();
    }

    /// Drops every stored period and persists the empty list.
    pub fn clear_all(&mut self) {
        let removed = self.state.store.len();
        self.state.store.clear();
        self.persist();
        info!("event=period_clear module=service status=ok removed={removed}");
    }

    /// Periods in ascending start order.
    pub fn periods(&self) -> Vec<Period> {
        self.state.store.sorted_by_start()
    }

    pub fn pending_start(&self) -> Option<CalendarDate> {
        self.state.selection.pending_start()
    }

    pub fn prediction(&self) -> Prediction {
        summarize(self.state.store.periods())
    }

    pub fn summary(&self) -> Summary {
        Summary::from_prediction(&self.prediction())
    }

    pub fn export_rows(&self) -> Vec<ExportRow> {
        export_rows(self.state.store.periods())
    }

    pub fn visible_month(&self) -> VisibleMonth {
        self.state.visible
    }

    pub fn show_month(&mut self, month: VisibleMonth) {
        self.state.visible = month;
    }

    pub fn show_previous_month(&mut self) {
        self.state.visible = self.state.visible.previous();
    }

    pub fn show_next_month(&mut self) {
        self.state.visible = self.state.visible.next();
    }

    pub fn month_view(&self) -> MonthView {
        MonthView::build(
            self.state.visible,
            &self.state.store,
            self.state.selection.pending_start(),
        )
    }

    fn persist(&self) {
        let blob = match self.state.store.to_blob() {
            Ok(blob) => blob,
            Err(err) => {
                error!("event=period_persist module=service status=error error_code=encode_failed error={err}");
                return;
            }
        };
        if let Err(err) = self.repo.write_blob(PERIODS_BLOB_NAME, &blob) {
            error!("event=period_persist module=service status=error error_code=write_failed error={err}");
        }
    }
}

fn outcome_label(outcome: &PickOutcome) -> &'static str {
    match outcome {
        PickOutcome::RangeStarted(_) => "range_started",
        PickOutcome::PeriodAdded(_) => "period_added",
        PickOutcome::PeriodRemoved(_) => "period_removed",
        PickOutcome::RemovalDeclined(_) => "removal_declined",
    }
}
