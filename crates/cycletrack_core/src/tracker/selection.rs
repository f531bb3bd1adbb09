//! Click-driven range selection.
//!
//! # Responsibility
//! - Track the pending start date between two picks.
//! - Map each picked date to one store instruction.
//!
//! # Invariants
//! - A pick inside a stored period always yields `ConfirmRemoval`, whatever
//!   the pending state.
//! - `Commit` periods are order-normalized (`start <= end`).
//! - Removal instructions never change the pending state.

use crate::model::date::CalendarDate;
use crate::model::period::Period;
use crate::tracker::store::PeriodStore;

/// Cursor state of the two-click selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    PendingStart(CalendarDate),
}

/// Instruction produced for one picked date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The date lies in a stored period; removal needs confirmation.
    ConfirmRemoval { index: usize, period: Period },
    /// No range open yet; remember this date as its start.
    BeginRange(CalendarDate),
    /// Second pick closes the range; append this period.
    Commit(Period),
}

/// Two-state selection machine (`Idle` / `PendingStart`).
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    state: SelectionState,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn pending_start(&self) -> Option<CalendarDate> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::PendingStart(date) => Some(date),
        }
    }

    /// Decides what a pick of `date` means without mutating anything.
    pub fn evaluate(&self, date: CalendarDate, store: &PeriodStore) -> Transition {
        if let Some((index, period)) = store.find_containing(date) {
            return Transition::ConfirmRemoval { index, period };
        }

        match self.state {
            SelectionState::Idle => Transition::BeginRange(date),
            SelectionState::PendingStart(start) => Transition::Commit(Period::new(start, date)),
        }
    }

    /// Advances the cursor for a transition the caller has acted on.
    pub fn apply(&mut self, transition: &Transition) {
        match transition {
            Transition::ConfirmRemoval { .. } => {}
            Transition::BeginRange(date) => self.state = SelectionState::PendingStart(*date),
            Transition::Commit(_) => self.state = SelectionState::Idle,
        }
    }

    /// Drops any pending start.
    pub fn reset(&mut self) {
        self.state = SelectionState::Idle;
    }
}
