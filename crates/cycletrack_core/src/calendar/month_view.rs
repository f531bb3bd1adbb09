//! Month grid view model and month navigation.
//!
//! # Responsibility
//! - Produce leading blank cells and one cell per day for a month.
//! - Flag days inside stored periods and the pending range start.
//!
//! # Invariants
//! - Weeks start on Sunday; blanks = weekday index of the 1st.
//! - Navigation clamps at the supported date range instead of panicking.

use crate::model::date::CalendarDate;
use crate::tracker::store::PeriodStore;
use chrono::{Datelike, Months, NaiveDate};

/// First day of the month currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VisibleMonth {
    first: NaiveDate,
}

impl VisibleMonth {
    /// Returns `None` when `month` is outside 1-12 or the year is unsupported.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// Month that contains `date`.
    pub fn containing(date: CalendarDate) -> Self {
        let naive = date.as_naive();
        Self {
            first: naive.with_day(1).unwrap_or(naive),
        }
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    pub fn month(self) -> u32 {
        self.first.month()
    }

    pub fn first_day(self) -> CalendarDate {
        CalendarDate::from(self.first)
    }

    pub fn previous(self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .map_or(self, |first| Self { first })
    }

    pub fn next(self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .map_or(self, |first| Self { first })
    }

    /// Heading text, e.g. `March 2024`.
    pub fn title(self) -> String {
        self.first.format("%B %Y").to_string()
    }

    /// Days of this month in order.
    pub fn days(self) -> impl Iterator<Item = CalendarDate> {
        let month = self.first.month();
        self.first
            .iter_days()
            .take_while(move |day| day.month() == month)
            .map(CalendarDate::from)
    }
}

/// One rendered day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: CalendarDate,
    /// Inside at least one stored period.
    pub marked: bool,
    /// Equals the pending range start.
    pub pending_start: bool,
}

/// Grid slot; blanks pad the first week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    Blank,
    Day(DayCell),
}

/// Render-ready month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub month: VisibleMonth,
    pub title: String,
    pub cells: Vec<CalendarCell>,
}

impl MonthView {
    pub fn build(
        month: VisibleMonth,
        store: &PeriodStore,
        pending_start: Option<CalendarDate>,
    ) -> Self {
        let leading = month.first_day().weekday().num_days_from_sunday() as usize;
        let mut cells = vec![CalendarCell::Blank; leading];
        cells.extend(month.days().map(|date| {
            CalendarCell::Day(DayCell {
                date,
                marked: store.is_marked(date),
                pending_start: pending_start == Some(date),
            })
        }));

        Self {
            month,
            title: month.title(),
            cells,
        }
    }

    /// Day cells only, skipping leading blanks.
    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter_map(|cell| match cell {
            CalendarCell::Blank => None,
            CalendarCell::Day(day) => Some(day),
        })
    }
}
