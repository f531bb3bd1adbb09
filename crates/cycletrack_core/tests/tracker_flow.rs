use cycletrack_core::db::open_db;
use cycletrack_core::{
    BlobRepository, CalendarDate, MemoryBlobRepository, Period, PeriodStore, PickOutcome,
    RepoError, RepoResult, SqliteBlobRepository, TrackerService, PERIODS_BLOB_NAME,
};
use std::cell::Cell;

fn date(value: &str) -> CalendarDate {
    CalendarDate::parse(value).expect("valid test date")
}

fn period(start: &str, end: &str) -> Period {
    Period::new(date(start), date(end))
}

fn confirm(_: &Period) -> bool {
    true
}

fn decline(_: &Period) -> bool {
    false
}

fn persisted(repo: &impl BlobRepository) -> Vec<Period> {
    let blob = repo.read_blob(PERIODS_BLOB_NAME).unwrap();
    PeriodStore::from_blob(blob.as_deref().expect("blob should be persisted"))
        .unwrap()
        .periods()
        .to_vec()
}

fn seeded(periods: &[Period]) -> MemoryBlobRepository {
    let blob = PeriodStore::from_periods(periods.to_vec()).to_blob().unwrap();
    MemoryBlobRepository::with_blob(PERIODS_BLOB_NAME, blob)
}

#[test]
fn two_picks_add_and_persist_a_period() {
    let mut tracker = TrackerService::open(MemoryBlobRepository::new(), date("2024-01-15"));

    let first = tracker.pick(date("2024-01-14"), &confirm).unwrap();
    assert_eq!(first, PickOutcome::RangeStarted(date("2024-01-14")));
    assert_eq!(tracker.pending_start(), Some(date("2024-01-14")));
    assert_eq!(
        tracker.repository().read_blob(PERIODS_BLOB_NAME).unwrap(),
        None,
        "a pending start is never persisted"
    );

    let second = tracker.pick(date("2024-01-10"), &confirm).unwrap();
    assert_eq!(second, PickOutcome::PeriodAdded(period("2024-01-10", "2024-01-14")));
    assert_eq!(tracker.pending_start(), None);
    assert_eq!(persisted(tracker.repository()), vec![period("2024-01-10", "2024-01-14")]);
}

#[test]
fn confirmed_pick_inside_period_removes_only_that_period() {
    let repo = seeded(&[
        period("2024-01-01", "2024-01-05"),
        period("2024-02-01", "2024-02-05"),
        period("2024-03-01", "2024-03-05"),
    ]);
    let mut tracker = TrackerService::open(repo, date("2024-02-10"));

    let outcome = tracker.pick(date("2024-02-03"), &confirm).unwrap();
    assert_eq!(outcome, PickOutcome::PeriodRemoved(period("2024-02-01", "2024-02-05")));
    assert_eq!(
        tracker.periods(),
        vec![period("2024-01-01", "2024-01-05"), period("2024-03-01", "2024-03-05")]
    );
    assert_eq!(persisted(tracker.repository()), tracker.periods());
}

#[test]
fn declined_removal_changes_nothing() {
    let original = vec![period("2024-01-01", "2024-01-05")];
    let mut tracker = TrackerService::open(seeded(&original), date("2024-01-10"));
    tracker.pick(date("2024-01-20"), &confirm).unwrap();

    let outcome = tracker.pick(date("2024-01-05"), &decline).unwrap();
    assert_eq!(outcome, PickOutcome::RemovalDeclined(original[0]));
    assert_eq!(tracker.periods(), original);
    assert_eq!(tracker.pending_start(), Some(date("2024-01-20")));
    assert_eq!(persisted(tracker.repository()), original);
}

#[test]
fn confirmer_sees_matched_period() {
    let asked = Cell::new(None);
    let mut tracker =
        TrackerService::open(seeded(&[period("2024-01-01", "2024-01-05")]), date("2024-01-10"));

    tracker
        .pick(date("2024-01-03"), &|matched: &Period| {
            asked.set(Some(*matched));
            false
        })
        .unwrap();
    assert_eq!(asked.get(), Some(period("2024-01-01", "2024-01-05")));
}

#[test]
fn removal_keeps_pending_start() {
    let mut tracker =
        TrackerService::open(seeded(&[period("2024-01-01", "2024-01-05")]), date("2024-01-10"));

    tracker.pick(date("2024-01-20"), &confirm).unwrap();
    tracker.pick(date("2024-01-02"), &confirm).unwrap();
    assert!(tracker.periods().is_empty());
    assert_eq!(tracker.pending_start(), Some(date("2024-01-20")));

    let closed = tracker.pick(date("2024-01-24"), &confirm).unwrap();
    assert_eq!(closed, PickOutcome::PeriodAdded(period("2024-01-20", "2024-01-24")));
}

#[test]
fn overlapping_ranges_are_accepted() {
    let mut tracker = TrackerService::open(MemoryBlobRepository::new(), date("2024-01-15"));
    tracker.pick(date("2024-01-01"), &confirm).unwrap();
    tracker.pick(date("2024-01-05"), &confirm).unwrap();

    // Picks outside the stored period can still enclose it.
    tracker.pick(date("2023-12-30"), &confirm).unwrap();
    tracker.pick(date("2024-01-09"), &confirm).unwrap();

    assert_eq!(
        tracker.periods(),
        vec![period("2023-12-30", "2024-01-09"), period("2024-01-01", "2024-01-05")]
    );
}

#[test]
fn remove_period_and_clear_all_persist() {
    let mut tracker = TrackerService::open(
        seeded(&[period("2024-01-01", "2024-01-05"), period("2024-02-01", "2024-02-03")]),
        date("2024-02-10"),
    );

    assert!(tracker.remove_period(&period("2024-01-01", "2024-01-05")));
    assert!(!tracker.remove_period(&period("2024-01-01", "2024-01-05")));
    assert_eq!(persisted(tracker.repository()), vec![period("2024-02-01", "2024-02-03")]);

    tracker.clear_all();
    assert!(tracker.periods().is_empty());
    assert_eq!(
        tracker.repository().read_blob(PERIODS_BLOB_NAME).unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn malformed_storage_opens_empty() {
    let repo = MemoryBlobRepository::with_blob(PERIODS_BLOB_NAME, "{not json");
    let tracker = TrackerService::open(repo, date("2024-01-01"));
    assert!(tracker.periods().is_empty());
    assert_eq!(tracker.summary().last_period, "-");
}

struct BrokenRepository;

impl BlobRepository for BrokenRepository {
    fn read_blob(&self, _name: &str) -> RepoResult<Option<String>> {
        Err(RepoError::Db(rusqlite::Error::InvalidQuery.into()))
    }

    fn write_blob(&self, _name: &str, _value: &str) -> RepoResult<()> {
        Err(RepoError::Db(rusqlite::Error::InvalidQuery.into()))
    }
}

#[test]
fn storage_failures_do_not_fail_user_operations() {
    let mut tracker = TrackerService::open(BrokenRepository, date("2024-01-01"));
    assert!(tracker.periods().is_empty());

    tracker.pick(date("2024-01-01"), &confirm).unwrap();
    let outcome = tracker.pick(date("2024-01-04"), &confirm).unwrap();
    assert_eq!(outcome, PickOutcome::PeriodAdded(period("2024-01-01", "2024-01-04")));
    assert_eq!(tracker.periods().len(), 1);
}

#[test]
fn prediction_and_summary_follow_store_contents() {
    let mut tracker = TrackerService::open(MemoryBlobRepository::new(), date("2024-01-15"));
    assert_eq!(tracker.prediction().average_cycle_days, None);

    for (first, second) in [("2024-01-11", "2024-01-14"), ("2024-01-01", "2024-01-04")] {
        tracker.pick(date(first), &confirm).unwrap();
        tracker.pick(date(second), &confirm).unwrap();
    }

    let prediction = tracker.prediction();
    assert_eq!(prediction.last_period, Some(period("2024-01-11", "2024-01-14")));
    assert_eq!(prediction.average_cycle_days, Some(10.0));
    assert_eq!(prediction.next_predicted, Some(date("2024-01-21")));

    let summary = tracker.summary();
    assert_eq!(summary.last_period, "Jan 11 - Jan 14");
    assert_eq!(summary.average_cycle, "10 days");
    assert_eq!(summary.next_predicted, "Jan 21");

    let rows = tracker.export_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].start_date, "1/1/2024");
    assert_eq!(rows[1].cycle_day, 2);
}

#[test]
fn month_view_tracks_navigation_and_pending_start() {
    let mut tracker =
        TrackerService::open(seeded(&[period("2024-01-30", "2024-02-02")]), date("2024-01-15"));
    assert_eq!(tracker.month_view().title, "January 2024");

    tracker.show_next_month();
    tracker.pick(date("2024-02-20"), &confirm).unwrap();
    let view = tracker.month_view();
    assert_eq!(view.title, "February 2024");
    assert_eq!(view.days().filter(|day| day.marked).count(), 2);
    assert_eq!(
        view.days().find(|day| day.pending_start).map(|day| day.date),
        Some(date("2024-02-20"))
    );

    tracker.show_previous_month();
    tracker.show_previous_month();
    assert_eq!(tracker.month_view().title, "December 2023");
}

#[test]
fn state_detaches_and_resumes_across_repositories() {
    let mut tracker = TrackerService::open(MemoryBlobRepository::new(), date("2024-01-15"));
    tracker.pick(date("2024-01-10"), &confirm).unwrap();

    let state = tracker.into_state();
    let mut resumed = TrackerService::from_state(MemoryBlobRepository::new(), state);
    assert_eq!(resumed.pending_start(), Some(date("2024-01-10")));

    resumed.pick(date("2024-01-12"), &confirm).unwrap();
    assert_eq!(persisted(resumed.repository()), vec![period("2024-01-10", "2024-01-12")]);
}

#[test]
fn periods_survive_reopening_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cycletrack.db");

    {
        let conn = open_db(&path).unwrap();
        let mut tracker = TrackerService::open(SqliteBlobRepository::new(&conn), date("2024-03-01"));
        tracker.pick(date("2024-03-05"), &confirm).unwrap();
        tracker.pick(date("2024-03-01"), &confirm).unwrap();
        tracker.pick(date("2024-02-02"), &confirm).unwrap();
        tracker.pick(date("2024-02-06"), &confirm).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let tracker = TrackerService::open(SqliteBlobRepository::new(&conn), date("2024-03-01"));
    assert_eq!(
        tracker.periods(),
        vec![period("2024-02-02", "2024-02-06"), period("2024-03-01", "2024-03-05")]
    );
    assert_eq!(tracker.pending_start(), None);
}
