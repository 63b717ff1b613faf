//! Report Tests
//!
//! ## Scenarios Covered
//!
//! 1. Two tracks by one artist gaining plays sum into one row
//! 2. Invalid names fail before any read
//! 3. Limit, reverse and count shape the output

#![allow(clippy::unwrap_used, clippy::expect_used)]

use tracklog_core::errors::{ExError, ExErrorKind};
use tracklog_core::model::{ChangeEvent, Field, Track};
use tracklog_core::ops::{ChangeLogStore, ReportStore, Snapshot, SnapshotStore};
use tracklog_core::provider::StaticProvider;
use tracklog_core::report::{ReportQuery, TimeWindow};
use tracklog_engine::{run_report, update_at, ReportRequest};
use tracklog_store::SqliteStore;

const DAY: i64 = 86_400;

fn track(id: &str, artist: &str, plays: i64) -> Track {
    Track::new(id)
        .with(Field::Title, id)
        .with(Field::Artist, artist)
        .with(Field::PlayCount, plays)
        .with(Field::Year, 1991)
}

/// A store whose reads must never happen
struct UnreadableStore;

impl SnapshotStore for UnreadableStore {
    fn load_snapshot(&self) -> Result<Snapshot, ExError> {
        panic!("snapshot read during validation");
    }
}

impl ReportStore for UnreadableStore {}

impl ChangeLogStore for UnreadableStore {
    fn recent_events(&self, _limit: usize) -> Result<Vec<ChangeEvent>, ExError> {
        panic!("log read during validation");
    }

    fn events_between(&self, _from: i64, _to: i64) -> Result<Vec<ChangeEvent>, ExError> {
        panic!("log read during validation");
    }
}

#[test]
fn test_plays_sum_by_artist() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut provider = StaticProvider::new(vec![track("A", "X", 0), track("B", "X", 0)]);
    update_at(&provider, &mut store, false, 50).unwrap();

    provider.set_tracks(vec![track("A", "X", 3), track("B", "X", 0)]);
    update_at(&provider, &mut store, false, 100).unwrap();
    provider.set_tracks(vec![track("A", "X", 3), track("B", "X", 1)]);
    update_at(&provider, &mut store, false, 200).unwrap();

    let query =
        ReportQuery::parse("Artist", "PlayCount", TimeWindow::new(0, 300).unwrap(), false).unwrap();
    let report = run_report(&store, &query).unwrap();

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].key.to_string(), "X");
    assert_eq!(report.rows[0].value, 4.0);
}

#[test]
fn test_bogus_grouping_fails_without_reading() {
    let request = ReportRequest {
        group_by: "Bogus".to_string(),
        ..Default::default()
    };

    let err = request.execute(&UnreadableStore, 1_000).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidGroupingProperty);
    assert!(err.to_string().contains("Bogus"));
}

#[test]
fn test_invalid_inputs_fail_without_reading() {
    let cases = [
        ReportRequest {
            sort_by: "Title".to_string(),
            ..Default::default()
        },
        ReportRequest {
            timeframe_days: -1.0,
            ..Default::default()
        },
        ReportRequest {
            limit: 0,
            ..Default::default()
        },
    ];
    let kinds: Vec<ExErrorKind> = cases
        .iter()
        .map(|r| r.execute(&UnreadableStore, 1_000).unwrap_err().kind())
        .collect();

    assert_eq!(
        kinds,
        vec![
            ExErrorKind::InvalidSortingProperty,
            ExErrorKind::InvalidArgument,
            ExErrorKind::InvalidArgument,
        ]
    );
}

#[test]
fn test_request_shapes_output() {
    let now = 40 * DAY;
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut provider = StaticProvider::new(vec![
        track("A", "X", 0),
        track("B", "Y", 0),
        track("C", "Z", 0),
    ]);
    update_at(&provider, &mut store, false, now - 35 * DAY).unwrap();

    // Outside the default 30-day window
    provider.set_tracks(vec![track("A", "X", 9), track("B", "Y", 0), track("C", "Z", 0)]);
    update_at(&provider, &mut store, false, now - 31 * DAY).unwrap();

    provider.set_tracks(vec![track("A", "X", 10), track("B", "Y", 5), track("C", "Z", 2)]);
    update_at(&provider, &mut store, false, now - DAY).unwrap();

    let request = ReportRequest {
        group_by: "Artist".to_string(),
        limit: 2,
        count: true,
        ..Default::default()
    };
    let output = request.execute(&store, now).unwrap();

    let shown: Vec<(usize, String, f64)> = output
        .rows
        .iter()
        .map(|r| (r.rank, r.row.key.to_string(), r.row.value))
        .collect();
    assert_eq!(
        shown,
        vec![(1, "Y".to_string(), 5.0), (2, "Z".to_string(), 2.0)]
    );
    assert_eq!(output.report.total_groups, 3);
    assert_eq!(output.rows[0].row.track_count, Some(1));

    let reversed = ReportRequest {
        group_by: "Decade".to_string(),
        reverse: true,
        ..Default::default()
    }
    .execute(&store, now)
    .unwrap();
    assert_eq!(reversed.rows.len(), 1);
    assert_eq!(reversed.rows[0].row.key.to_string(), "1990s");
    assert_eq!(reversed.rows[0].row.value, 8.0);
}
