//! Aggregation of change events into ranked groups.

use std::collections::BTreeMap;

use crate::model::{ChangeEvent, ChangeKind, Track};
use crate::ops::Snapshot;
use crate::report::model::{GroupKey, Report, ReportQuery, ReportRow};
use crate::report::property::Property;

/// Build the full report for `query` from the given events.
///
/// Only `modified` events inside the window, on the measure's source field and
/// carrying a delta contribute. Each is attributed to its track's current
/// snapshot entry; events for tracks no longer in the snapshot are skipped.
pub fn build_report(snapshot: &Snapshot, events: &[ChangeEvent], query: &ReportQuery) -> Report {
    let mut per_track: BTreeMap<&str, (&Track, f64)> = BTreeMap::new();

    for event in events {
        let Some(delta) = contributing_delta(event, query) else {
            continue;
        };
        let Some(track) = snapshot.get(&event.persistent_id) else {
            continue;
        };
        let entry = per_track
            .entry(track.persistent_id.as_str())
            .or_insert((track, 0.0));
        entry.1 += query.measure.contribution(delta, track);
    }

    let groups = group_tracks(&query.group_by, per_track.values().map(|(track, _)| *track));
    let mut rows: Vec<ReportRow> = groups
        .into_iter()
        .map(|(key, tracks)| ReportRow {
            value: tracks
                .iter()
                .filter_map(|t| per_track.get(t.persistent_id.as_str()))
                .map(|(_, value)| value)
                .sum(),
            track_count: query.count.then_some(tracks.len()),
            key,
        })
        .collect();
    sort_rows(&mut rows);

    Report {
        group_by: query.group_by.clone(),
        measure: query.measure,
        window: query.window,
        total_groups: rows.len(),
        rows,
    }
}

/// Measure descending, then group key ascending
pub fn sort_rows(rows: &mut [ReportRow]) {
    rows.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.key.cmp(&b.key)));
}

/// Render a track's group key for the given properties
pub fn group_key(group_by: &[Property], track: &Track) -> GroupKey {
    GroupKey(group_by.iter().map(|p| p.render(track)).collect())
}

/// Partition tracks by group key; every track lands in exactly one group.
/// Tracks are listed once each, so a group's length is its distinct track count.
pub fn group_tracks<'a>(
    group_by: &[Property],
    tracks: impl IntoIterator<Item = &'a Track>,
) -> BTreeMap<GroupKey, Vec<&'a Track>> {
    let mut groups: BTreeMap<GroupKey, Vec<&Track>> = BTreeMap::new();
    for track in tracks {
        groups
            .entry(group_key(group_by, track))
            .or_default()
            .push(track);
    }
    groups
}

fn contributing_delta(event: &ChangeEvent, query: &ReportQuery) -> Option<i64> {
    if event.kind != ChangeKind::Modified
        || event.field != Some(query.measure.source_field())
        || !query.window.contains(event.timestamp)
    {
        return None;
    }
    event.delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;
    use crate::report::property::Measure;
    use crate::report::model::TimeWindow;

    fn play(ts: i64, track: &Track, delta: i64) -> ChangeEvent {
        let old = track.play_count.unwrap_or(0) - delta;
        ChangeEvent::modified(
            ts,
            track,
            Field::PlayCount,
            Some(&crate::model::FieldValue::Integer(old)),
        )
    }

    fn query(group_by: &str, measure: Measure, from: i64, to: i64) -> ReportQuery {
        ReportQuery::parse(group_by, measure.name(), TimeWindow::new(from, to).unwrap(), true)
            .unwrap()
    }

    #[test]
    fn test_events_outside_window_ignored() {
        let a = Track::new("A")
            .with(Field::Artist, "X")
            .with(Field::PlayCount, 5);
        let snapshot = Snapshot::new(1, vec![a.clone()]);
        let events = vec![play(100, &a, 2), play(400, &a, 3)];

        let report = build_report(&snapshot, &events, &query("Artist", Measure::PlayCount, 0, 300));
        assert_eq!(report.rows[0].value, 2.0);
    }

    #[test]
    fn test_events_for_removed_tracks_skipped() {
        let gone = Track::new("G").with(Field::PlayCount, 2);
        let events = vec![play(10, &gone, 2)];

        let report = build_report(&Snapshot::default(), &events, &query("Artist", Measure::PlayCount, 0, 300));
        assert!(report.is_empty());
        assert_eq!(report.total_groups, 0);
    }

    #[test]
    fn test_rating_measure_ignores_play_events() {
        let a = Track::new("A").with(Field::PlayCount, 3).with(Field::Rating, 80);
        let snapshot = Snapshot::new(1, vec![a.clone()]);
        let rating = ChangeEvent::modified(
            10,
            &a,
            Field::Rating,
            Some(&crate::model::FieldValue::Integer(60)),
        );
        let events = vec![play(10, &a, 3), rating];

        let report = build_report(&snapshot, &events, &query("PersistentID", Measure::Rating, 0, 20));
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].value, 20.0);
        assert_eq!(report.rows[0].track_count, Some(1));
    }

    #[test]
    fn test_ties_broken_by_key() {
        let a = Track::new("A").with(Field::Artist, "b").with(Field::PlayCount, 1);
        let b = Track::new("B").with(Field::Artist, "a").with(Field::PlayCount, 1);
        let snapshot = Snapshot::new(1, vec![a.clone(), b.clone()]);
        let events = vec![play(1, &a, 1), play(1, &b, 1)];

        let report = build_report(&snapshot, &events, &query("Artist", Measure::PlayCount, 0, 5));
        let keys: Vec<String> = report.rows.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
