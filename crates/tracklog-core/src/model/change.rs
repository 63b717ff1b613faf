use serde::{Deserialize, Serialize};

use super::field::{Field, FieldKind, FieldValue};
use super::track::Track;

/// What a change event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Modified => "modified",
        }
    }

    pub fn parse(s: &str) -> Option<ChangeKind> {
        match s {
            "added" => Some(ChangeKind::Added),
            "removed" => Some(ChangeKind::Removed),
            "modified" => Some(ChangeKind::Modified),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ChangeEvent - one committed difference between two library observations
///
/// Events are immutable once committed. `seq` is assigned by the store at
/// commit time and is `None` for events that were only computed (dry run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Store-assigned commit order
    pub seq: Option<i64>,

    /// Commit time, Unix seconds
    pub timestamp: i64,

    pub kind: ChangeKind,

    pub persistent_id: String,

    /// Track title at the time of the event
    pub track_title: String,

    /// Changed field; only set for `Modified`
    pub field: Option<Field>,

    /// New field value for `Modified`; the track's play count otherwise
    pub value: Option<FieldValue>,

    /// `new - old` for integer fields; counters read absent as zero
    pub delta: Option<i64>,
}

impl ChangeEvent {
    /// A track seen for the first time
    pub fn added(timestamp: i64, track: &Track) -> Self {
        Self::whole_track(timestamp, ChangeKind::Added, track)
    }

    /// A track that disappeared from the library
    pub fn removed(timestamp: i64, track: &Track) -> Self {
        Self::whole_track(timestamp, ChangeKind::Removed, track)
    }

    /// One field of a known track changed; `current` is the new track state
    pub fn modified(
        timestamp: i64,
        current: &Track,
        field: Field,
        old: Option<&FieldValue>,
    ) -> Self {
        let value = current.value(field);
        let delta = if field.kind() == FieldKind::Integer {
            let before = integer_or_zero(field, old);
            let after = integer_or_zero(field, value.as_ref());
            match (before, after) {
                (Some(before), Some(after)) => after.checked_sub(before),
                _ => None,
            }
        } else {
            None
        };

        Self {
            seq: None,
            timestamp,
            kind: ChangeKind::Modified,
            persistent_id: current.persistent_id.clone(),
            track_title: current.display_title().to_string(),
            field: Some(field),
            value,
            delta,
        }
    }

    fn whole_track(timestamp: i64, kind: ChangeKind, track: &Track) -> Self {
        Self {
            seq: None,
            timestamp,
            kind,
            persistent_id: track.persistent_id.clone(),
            track_title: track.display_title().to_string(),
            field: None,
            value: track.play_count.map(FieldValue::Integer),
            delta: None,
        }
    }

    /// The log's type column: the field name for modifications, the kind otherwise
    pub fn type_label(&self) -> &'static str {
        match (self.kind, self.field) {
            (ChangeKind::Modified, Some(field)) => field.name(),
            (kind, _) => kind.as_str(),
        }
    }
}

fn integer_or_zero(field: Field, value: Option<&FieldValue>) -> Option<i64> {
    match value {
        Some(FieldValue::Integer(v)) => Some(*v),
        None if field.is_counter() => Some(0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modified_integer_carries_delta() {
        let now = Track::new("A").with(Field::PlayCount, 5);
        let old = FieldValue::Integer(2);
        let event = ChangeEvent::modified(100, &now, Field::PlayCount, Some(&old));

        assert_eq!(event.value, Some(FieldValue::Integer(5)));
        assert_eq!(event.delta, Some(3));
        assert_eq!(event.type_label(), "PlayCount");
    }

    #[test]
    fn test_first_play_counts_from_zero() {
        let now = Track::new("A").with(Field::PlayCount, 3);
        let event = ChangeEvent::modified(100, &now, Field::PlayCount, None);
        assert_eq!(event.delta, Some(3));

        let rated = Track::new("A").with(Field::Rating, 80);
        let event = ChangeEvent::modified(100, &rated, Field::Rating, None);
        assert_eq!(event.delta, Some(80));
    }

    #[test]
    fn test_counter_cleared_goes_negative() {
        let old = FieldValue::Integer(60);
        let event = ChangeEvent::modified(100, &Track::new("A"), Field::Rating, Some(&old));
        assert_eq!(event.delta, Some(-60));
    }

    #[test]
    fn test_non_counter_from_absent_has_no_delta() {
        let now = Track::new("A").with(Field::Year, 1999);
        let event = ChangeEvent::modified(100, &now, Field::Year, None);
        assert_eq!(event.delta, None);
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let now = Track::new("A").with(Field::PlayCount, i64::MAX);
        let old = FieldValue::Integer(-1);
        let event = ChangeEvent::modified(100, &now, Field::PlayCount, Some(&old));
        assert_eq!(event.delta, None);
    }

    #[test]
    fn test_modified_text_has_no_delta() {
        let now = Track::new("A").with(Field::Artist, "New");
        let old = FieldValue::from("Old");
        let event = ChangeEvent::modified(100, &now, Field::Artist, Some(&old));
        assert_eq!(event.delta, None);
        assert_eq!(event.value, Some(FieldValue::from("New")));
    }

    #[test]
    fn test_added_reports_play_count_and_kind_label() {
        let track = Track::new("A")
            .with(Field::Title, "Song")
            .with(Field::PlayCount, 9);
        let event = ChangeEvent::added(100, &track);
        assert_eq!(event.type_label(), "added");
        assert_eq!(event.track_title, "Song");
        assert_eq!(event.value, Some(FieldValue::Integer(9)));
        assert!(event.field.is_none());
    }

    #[test]
    fn test_kind_parse_round_trip() {
        for kind in [ChangeKind::Added, ChangeKind::Removed, ChangeKind::Modified] {
            assert_eq!(ChangeKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ChangeKind::parse("deleted"), None);
    }
}
