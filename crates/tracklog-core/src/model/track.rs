use serde::{Deserialize, Serialize};

use super::field::{Field, FieldKind, FieldValue};

/// Track - one media item as reported by the library
///
/// Identity is `persistent_id`; every other field is mutable and optional.
/// Serialized names match the canonical field names so that export files and
/// command-line properties share one vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Track {
    /// Stable identifier assigned by the library
    #[serde(rename = "PersistentID")]
    pub persistent_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disc_number: Option<i64>,
    /// Duration in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<i64>,
    /// 0-100, twenty per star
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_count: Option<i64>,

    /// Unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played_date: Option<i64>,
}

impl Track {
    /// Create a track with only its identity set
    pub fn new(persistent_id: impl Into<String>) -> Self {
        Self {
            persistent_id: persistent_id.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter, mostly for tests and fixtures
    pub fn with(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    /// Title used in change events; empty when the library has none
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Read one field as a typed value
    pub fn value(&self, field: Field) -> Option<FieldValue> {
        match field.kind() {
            FieldKind::Text => self.text(field).map(|s| FieldValue::Text(s.to_string())),
            kind => self.integer(field).map(|v| FieldValue::from_i64(kind, v)),
        }
    }

    /// Write one field; a value of the wrong kind is coerced where meaningful
    pub fn set(&mut self, field: Field, value: Option<FieldValue>) {
        match field.kind() {
            FieldKind::Text => {
                let text = value.map(|v| v.to_string());
                match field {
                    Field::Title => self.title = text,
                    Field::Artist => self.artist = text,
                    Field::AlbumArtist => self.album_artist = text,
                    Field::AlbumTitle => self.album_title = text,
                    Field::Genre => self.genre = text,
                    Field::Composer => self.composer = text,
                    _ => {}
                }
            }
            FieldKind::Integer | FieldKind::Timestamp => {
                let number = value.and_then(|v| match v {
                    FieldValue::Text(s) => s.trim().parse().ok(),
                    other => other.as_i64(),
                });
                if let Some(slot) = self.integer_slot(field) {
                    *slot = number;
                }
            }
        }
    }

    /// Integer (or timestamp) view of a numeric field
    pub fn integer(&self, field: Field) -> Option<i64> {
        match field {
            Field::Year => self.year,
            Field::TrackNumber => self.track_number,
            Field::DiscNumber => self.disc_number,
            Field::TotalTime => self.total_time,
            Field::Rating => self.rating,
            Field::PlayCount => self.play_count,
            Field::SkipCount => self.skip_count,
            Field::DateAdded => self.date_added,
            Field::ReleaseDate => self.release_date,
            Field::LastPlayedDate => self.last_played_date,
            _ => None,
        }
    }

    fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => self.title.as_deref(),
            Field::Artist => self.artist.as_deref(),
            Field::AlbumArtist => self.album_artist.as_deref(),
            Field::AlbumTitle => self.album_title.as_deref(),
            Field::Genre => self.genre.as_deref(),
            Field::Composer => self.composer.as_deref(),
            _ => None,
        }
    }

    fn integer_slot(&mut self, field: Field) -> Option<&mut Option<i64>> {
        match field {
            Field::Year => Some(&mut self.year),
            Field::TrackNumber => Some(&mut self.track_number),
            Field::DiscNumber => Some(&mut self.disc_number),
            Field::TotalTime => Some(&mut self.total_time),
            Field::Rating => Some(&mut self.rating),
            Field::PlayCount => Some(&mut self.play_count),
            Field::SkipCount => Some(&mut self.skip_count),
            Field::DateAdded => Some(&mut self.date_added),
            Field::ReleaseDate => Some(&mut self.release_date),
            Field::LastPlayedDate => Some(&mut self.last_played_date),
            _ => None,
        }
    }
}
