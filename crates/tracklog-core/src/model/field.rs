use serde::{Deserialize, Serialize};

/// The closed set of tracked metadata fields, in layout order.
///
/// `PersistentID` is identity, not a field, and never appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    Title,
    Artist,
    AlbumArtist,
    AlbumTitle,
    Genre,
    Composer,
    Year,
    TrackNumber,
    DiscNumber,
    TotalTime,
    Rating,
    PlayCount,
    SkipCount,
    DateAdded,
    ReleaseDate,
    LastPlayedDate,
}

/// Storage class of a field's values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    /// Seconds since the Unix epoch, UTC
    Timestamp,
}

impl Field {
    /// Every field in layout order
    pub const ALL: [Field; 16] = [
        Field::Title,
        Field::Artist,
        Field::AlbumArtist,
        Field::AlbumTitle,
        Field::Genre,
        Field::Composer,
        Field::Year,
        Field::TrackNumber,
        Field::DiscNumber,
        Field::TotalTime,
        Field::Rating,
        Field::PlayCount,
        Field::SkipCount,
        Field::DateAdded,
        Field::ReleaseDate,
        Field::LastPlayedDate,
    ];

    /// Canonical name, as used on the command line and in export files
    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Artist => "Artist",
            Field::AlbumArtist => "AlbumArtist",
            Field::AlbumTitle => "AlbumTitle",
            Field::Genre => "Genre",
            Field::Composer => "Composer",
            Field::Year => "Year",
            Field::TrackNumber => "TrackNumber",
            Field::DiscNumber => "DiscNumber",
            Field::TotalTime => "TotalTime",
            Field::Rating => "Rating",
            Field::PlayCount => "PlayCount",
            Field::SkipCount => "SkipCount",
            Field::DateAdded => "DateAdded",
            Field::ReleaseDate => "ReleaseDate",
            Field::LastPlayedDate => "LastPlayedDate",
        }
    }

    /// Exact, case-sensitive lookup by canonical name
    pub fn parse(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Title
            | Field::Artist
            | Field::AlbumArtist
            | Field::AlbumTitle
            | Field::Genre
            | Field::Composer => FieldKind::Text,
            Field::Year
            | Field::TrackNumber
            | Field::DiscNumber
            | Field::TotalTime
            | Field::Rating
            | Field::PlayCount
            | Field::SkipCount => FieldKind::Integer,
            Field::DateAdded | Field::ReleaseDate | Field::LastPlayedDate => FieldKind::Timestamp,
        }
    }

    /// Counters a library omits until they first move; absent reads as zero
    pub fn is_counter(&self) -> bool {
        matches!(self, Field::Rating | Field::PlayCount | Field::SkipCount)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single field value. Absence is modelled as `Option<FieldValue>`.
///
/// Equality is structural: text compares byte-for-byte, never by locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Timestamp(i64),
}

impl FieldValue {
    /// Numeric view for integer and timestamp values
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) | FieldValue::Timestamp(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    /// Rebuild a value of the given kind from its integer storage form
    pub fn from_i64(kind: FieldKind, value: i64) -> FieldValue {
        match kind {
            FieldKind::Timestamp => FieldValue::Timestamp(value),
            _ => FieldValue::Integer(value),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Timestamp(secs) => match chrono::DateTime::from_timestamp(*secs, 0) {
                Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d")),
                None => write!(f, "{}", secs),
            },
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_parse() {
        for field in Field::ALL {
            assert_eq!(Field::parse(field.name()), Some(field));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(Field::parse("artist"), None);
        assert_eq!(Field::parse("PersistentID"), None);
    }

    #[test]
    fn test_timestamp_display_is_utc_date() {
        assert_eq!(FieldValue::Timestamp(0).to_string(), "1970-01-01");
        assert_eq!(FieldValue::Integer(42).to_string(), "42");
    }

    #[test]
    fn test_text_equality_is_exact() {
        assert_ne!(FieldValue::from("Café"), FieldValue::from("Cafe\u{301}"));
        assert_ne!(FieldValue::from("abc"), FieldValue::from("ABC"));
    }
}
