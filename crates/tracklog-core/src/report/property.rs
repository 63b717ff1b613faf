//! Grouping properties and sort measures.
//!
//! Both are closed sets. User-supplied names are resolved with [`Property::parse`]
//! and [`Measure::parse`]; anything else is rejected with the allowed set.

use crate::errors::TrackLogError;
use crate::model::{Field, Track};

/// Something a report can group by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// A raw metadata field
    Field(Field),
    /// `Year` bucketed to its decade, e.g. `1990s`
    Decade,
    PersistentId,
    /// `TotalTime` rounded to whole minutes
    TotalMinutes,
}

const DERIVED: [Property; 3] = [
    Property::Decade,
    Property::PersistentId,
    Property::TotalMinutes,
];

impl Property {
    /// Every groupable property: metadata fields in layout order, then derived ones
    pub fn all() -> Vec<Property> {
        Field::ALL
            .iter()
            .copied()
            .map(Property::Field)
            .chain(DERIVED)
            .collect()
    }

    pub fn allowed_names() -> Vec<String> {
        Self::all().iter().map(|p| p.name().to_string()).collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Property::Field(field) => field.name(),
            Property::Decade => "Decade",
            Property::PersistentId => "PersistentID",
            Property::TotalMinutes => "TotalMinutes",
        }
    }

    /// Exact, case-sensitive lookup
    ///
    /// # Errors
    ///
    /// `InvalidGroupingProperty` naming the rejected value
    pub fn parse(name: &str) -> Result<Property, TrackLogError> {
        Self::all()
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| TrackLogError::InvalidGroupingProperty {
                property: name.to_string(),
                allowed: Self::allowed_names(),
            })
    }

    /// Render this property of a track as a group-key component
    ///
    /// Absent values render as the empty string, except `Decade` which
    /// renders as `Unknown`.
    pub fn render(&self, track: &Track) -> String {
        match self {
            Property::Field(field) => track
                .value(*field)
                .map(|v| v.to_string())
                .unwrap_or_default(),
            Property::Decade => match track.year {
                Some(year) if year > 0 => format!("{}s", year / 10 * 10),
                _ => "Unknown".to_string(),
            },
            Property::PersistentId => track.persistent_id.clone(),
            Property::TotalMinutes => track
                .total_time
                .map(|ms| format!("{}", (ms as f64 / 60_000.0).round() as i64))
                .unwrap_or_default(),
        }
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a list of property names
///
/// # Errors
///
/// - `EmptyGrouping` when no names are given
/// - `InvalidGroupingProperty` for the first unknown name
pub fn parse_properties<I, S>(names: I) -> Result<Vec<Property>, TrackLogError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let properties = names
        .into_iter()
        .map(|n| Property::parse(n.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    if properties.is_empty() {
        return Err(TrackLogError::EmptyGrouping);
    }
    Ok(properties)
}

/// Parse a comma-separated group-by list such as `Artist,Title`
///
/// Whitespace around names is ignored, as are empty segments.
///
/// # Errors
///
/// See [`parse_properties`].
pub fn parse_group_by(list: &str) -> Result<Vec<Property>, TrackLogError> {
    parse_properties(list.split(',').map(str::trim).filter(|s| !s.is_empty()))
}

/// What a report ranks groups by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    /// Plays gained in the window
    PlayCount,
    /// Net rating change in the window
    Rating,
    /// Minutes played in the window
    PlayTime,
}

impl Measure {
    pub const ALL: [Measure; 3] = [Measure::PlayCount, Measure::Rating, Measure::PlayTime];

    pub fn allowed_names() -> Vec<String> {
        Self::ALL.iter().map(|m| m.name().to_string()).collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Measure::PlayCount => "PlayCount",
            Measure::Rating => "Rating",
            Measure::PlayTime => "PlayTime",
        }
    }

    /// # Errors
    ///
    /// `InvalidSortingProperty` naming the rejected value
    pub fn parse(name: &str) -> Result<Measure, TrackLogError> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == name)
            .ok_or_else(|| TrackLogError::InvalidSortingProperty {
                property: name.to_string(),
                allowed: Self::allowed_names(),
            })
    }

    /// The field whose change events feed this measure
    pub fn source_field(&self) -> Field {
        match self {
            Measure::PlayCount | Measure::PlayTime => Field::PlayCount,
            Measure::Rating => Field::Rating,
        }
    }

    /// Contribution of one event's delta, given the track it belongs to
    pub fn contribution(&self, delta: i64, track: &Track) -> f64 {
        match self {
            Measure::PlayCount | Measure::Rating => delta as f64,
            Measure::PlayTime => delta as f64 * track.total_time.unwrap_or(0) as f64 / 60_000.0,
        }
    }

    /// Whether values of this measure are whole numbers
    pub fn is_integral(&self) -> bool {
        !matches!(self, Measure::PlayTime)
    }
}

impl std::fmt::Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group_by_list() {
        let props = parse_group_by("Artist, Title").unwrap();
        assert_eq!(
            props,
            vec![Property::Field(Field::Artist), Property::Field(Field::Title)]
        );
        assert_eq!(parse_group_by("Decade").unwrap(), vec![Property::Decade]);
    }

    #[test]
    fn test_unknown_property_names_value() {
        let err = parse_group_by("Artist,Bogus").unwrap_err();
        match err {
            TrackLogError::InvalidGroupingProperty { property, allowed } => {
                assert_eq!(property, "Bogus");
                assert!(allowed.contains(&"PersistentID".to_string()));
                assert!(allowed.contains(&"Artist".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_group_by() {
        assert_eq!(parse_group_by(" , ").unwrap_err(), TrackLogError::EmptyGrouping);
    }

    #[test]
    fn test_decade_rendering() {
        let track = Track::new("A").with(Field::Year, 1994);
        assert_eq!(Property::Decade.render(&track), "1990s");
        assert_eq!(Property::Decade.render(&Track::new("B")), "Unknown");
        assert_eq!(
            Property::Decade.render(&Track::new("C").with(Field::Year, 0)),
            "Unknown"
        );
    }

    #[test]
    fn test_total_minutes_rounds() {
        let track = Track::new("A").with(Field::TotalTime, 210_000);
        assert_eq!(Property::TotalMinutes.render(&track), "4");
        assert_eq!(Property::TotalMinutes.render(&Track::new("B")), "");
    }

    #[test]
    fn test_absent_field_renders_empty() {
        assert_eq!(Property::Field(Field::Artist).render(&Track::new("A")), "");
    }

    #[test]
    fn test_measure_parse_and_sources() {
        assert_eq!(Measure::parse("PlayTime").unwrap(), Measure::PlayTime);
        assert_eq!(Measure::PlayTime.source_field(), Field::PlayCount);
        assert_eq!(Measure::Rating.source_field(), Field::Rating);
        assert!(matches!(
            Measure::parse("Title"),
            Err(TrackLogError::InvalidSortingProperty { .. })
        ));
    }

    #[test]
    fn test_play_time_contribution_in_minutes() {
        let track = Track::new("A").with(Field::TotalTime, 180_000);
        assert_eq!(Measure::PlayTime.contribution(2, &track), 6.0);
        assert_eq!(Measure::PlayCount.contribution(2, &track), 2.0);
    }
}
