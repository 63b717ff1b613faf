//! Reporting engine.
//!
//! Turns the change log into ranked groups: which artists, albums or decades
//! gained the most plays (or rating, or minutes) in a time window.

pub mod engine;
pub mod model;
pub mod property;

pub use engine::{build_report, group_key, group_tracks, sort_rows};
pub use model::{GroupKey, RankedRow, Report, ReportQuery, ReportRow, TimeWindow};
pub use property::{parse_group_by, parse_properties, Measure, Property};
