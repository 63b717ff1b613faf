//! Report query and result types.

use crate::errors::{ExError, TrackLogError};
use crate::report::property::{parse_group_by, Measure, Property};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Inclusive time window, Unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: i64,
    pub to: i64,
}

impl TimeWindow {
    /// # Errors
    ///
    /// `InvalidWindow` when `from > to`
    pub fn new(from: i64, to: i64) -> Result<Self, TrackLogError> {
        if from > to {
            return Err(TrackLogError::InvalidWindow { from, to });
        }
        Ok(Self { from, to })
    }

    /// The `days` (fractional allowed) leading up to and including `now`
    ///
    /// # Errors
    ///
    /// `InvalidTimeframe` when `days` is negative or not finite
    pub fn trailing_days(now: i64, days: f64) -> Result<Self, TrackLogError> {
        if !days.is_finite() || days < 0.0 {
            return Err(TrackLogError::InvalidTimeframe { days });
        }
        let span = (days * SECONDS_PER_DAY).round() as i64;
        Self::new(now.saturating_sub(span), now)
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.from <= timestamp && timestamp <= self.to
    }
}

/// Rendered property values identifying one group
///
/// Ordering is lexicographic on the tuple, byte-wise within each component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey(pub Vec<String>);

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// A validated report request
#[derive(Debug, Clone, PartialEq)]
pub struct ReportQuery {
    pub group_by: Vec<Property>,
    pub measure: Measure,
    pub window: TimeWindow,
    /// Also report distinct tracks per group
    pub count: bool,
}

impl ReportQuery {
    /// Validate raw names into a query
    ///
    /// Grouping is checked before sorting; nothing is read until both pass.
    ///
    /// # Errors
    ///
    /// - `InvalidGroupingProperty` / `InvalidArgument` for the group-by list
    /// - `InvalidSortingProperty` for the sort-by name
    pub fn parse(
        group_by: &str,
        sort_by: &str,
        window: TimeWindow,
        count: bool,
    ) -> Result<Self, ExError> {
        let op = "report";
        let group_by = parse_group_by(group_by).map_err(|e| ExError::from(e).with_op(op))?;
        let measure = Measure::parse(sort_by).map_err(|e| ExError::from(e).with_op(op))?;
        Ok(Self {
            group_by,
            measure,
            window,
            count,
        })
    }
}

/// One aggregated group
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub key: GroupKey,
    pub value: f64,
    /// Distinct tracks that contributed; only set for counting queries
    pub track_count: Option<usize>,
}

/// A row after presentation, with its 1-based rank
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub rank: usize,
    pub row: ReportRow,
}

/// Full, untruncated report result
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub group_by: Vec<Property>,
    pub measure: Measure,
    pub window: TimeWindow,
    /// Measure descending, ties by group key ascending
    pub rows: Vec<ReportRow>,
    /// Number of groups before any truncation
    pub total_groups: usize,
}

impl Report {
    /// Apply display options: reverse first, then truncate, then rank
    pub fn present(&self, reverse: bool, limit: Option<usize>) -> Vec<RankedRow> {
        let mut rows = self.rows.clone();
        if reverse {
            rows.reverse();
        }
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        rows.into_iter()
            .enumerate()
            .map(|(i, row)| RankedRow { rank: i + 1, row })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
