//! Report orchestration.
//!
//! Validation happens before anything is read: a bad group-by, sort-by,
//! timeframe or limit fails without touching the store.

#![allow(clippy::result_large_err)]

use tracklog_core::errors::ExError;
use tracklog_core::ops::ReportStore;
use tracklog_core::report::{build_report, RankedRow, Report, ReportQuery, TimeWindow};
use tracklog_core::tracklog_core_types::schema::OP_REPORT;
use tracklog_core::{log_op_end, log_op_error, log_op_start};

use crate::commands::{validate_limit, DEFAULT_LIMIT};

pub const DEFAULT_TIMEFRAME_DAYS: f64 = 30.0;
pub const DEFAULT_GROUP_BY: &str = "Artist,Title";
pub const DEFAULT_SORT_BY: &str = "PlayCount";

/// A report as requested on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    /// Trailing window length in days, ending now
    pub timeframe_days: f64,
    /// Comma-separated property names
    pub group_by: String,
    pub sort_by: String,
    pub limit: i64,
    pub count: bool,
    pub reverse: bool,
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self {
            timeframe_days: DEFAULT_TIMEFRAME_DAYS,
            group_by: DEFAULT_GROUP_BY.to_string(),
            sort_by: DEFAULT_SORT_BY.to_string(),
            limit: DEFAULT_LIMIT,
            count: false,
            reverse: false,
        }
    }
}

/// Full report plus the rows selected for display
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutput {
    pub report: Report,
    pub rows: Vec<RankedRow>,
}

impl ReportRequest {
    /// Validate into a query over the window ending at `now`
    ///
    /// # Errors
    ///
    /// `InvalidArgument`, `InvalidGroupingProperty` or `InvalidSortingProperty`
    pub fn to_query(&self, now: i64) -> Result<ReportQuery, ExError> {
        let window = TimeWindow::trailing_days(now, self.timeframe_days)
            .map_err(|e| ExError::from(e).with_op(OP_REPORT))?;
        ReportQuery::parse(&self.group_by, &self.sort_by, window, self.count)
    }

    /// Validate, run and present the report
    ///
    /// # Errors
    ///
    /// Validation errors from [`Self::to_query`] and `InvalidArgument` for
    /// the limit, before any read; `Persistence` from the store.
    pub fn execute<S>(&self, store: &S, now: i64) -> Result<ReportOutput, ExError>
    where
        S: ReportStore + ?Sized,
    {
        let query = self.to_query(now)?;
        let limit = validate_limit(OP_REPORT, self.limit)?;
        let report = run_report(store, &query)?;
        let rows = report.present(self.reverse, Some(limit));
        Ok(ReportOutput { report, rows })
    }
}

/// Run a validated query against the store
///
/// # Errors
///
/// `Persistence` when the snapshot or change log cannot be read
pub fn run_report<S>(store: &S, query: &ReportQuery) -> Result<Report, ExError>
where
    S: ReportStore + ?Sized,
{
    log_op_start!(
        OP_REPORT,
        measure = query.measure.name(),
        from = query.window.from,
        to = query.window.to
    );
    let start = std::time::Instant::now();

    let result = store
        .read_window(query.window.from, query.window.to)
        .map(|(snapshot, events)| build_report(&snapshot, &events, query))
        .map_err(|e| {
            log_op_error!(
                OP_REPORT,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        OP_REPORT,
        duration_ms = start.elapsed().as_millis() as u64,
        group_count = result.total_groups as u64
    );

    Ok(result)
}
