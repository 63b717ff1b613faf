//! Command orchestration layer.
//!
//! Provides the high-level operations that coordinate between core domain
//! logic, the metadata provider and the persistence layer.

pub mod log;
pub mod report;
pub mod update;

use tracklog_core::errors::{ExError, TrackLogError};

/// Rows shown by `log` and `report` when no limit is given
pub const DEFAULT_LIMIT: i64 = 10;

/// Accept only positive limits
///
/// # Errors
///
/// `InvalidArgument` when `limit <= 0`
pub fn validate_limit(op: &str, limit: i64) -> Result<usize, ExError> {
    if limit <= 0 {
        return Err(ExError::from(TrackLogError::InvalidLimit { limit }).with_op(op));
    }
    Ok(usize::try_from(limit).unwrap_or(usize::MAX))
}
