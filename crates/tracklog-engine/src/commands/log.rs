//! Change log reading.

#![allow(clippy::result_large_err)]

use tracklog_core::errors::ExError;
use tracklog_core::model::ChangeEvent;
use tracklog_core::ops::ChangeLogStore;
use tracklog_core::tracklog_core_types::schema::OP_LOG;
use tracklog_core::{log_op_end, log_op_error, log_op_start};

use crate::commands::validate_limit;

/// The `limit` most recent events, newest first
///
/// Ties on timestamp are broken by commit order, latest first.
///
/// # Errors
///
/// - `InvalidArgument`: `limit <= 0`
/// - `Persistence`: the change log could not be read
pub fn read_log<S>(store: &S, limit: i64) -> Result<Vec<ChangeEvent>, ExError>
where
    S: ChangeLogStore + ?Sized,
{
    log_op_start!(OP_LOG, limit = limit);
    let start = std::time::Instant::now();

    let result = validate_limit(OP_LOG, limit)
        .and_then(|limit| store.recent_events(limit))
        .map_err(|e| {
            log_op_error!(
                OP_LOG,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        OP_LOG,
        duration_ms = start.elapsed().as_millis() as u64,
        event_count = result.len() as u64
    );

    Ok(result)
}
