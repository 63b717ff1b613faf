//! Operation lifecycle events
//!
//! An update, log read or report emits one `start` event and then exactly one
//! of `end` or `end_error`. All three carry `component` and `op`, so a single
//! run can be followed through the log by filtering on `op`.

#[doc(hidden)]
#[macro_export]
macro_rules! __tracklog_op_event {
    ($level:ident, $op:expr, $event:ident $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::tracklog_core_types::schema::$event,
            $($($field)*)?
        )
    };
}

/// `start` event for an operation, with optional extra fields
///
/// ```
/// # use tracklog_core::log_op_start;
/// use tracklog_core::tracklog_core_types::schema::OP_REPORT;
/// log_op_start!(OP_REPORT, measure = "PlayCount", from = 0_i64, to = 86_400_i64);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__tracklog_op_event!(info, $op, EVENT_START $(, $($field)*)?)
    };
}

/// `end` event; `duration_ms` is required
///
/// ```
/// # use tracklog_core::log_op_end;
/// use tracklog_core::tracklog_core_types::schema::OP_UPDATE;
/// log_op_end!(OP_UPDATE, duration_ms = 42_u64, appended = 3_u64);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__tracklog_op_event!(info, $op, EVENT_END, duration_ms = $duration $(, $($field)*)?)
    };
}

/// `end_error` event; the error is converted into `ExError` for its kind and code
///
/// ```
/// # use tracklog_core::log_op_error;
/// use tracklog_core::errors::{ExError, ExErrorKind};
/// use tracklog_core::tracklog_core_types::schema::OP_UPDATE;
/// let err = ExError::new(ExErrorKind::ProviderUnavailable);
/// log_op_error!(OP_UPDATE, err, duration_ms = 10_u64);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__tracklog_op_event!(
            error,
            $op,
            EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code()
            $(, $($field)*)?
        )
    }};
}
