#![allow(clippy::unwrap_used, clippy::expect_used)]

use tracklog_core::errors::TrackLogError;
use tracklog_core::logging_facility::test_capture::init_test_capture;
use tracklog_core::{log_op_end, log_op_error, log_op_start};
use tracklog_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, dry_run = true);

    let events = capture.events_for_op(op_name);
    let start_events: Vec<_> = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert_eq!(start_events.len(), 1, "Should have exactly one start event");
    assert_eq!(start_events[0].field("dry_run"), Some("true"));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events();
    let end_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = TrackLogError::InvalidLimit { limit: -1 };
    log_op_error!(op_name, err, duration_ms = 10);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let error_event = capture
        .events_for_op(op_name)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .unwrap();

    assert_eq!(error_event.field(FIELD_ERR_CODE), Some("ERR_INVALID_ARGUMENT"));
    assert!(error_event.field(FIELD_ERR_KIND).is_some());
    assert_eq!(error_event.level, tracing::Level::ERROR);
}

#[test]
fn test_events_carry_component() {
    let capture = init_test_capture();
    let op_name = "test_component_unique_4";

    log_op_start!(op_name);

    let events = capture.events_for_op(op_name);
    assert!(events
        .iter()
        .all(|e| e.component.as_deref() == Some(module_path!())));
}
