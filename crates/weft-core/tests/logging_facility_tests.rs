#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use weft_core::core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_NEW_SNAPSHOT_ID};
use weft_core::errors::{ExError, ExErrorKind, WeftError};
use weft_core::logging_facility::test_capture::init_test_capture;
use weft_core::{log_op_end, log_op_error, log_op_start};
use weft_core::{EntityValue, PatchBuilder, SnapshotId, SnapshotRepository};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let start_events = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    assert!(start_events >= 1, "Should have captured a start event");
}

#[test]
fn test_log_op_end_macro_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events = capture.events_for_op(op_name);
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(end_events[0].fields.get("duration_ms"), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = WeftError::SnapshotNotFound {
        snapshot_id: SnapshotId::from("s-missing"),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events = capture.events_for_op(op_name);
    assert_eq!(error_events.len(), 1, "Should have exactly one error event");

    let error_event = &error_events[0];
    assert_eq!(error_event.event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(
        error_event.fields.get("err_code"),
        Some(&"ERR_SNAPSHOT_NOT_FOUND".to_string())
    );
    assert_eq!(
        error_event.fields.get("err_kind"),
        Some(&"SnapshotNotFound".to_string())
    );
}

#[test]
fn test_log_macros_with_multiple_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_4";

    log_op_start!(op_name, snapshot_id = "s123", key = "p1#root");

    let start_event = capture
        .events_for_op(op_name)
        .into_iter()
        .next()
        .expect("Should have start event");

    assert_eq!(start_event.snapshot_id.as_deref(), Some("s123"));
    assert_eq!(start_event.fields.get("key"), Some(&"p1#root".to_string()));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_error_conversion_preserves_kind() {
    let capture = init_test_capture();
    let op_name = "test_error_conversion_unique_5";

    let err = WeftError::PatchTargetMismatch {
        op: "remove".to_string(),
        path: "/nodes/root:9".to_string(),
        found: "no entry to remove".to_string(),
    };
    log_op_error!(op_name, err.clone(), duration_ms = 5);

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::PatchTargetMismatch);
    capture.assert_event_exists(op_name, EVENT_END_ERROR);
}

#[test]
fn test_repository_commit_emits_start_and_end() {
    let capture = init_test_capture();
    let repo: SnapshotRepository<String> =
        SnapshotRepository::new().with_id_generator(common::sequential_ids("logcommit"));

    let id = repo.commit(&"k".to_string(), EntityValue::from(1));

    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("commit")
            && e.event.as_deref() == Some(EVENT_END)
            && e.snapshot_id.as_deref() == Some(id.as_str())
    });
    assert_eq!(ends, 1);
    capture.assert_event_exists("commit", EVENT_START);
}

#[test]
fn test_repository_lookup_failure_emits_end_error() {
    let capture = init_test_capture();
    let repo: SnapshotRepository<String> = SnapshotRepository::new();
    let missing = SnapshotId::from("logfail-unknown");

    let result = repo.get_changes_and_commit(&missing, EntityValue::Null, PatchBuilder::new());
    assert!(result.is_err());

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("get_changes_and_commit")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.snapshot_id.as_deref() == Some("logfail-unknown")
            && e.fields.get("err_code").map(String::as_str) == Some("ERR_SNAPSHOT_NOT_FOUND")
    });
    assert_eq!(errors, 1);
}

#[test]
fn test_repository_changes_end_event_counts_operations() {
    let capture = init_test_capture();
    let repo: SnapshotRepository<String> =
        SnapshotRepository::new().with_id_generator(common::sequential_ids("logdiff"));
    let key = "k".to_string();

    let s1 = repo.commit(&key, EntityValue::sequence([1, 2, 3]));
    let changes = repo
        .get_changes_and_commit(&s1, EntityValue::sequence([1]), PatchBuilder::new())
        .unwrap();
    assert_eq!(changes.snapshot_id().map(SnapshotId::as_str), Some("logdiff-2"));

    let end = capture
        .events_for_op("get_changes_and_commit")
        .into_iter()
        .find(|e| {
            e.event.as_deref() == Some(EVENT_END) && e.snapshot_id.as_deref() == Some(s1.as_str())
        })
        .expect("Should have end event for this snapshot");
    assert_eq!(end.fields.get("op_count"), Some(&"2".to_string()));
    assert_eq!(end.fields.get("unchanged"), Some(&"false".to_string()));
    assert_eq!(
        end.fields.get(FIELD_NEW_SNAPSHOT_ID),
        Some(&"logdiff-2".to_string())
    );
}

#[test]
fn test_repository_unchanged_end_event_has_no_new_snapshot() {
    let capture = init_test_capture();
    let repo: SnapshotRepository<String> =
        SnapshotRepository::new().with_id_generator(common::sequential_ids("logsame"));

    let s1 = repo.commit(&"k".to_string(), EntityValue::from(7));
    let changes = repo
        .get_changes_and_commit(&s1, EntityValue::from(7), PatchBuilder::new())
        .unwrap();
    assert!(changes.is_unchanged());

    let end = capture
        .events_for_op("get_changes_and_commit")
        .into_iter()
        .find(|e| {
            e.event.as_deref() == Some(EVENT_END) && e.snapshot_id.as_deref() == Some(s1.as_str())
        })
        .expect("Should have end event for this snapshot");
    assert_eq!(end.fields.get("unchanged"), Some(&"true".to_string()));
    assert!(!end.fields.contains_key(FIELD_NEW_SNAPSHOT_ID));
}

#[test]
fn test_start_events_pass_production_filter() {
    let capture = init_test_capture();
    let op_name = "test_start_level_unique_9";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 1);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.level == tracing::Level::INFO));
}
