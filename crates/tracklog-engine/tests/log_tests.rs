#![allow(clippy::unwrap_used, clippy::expect_used)]

use tracklog_core::errors::ExErrorKind;
use tracklog_core::model::{ChangeEvent, Track};
use tracklog_core::ops::{LibraryStore, MemoryStore, UpdateBatch};
use tracklog_engine::commands::DEFAULT_LIMIT;
use tracklog_engine::read_log;
use tracklog_store::SqliteStore;

fn seed<S: LibraryStore>(store: &mut S, stamps: &[i64]) {
    let events = stamps
        .iter()
        .map(|ts| ChangeEvent::added(*ts, &Track::new(format!("T{}", ts))))
        .collect();
    store
        .commit(&UpdateBatch {
            expected_generation: 0,
            events,
            upserts: vec![],
            removals: vec![],
        })
        .unwrap();
}

#[test]
fn test_limit_one_returns_latest() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    seed(&mut store, &[10, 20, 30]);

    let events = read_log(&store, 1).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].timestamp, 30);
}

#[test]
fn test_memory_and_sqlite_agree() {
    let mut sqlite = SqliteStore::open_in_memory().unwrap();
    let mut memory = MemoryStore::new();
    seed(&mut sqlite, &[5, 15, 15, 1]);
    seed(&mut memory, &[5, 15, 15, 1]);

    let a = read_log(&sqlite, DEFAULT_LIMIT).unwrap();
    let b = read_log(&memory, DEFAULT_LIMIT).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 4);
}

#[test]
fn test_non_positive_limit_rejected() {
    let store = MemoryStore::new();
    for limit in [0, -3] {
        let err = read_log(&store, limit).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidArgument);
        assert_eq!(err.field(), Some("limit"));
    }
}

#[test]
fn test_empty_log() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert!(read_log(&store, 10).unwrap().is_empty());
}
