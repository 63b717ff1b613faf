//! Tracklog Core - library change tracking kernel
//!
//! This crate provides the storage-agnostic parts of tracklog:
//! - Track, field and change event models
//! - The diff engine comparing a library listing with the stored snapshot
//! - The reporting engine aggregating change events into ranked groups
//! - Capability traits for the metadata provider and the persisted stores,
//!   with in-memory implementations for tests
//! - The error facility and the logging facility shared by every crate

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod provider;
pub mod report;

// Logging macros refer to schema constants through this path
pub use tracklog_core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, Result, TrackLogError};
pub use model::{ChangeEvent, ChangeKind, Field, FieldKind, FieldValue, Track};
pub use ops::{
    ChangeLogStore, LibraryStore, MemoryStore, ReportStore, Snapshot, SnapshotStore, UpdateBatch,
};
pub use provider::{MetadataProvider, StaticProvider};
