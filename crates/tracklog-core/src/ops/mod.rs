//! Store capabilities and the in-memory implementation.

pub mod memory;
pub mod store;

pub use memory::MemoryStore;
pub use store::{
    ChangeLogStore, CommitReceipt, LibraryStore, ReportStore, Snapshot, SnapshotStore,
    UpdateBatch,
};
