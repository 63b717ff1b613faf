//! Persisted-store capability traits
//!
//! The update and reporting engines only ever see these traits. `tracklog-store`
//! provides the SQLite implementation; [`super::memory::MemoryStore`] is the
//! in-memory one used by tests.

use std::collections::BTreeMap;

use crate::errors::ExError;
use crate::model::{ChangeEvent, Track};

/// Last-known state of every track, keyed by persistent ID
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Bumped by every committed update; 0 for an empty, never-updated store
    pub generation: u64,
    pub tracks: BTreeMap<String, Track>,
}

impl Snapshot {
    pub fn new(generation: u64, tracks: impl IntoIterator<Item = Track>) -> Self {
        Self {
            generation,
            tracks: tracks
                .into_iter()
                .map(|t| (t.persistent_id.clone(), t))
                .collect(),
        }
    }

    pub fn get(&self, persistent_id: &str) -> Option<&Track> {
        self.tracks.get(persistent_id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Everything one update writes, applied as a single unit
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBatch {
    /// Generation the diff was computed against
    pub expected_generation: u64,
    /// Events to append, in emission order
    pub events: Vec<ChangeEvent>,
    /// Added and modified tracks, in their new observed state
    pub upserts: Vec<Track>,
    /// Persistent IDs of removed tracks; their entries are deleted
    pub removals: Vec<String>,
}

/// Outcome of a successful commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Generation after the commit
    pub generation: u64,
    /// Number of events appended
    pub appended: usize,
    /// Store-assigned seq of the first appended event
    pub first_seq: Option<i64>,
}

/// Read access to the snapshot table
pub trait SnapshotStore {
    /// Load every snapshot entry together with the current generation
    ///
    /// # Errors
    ///
    /// `Persistence` when the backing store cannot be read
    fn load_snapshot(&self) -> Result<Snapshot, ExError>;
}

/// Read access to the append-only change log
pub trait ChangeLogStore {
    /// Most recent events first (`timestamp DESC, seq DESC`), at most `limit`
    ///
    /// # Errors
    ///
    /// `Persistence` when the backing store cannot be read
    fn recent_events(&self, limit: usize) -> Result<Vec<ChangeEvent>, ExError>;

    /// Events with `from <= timestamp <= to`, in commit order
    ///
    /// # Errors
    ///
    /// `Persistence` when the backing store cannot be read
    fn events_between(&self, from: i64, to: i64) -> Result<Vec<ChangeEvent>, ExError>;
}

/// A store that can read a snapshot and a window of the log as one consistent view
pub trait ReportStore: SnapshotStore + ChangeLogStore {
    /// The snapshot plus the events with `from <= timestamp <= to`
    ///
    /// Stores shared between processes override this so that both parts come
    /// from the same read transaction.
    ///
    /// # Errors
    ///
    /// `Persistence` when the backing store cannot be read
    fn read_window(&self, from: i64, to: i64) -> Result<(Snapshot, Vec<ChangeEvent>), ExError> {
        let events = self.events_between(from, to)?;
        let snapshot = self.load_snapshot()?;
        Ok((snapshot, events))
    }
}

/// A store that can apply an [`UpdateBatch`] atomically across both tables
pub trait LibraryStore: SnapshotStore + ChangeLogStore {
    /// Append the batch's events and overwrite the snapshot in one unit
    ///
    /// Either everything in the batch becomes visible or nothing does.
    ///
    /// # Errors
    ///
    /// - `Concurrency` when the stored generation is not `batch.expected_generation`
    /// - `InconsistentState` when the write failed part-way and was rolled back
    fn commit(&mut self, batch: &UpdateBatch) -> Result<CommitReceipt, ExError>;
}
