//! Library diff output types.
//!
//! Collections are sorted by persistent ID (and field layout order within a
//! track) so that a diff over the same inputs is always identical.

use serde::{Deserialize, Serialize};

use crate::model::{ChangeEvent, Field, FieldValue, Track};
use crate::ops::UpdateBatch;

/// One field of one track that differs between snapshot and library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldChange {
    pub persistent_id: String,
    pub field: Field,
    /// Value recorded in the snapshot
    pub old: Option<FieldValue>,
    /// Value observed in the library now
    pub new: Option<FieldValue>,
}

/// The complete difference between the current library and the snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryDiff {
    /// Timestamp stamped on every event in the diff
    pub timestamp: i64,
    /// Snapshot generation the diff was computed against
    pub base_generation: u64,
    /// Tracks present in the library but not the snapshot
    pub added: Vec<Track>,
    /// Snapshot entries whose track is gone from the library
    pub removed: Vec<Track>,
    /// Every differing field of every common track
    pub modified: Vec<FieldChange>,
    /// Common tracks with at least one modification, in their new state
    pub changed: Vec<Track>,
    /// Events in emission order: added, removed, modified
    pub events: Vec<ChangeEvent>,
}

impl LibraryDiff {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of distinct tracks with at least one modified field
    pub fn modified_track_count(&self) -> usize {
        self.changed.len()
    }

    /// Build the write set for the store
    ///
    /// Added and changed tracks are upserted, removed tracks are deleted.
    pub fn to_batch(&self) -> UpdateBatch {
        let upserts = self
            .added
            .iter()
            .chain(self.changed.iter())
            .cloned()
            .collect();
        let removals = self
            .removed
            .iter()
            .map(|t| t.persistent_id.clone())
            .collect();

        UpdateBatch {
            expected_generation: self.base_generation,
            events: self.events.clone(),
            upserts,
            removals,
        }
    }
}
