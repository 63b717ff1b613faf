use std::collections::BTreeMap;

use crate::errors::{ExError, ExErrorKind};
use crate::model::{ChangeEvent, Track};
use crate::ops::store::{
    ChangeLogStore, CommitReceipt, LibraryStore, ReportStore, Snapshot, SnapshotStore,
    UpdateBatch,
};

/// In-memory library store
///
/// A fully substitutable stand-in for the SQLite store. Not thread-safe;
/// designed for single-threaded tests and dry experiments.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    generation: u64,
    tracks: BTreeMap<String, Track>,
    events: Vec<ChangeEvent>,
    next_seq: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            generation: 0,
            tracks: BTreeMap::new(),
            events: Vec::new(),
            next_seq: 1,
        }
    }

    /// Every committed event in commit order
    pub fn all_events(&self) -> &[ChangeEvent] {
        &self.events
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for MemoryStore {
    fn load_snapshot(&self) -> Result<Snapshot, ExError> {
        Ok(Snapshot {
            generation: self.generation,
            tracks: self.tracks.clone(),
        })
    }
}

impl ChangeLogStore for MemoryStore {
    fn recent_events(&self, limit: usize) -> Result<Vec<ChangeEvent>, ExError> {
        let mut events = self.events.clone();
        events.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.seq.cmp(&a.seq))
        });
        events.truncate(limit);
        Ok(events)
    }

    fn events_between(&self, from: i64, to: i64) -> Result<Vec<ChangeEvent>, ExError> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.timestamp >= from && e.timestamp <= to)
            .cloned()
            .collect())
    }
}

impl ReportStore for MemoryStore {}

impl LibraryStore for MemoryStore {
    fn commit(&mut self, batch: &UpdateBatch) -> Result<CommitReceipt, ExError> {
        if batch.expected_generation != self.generation {
            return Err(ExError::new(ExErrorKind::Concurrency)
                .with_op("commit")
                .with_message(format!(
                    "Expected generation {} but store is at {}",
                    batch.expected_generation, self.generation
                )));
        }

        // Stage into copies, then swap, so a panic mid-way cannot leave half a batch.
        let mut tracks = self.tracks.clone();
        let mut events = self.events.clone();
        let mut next_seq = self.next_seq;
        let first_seq = (!batch.events.is_empty()).then_some(next_seq);

        for event in &batch.events {
            let mut stored = event.clone();
            stored.seq = Some(next_seq);
            next_seq += 1;
            events.push(stored);
        }
        for id in &batch.removals {
            tracks.remove(id);
        }
        for track in &batch.upserts {
            tracks.insert(track.persistent_id.clone(), track.clone());
        }

        self.tracks = tracks;
        self.events = events;
        self.next_seq = next_seq;
        self.generation += 1;

        Ok(CommitReceipt {
            generation: self.generation,
            appended: batch.events.len(),
            first_seq,
        })
    }
}
