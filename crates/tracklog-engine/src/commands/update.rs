//! Update orchestration: observe the library, diff, commit.
//!
//! ## Pipeline (in order):
//! 1. Fetch the current track set (ProviderUnavailable / InvalidLibrary stop here)
//! 2. Load the snapshot and its generation
//! 3. Compute the diff and its events
//! 4. dry_run or empty diff short-circuit (no writes)
//! 5. Commit events and snapshot changes as one unit (Concurrency surfaces from store)
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for update:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure

#![allow(clippy::result_large_err)]

use tracklog_core::diff::{
    compute_diff, count_summary, render_human_summary, summary_line, LibraryDiff,
};
use tracklog_core::errors::ExError;
use tracklog_core::model::ChangeEvent;
use tracklog_core::ops::LibraryStore;
use tracklog_core::provider::MetadataProvider;
use tracklog_core::{log_op_end, log_op_error, log_op_start};
use tracklog_core::tracklog_core_types::schema::OP_UPDATE;

/// Outcome of one update run
#[derive(Debug, Clone, PartialEq)]
pub struct CommitResult {
    /// Timestamp stamped on every event of this run
    pub timestamp: i64,
    pub dry_run: bool,
    /// True only if events were written
    pub committed: bool,
    pub added: usize,
    pub removed: usize,
    /// Number of modified fields, across all tracks
    pub modified: usize,
    /// Number of tracks with at least one modified field
    pub modified_tracks: usize,
    /// Events in emission order; `seq` is set once committed
    pub events: Vec<ChangeEvent>,
    pub generation_before: u64,
    pub generation_after: u64,
    /// The diff the events were derived from, including old field values
    pub diff: LibraryDiff,
}

impl CommitResult {
    fn from_diff(diff: LibraryDiff, dry_run: bool) -> Self {
        Self {
            timestamp: diff.timestamp,
            dry_run,
            committed: false,
            added: diff.added.len(),
            removed: diff.removed.len(),
            modified: diff.modified.len(),
            modified_tracks: diff.modified_track_count(),
            generation_before: diff.base_generation,
            generation_after: diff.base_generation,
            events: diff.events.clone(),
            diff,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// `2 added, 1 removed, 5 fields modified`, or `No changes`
    pub fn summary(&self) -> String {
        count_summary(self.added, self.removed, self.modified)
    }

    /// The summary line followed by one line per added, removed or changed entry
    pub fn details(&self) -> String {
        render_human_summary(&self.diff)
    }
}

/// Run an update stamped with the current time
///
/// # Errors
///
/// See [`update_at`].
pub fn update<P, S>(provider: &P, store: &mut S, dry_run: bool) -> Result<CommitResult, ExError>
where
    P: MetadataProvider + ?Sized,
    S: LibraryStore + ?Sized,
{
    update_at(provider, store, dry_run, chrono::Utc::now().timestamp())
}

/// Run an update with an explicit commit timestamp
///
/// # Errors
///
/// - `ProviderUnavailable` / `InvalidLibrary`: the library could not be read
/// - `Concurrency`: another update committed since the snapshot was read
/// - `InconsistentState`: the commit failed and was rolled back
/// - `Persistence`: the snapshot could not be read
pub fn update_at<P, S>(
    provider: &P,
    store: &mut S,
    dry_run: bool,
    timestamp: i64,
) -> Result<CommitResult, ExError>
where
    P: MetadataProvider + ?Sized,
    S: LibraryStore + ?Sized,
{
    log_op_start!(OP_UPDATE, dry_run = dry_run);
    let start = std::time::Instant::now();

    let result = update_impl(provider, store, dry_run, timestamp).map_err(|e| {
        log_op_error!(
            OP_UPDATE,
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        OP_UPDATE,
        duration_ms = start.elapsed().as_millis() as u64,
        event_count = result.events.len() as u64,
        generation = result.generation_after,
        committed = result.committed
    );

    Ok(result)
}

fn update_impl<P, S>(
    provider: &P,
    store: &mut S,
    dry_run: bool,
    timestamp: i64,
) -> Result<CommitResult, ExError>
where
    P: MetadataProvider + ?Sized,
    S: LibraryStore + ?Sized,
{
    let tracks = provider.fetch_tracks()?;
    let snapshot = store.load_snapshot()?;

    let diff = compute_diff(&tracks, &snapshot, timestamp)?;
    tracing::debug!(
        track_count = tracks.len() as u64,
        snapshot_count = snapshot.len() as u64,
        summary = %summary_line(&diff),
        "Computed library diff"
    );

    if dry_run || diff.is_empty() {
        return Ok(CommitResult::from_diff(diff, dry_run));
    }

    let batch = diff.to_batch();
    let receipt = store.commit(&batch)?;

    let mut result = CommitResult::from_diff(diff, dry_run);
    result.committed = true;
    result.generation_after = receipt.generation;
    if let Some(first) = receipt.first_seq {
        for (offset, event) in result.events.iter_mut().enumerate() {
            event.seq = Some(first + offset as i64);
        }
    }

    Ok(result)
}
