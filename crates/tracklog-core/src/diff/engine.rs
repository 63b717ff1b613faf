//! Library diff computation engine.
//!
//! The core entry point is [`compute_diff`], which compares the provider's
//! current track list with the persisted [`Snapshot`] and produces a
//! [`LibraryDiff`].

#![allow(clippy::result_large_err)]

use std::collections::BTreeMap;

use crate::diff::model::{FieldChange, LibraryDiff};
use crate::errors::{ExError, ExErrorKind, TrackLogError};
use crate::model::{ChangeEvent, Field, Track};
use crate::ops::Snapshot;

/// Compare the current library against the snapshot.
///
/// Tracks are partitioned by persistent ID into added, removed and common.
/// Every field of every common track is compared with exact structural
/// equality, in layout order. Events are emitted added first, then removed,
/// then modified; each group is ordered by persistent ID.
///
/// # Errors
///
/// - `InvalidLibrary`: a track has an empty persistent ID, or two tracks
///   share one
pub fn compute_diff(
    current: &[Track],
    snapshot: &Snapshot,
    timestamp: i64,
) -> Result<LibraryDiff, ExError> {
    let observed = index_tracks(current)?;

    let mut added = Vec::new();
    let mut changed = Vec::new();
    let mut modified = Vec::new();
    let mut modified_events = Vec::new();

    for (id, track) in &observed {
        match snapshot.get(id) {
            None => added.push((*track).clone()),
            Some(previous) => {
                let changes = diff_fields(previous, track);
                if changes.is_empty() {
                    continue;
                }
                for change in &changes {
                    modified_events.push(ChangeEvent::modified(
                        timestamp,
                        track,
                        change.field,
                        change.old.as_ref(),
                    ));
                }
                modified.extend(changes);
                changed.push((*track).clone());
            }
        }
    }

    let removed: Vec<Track> = snapshot
        .tracks
        .iter()
        .filter(|(id, _)| !observed.contains_key(id.as_str()))
        .map(|(_, track)| track.clone())
        .collect();

    let mut events = Vec::with_capacity(added.len() + removed.len() + modified_events.len());
    events.extend(added.iter().map(|t| ChangeEvent::added(timestamp, t)));
    events.extend(removed.iter().map(|t| ChangeEvent::removed(timestamp, t)));
    events.extend(modified_events);

    Ok(LibraryDiff {
        timestamp,
        base_generation: snapshot.generation,
        added,
        removed,
        modified,
        changed,
        events,
    })
}

/// Field-by-field comparison of two observations of the same track
pub fn diff_fields(old: &Track, new: &Track) -> Vec<FieldChange> {
    Field::ALL
        .iter()
        .filter_map(|&field| {
            let before = old.value(field);
            let after = new.value(field);
            (before != after).then(|| FieldChange {
                persistent_id: new.persistent_id.clone(),
                field,
                old: before,
                new: after,
            })
        })
        .collect()
}

fn index_tracks(current: &[Track]) -> Result<BTreeMap<&str, &Track>, ExError> {
    let mut observed = BTreeMap::new();
    for track in current {
        if track.persistent_id.is_empty() {
            return Err(ExError::new(ExErrorKind::InvalidLibrary)
                .with_op("compute_diff")
                .with_message("track without a persistent ID"));
        }
        if observed
            .insert(track.persistent_id.as_str(), track)
            .is_some()
        {
            let err: ExError = TrackLogError::DuplicateTrack {
                persistent_id: track.persistent_id.clone(),
            }
            .into();
            return Err(err.with_op("compute_diff"));
        }
    }
    Ok(observed)
}
