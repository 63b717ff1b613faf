//! Metadata provider capability
//!
//! The provider is the read-only source of the current library. The production
//! implementation lives in `tracklog-store` (export files); the in-memory ones
//! here are injected by tests.

use crate::errors::{ExError, ExErrorKind};
use crate::model::Track;

/// Source of the full, current track set
pub trait MetadataProvider {
    /// Enumerate every track in the library
    ///
    /// # Errors
    ///
    /// - `ProviderUnavailable` when the library cannot be read at all
    /// - `InvalidLibrary` when it can be read but is malformed
    fn fetch_tracks(&self) -> Result<Vec<Track>, ExError>;
}

/// Provider over a fixed, in-memory track list
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    tracks: Vec<Track>,
}

impl StaticProvider {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Replace the library contents between two update runs
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }
}

impl MetadataProvider for StaticProvider {
    fn fetch_tracks(&self) -> Result<Vec<Track>, ExError> {
        Ok(self.tracks.clone())
    }
}

/// Provider that always fails, for exercising the unavailable-library path
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableProvider;

impl MetadataProvider for UnavailableProvider {
    fn fetch_tracks(&self) -> Result<Vec<Track>, ExError> {
        Err(ExError::new(ExErrorKind::ProviderUnavailable)
            .with_op("fetch_tracks")
            .with_message("library is not available"))
    }
}
