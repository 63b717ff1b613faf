//! Export-file metadata provider

#![allow(clippy::result_large_err)]

use std::fs;
use std::path::{Path, PathBuf};

use tracklog_core::errors::ExError;
use tracklog_core::model::Track;
use tracklog_core::provider::MetadataProvider;

use crate::errors::library_unavailable;
use crate::library::format::ExportFormat;
use crate::library::parser::parse_export_str;

/// Reads the library from an export file on every fetch
#[derive(Debug, Clone)]
pub struct ExportFileProvider {
    path: PathBuf,
}

impl ExportFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetadataProvider for ExportFileProvider {
    fn fetch_tracks(&self) -> Result<Vec<Track>, ExError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| library_unavailable(&self.path, &e.to_string()))?;

        let export = parse_export_str(&content, ExportFormat::from_path(&self.path))?;

        tracing::debug!(
            path = %self.path.display(),
            track_count = export.tracks.len(),
            "Read library export"
        );

        Ok(export.tracks)
    }
}
