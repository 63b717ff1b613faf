//! Library export format
//!
//! Defines the JSON/YAML structure the production provider reads

use serde::{Deserialize, Serialize};
use tracklog_core::model::Track;

/// The only export schema this crate understands
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

/// Top-level export file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryExport {
    /// Schema version (must be 1 for this format)
    pub schema_version: u32,

    /// Every track in the library
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl LibraryExport {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            tracks,
        }
    }
}

/// Encoding of an export file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
}

impl ExportFormat {
    /// Pick the format by extension: `.yaml`/`.yml` is YAML, anything else JSON
    pub fn from_path(path: &std::path::Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => ExportFormat::Yaml,
            _ => ExportFormat::Json,
        }
    }
}
