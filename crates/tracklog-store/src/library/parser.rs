//! Export parser with validation
//!
//! Parses JSON or YAML and validates the schema version and track identities

#![allow(clippy::result_large_err)]

use std::collections::HashSet;

use crate::errors::{invalid_library, serialization_error, Result};
use crate::library::format::{ExportFormat, LibraryExport, EXPORT_SCHEMA_VERSION};

/// Parse an export from a string
pub fn parse_export_str(content: &str, format: ExportFormat) -> Result<LibraryExport> {
    let export: LibraryExport = match format {
        ExportFormat::Json => serde_json::from_str(content)
            .map_err(|e| invalid_library(&format!("JSON parse error: {}", e)))?,
        ExportFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| invalid_library(&format!("YAML parse error: {}", e)))?,
    };

    validate_export(&export)?;

    Ok(export)
}

/// Serialize an export, for writing fixtures and round-trip tooling
pub fn render_export(export: &LibraryExport, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(export)
            .map_err(|e| serialization_error(&format!("JSON encode error: {}", e))),
        ExportFormat::Yaml => serde_yaml::to_string(export)
            .map_err(|e| serialization_error(&format!("YAML encode error: {}", e))),
    }
}

fn validate_export(export: &LibraryExport) -> Result<()> {
    if export.schema_version != EXPORT_SCHEMA_VERSION {
        return Err(invalid_library(&format!(
            "Unsupported schema_version: {}. Expected {}",
            export.schema_version, EXPORT_SCHEMA_VERSION
        )));
    }

    let mut seen = HashSet::new();
    for track in &export.tracks {
        if track.persistent_id.is_empty() {
            return Err(invalid_library("Track with empty PersistentID"));
        }
        if !seen.insert(track.persistent_id.as_str()) {
            return Err(invalid_library(&format!(
                "Duplicate PersistentID {}",
                track.persistent_id
            ))
            .with_persistent_id(track.persistent_id.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracklog_core::errors::ExErrorKind;
    use tracklog_core::model::Field;

    #[test]
    fn test_parse_json_export() {
        let json = r#"{
            "schema_version": 1,
            "tracks": [
                {"PersistentID": "A1", "Title": "Song", "PlayCount": 4, "Year": 1994}
            ]
        }"#;
        let export = parse_export_str(json, ExportFormat::Json).unwrap();
        assert_eq!(export.tracks.len(), 1);
        assert_eq!(export.tracks[0].integer(Field::PlayCount), Some(4));
        assert_eq!(export.tracks[0].title.as_deref(), Some("Song"));
    }

    #[test]
    fn test_parse_yaml_export() {
        let yaml = "schema_version: 1\ntracks:\n  - PersistentID: B2\n    Artist: X\n";
        let export = parse_export_str(yaml, ExportFormat::Yaml).unwrap();
        assert_eq!(export.tracks[0].artist.as_deref(), Some("X"));
    }

    #[test]
    fn test_wrong_schema_version() {
        let err = parse_export_str(r#"{"schema_version": 2, "tracks": []}"#, ExportFormat::Json)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidLibrary);
        assert!(err.message().contains("schema_version"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"schema_version": 1, "tracks": [{"PersistentID": "A"}, {"PersistentID": "A"}]}"#;
        let err = parse_export_str(json, ExportFormat::Json).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidLibrary);
        assert_eq!(err.persistent_id(), Some("A"));
    }

    #[test]
    fn test_malformed_is_invalid_library() {
        let err = parse_export_str("{not json", ExportFormat::Json).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidLibrary);
    }
}
