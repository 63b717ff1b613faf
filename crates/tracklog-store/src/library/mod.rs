//! Library export files
//!
//! Provides:
//! - The export schema (JSON or YAML)
//! - Parser with validation
//! - The export-file metadata provider

pub mod format;
pub mod parser;
pub mod provider;

pub use format::{ExportFormat, LibraryExport, EXPORT_SCHEMA_VERSION};
pub use parser::{parse_export_str, render_export};
pub use provider::ExportFileProvider;
