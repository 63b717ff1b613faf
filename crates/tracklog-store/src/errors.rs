//! Error handling for tracklog-store
//!
//! Wraps tracklog-core ExError with store-specific helpers

use std::path::Path;

use tracklog_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// The library export could not be read at all
pub fn library_unavailable(path: &Path, reason: &str) -> ExError {
    ExError::new(ExErrorKind::ProviderUnavailable)
        .with_op("fetch_tracks")
        .with_message(format!(
            "Cannot read library export {}: {}",
            path.display(),
            reason
        ))
}

/// The library export was read but is malformed
pub fn invalid_library(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidLibrary)
        .with_op("parse_library")
        .with_message(reason.to_string())
}

/// An export could not be encoded
pub fn serialization_error(reason: &str) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("render_library")
        .with_message(reason.to_string())
}

/// A stored row that cannot be mapped back onto the model
pub fn corrupt_row(table: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("read_row")
        .with_message(format!("Unreadable row in {}: {}", table, reason))
}
