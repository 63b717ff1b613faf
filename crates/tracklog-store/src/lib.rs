//! Tracklog Store - SQLite persistence and library export reading
//!
//! Provides:
//! - SQLite schema with an embedded, checksummed migrations framework
//! - `SqliteStore`, the production snapshot and change log store
//! - `ExportFileProvider`, the production metadata provider

pub mod db;
pub mod errors;
pub mod library;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use library::ExportFileProvider;
pub use repo::SqliteStore;
