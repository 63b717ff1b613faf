//! Repository layer persisting the snapshot and change log to SQLite

pub mod sqlite_repo;

pub use sqlite_repo::{column_name, SqliteStore};
