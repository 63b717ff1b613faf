//! Tracklog Engine - Orchestration layer
//!
//! Provides the update, log and report operations, wiring core diffing and
//! reporting to a metadata provider and a persisted store, plus the explicit
//! configuration object every entry point is built from.

pub mod commands;
pub mod config;

pub use commands::log::read_log;
pub use commands::report::{run_report, ReportOutput, ReportRequest};
pub use commands::update::{update, update_at, CommitResult};
pub use config::{Config, ConfigOverrides};
