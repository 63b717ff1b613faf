//! Library diff engine.
//!
//! Compares the provider's current track list with the persisted snapshot and
//! produces a structured, deterministic diff plus the change events it implies.
//!
//! ## Entry point
//!
//! ```ignore
//! use tracklog_core::diff::compute_diff;
//!
//! let diff = compute_diff(&tracks, &snapshot, timestamp)?;
//! let summary = tracklog_core::diff::render_human_summary(&diff);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical diffs and event order.
//! - **Completeness**: applying the diff to the snapshot reproduces the library.
//! - **Exact comparison**: values compare structurally, never by locale.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compute_diff, diff_fields};
pub use human_summary::{count_summary, render_human_summary, summary_line};
pub use model::{FieldChange, LibraryDiff};
