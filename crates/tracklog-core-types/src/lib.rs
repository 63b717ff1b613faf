//! Core types shared across tracklog facilities
//!
//! This crate holds the canonical schema constants used by the logging
//! facility and by anything that asserts on structured log output.

pub mod schema;
