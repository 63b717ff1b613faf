//! Checksum validation for migrations
//!
//! A migration's checksum is the SHA256 of its SQL with line endings
//! normalised, so a checkout with CRLF endings does not look edited.

use sha2::{Digest, Sha256};

/// Compute the SHA256 checksum of migration SQL
pub fn compute_checksum(sql: &str) -> String {
    let mut hasher = Sha256::new();
    for line in sql.lines() {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}
