//! Content hashing for sync operations.
//!
//! SHA256 over raw file bytes, used to tell whether the local store already
//! matches a snapshot so a redundant import (and its backup) can be skipped.

use std::fs;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Compute a SHA256 hex digest of a byte slice.
#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Hash a file's content. Returns `Ok(None)` if the file does not exist.
///
/// # Errors
///
/// Returns any read error other than `NotFound`.
pub fn file_hash(path: &Path) -> io::Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(content_hash(&bytes))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
