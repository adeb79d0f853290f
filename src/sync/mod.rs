//! Cloud-folder sync operations.
//!
//! This module synchronizes the local record store through a folder that a
//! third-party client (Dropbox, OneDrive, ...) mirrors between machines:
//!
//! - **Export**: local store → timestamped snapshot + `.ready` marker + `LATEST`
//! - **Import**: newest complete snapshot → local store, after a stability
//!   wait and a backup, swapped in by rename
//! - **Hashing**: SHA256 content hashing to detect an already-current store
//! - **Status**: snapshots, pointer, backups and in-sync state
//!
//! # Architecture
//!
//! Both directions are explicit phase sequences ([`ExportPhase`],
//! [`ImportPhase`]). Every destructive step is preceded by a durable copy
//! and every publish step is a rename, so a crash never leaves a truncated
//! store or a half-written snapshot that a reader would trust.
//!
//! # Example
//!
//! ```ignore
//! use weightlog::sync::SyncProtocol;
//!
//! let sync = SyncProtocol::new("/home/me/weights.txt", "/home/me/Dropbox/weightlog");
//!
//! // At startup
//! let replaced = sync.import_latest_snapshot();
//!
//! // After every mutation
//! sync.export_snapshot();
//! ```

mod export;
mod file;
mod hash;
mod import;
mod layout;
mod protocol;
mod stability;
mod status;
mod types;

// Re-export main types and functions
pub use export::Exporter;
pub use file::{
    atomic_write, copy_synced, count_lines, file_size, remove_if_exists, replace_rename,
    sibling_path,
};
pub use hash::{content_hash, file_hash};
pub use import::Importer;
pub use layout::{incoming_path, sidecar_path, snapshot_stem, SyncLayout, POINTER_FILE};
pub use protocol::SyncProtocol;
pub use stability::{format_stamp, wait_for_stable, Clock, StabilityPolicy, SystemClock};
#[cfg(test)]
pub(crate) use stability::ManualClock;
pub use status::{get_sync_status, print_status};
pub use types::{
    ExportOutcome, ExportPhase, ImportOutcome, ImportPhase, ImportReport, SnapshotEntry,
    SnapshotInfo, SyncError, SyncResult, SyncStatus,
};
