//! Sync types for snapshot export/import.
//!
//! This module defines the phase enums of the two sync state machines, the
//! outcome values they report, and the sync error type.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Phases of an export, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportPhase {
    /// Copy the local store to `<stem>.tmp` in the export folder.
    CopyToTemp,
    /// Rename `<stem>.tmp` to `<stem>.txt`.
    RenameToFinal,
    /// Write the `<stem>.ready` completeness marker.
    WriteReadyMarker,
    /// Point `LATEST` at the new snapshot.
    UpdatePointer,
}

impl fmt::Display for ExportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CopyToTemp => write!(f, "copy_to_temp"),
            Self::RenameToFinal => write!(f, "rename_to_final"),
            Self::WriteReadyMarker => write!(f, "write_ready_marker"),
            Self::UpdatePointer => write!(f, "update_pointer"),
        }
    }
}

/// Phases of an import, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPhase {
    /// Find the newest complete snapshot.
    Locate,
    /// Wait until the snapshot's size stops changing.
    WaitStable,
    /// Copy the current local store into the backup folder.
    Backup,
    /// Copy the snapshot next to the live store.
    StageTemp,
    /// Move the live store aside to the sidecar.
    SwapOld,
    /// Rename the staged file into the live path.
    RenameIn,
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locate => write!(f, "locate"),
            Self::WaitStable => write!(f, "wait_stable"),
            Self::Backup => write!(f, "backup"),
            Self::StageTemp => write!(f, "stage_temp"),
            Self::SwapOld => write!(f, "swap_old"),
            Self::RenameIn => write!(f, "rename_in"),
        }
    }
}

/// A published snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotInfo {
    /// Timestamp stem, e.g. `DB_2024-01-31_120000`.
    pub stem: String,
    /// Path of the `.txt` snapshot file.
    pub path: PathBuf,
    /// Size in bytes at publish time.
    pub size: u64,
}

/// Result of a completed export call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportOutcome {
    /// There is no local store yet; nothing was written.
    NoLocalStore,
    /// A new snapshot was published.
    Exported(SnapshotInfo),
}

/// What a successful import did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Snapshot that was imported.
    pub source: PathBuf,
    /// Backup of the previous local store, if there was one.
    pub backup: Option<PathBuf>,
    /// Sidecar holding the previous live store, if there was one.
    pub sidecar: Option<PathBuf>,
    /// Size of the imported snapshot in bytes.
    pub size: u64,
}

/// Result of a completed import call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportOutcome {
    /// No complete snapshot exists in the export folder.
    NothingToImport,
    /// A snapshot replaced the local store.
    Imported(ImportReport),
}

impl ImportOutcome {
    /// Whether the live store was replaced.
    #[must_use]
    pub fn is_imported(&self) -> bool {
        matches!(self, Self::Imported(_))
    }
}

/// One snapshot found in the export folder.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotEntry {
    /// File name (e.g., `DB_2024-01-31_120000.txt`).
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// Number of lines (records) in the file.
    pub line_count: usize,
    /// Whether the matching `.ready` marker exists.
    pub ready: bool,
}

/// Sync status information.
#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    /// Export folder inspected.
    pub export_dir: PathBuf,
    /// Content of the `LATEST` pointer, if present.
    pub pointer: Option<String>,
    /// Snapshot an import would pick right now.
    pub importable: Option<String>,
    /// All snapshots, oldest first.
    pub snapshots: Vec<SnapshotEntry>,
    /// Number of local-store backups.
    pub backups: usize,
    /// Whether the previous-store sidecar exists.
    pub has_sidecar: bool,
    /// Local store size in bytes, if it exists.
    pub local_size: Option<u64>,
    /// Local store content matches the importable snapshot.
    pub in_sync: bool,
}

/// Sync-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// An export phase failed.
    #[error("Export failed during {phase}: {source}")]
    Export {
        /// Phase that failed.
        phase: ExportPhase,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An import phase failed.
    #[error("Import failed during {phase}: {source}")]
    Import {
        /// Phase that failed.
        phase: ImportPhase,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The snapshot never reached a stable size.
    #[error("Snapshot {} did not settle after {attempts} attempts", path.display())]
    StabilityTimeout {
        /// Snapshot being waited on.
        path: PathBuf,
        /// Attempts made.
        attempts: u32,
    },

    /// IO error outside a named phase.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    pub(crate) fn export(phase: ExportPhase) -> impl FnOnce(std::io::Error) -> Self {
        move |source| Self::Export { phase, source }
    }

    pub(crate) fn import(phase: ImportPhase) -> impl FnOnce(std::io::Error) -> Self {
        move |source| Self::Import { phase, source }
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;
