//! Snapshot export.
//!
//! Publishes a copy of the local store into the shared export folder in four
//! phases:
//!
//! 1. **CopyToTemp**: copy the store to `<stem>.tmp`
//! 2. **RenameToFinal**: rename it to `<stem>.txt`
//! 3. **WriteReadyMarker**: write `<stem>.ready`
//! 4. **UpdatePointer**: point `LATEST` at `<stem>.txt`
//!
//! Readers only trust a `.txt` once its `.ready` exists, and the `.txt`
//! only ever appears through a rename, so a reader never sees a partial
//! snapshot. The local store is never modified.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::sync::file::{copy_synced, file_size, remove_if_exists, replace_rename, write_synced};
use crate::sync::layout::{
    snapshot_file_name, snapshot_stem, SyncLayout, DATA_EXT, READY_EXT, TEMP_EXT,
};
use crate::sync::stability::{format_stamp, Clock};
use crate::sync::types::{ExportOutcome, ExportPhase, SnapshotInfo, SyncError, SyncResult};

/// Exporter for one local store into one sync layout.
pub struct Exporter<'a> {
    store_path: &'a Path,
    layout: &'a SyncLayout,
    clock: &'a dyn Clock,
}

impl<'a> Exporter<'a> {
    /// Create an exporter.
    #[must_use]
    pub fn new(store_path: &'a Path, layout: &'a SyncLayout, clock: &'a dyn Clock) -> Self {
        Self {
            store_path,
            layout,
            clock,
        }
    }

    /// Run all export phases.
    ///
    /// A missing local store is not an error: nothing is written and
    /// [`ExportOutcome::NoLocalStore`] is returned. Two exports within the
    /// same second share a stem; the second overwrites the first.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Export`] naming the phase that failed. The
    /// `.tmp` file is removed before returning.
    pub fn export(&self) -> SyncResult<ExportOutcome> {
        if !self.store_path.is_file() {
            debug!(store = %self.store_path.display(), "No local store; skipping export");
            return Ok(ExportOutcome::NoLocalStore);
        }

        let stem = snapshot_stem(&format_stamp(self.clock.now()));
        let temp_path = self.layout.export_file(&stem, TEMP_EXT);

        let result = self.publish(&stem, &temp_path);
        if result.is_err() {
            let _ = remove_if_exists(&temp_path);
        }
        result
    }

    fn publish(&self, stem: &str, temp_path: &Path) -> SyncResult<ExportOutcome> {
        let final_path = self.layout.export_file(stem, DATA_EXT);

        debug!(phase = %ExportPhase::CopyToTemp, path = %temp_path.display());
        fs::create_dir_all(self.layout.export_dir())
            .and_then(|()| copy_synced(self.store_path, temp_path))
            .map_err(SyncError::export(ExportPhase::CopyToTemp))?;

        debug!(phase = %ExportPhase::RenameToFinal, path = %final_path.display());
        replace_rename(temp_path, &final_path)
            .map_err(SyncError::export(ExportPhase::RenameToFinal))?;

        debug!(phase = %ExportPhase::WriteReadyMarker);
        write_synced(&self.layout.export_file(stem, READY_EXT), stem.as_bytes())
            .map_err(SyncError::export(ExportPhase::WriteReadyMarker))?;

        debug!(phase = %ExportPhase::UpdatePointer);
        write_synced(
            &self.layout.pointer_path(),
            snapshot_file_name(stem).as_bytes(),
        )
        .map_err(SyncError::export(ExportPhase::UpdatePointer))?;

        Ok(ExportOutcome::Exported(SnapshotInfo {
            stem: stem.to_string(),
            size: file_size(&final_path).unwrap_or(0),
            path: final_path,
        }))
    }
}
