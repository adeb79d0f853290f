//! Snapshot import.
//!
//! Replaces the local store with the newest complete snapshot:
//!
//! 1. **Locate**: the `LATEST` snapshot if it and its marker exist,
//!    otherwise the greatest `.ready` marker with a data file
//! 2. **WaitStable**: wait for the sync client to finish writing it
//! 3. **Backup**: copy the current store to the backup folder
//! 4. **StageTemp**: copy the snapshot next to the store (`.incoming`)
//! 5. **SwapOld**: rename the store to its `.old` sidecar
//! 6. **RenameIn**: rename the staged file into the store path
//!
//! Every destructive step is preceded by a durable copy and every publish
//! step is a rename. A crash leaves either the old store, the old store in
//! the sidecar, or the new store on disk; never a truncated one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::sync::file::{copy_synced, read_trimmed, remove_if_exists, replace_rename};
use crate::sync::layout::{
    incoming_path, sidecar_path, stem_from_pointer, SyncLayout, DATA_EXT, READY_EXT,
};
use crate::sync::stability::{format_stamp, wait_for_stable, Clock, StabilityPolicy};
use crate::sync::types::{ImportOutcome, ImportPhase, ImportReport, SyncError, SyncResult};

/// Importer for one sync layout into one local store.
pub struct Importer<'a> {
    store_path: &'a Path,
    layout: &'a SyncLayout,
    policy: StabilityPolicy,
    clock: &'a dyn Clock,
}

impl<'a> Importer<'a> {
    /// Create an importer.
    #[must_use]
    pub fn new(
        store_path: &'a Path,
        layout: &'a SyncLayout,
        policy: StabilityPolicy,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            store_path,
            layout,
            policy,
            clock,
        }
    }

    /// Run all import phases.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::StabilityTimeout`] if the snapshot never settles,
    /// or [`SyncError::Import`] naming the phase that failed. In both cases
    /// the live store is left as it was (or, if only the final rename
    /// failed, recoverable from the `.old` sidecar).
    pub fn import(&self) -> SyncResult<ImportOutcome> {
        let Some(source) = self.locate()? else {
            debug!(export_dir = %self.layout.export_dir().display(), "Nothing to import");
            return Ok(ImportOutcome::NothingToImport);
        };

        debug!(phase = %ImportPhase::WaitStable, source = %source.display());
        let size = wait_for_stable(&source, &self.policy, self.clock)?;

        let backup = self.backup()?;

        let incoming = incoming_path(self.store_path);
        let swapped = self.swap_in(&source, &incoming);
        if swapped.is_err() {
            let _ = remove_if_exists(&incoming);
        }
        let sidecar = swapped?;

        info!(source = %source.display(), store = %self.store_path.display(), "Imported snapshot");
        Ok(ImportOutcome::Imported(ImportReport {
            source,
            backup,
            sidecar,
            size,
        }))
    }

    /// Find the snapshot an import would use.
    ///
    /// # Errors
    ///
    /// Returns an error if the export folder exists but cannot be listed.
    pub fn locate(&self) -> SyncResult<Option<PathBuf>> {
        debug!(phase = %ImportPhase::Locate);

        if let Some(path) = self.pointed_snapshot() {
            return Ok(Some(path));
        }

        let entries = match fs::read_dir(self.layout.export_dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SyncError::import(ImportPhase::Locate)(e)),
        };

        let newest = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let stem = name.strip_suffix(&format!(".{READY_EXT}"))?.to_string();
                (!stem.is_empty()).then_some(stem)
            })
            .filter(|stem| self.layout.export_file(stem, DATA_EXT).is_file())
            .max();

        Ok(newest.map(|stem| self.layout.export_file(&stem, DATA_EXT)))
    }

    /// Snapshot named by `LATEST`, if both it and its marker exist.
    fn pointed_snapshot(&self) -> Option<PathBuf> {
        let pointer = read_trimmed(&self.layout.pointer_path())?;
        let Some(stem) = stem_from_pointer(&pointer) else {
            debug!(%pointer, "Ignoring malformed pointer");
            return None;
        };

        let data = self.layout.export_file(stem, DATA_EXT);
        let ready = self.layout.export_file(stem, READY_EXT);
        if data.is_file() && ready.is_file() {
            Some(data)
        } else {
            debug!(%pointer, "Pointer names an incomplete snapshot; scanning markers");
            None
        }
    }

    /// Copy the current store into the backup folder, if there is one.
    fn backup(&self) -> SyncResult<Option<PathBuf>> {
        if !self.store_path.is_file() {
            return Ok(None);
        }

        let path = self.layout.backup_path(&format_stamp(self.clock.now()));
        debug!(phase = %ImportPhase::Backup, path = %path.display());
        fs::create_dir_all(self.layout.backup_dir())
            .and_then(|()| copy_synced(self.store_path, &path))
            .map_err(SyncError::import(ImportPhase::Backup))?;
        Ok(Some(path))
    }

    /// Stage, move the old store aside, and rename the new one in.
    ///
    /// Returns the sidecar path if there was a store to move aside.
    fn swap_in(&self, source: &Path, incoming: &Path) -> SyncResult<Option<PathBuf>> {
        debug!(phase = %ImportPhase::StageTemp, path = %incoming.display());
        if let Some(parent) = self.store_path.parent() {
            fs::create_dir_all(parent).map_err(SyncError::import(ImportPhase::StageTemp))?;
        }
        copy_synced(source, incoming).map_err(SyncError::import(ImportPhase::StageTemp))?;

        let sidecar = if self.store_path.is_file() {
            let sidecar = sidecar_path(self.store_path);
            debug!(phase = %ImportPhase::SwapOld, path = %sidecar.display());
            replace_rename(self.store_path, &sidecar)
                .map_err(SyncError::import(ImportPhase::SwapOld))?;
            Some(sidecar)
        } else {
            None
        };

        debug!(phase = %ImportPhase::RenameIn);
        fs::rename(incoming, self.store_path).map_err(SyncError::import(ImportPhase::RenameIn))?;

        Ok(sidecar)
    }
}
