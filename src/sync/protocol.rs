//! Facade over export and import.
//!
//! Two categories of call:
//!
//! - **Best-effort** ([`SyncProtocol::export_snapshot`],
//!   [`SyncProtocol::import_latest_snapshot`]): never fail. Problems are
//!   logged and the prior on-disk state is left intact.
//! - **Inspectable** ([`SyncProtocol::try_export`],
//!   [`SyncProtocol::try_import`]): the same work, returning the outcome or
//!   the failing phase for callers that want to report it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::sync::export::Exporter;
use crate::sync::import::Importer;
use crate::sync::layout::SyncLayout;
use crate::sync::stability::{Clock, StabilityPolicy, SystemClock};
use crate::sync::types::{ExportOutcome, ImportOutcome, SyncResult};

/// Sync configuration for one local store.
#[derive(Clone)]
pub struct SyncProtocol {
    store_path: PathBuf,
    layout: SyncLayout,
    policy: StabilityPolicy,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SyncProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncProtocol")
            .field("store_path", &self.store_path)
            .field("layout", &self.layout)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl SyncProtocol {
    /// Sync `store_path` through the folder tree at `sync_dir`, using the
    /// system clock and the default stability policy.
    #[must_use]
    pub fn new(store_path: impl Into<PathBuf>, sync_dir: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            layout: SyncLayout::new(sync_dir),
            policy: StabilityPolicy::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the stability policy.
    #[must_use]
    pub fn with_policy(mut self, policy: StabilityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the clock (tests).
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The local store this protocol syncs.
    #[must_use]
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// The shared folder tree.
    #[must_use]
    pub fn layout(&self) -> &SyncLayout {
        &self.layout
    }

    /// The stability policy in effect.
    #[must_use]
    pub fn policy(&self) -> &StabilityPolicy {
        &self.policy
    }

    /// The clock in effect.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Export the local store, reporting the outcome.
    ///
    /// # Errors
    ///
    /// Returns the failing export phase.
    pub fn try_export(&self) -> SyncResult<ExportOutcome> {
        Exporter::new(&self.store_path, &self.layout, self.clock()).export()
    }

    /// Import the newest complete snapshot, reporting the outcome.
    ///
    /// # Errors
    ///
    /// Returns a stability timeout or the failing import phase.
    pub fn try_import(&self) -> SyncResult<ImportOutcome> {
        Importer::new(&self.store_path, &self.layout, self.policy, self.clock()).import()
    }

    /// Export the local store; failures are logged and swallowed.
    pub fn export_snapshot(&self) {
        match self.try_export() {
            Ok(outcome) => debug!(?outcome, "Export finished"),
            Err(e) => warn!(error = %e, "Export failed; local store unchanged"),
        }
    }

    /// Import the newest complete snapshot.
    ///
    /// Returns `true` only if the local store was replaced. Nothing to
    /// import, a stability timeout, and I/O failures all return `false`.
    #[must_use]
    pub fn import_latest_snapshot(&self) -> bool {
        match self.try_import() {
            Ok(outcome) => {
                debug!(?outcome, "Import finished");
                outcome.is_imported()
            }
            Err(e) => {
                warn!(error = %e, "Import failed; local store unchanged");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::stability::ManualClock;
    use std::fs;
    use tempfile::TempDir;

    fn protocol(tmp: &TempDir) -> SyncProtocol {
        SyncProtocol::new(tmp.path().join("weights.txt"), tmp.path().join("cloud"))
            .with_clock(Arc::new(ManualClock::at("2024-05-01 10:00:00")))
            .with_policy(StabilityPolicy {
                max_attempts: 2,
                ..StabilityPolicy::default()
            })
    }

    #[test]
    fn test_import_with_no_snapshots_returns_false() {
        let tmp = TempDir::new().unwrap();
        let sync = protocol(&tmp);
        fs::write(sync.store_path(), "a,1,1\n").unwrap();

        assert!(!sync.import_latest_snapshot());
        assert_eq!(fs::read_to_string(sync.store_path()).unwrap(), "a,1,1\n");
    }

    #[test]
    fn test_export_snapshot_swallows_failure() {
        let tmp = TempDir::new().unwrap();
        // Sync root is a plain file, so the export folder cannot be created.
        fs::write(tmp.path().join("cloud"), "not a dir").unwrap();
        let sync = protocol(&tmp);
        fs::write(sync.store_path(), "a,1,1\n").unwrap();

        sync.export_snapshot();

        assert!(sync.try_export().is_err());
        assert_eq!(fs::read_to_string(sync.store_path()).unwrap(), "a,1,1\n");
    }

    #[test]
    fn test_export_then_import_returns_true() {
        let tmp = TempDir::new().unwrap();
        let sync = protocol(&tmp);
        fs::write(sync.store_path(), "a,1,1\n").unwrap();

        sync.export_snapshot();

        assert!(sync.import_latest_snapshot());
        assert_eq!(fs::read_to_string(sync.store_path()).unwrap(), "a,1,1\n");
    }

    #[test]
    fn test_stability_timeout_returns_false() {
        let tmp = TempDir::new().unwrap();
        let sync = protocol(&tmp);
        let layout = sync.layout().clone();
        fs::create_dir_all(layout.export_dir()).unwrap();
        fs::write(layout.export_file("DB_2024-05-01_090000", "txt"), "").unwrap();
        fs::write(layout.export_file("DB_2024-05-01_090000", "ready"), "x").unwrap();

        assert!(!sync.import_latest_snapshot());
        assert!(!sync.store_path().exists());
    }
}
