//! Sync command implementations (snapshot export/import).
//!
//! Explicit `wl sync` commands report failures to the user. The automatic
//! sync around record commands ([`startup_import`] and the export after a
//! change) is best-effort and only logs.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::cli::commands::Context;
use crate::cli::SyncCommands;
use crate::error::Result;
use crate::sync::{
    file_hash, file_size, get_sync_status, print_status, ExportOutcome, ImportOutcome, Importer,
    SyncProtocol, SyncResult,
};

/// Execute sync commands.
///
/// # Errors
///
/// Returns an error if sync is not configured or the operation fails.
pub fn execute(command: &SyncCommands, ctx: &Context) -> Result<()> {
    match command {
        SyncCommands::Export => export(ctx),
        SyncCommands::Import => import(ctx),
        SyncCommands::Status => status(ctx),
    }
}

fn export(ctx: &Context) -> Result<()> {
    let sync = ctx.require_sync()?;
    let outcome = sync.try_export()?;

    if ctx.json {
        let output = serde_json::json!({
            "success": true,
            "export_dir": sync.layout().export_dir().display().to_string(),
            "outcome": outcome,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    match outcome {
        ExportOutcome::NoLocalStore => {
            println!("No local store at {}; nothing exported.", sync.store_path().display());
        }
        ExportOutcome::Exported(info) => {
            println!("Export complete: {}", info.stem);
            println!("  Size:     {} bytes", info.size);
            println!("  Location: {}", info.path.display());
        }
    }
    Ok(())
}

fn import(ctx: &Context) -> Result<()> {
    let sync = ctx.require_sync()?;
    let outcome = sync.try_import()?;

    if ctx.json {
        let output = serde_json::json!({
            "success": outcome.is_imported(),
            "outcome": outcome,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    match outcome {
        ImportOutcome::NothingToImport => {
            println!("No complete snapshot found in: {}", sync.layout().export_dir().display());
            println!("Run 'wl sync export' on another machine first.");
        }
        ImportOutcome::Imported(report) => {
            println!("Import complete from: {}", report.source.display());
            if let Some(backup) = &report.backup {
                println!("  Backup:   {}", backup.display());
            }
            if let Some(sidecar) = &report.sidecar {
                println!("  Previous: {}", sidecar.display());
            }
        }
    }
    Ok(())
}

fn status(ctx: &Context) -> Result<()> {
    let sync = ctx.require_sync()?;
    let sync_status = get_sync_status(sync)?;

    if ctx.json {
        let output = serde_json::json!({
            "store": sync.store_path().display().to_string(),
            "sync_dir": sync.layout().root().display().to_string(),
            "status": sync_status,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Store:     {}", sync.store_path().display());
        println!("Sync dir:  {}", sync.layout().root().display());
        println!();
        print_status(&sync_status);
    }

    Ok(())
}

/// Import the newest snapshot before a record command runs.
///
/// Skipped when sync is off, `auto_import` is disabled, the local store
/// already matches the snapshot (which avoids a backup per invocation), or
/// the snapshot is empty. Never fails.
pub fn startup_import(ctx: &Context) {
    let Some(sync) = &ctx.sync else {
        return;
    };
    if !ctx.config.auto_import {
        return;
    }

    match pending_snapshot(sync) {
        Ok(Some(snapshot)) => {
            if sync.import_latest_snapshot() {
                info!(snapshot = %snapshot.display(), "Loaded newer data from sync folder");
            }
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Could not inspect sync folder; skipping import"),
    }
}

/// The snapshot a startup import would load, if it is worth loading.
fn pending_snapshot(sync: &SyncProtocol) -> SyncResult<Option<PathBuf>> {
    let importer = Importer::new(sync.store_path(), sync.layout(), *sync.policy(), sync.clock());
    let Some(snapshot) = importer.locate()? else {
        return Ok(None);
    };

    // Marked complete but empty: the stability wait would never accept it.
    if file_size(&snapshot) == Some(0) {
        warn!(snapshot = %snapshot.display(), "Newest snapshot is empty; skipping import");
        return Ok(None);
    }

    let local = file_hash(sync.store_path())?;
    if local.is_some() && local == file_hash(&snapshot)? {
        debug!(snapshot = %snapshot.display(), "Local store already matches snapshot");
        return Ok(None);
    }

    Ok(Some(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use crate::config::Config;
    use crate::storage::RecordStore;
    use crate::sync::ManualClock;
    use tempfile::TempDir;

    struct Machines {
        _tmp: TempDir,
        cloud: PathBuf,
        remote_store: PathBuf,
        local_store: PathBuf,
        clock: Arc<ManualClock>,
    }

    impl Machines {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            Self {
                cloud: tmp.path().join("cloud"),
                remote_store: tmp.path().join("remote").join("weights.txt"),
                local_store: tmp.path().join("local").join("weights.txt"),
                clock: Arc::new(ManualClock::at("2024-01-31 12:00:00")),
                _tmp: tmp,
            }
        }

        /// Publish `content` as the remote machine's newest snapshot.
        fn publish(&self, content: &str) {
            fs::create_dir_all(self.remote_store.parent().unwrap()).unwrap();
            fs::write(&self.remote_store, content).unwrap();
            SyncProtocol::new(&self.remote_store, &self.cloud)
                .with_clock(self.clock.clone())
                .try_export()
                .unwrap();
        }

        fn write_local(&self, content: &str) {
            fs::create_dir_all(self.local_store.parent().unwrap()).unwrap();
            fs::write(&self.local_store, content).unwrap();
        }

        fn context(&self) -> Context {
            Context {
                config: Config::default(),
                store: RecordStore::new(&self.local_store),
                sync: Some(
                    SyncProtocol::new(&self.local_store, &self.cloud)
                        .with_clock(self.clock.clone()),
                ),
                json: true,
            }
        }

        fn backups(&self) -> bool {
            Path::new(&self.cloud).join("backups").exists()
        }
    }

    #[test]
    fn test_startup_import_loads_newer_snapshot() {
        let m = Machines::new();
        m.write_local("2024-01-01,80,2000\n");
        m.publish("2024-01-01,80,2000\n2024-01-02,79,1900\n");

        startup_import(&m.context());

        assert_eq!(
            fs::read_to_string(&m.local_store).unwrap(),
            "2024-01-01,80,2000\n2024-01-02,79,1900\n"
        );
        assert!(m.backups());
    }

    #[test]
    fn test_startup_import_skips_matching_store() {
        let m = Machines::new();
        m.write_local("2024-01-01,80,2000\n");
        m.publish("2024-01-01,80,2000\n");

        startup_import(&m.context());

        assert!(m.clock.sleeps().is_empty());
        assert!(!m.backups());
    }

    #[test]
    fn test_startup_import_skips_empty_snapshot_without_waiting() {
        let m = Machines::new();
        m.write_local("2024-01-01,80,2000\n");
        m.publish("");

        startup_import(&m.context());

        assert!(m.clock.sleeps().is_empty());
        assert_eq!(fs::read_to_string(&m.local_store).unwrap(), "2024-01-01,80,2000\n");
        assert!(!m.backups());
    }

    #[test]
    fn test_pending_snapshot_ignores_empty_snapshot_without_local_store() {
        let m = Machines::new();
        m.publish("");

        let ctx = m.context();
        assert_eq!(pending_snapshot(ctx.sync.as_ref().unwrap()).unwrap(), None);
    }

    #[test]
    fn test_startup_import_respects_auto_import() {
        let m = Machines::new();
        m.publish("2024-01-01,80,2000\n");
        let mut ctx = m.context();
        ctx.config.auto_import = false;

        startup_import(&ctx);

        assert!(!m.local_store.exists());
    }
}
