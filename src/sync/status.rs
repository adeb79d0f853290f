//! Sync status display.
//!
//! This module inspects the shared folder tree and the local store: which
//! snapshots exist and are complete, what `LATEST` says, how many backups
//! have piled up, and whether the local store already matches the snapshot
//! an import would pick.

use std::fs;
use std::io;

use colored::Colorize;

use crate::sync::file::{count_lines, file_size, read_trimmed};
use crate::sync::hash::file_hash;
use crate::sync::import::Importer;
use crate::sync::layout::{sidecar_path, BACKUP_PREFIX, DATA_EXT, READY_EXT, SNAPSHOT_PREFIX};
use crate::sync::protocol::SyncProtocol;
use crate::sync::types::{SnapshotEntry, SyncResult, SyncStatus};

/// Get the current sync status.
///
/// # Errors
///
/// Returns an error if an existing folder or file cannot be read.
pub fn get_sync_status(sync: &SyncProtocol) -> SyncResult<SyncStatus> {
    let layout = sync.layout();
    let export_dir = layout.export_dir();

    let mut snapshots = Vec::new();
    for name in list_names(&export_dir)? {
        let Some(stem) = name
            .strip_prefix(SNAPSHOT_PREFIX)
            .and_then(|_| name.strip_suffix(&format!(".{DATA_EXT}")))
        else {
            continue;
        };
        let path = export_dir.join(&name);
        snapshots.push(SnapshotEntry {
            size: file_size(&path).unwrap_or(0),
            line_count: count_lines(&path)?,
            ready: layout.export_file(stem, READY_EXT).is_file(),
            name,
        });
    }
    snapshots.sort_by(|a, b| a.name.cmp(&b.name));

    let backups = list_names(&layout.backup_dir())?
        .iter()
        .filter(|name| name.starts_with(BACKUP_PREFIX))
        .count();

    let importable = Importer::new(sync.store_path(), layout, *sync.policy(), sync.clock())
        .locate()?;

    let in_sync = match &importable {
        Some(path) => {
            let local = file_hash(sync.store_path())?;
            local.is_some() && local == file_hash(path)?
        }
        None => false,
    };

    Ok(SyncStatus {
        export_dir,
        pointer: read_trimmed(&layout.pointer_path()),
        importable: importable
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned()),
        snapshots,
        backups,
        has_sidecar: sidecar_path(sync.store_path()).is_file(),
        local_size: file_size(sync.store_path()),
        in_sync,
    })
}

/// File names in a directory; empty if the directory does not exist.
fn list_names(dir: &std::path::Path) -> io::Result<Vec<String>> {
    match fs::read_dir(dir) {
        Ok(entries) => Ok(entries
            .filter_map(Result::ok)
            .filter_map(|e| e.file_name().into_string().ok())
            .collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Print sync status to stdout in a human-readable format.
pub fn print_status(status: &SyncStatus) {
    println!("{}", "Sync Status".bold().underline());
    println!();

    println!("{}", "Local Store:".blue().bold());
    match status.local_size {
        Some(size) => println!("  Size:          {size} bytes"),
        None => println!("  {}", "(not created yet)".dimmed()),
    }
    if status.has_sidecar {
        println!("  Previous copy: kept (.old)");
    }
    println!();

    println!("{}", "Snapshots:".blue().bold());
    if status.snapshots.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for snapshot in &status.snapshots {
        let marker = if snapshot.ready {
            "ready".green()
        } else {
            "incomplete".yellow()
        };
        println!(
            "  {:<28} {:>5} records  {:>8} bytes  {marker}",
            snapshot.name, snapshot.line_count, snapshot.size
        );
    }
    if let Some(pointer) = &status.pointer {
        println!("  LATEST -> {pointer}");
    }
    println!("  Backups:       {}", status.backups);
    println!();

    match &status.importable {
        Some(name) if status.in_sync => {
            println!("{} local store matches {name}", "In sync:".green().bold());
        }
        Some(name) => {
            println!("{} {name} differs from the local store", "Pending import:".yellow().bold());
        }
        None => println!("{}", "Nothing to import.".dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::stability::ManualClock;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn protocol(tmp: &TempDir) -> SyncProtocol {
        SyncProtocol::new(tmp.path().join("weights.txt"), tmp.path().join("cloud"))
            .with_clock(Arc::new(ManualClock::at("2024-05-01 10:00:00")))
    }

    #[test]
    fn test_status_of_empty_tree() {
        let tmp = TempDir::new().unwrap();
        let status = get_sync_status(&protocol(&tmp)).unwrap();

        assert!(status.snapshots.is_empty());
        assert_eq!(status.pointer, None);
        assert_eq!(status.importable, None);
        assert_eq!(status.backups, 0);
        assert_eq!(status.local_size, None);
        assert!(!status.in_sync);
    }

    #[test]
    fn test_status_after_export_is_in_sync() {
        let tmp = TempDir::new().unwrap();
        let sync = protocol(&tmp);
        fs::write(sync.store_path(), "a,1,1\nb,2,2\n").unwrap();
        sync.export_snapshot();

        let status = get_sync_status(&sync).unwrap();

        assert_eq!(status.snapshots.len(), 1);
        assert_eq!(status.snapshots[0].name, "DB_2024-05-01_100000.txt");
        assert_eq!(status.snapshots[0].line_count, 2);
        assert!(status.snapshots[0].ready);
        assert_eq!(status.pointer.as_deref(), Some("DB_2024-05-01_100000.txt"));
        assert!(status.in_sync);
    }

    #[test]
    fn test_status_detects_local_change() {
        let tmp = TempDir::new().unwrap();
        let sync = protocol(&tmp);
        fs::write(sync.store_path(), "a,1,1\n").unwrap();
        sync.export_snapshot();
        fs::write(sync.store_path(), "a,1,1\nb,2,2\n").unwrap();

        let status = get_sync_status(&sync).unwrap();

        assert_eq!(status.importable.as_deref(), Some("DB_2024-05-01_100000.txt"));
        assert!(!status.in_sync);
    }

    #[test]
    fn test_status_counts_backups() {
        let tmp = TempDir::new().unwrap();
        let sync = protocol(&tmp);
        fs::write(sync.store_path(), "a,1,1\n").unwrap();
        sync.export_snapshot();
        assert!(sync.import_latest_snapshot());

        let status = get_sync_status(&sync).unwrap();

        assert_eq!(status.backups, 1);
        assert!(status.has_sidecar);
    }
}
