//! Naming and placement of every file the sync protocol touches.
//!
//! ```text
//! <sync_dir>/exports/DB_<ts>.tmp      export staging
//! <sync_dir>/exports/DB_<ts>.txt      snapshot
//! <sync_dir>/exports/DB_<ts>.ready    completeness marker (content: stem)
//! <sync_dir>/exports/LATEST           pointer (content: snapshot file name)
//! <sync_dir>/backups/LocalBackup_<ts>.txt
//! ```

use std::path::{Path, PathBuf};

use crate::sync::file::sibling_path;

/// Prefix of snapshot stems.
pub const SNAPSHOT_PREFIX: &str = "DB_";
/// Prefix of local-store backups.
pub const BACKUP_PREFIX: &str = "LocalBackup_";
/// Name of the pointer file.
pub const POINTER_FILE: &str = "LATEST";
/// Snapshot data extension.
pub const DATA_EXT: &str = "txt";
/// Completeness marker extension.
pub const READY_EXT: &str = "ready";
/// Export staging extension.
pub const TEMP_EXT: &str = "tmp";

/// Import staging file, next to the live store.
pub const INCOMING_SUFFIX: &str = ".incoming";
/// Previous-store sidecar, next to the live store.
pub const SIDECAR_SUFFIX: &str = ".old";

/// The shared folder tree under one sync root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncLayout {
    root: PathBuf,
}

impl SyncLayout {
    /// Layout rooted at `root` (the cloud-drive folder).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The sync root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder holding snapshots, markers and the pointer.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.root.join("exports")
    }

    /// Folder holding local-store backups.
    #[must_use]
    pub fn backup_dir(&self) -> PathBuf {
        self.root.join("backups")
    }

    /// The `LATEST` pointer file.
    #[must_use]
    pub fn pointer_path(&self) -> PathBuf {
        self.export_dir().join(POINTER_FILE)
    }

    /// `<stem>.<ext>` inside the export folder.
    #[must_use]
    pub fn export_file(&self, stem: &str, ext: &str) -> PathBuf {
        self.export_dir().join(format!("{stem}.{ext}"))
    }

    /// Backup path for a timestamp fragment.
    #[must_use]
    pub fn backup_path(&self, stamp: &str) -> PathBuf {
        self.backup_dir()
            .join(format!("{BACKUP_PREFIX}{stamp}.{DATA_EXT}"))
    }
}

/// Snapshot stem for a timestamp fragment, e.g. `DB_2024-01-31_120000`.
#[must_use]
pub fn snapshot_stem(stamp: &str) -> String {
    format!("{SNAPSHOT_PREFIX}{stamp}")
}

/// Snapshot file name for a stem.
#[must_use]
pub fn snapshot_file_name(stem: &str) -> String {
    format!("{stem}.{DATA_EXT}")
}

/// Import staging path for a live store.
#[must_use]
pub fn incoming_path(store: &Path) -> PathBuf {
    sibling_path(store, INCOMING_SUFFIX)
}

/// Previous-store sidecar path for a live store.
#[must_use]
pub fn sidecar_path(store: &Path) -> PathBuf {
    sibling_path(store, SIDECAR_SUFFIX)
}

/// Stem of a snapshot named by the pointer.
///
/// Only a bare `<stem>.txt` file name is accepted; anything with a path
/// separator or another extension is rejected.
#[must_use]
pub fn stem_from_pointer(content: &str) -> Option<&str> {
    let name = content.trim();
    if name.contains(['/', '\\']) || name.starts_with('.') {
        return None;
    }
    name.strip_suffix(".txt").filter(|stem| !stem.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = SyncLayout::new("/cloud/weights");
        assert_eq!(layout.pointer_path(), PathBuf::from("/cloud/weights/exports/LATEST"));
        assert_eq!(
            layout.export_file("DB_2024-01-01_000000", READY_EXT),
            PathBuf::from("/cloud/weights/exports/DB_2024-01-01_000000.ready")
        );
        assert_eq!(
            layout.backup_path("2024-01-01_000000"),
            PathBuf::from("/cloud/weights/backups/LocalBackup_2024-01-01_000000.txt")
        );
    }

    #[test]
    fn test_snapshot_names() {
        let stem = snapshot_stem("2024-01-01_120000");
        assert_eq!(stem, "DB_2024-01-01_120000");
        assert_eq!(snapshot_file_name(&stem), "DB_2024-01-01_120000.txt");
    }

    #[test]
    fn test_store_sidecars() {
        let store = Path::new("/home/u/weights.txt");
        assert_eq!(incoming_path(store), PathBuf::from("/home/u/weights.txt.incoming"));
        assert_eq!(sidecar_path(store), PathBuf::from("/home/u/weights.txt.old"));
    }

    #[test]
    fn test_stem_from_pointer() {
        assert_eq!(stem_from_pointer("DB_2024-01-01_000000.txt\n"), Some("DB_2024-01-01_000000"));
        assert_eq!(stem_from_pointer("../etc/passwd.txt"), None);
        assert_eq!(stem_from_pointer("DB_2024-01-01_000000.ready"), None);
        assert_eq!(stem_from_pointer(".txt"), None);
        assert_eq!(stem_from_pointer(""), None);
    }
}
