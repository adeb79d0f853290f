//! Atomic file operations for sync.
//!
//! This module provides the file primitives both sync state machines are
//! built from:
//! - Atomic writes: write to temp file, sync to disk, then rename
//! - Durable copies (copy + fsync) used for temp, staging and backup files
//! - Replacing renames that clear the destination first
//!
//! Everything here returns plain `io::Result`; the state machines attach the
//! phase that failed.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Build a path next to `path` by appending `suffix` to its file name.
///
/// `weights.txt` + `.old` gives `weights.txt.old`.
#[must_use]
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, std::ffi::OsStr::to_os_string);
    name.push(suffix);
    path.with_file_name(name)
}

/// Write content to a file atomically.
///
/// This function:
/// 1. Writes content to a temporary file (same path with `.tmp` appended)
/// 2. Calls `fsync` to ensure data is on disk
/// 3. Atomically renames the temp file to the target path
///
/// If any step fails, the original file (if any) remains untouched and the
/// temp file is removed.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = sibling_path(path, ".tmp");

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let result = write_synced(&temp_path, content.as_bytes())
        .and_then(|()| fs::rename(&temp_path, path));

    if result.is_err() {
        let _ = remove_if_exists(&temp_path);
    }
    result
}

/// Write bytes to `path` (create or truncate) and fsync.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_synced(path: &Path, content: &[u8]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

/// Copy `from` to `to` and fsync the copy.
///
/// Returns the number of bytes copied.
///
/// # Errors
///
/// Returns an error if the source cannot be read or the copy written.
pub fn copy_synced(from: &Path, to: &Path) -> io::Result<u64> {
    let bytes = fs::copy(from, to)?;
    OpenOptions::new().write(true).open(to)?.sync_all()?;
    Ok(bytes)
}

/// Rename `from` onto `to`, deleting any existing `to` first.
///
/// The delete keeps the rename working on platforms where rename refuses
/// to overwrite; the rename itself is still a single operation.
///
/// # Errors
///
/// Returns an error if the delete or the rename fails.
pub fn replace_rename(from: &Path, to: &Path) -> io::Result<()> {
    remove_if_exists(to)?;
    fs::rename(from, to)
}

/// Remove a file, treating "already gone" as success.
///
/// # Errors
///
/// Returns any error other than `NotFound`.
pub fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Get the size of a file in bytes.
///
/// Returns `None` if the file doesn't exist or cannot be inspected.
#[must_use]
pub fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path).ok().filter(fs::Metadata::is_file).map(|m| m.len())
}

/// Read a small text file, trimmed. `None` if missing or unreadable.
#[must_use]
pub fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
}

/// Count the number of lines in a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn count_lines(path: &Path) -> io::Result<usize> {
    if !path.exists() {
        return Ok(0);
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let count = reader.lines().filter(Result::is_ok).count();
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sibling_path() {
        let path = Path::new("/data/weights.txt");
        assert_eq!(sibling_path(path, ".old"), PathBuf::from("/data/weights.txt.old"));
    }

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("test.txt");

        atomic_write(&path, "line 1\nline 2\n").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "line 1\nline 2\n");
        assert!(!sibling_path(&path, ".tmp").exists());
    }

    #[test]
    fn test_copy_synced() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("a.txt");
        let to = temp_dir.path().join("b.txt");
        fs::write(&from, "abc").unwrap();

        assert_eq!(copy_synced(&from, &to).unwrap(), 3);
        assert_eq!(fs::read_to_string(&to).unwrap(), "abc");
    }

    #[test]
    fn test_replace_rename_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("new.txt");
        let to = temp_dir.path().join("live.txt");
        fs::write(&from, "new").unwrap();
        fs::write(&to, "old").unwrap();

        replace_rename(&from, &to).unwrap();

        assert_eq!(fs::read_to_string(&to).unwrap(), "new");
        assert!(!from.exists());
    }

    #[test]
    fn test_remove_if_exists_tolerates_missing() {
        let temp_dir = TempDir::new().unwrap();
        remove_if_exists(&temp_dir.path().join("missing")).unwrap();
    }

    #[test]
    fn test_file_size() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("f.txt");
        assert_eq!(file_size(&path), None);
        fs::write(&path, "12345").unwrap();
        assert_eq!(file_size(&path), Some(5));
        assert_eq!(file_size(temp_dir.path()), None);
    }

    #[test]
    fn test_count_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.txt");

        assert_eq!(count_lines(&path).unwrap(), 0);

        fs::write(&path, "line1\nline2\nline3\n").unwrap();
        assert_eq!(count_lines(&path).unwrap(), 3);
    }
}
