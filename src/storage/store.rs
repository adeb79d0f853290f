//! Flat-file record store.
//!
//! The store is a UTF-8 text file with one `date,weight,calorie` line per
//! record, in insertion order. Mutations read the whole file, change it in
//! memory, and write it back atomically. Record volume is a personal daily
//! log (a few thousand lines), so whole-file rewrites are fine.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::Result;
use crate::model::{line_has_date, Record};
use crate::sync::atomic_write;

/// The local record store. Owns every mutation of its file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Store backed by the file at `path` (created on first append).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every well-formed record.
    ///
    /// A missing file yields an empty list. Lines that do not split into
    /// exactly three fields are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(&self) -> Result<Vec<Record>> {
        let Some(content) = self.read()? else {
            return Ok(Vec::new());
        };

        let records = content
            .lines()
            .enumerate()
            .filter_map(|(index, line)| {
                let record = Record::parse_line(line);
                if record.is_none() {
                    trace!(line = index + 1, "Dropping malformed line");
                }
                record
            })
            .collect();
        Ok(records)
    }

    /// Append one record at the end of the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened for append or written.
    pub fn append(&self, record: &Record) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        let mut line = String::new();
        if !ends_with_newline(&mut file)? {
            line.push('\n');
        }
        line.push_str(&record.to_line());
        line.push('\n');

        file.write_all(line.as_bytes())?;
        file.sync_all()?;
        debug!(date = %record.date, "Appended record");
        Ok(())
    }

    /// Rewrite the first record dated `date`.
    ///
    /// Returns `false`, leaving the file untouched, if no line matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or rewritten.
    pub fn update(&self, date: &str, weight: &str, calorie: &str) -> Result<bool> {
        let Some(content) = self.read()? else {
            return Ok(false);
        };

        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
        let Some(line) = lines.iter_mut().find(|line| line_has_date(line, date)) else {
            return Ok(false);
        };
        *line = Record::new(date, weight, calorie).to_line();

        self.write_lines(&lines)?;
        debug!(%date, "Updated record");
        Ok(true)
    }

    /// Remove every record dated `date`.
    ///
    /// Returns the number of lines removed; the file is untouched when zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or rewritten.
    pub fn delete(&self, date: &str) -> Result<usize> {
        let Some(content) = self.read()? else {
            return Ok(0);
        };

        let total = content.lines().count();
        let kept: Vec<&str> = content
            .lines()
            .filter(|line| !line_has_date(line, date))
            .collect();
        let removed = total - kept.len();
        if removed == 0 {
            return Ok(0);
        }

        self.write_lines(&kept)?;
        debug!(%date, removed, "Deleted records");
        Ok(removed)
    }

    /// Whole file content, or `None` if the file does not exist.
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<()> {
        let mut content = String::new();
        for line in lines {
            content.push_str(line.as_ref());
            content.push('\n');
        }
        atomic_write(&self.path, &content)?;
        Ok(())
    }
}

/// Whether an open file is empty or ends in `\n`.
fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(content: &str) -> (TempDir, RecordStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("weights.txt"));
        fs::write(store.path(), content).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("none.txt"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_drops_malformed_lines() {
        let (_tmp, store) = store_with("2024-01-01,80,2000\ngarbage\n\n2024-01-02,79,1900,x\r\n2024-01-03,78,1800\r\n");

        let records = store.load().unwrap();

        assert_eq!(
            records,
            vec![
                Record::new("2024-01-01", "80", "2000"),
                Record::new("2024-01-03", "78", "1800"),
            ]
        );
    }

    #[test]
    fn test_append_adds_record_at_end() {
        let (_tmp, store) = store_with("2024-01-01,80,2000\n2024-01-02,79,1900\n");
        let before = store.load().unwrap();
        let record = Record::new("2024-01-03", "78.5", "1750");

        store.append(&record).unwrap();

        let after = store.load().unwrap();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(after.last(), Some(&record));
    }

    #[test]
    fn test_append_creates_file_and_parent() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("data").join("weights.txt"));

        store.append(&Record::new("2024-01-01", "80", "2000")).unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "2024-01-01,80,2000\n");
    }

    #[test]
    fn test_append_after_missing_trailing_newline() {
        let (_tmp, store) = store_with("2024-01-01,80,2000");

        store.append(&Record::new("2024-01-02", "79", "1900")).unwrap();

        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn test_update_first_match_only() {
        let (_tmp, store) =
            store_with("2024-01-01,80,2000\n2024-01-02,79,1900\n2024-01-01,81,2100\n");

        assert!(store.update("2024-01-01", "77", "1500").unwrap());

        let records = store.load().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], Record::new("2024-01-01", "77", "1500"));
        assert_eq!(records[1], Record::new("2024-01-02", "79", "1900"));
        assert_eq!(records[2], Record::new("2024-01-01", "81", "2100"));
    }

    #[test]
    fn test_update_missing_date_leaves_bytes() {
        let original = "2024-01-01,80,2000\nnot a record\n2024-01-02,79,1900";
        let (_tmp, store) = store_with(original);

        assert!(!store.update("2024-01-05", "70", "1000").unwrap());

        assert_eq!(fs::read_to_string(store.path()).unwrap(), original);
    }

    #[test]
    fn test_update_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("none.txt"));
        assert!(!store.update("2024-01-01", "1", "1").unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_delete_removes_all_matches() {
        let (_tmp, store) =
            store_with("2024-01-01,80,2000\n2024-01-02,79,1900\n2024-01-01,81,2100\n");

        assert_eq!(store.delete("2024-01-01").unwrap(), 2);

        assert_eq!(
            store.load().unwrap(),
            vec![Record::new("2024-01-02", "79", "1900")]
        );
    }

    #[test]
    fn test_delete_does_not_match_date_prefix_of_longer_date() {
        let (_tmp, store) = store_with("2024-01-1,80,2000\n2024-01-10,79,1900\n");

        assert_eq!(store.delete("2024-01-1").unwrap(), 1);

        assert_eq!(
            store.load().unwrap(),
            vec![Record::new("2024-01-10", "79", "1900")]
        );
    }

    #[test]
    fn test_delete_missing_date_leaves_bytes() {
        let original = "2024-01-01,80,2000\n2024-01-02,79,1900\n";
        let (_tmp, store) = store_with(original);

        assert_eq!(store.delete("2023-12-31").unwrap(), 0);

        assert_eq!(fs::read_to_string(store.path()).unwrap(), original);
    }
}
