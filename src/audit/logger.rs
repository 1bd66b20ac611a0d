//! The shop's `audit.log`
//!
//! One JSON object per line. Lines are only ever appended, so reading the
//! file front to back gives the shop's mutations in the order they happened.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{ShopError, ShopResult};

use super::entry::AuditEntry;

/// Appends to and reads back `audit.log`
pub struct AuditLogger {
    path: PathBuf,
}

fn parse_line(number: usize, line: &str) -> ShopResult<AuditEntry> {
    serde_json::from_str(line).map_err(|e| {
        ShopError::Json(format!("Audit log line {} is not an entry: {}", number, e))
    })
}

impl AuditLogger {
    /// The file is created on the first append
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one entry as a single line and flush it
    pub fn append(&self, entry: &AuditEntry) -> ShopResult<()> {
        let line = serde_json::to_string(entry)
            .map_err(|e| ShopError::Json(format!("Cannot encode audit entry: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                ShopError::Io(format!("Cannot open {}: {}", self.path.display(), e))
            })?;
        writeln!(file, "{}", line)
            .and_then(|()| file.flush())
            .map_err(|e| ShopError::Io(format!("Cannot append to audit log: {}", e)))
    }

    /// Every entry, oldest first; a missing file is an empty log
    pub fn entries(&self) -> ShopResult<Vec<AuditEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)
            .map_err(|e| ShopError::Io(format!("Cannot open {}: {}", self.path.display(), e)))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                ShopError::Io(format!("Cannot read audit log line {}: {}", index + 1, e))
            })?;
            if !line.trim().is_empty() {
                entries.push(parse_line(index + 1, &line)?);
            }
        }
        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn latest(&self, count: usize) -> ShopResult<Vec<AuditEntry>> {
        let mut entries = self.entries()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    /// The last `count` entries about one record, by id or name
    ///
    /// For an order this is its opening, its status changes and its payments.
    pub fn latest_for(&self, key: &str, count: usize) -> ShopResult<Vec<AuditEntry>> {
        let mut entries: Vec<AuditEntry> = self
            .entries()?
            .into_iter()
            .filter(|entry| entry.concerns(key))
            .collect();
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    pub fn count(&self) -> ShopResult<usize> {
        Ok(self.entries()?.len())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
