//! Append-only run log
//!
//! Each run is written as a single JSON line and flushed immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{BackupError, BackupResult};

use super::record::RunRecord;

/// Writes and reads the run log file
pub struct RunLog {
    log_path: PathBuf,
}

impl RunLog {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append a record
    pub fn append(&self, record: &RunRecord) -> BackupResult<()> {
        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| BackupError::Io(format!("Failed to create run log directory: {}", e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| BackupError::Io(format!("Failed to open run log: {}", e)))?;

        let json = serde_json::to_string(record)
            .map_err(|e| BackupError::Json(format!("Failed to serialize run record: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| BackupError::Io(format!("Failed to write run record: {}", e)))?;

        file.flush()
            .map_err(|e| BackupError::Io(format!("Failed to flush run log: {}", e)))?;

        Ok(())
    }

    /// Read all records, oldest first
    pub fn read_all(&self) -> BackupResult<Vec<RunRecord>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| BackupError::Io(format!("Failed to open run log: {}", e)))?;

        let mut records = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                BackupError::Io(format!("Failed to read run log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let record: RunRecord = serde_json::from_str(&line).map_err(|e| {
                BackupError::Json(format!(
                    "Failed to parse run record at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            records.push(record);
        }

        Ok(records)
    }

    /// Read the most recent `count` records, oldest first
    pub fn read_recent(&self, count: usize) -> BackupResult<Vec<RunRecord>> {
        let mut records = self.read_all()?;
        let start = records.len().saturating_sub(count);
        Ok(records.split_off(start))
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}
