//! Run timestamps and the files a run produces
//!
//! File names are derived from the database name and the run's start time:
//! `db-<name>-backup-<YYYY-MM-DD-HH-MM>.sql` for the intermediate dump and the
//! same name with `.tar.gz` appended for the archive.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Human-readable form used in notification bodies,
/// e.g. "Monday, December 31 2012 at 08:53 PM"
const HUMAN_FORMAT: &str = "%A, %B %d %Y at %I:%M %p";

/// Filesystem-safe form used in file names
const FILE_FORMAT: &str = "%Y-%m-%d-%H-%M";

/// The instant a run started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTimestamp {
    at: DateTime<Local>,
}

impl RunTimestamp {
    pub fn now() -> Self {
        Self { at: Local::now() }
    }

    pub fn at(at: DateTime<Local>) -> Self {
        Self { at }
    }

    pub fn datetime(&self) -> DateTime<Local> {
        self.at
    }

    pub fn human(&self) -> String {
        self.at.format(HUMAN_FORMAT).to_string()
    }

    pub fn file_safe(&self) -> String {
        self.at.format(FILE_FORMAT).to_string()
    }
}

/// Paths of the dump and archive for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupArtifacts {
    /// Intermediate, uncompressed dump
    pub dump_path: PathBuf,
    /// Durable output
    pub archive_path: PathBuf,
}

impl BackupArtifacts {
    /// Derive both paths inside `directory`
    pub fn derive(directory: &Path, database: &str, stamp: &RunTimestamp) -> Self {
        let dump_name = format!("db-{}-backup-{}.sql", database, stamp.file_safe());
        let archive_name = format!("{}.tar.gz", dump_name);

        Self {
            dump_path: directory.join(dump_name),
            archive_path: directory.join(archive_name),
        }
    }
}
