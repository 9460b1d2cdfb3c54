//! Gzip-compressed tar archive holding exactly one dump file

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{BackupError, BackupResult};

/// A regular file stored in an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub contents: Vec<u8>,
}

/// Write `dump_path` into a new archive at `archive_path`
///
/// The entry is stored under the dump's base file name, with no directory
/// entries. The archive is flushed and synced before returning. A partially
/// written archive is removed on failure.
pub fn create_archive(dump_path: &Path, archive_path: &Path) -> BackupResult<()> {
    let result = write_archive(dump_path, archive_path);
    if result.is_err() {
        let _ = fs::remove_file(archive_path);
    }
    result
}

fn write_archive(dump_path: &Path, archive_path: &Path) -> BackupResult<()> {
    let entry_name = dump_path.file_name().ok_or_else(|| {
        BackupError::Archive(format!("Dump path has no file name: {}", dump_path.display()))
    })?;

    let mut dump = File::open(dump_path)
        .map_err(|e| BackupError::Archive(format!("Failed to open dump file: {}", e)))?;

    let file = File::create(archive_path)
        .map_err(|e| BackupError::Archive(format!("Failed to create archive: {}", e)))?;

    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder
        .append_file(entry_name, &mut dump)
        .map_err(|e| BackupError::Archive(format!("Failed to add dump to archive: {}", e)))?;

    let file = builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .map_err(|e| BackupError::Archive(format!("Failed to finish archive: {}", e)))?;

    file.sync_all()
        .map_err(|e| BackupError::Archive(format!("Failed to flush archive: {}", e)))?;

    Ok(())
}

/// Read every entry of an archive, in order
pub fn archive_entries(archive_path: &Path) -> BackupResult<Vec<ArchiveEntry>> {
    let file = File::open(archive_path)
        .map_err(|e| BackupError::Archive(format!("Failed to open archive: {}", e)))?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    let read_error = |e: std::io::Error| BackupError::Archive(format!("Failed to read archive: {}", e));

    let mut entries = Vec::new();
    for entry in archive.entries().map_err(read_error)? {
        let mut entry = entry.map_err(read_error)?;
        let name = entry.path().map_err(read_error)?.to_string_lossy().to_string();

        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).map_err(read_error)?;

        entries.push(ArchiveEntry { name, contents });
    }

    Ok(entries)
}
