//! Backup orchestration: dump, archive, cleanup, notify
//!
//! Stages run strictly in order. Anything that fails before the archive
//! exists aborts the job; anything after it is reported and recorded in the
//! returned [`BackupReport`] without touching the archive.

use std::fmt;
use std::fs;
use std::io::{ErrorKind, Stdout, Write};
use std::path::{Component, Path, PathBuf};

use super::archive::create_archive;
use super::dump::DumpRunner;
use crate::display::ConsoleReporter;
use crate::error::{BackupError, BackupResult};
use crate::mail::{Delivery, MailNotifier, MailTransport, NotificationMessage};
use crate::models::{BackupArtifacts, BackupJob, MissingField, RunTimestamp};

/// A recoverable condition met during a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobWarning {
    /// The destination directory was already present
    DirectoryExists(PathBuf),
    /// Creating the destination failed, but it turned out to be usable
    DirectoryCreateFailed { path: PathBuf, reason: String },
    /// The intermediate dump could not be deleted
    CleanupFailed { path: PathBuf, reason: String },
}

impl fmt::Display for JobWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryExists(path) => {
                write!(f, "Backup directory already exists: {}", path.display())
            }
            Self::DirectoryCreateFailed { path, reason } => write!(
                f,
                "Could not create backup directory {}: {}",
                path.display(),
                reason
            ),
            Self::CleanupFailed { path, reason } => {
                write!(f, "Error removing SQL file {}: {}", path.display(), reason)
            }
        }
    }
}

/// Outcome of the notification step
#[derive(Debug)]
pub enum NotificationOutcome {
    NotRequested,
    /// Requested, but required fields were missing; nothing was sent
    Skipped(Vec<MissingField>),
    Sent { recipient: String, attached: bool },
    /// Composition or transport failed; the archive is unaffected
    Failed(BackupError),
}

impl NotificationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Result of a run that produced an archive
#[derive(Debug)]
pub struct BackupReport {
    pub database: String,
    pub started: RunTimestamp,
    pub artifacts: BackupArtifacts,
    /// Whether the intermediate dump was deleted
    pub dump_removed: bool,
    pub warnings: Vec<JobWarning>,
    pub notification: NotificationOutcome,
}

impl BackupReport {
    /// No cleanup problem and no failed notification
    pub fn is_clean(&self) -> bool {
        !self
            .warnings
            .iter()
            .any(|w| matches!(w, JobWarning::CleanupFailed { .. }))
            && !self.notification.is_failed()
    }
}

/// Runs backup jobs against a dump program and a mail transport
pub struct BackupOrchestrator<D: DumpRunner, T: MailTransport, W: Write = Stdout> {
    dump: D,
    notifier: MailNotifier<T>,
    reporter: ConsoleReporter<W>,
}

impl<D: DumpRunner, T: MailTransport, W: Write> BackupOrchestrator<D, T, W> {
    pub fn new(dump: D, transport: T, reporter: ConsoleReporter<W>) -> Self {
        Self {
            dump,
            notifier: MailNotifier::new(transport),
            reporter,
        }
    }

    pub fn notifier(&self) -> &MailNotifier<T> {
        &self.notifier
    }

    pub fn reporter_mut(&mut self) -> &mut ConsoleReporter<W> {
        &mut self.reporter
    }

    pub fn into_reporter(self) -> ConsoleReporter<W> {
        self.reporter
    }

    /// Run `job` now
    pub fn run(&mut self, job: &BackupJob) -> BackupResult<BackupReport> {
        self.run_at(job, RunTimestamp::now())
    }

    /// Run `job` as if it started at `started`
    ///
    /// Fatal errors are reported on the console before being returned.
    pub fn run_at(&mut self, job: &BackupJob, started: RunTimestamp) -> BackupResult<BackupReport> {
        let result = self.execute(job, started);
        if let Err(err) = &result {
            self.reporter.blank();
            self.reporter.error(&format!("Backup failed: {}", err));
        }
        result
    }

    fn execute(&mut self, job: &BackupJob, started: RunTimestamp) -> BackupResult<BackupReport> {
        job.validate()?;

        let mut warnings = Vec::new();
        let directory = absolute_directory(&job.directory)?;
        self.prepare_directory(&directory, &mut warnings)?;

        let artifacts = BackupArtifacts::derive(&directory, &job.database, &started);

        self.dump_database(job, &artifacts)?;

        create_archive(&artifacts.dump_path, &artifacts.archive_path)?;
        self.reporter.blank();
        self.reporter.success(&format!(
            "Created archive at: {}",
            artifacts.archive_path.display()
        ));

        let dump_removed = job.remove_dump && self.remove_dump(&artifacts.dump_path, &mut warnings);

        let notification = self.notify(job, &artifacts, &started);

        self.reporter.blank();
        self.reporter.success("Your backup is complete!");

        Ok(BackupReport {
            database: job.database.clone(),
            started,
            artifacts,
            dump_removed,
            warnings,
            notification,
        })
    }

    fn prepare_directory(
        &mut self,
        directory: &Path,
        warnings: &mut Vec<JobWarning>,
    ) -> BackupResult<()> {
        if directory.is_dir() {
            self.directory_exists(directory, warnings);
            return Ok(());
        }

        match fs::create_dir_all(directory) {
            Ok(()) => {
                self.reporter.blank();
                self.reporter
                    .info(&format!("Created backup directory: {}", directory.display()));
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists && directory.is_dir() => {
                self.directory_exists(directory, warnings);
                Ok(())
            }
            Err(e) if directory.is_dir() => {
                let warning = JobWarning::DirectoryCreateFailed {
                    path: directory.to_path_buf(),
                    reason: e.to_string(),
                };
                self.reporter.blank();
                self.reporter.warning(&warning.to_string());
                warnings.push(warning);
                Ok(())
            }
            Err(e) => Err(BackupError::Directory {
                path: directory.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn directory_exists(&mut self, directory: &Path, warnings: &mut Vec<JobWarning>) {
        self.reporter.blank();
        self.reporter
            .info("Backup directory already exists, skipping...");
        warnings.push(JobWarning::DirectoryExists(directory.to_path_buf()));
    }

    fn dump_database(&mut self, job: &BackupJob, artifacts: &BackupArtifacts) -> BackupResult<()> {
        if let Err(err) = self.dump.dump(job, &artifacts.dump_path) {
            // A failed dump leaves at most a partial file behind
            let _ = fs::remove_file(&artifacts.dump_path);
            return Err(err);
        }

        self.reporter.blank();
        self.reporter.success(&format!(
            "Dumped database '{}' to: {}",
            job.database,
            artifacts.dump_path.display()
        ));
        Ok(())
    }

    fn remove_dump(&mut self, dump_path: &Path, warnings: &mut Vec<JobWarning>) -> bool {
        self.reporter.blank();
        match fs::remove_file(dump_path) {
            Ok(()) => {
                self.reporter
                    .success(&format!("Deleted SQL file: {}", dump_path.display()));
                true
            }
            Err(e) => {
                let warning = JobWarning::CleanupFailed {
                    path: dump_path.to_path_buf(),
                    reason: e.to_string(),
                };
                self.reporter.error(&warning.to_string());
                warnings.push(warning);
                false
            }
        }
    }

    fn notify(
        &mut self,
        job: &BackupJob,
        artifacts: &BackupArtifacts,
        started: &RunTimestamp,
    ) -> NotificationOutcome {
        if !job.send_notification {
            return NotificationOutcome::NotRequested;
        }

        let (recipient, credentials) = match job.notification_target() {
            Ok(target) => target,
            Err(missing) => return NotificationOutcome::Skipped(missing),
        };

        let mut message = NotificationMessage::for_backup(
            &job.database,
            started,
            &artifacts.archive_path,
            job.attach_archive,
        );
        if job.attach_archive {
            message = message.with_attachment(&artifacts.archive_path);
        }

        match self
            .notifier
            .send(&mut self.reporter, &credentials, &recipient, &message)
        {
            Ok(Delivery::Sent) => NotificationOutcome::Sent {
                recipient,
                attached: job.attach_archive,
            },
            Ok(Delivery::MissingCredentials) => NotificationOutcome::Skipped(vec![
                MissingField::SenderAddress,
                MissingField::SenderSecret,
            ]),
            Err(err) => {
                self.reporter.blank();
                self.reporter
                    .error(&format!("Could not send notification: {}", err));
                NotificationOutcome::Failed(err)
            }
        }
    }
}

/// Resolve `directory` against the current directory; empty means current
fn absolute_directory(directory: &Path) -> BackupResult<PathBuf> {
    if directory.is_absolute() {
        return Ok(normalize(directory));
    }

    let current = std::env::current_dir().map_err(|e| {
        BackupError::Io(format!("Failed to determine the current directory: {}", e))
    })?;
    Ok(normalize(&current.join(directory)))
}

/// Collapse `.` and `..` lexically, without following symlinks
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
