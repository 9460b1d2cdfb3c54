//! Database backup for backupr
//!
//! A run dumps one database, compresses the dump into a `.tar.gz` archive,
//! optionally deletes the dump and optionally mails a notification.
//!
//! # Architecture
//!
//! - `DumpRunner` / `MysqlDump`: produce the logical dump file
//! - `create_archive`: pack the dump as the archive's only entry
//! - `BackupOrchestrator`: sequence the stages and classify failures
//!
//! # Files
//!
//! - `<dir>/db-<name>-backup-<YYYY-MM-DD-HH-MM>.sql` (removed by default)
//! - `<dir>/db-<name>-backup-<YYYY-MM-DD-HH-MM>.sql.tar.gz`
//!
//! # Example
//!
//! ```rust,ignore
//! use backupr::backup::{BackupOrchestrator, MysqlDump};
//! use backupr::config::{RelaySettings, ColorMode};
//! use backupr::display::ConsoleReporter;
//! use backupr::mail::SmtpRelay;
//! use backupr::models::BackupJob;
//!
//! let mut job = BackupJob::new("orders", "root");
//! job.directory = "/var/backups/mysql".into();
//!
//! let mut orchestrator = BackupOrchestrator::new(
//!     MysqlDump::default(),
//!     SmtpRelay::new(RelaySettings::default()),
//!     ConsoleReporter::stdout(ColorMode::Auto),
//! );
//! let report = orchestrator.run(&job)?;
//! println!("{}", report.artifacts.archive_path.display());
//! ```

mod archive;
mod dump;
mod orchestrator;

pub use archive::{archive_entries, create_archive, ArchiveEntry};
pub use dump::{dump_arguments, DumpRunner, MysqlDump};
pub use orchestrator::{BackupOrchestrator, BackupReport, JobWarning, NotificationOutcome};
