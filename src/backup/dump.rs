//! Logical database dump
//!
//! The dump program is spawned directly with an argument list (no shell),
//! with its standard output redirected into the dump file.

use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{BackupError, BackupResult};
use crate::models::BackupJob;

/// Options requested on every dump: table locks, privilege flush, drop
/// before create, column-named multi-row inserts, one consistent transaction
const DUMP_OPTIONS: &[&str] = &[
    "--add-locks",
    "--flush-privileges",
    "--add-drop-table",
    "--complete-insert",
    "--extended-insert",
    "--single-transaction",
];

/// Produces the dump file for a job
pub trait DumpRunner {
    /// Write the dump of `job.database` to `output`
    fn dump(&self, job: &BackupJob, output: &Path) -> BackupResult<()>;
}

/// Runs `mysqldump` (or a compatible program)
#[derive(Debug, Clone)]
pub struct MysqlDump {
    program: String,
}

impl MysqlDump {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for MysqlDump {
    fn default() -> Self {
        Self::new("mysqldump")
    }
}

impl DumpRunner for MysqlDump {
    fn dump(&self, job: &BackupJob, output: &Path) -> BackupResult<()> {
        let file = File::create(output).map_err(|e| {
            BackupError::DumpFailed(format!(
                "Failed to create dump file {}: {}",
                output.display(),
                e
            ))
        })?;

        // No timeout: a hung dump blocks the job
        let status = Command::new(&self.program)
            .args(dump_arguments(job))
            .stdin(Stdio::null())
            .stdout(Stdio::from(file))
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| {
                BackupError::DumpFailed(format!("Failed to start {}: {}", self.program, e))
            })?;

        if !status.success() {
            return Err(BackupError::dump_exit(&self.program, status));
        }

        Ok(())
    }
}

/// Build the dump program's argument list
///
/// The password flag is only present when a password is set.
pub fn dump_arguments(job: &BackupJob) -> Vec<String> {
    let credentials = &job.credentials;
    let mut args = vec![format!("-u{}", credentials.username)];

    if credentials.has_password() {
        args.push(format!("-p{}", credentials.password.as_str()));
    }
    args.push(format!("-h{}", credentials.host));

    args.extend(DUMP_OPTIONS.iter().map(|option| option.to_string()));
    args.push("--database".to_string());
    args.push(job.database.clone());

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zeroize::Zeroizing;

    #[test]
    fn test_arguments_without_password() {
        let mut job = BackupJob::new("orders", "root");
        job.credentials.host = "127.0.0.1".into();

        let args = dump_arguments(&job);

        assert_eq!(args[0], "-uroot");
        assert_eq!(args[1], "-h127.0.0.1");
        assert!(!args.iter().any(|arg| arg.starts_with("-p")));
        assert_eq!(&args[args.len() - 2..], ["--database", "orders"]);
        for option in DUMP_OPTIONS {
            assert!(args.iter().any(|arg| arg == option), "missing {}", option);
        }
    }

    #[test]
    fn test_arguments_with_password() {
        let mut job = BackupJob::new("orders", "backup");
        job.credentials.password = Zeroizing::new("s3cret".into());
        job.credentials.host = "db.internal".into();

        let args = dump_arguments(&job);

        assert_eq!(&args[..3], ["-ubackup", "-ps3cret", "-hdb.internal"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_is_redirected_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("dump.sql");
        let job = BackupJob::new("orders", "root");

        MysqlDump::new("echo").dump(&job, &output).unwrap();

        let contents = std::fs::read_to_string(&output).unwrap();
        assert_eq!(contents.trim_end(), dump_arguments(&job).join(" "));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("dump.sql");

        let err = MysqlDump::new("false")
            .dump(&BackupJob::new("orders", "root"), &output)
            .unwrap_err();

        assert!(err.is_fatal_dump());
    }

    #[test]
    fn test_unwritable_output_is_fatal() {
        let temp_dir = TempDir::new().unwrap();

        // The output path is a directory, so the dump file cannot be created
        let err = MysqlDump::new("echo")
            .dump(&BackupJob::new("orders", "root"), temp_dir.path())
            .unwrap_err();

        assert!(err.is_fatal_dump());
        assert!(err.to_string().contains("Failed to create dump file"));
    }

    #[test]
    fn test_missing_program_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("dump.sql");

        let err = MysqlDump::new("backupr-no-such-dump-program")
            .dump(&BackupJob::new("orders", "root"), &output)
            .unwrap_err();

        assert!(err.is_fatal_dump());
    }
}
