//! `backupr run` command
//!
//! Turns command-line arguments and settings into a `BackupJob`, runs it with
//! the real dump program and mail relay, and records the run in the history.

use std::io;
use std::path::PathBuf;

use clap::Args;
use crossterm::tty::IsTty;
use zeroize::Zeroizing;

use super::prompt::confirm;
use crate::backup::{BackupOrchestrator, MysqlDump, NotificationOutcome};
use crate::config::{BackuprPaths, Settings};
use crate::display::ConsoleReporter;
use crate::error::{BackupError, BackupResult};
use crate::history::{RunLog, RunRecord};
use crate::mail::SmtpRelay;
use crate::models::{BackupJob, RunTimestamp};

/// Arguments of `backupr run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Database to back up
    #[arg(short, long)]
    pub database: String,

    /// Database user
    #[arg(short, long)]
    pub user: String,

    /// Database password (empty for none)
    #[arg(short, long, env = "BACKUPR_DB_PASSWORD", hide_env_values = true, default_value = "")]
    pub password: String,

    /// Database host [default: settings, 127.0.0.1]
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Destination directory [default: settings, current directory]
    #[arg(short = 'o', long = "dir")]
    pub directory: Option<PathBuf>,

    /// Email a notification when the backup succeeds
    #[arg(short, long)]
    pub notify: bool,

    /// Notification recipient
    #[arg(long)]
    pub to: Option<String>,

    /// Sender address on the mail relay
    #[arg(long, env = "BACKUPR_MAIL_FROM")]
    pub from: Option<String>,

    /// Sender secret on the mail relay
    #[arg(long, env = "BACKUPR_MAIL_SECRET", hide_env_values = true)]
    pub mail_secret: Option<String>,

    /// Read the sender secret from the terminal without echo
    #[arg(long, conflicts_with = "mail_secret")]
    pub ask_mail_secret: bool,

    /// Keep the uncompressed dump next to the archive
    #[arg(long)]
    pub keep_dump: bool,

    /// Do not attach the archive to the notification
    #[arg(long)]
    pub no_attach: bool,

    /// Create the destination directory without asking
    #[arg(short, long)]
    pub yes: bool,
}

/// How a `run` ended, when it did not hit a setup error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Archive produced, notification sent or not requested
    Completed,
    /// Archive produced, notification failed
    NotificationFailed,
    /// Fatal job error, already reported on the console
    Failed,
    /// Operator declined to create the destination directory
    Declined,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Completed | Self::Declined => 0,
            Self::Failed => 1,
            Self::NotificationFailed => 2,
        }
    }
}

/// Build the job described by `args`, filling gaps from `settings`
pub fn build_job(args: RunArgs, settings: &Settings) -> BackupResult<BackupJob> {
    let mut job = BackupJob::new(args.database, args.user);
    job.credentials.password = Zeroizing::new(args.password);
    job.credentials.host = args
        .host
        .unwrap_or_else(|| settings.default_db_host.clone());
    job.directory = args
        .directory
        .unwrap_or_else(|| PathBuf::from(&settings.default_directory));

    job.send_notification = args.notify;
    job.recipient = args.to;
    job.sender = args.from;
    job.sender_secret = if args.ask_mail_secret {
        let secret = rpassword::prompt_password("Sender secret: ")
            .map_err(|e| BackupError::Prompt(format!("Failed to read sender secret: {}", e)))?;
        Some(Zeroizing::new(secret))
    } else {
        args.mail_secret.map(Zeroizing::new)
    };

    job.remove_dump = !args.keep_dump;
    job.attach_archive = !args.no_attach;

    Ok(job)
}

/// Handle `backupr run`
pub fn handle_run_command(
    paths: &BackuprPaths,
    settings: &Settings,
    args: RunArgs,
) -> BackupResult<RunOutcome> {
    let assume_yes = args.yes;
    let job = build_job(args, settings)?;

    let missing_directory = !job.directory.as_os_str().is_empty() && !job.directory.exists();
    if missing_directory && !assume_yes && io::stdin().is_tty() {
        let question = format!(
            "Backup directory {} does not exist. Create it?",
            job.directory.display()
        );
        if !confirm(&question, true)? {
            println!("Backup cancelled.");
            return Ok(RunOutcome::Declined);
        }
    }

    let mut orchestrator = BackupOrchestrator::new(
        MysqlDump::new(settings.dump_program.clone()),
        SmtpRelay::new(settings.relay.clone()),
        ConsoleReporter::stdout(settings.color),
    );

    let started = RunTimestamp::now();
    let (record, outcome) = match orchestrator.run_at(&job, started) {
        Ok(report) => {
            let outcome = match report.notification {
                NotificationOutcome::Failed(_) => RunOutcome::NotificationFailed,
                _ => RunOutcome::Completed,
            };
            (RunRecord::from_report(&report), outcome)
        }
        Err(err) => (
            RunRecord::failed(&job.database, &started, &err),
            RunOutcome::Failed,
        ),
    };

    if let Err(e) = RunLog::new(paths.run_log()).append(&record) {
        orchestrator
            .reporter_mut()
            .warning(&format!("Could not record run history: {}", e));
    }

    Ok(outcome)
}
