//! Backup job parameters
//!
//! A `BackupJob` is built once per invocation and never changes while the
//! job runs. Secrets are held in `Zeroizing` buffers and redacted from
//! `Debug` output.

use std::fmt;
use std::path::PathBuf;

use zeroize::Zeroizing;

use crate::error::{BackupError, BackupResult};

/// Default database host
pub const DEFAULT_DB_HOST: &str = "127.0.0.1";

/// Credentials used by the dump program
#[derive(Clone)]
pub struct DatabaseCredentials {
    pub username: String,
    /// Empty means "no password"
    pub password: Zeroizing<String>,
    pub host: String,
}

impl DatabaseCredentials {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(String::new()),
            host: DEFAULT_DB_HOST.to_string(),
        }
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }
}

impl fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("username", &self.username)
            .field("password", &if self.has_password() { "[REDACTED]" } else { "" })
            .field("host", &self.host)
            .finish()
    }
}

/// Sender account on the mail relay
#[derive(Clone)]
pub struct MailCredentials {
    pub address: String,
    pub secret: Zeroizing<String>,
}

impl MailCredentials {
    pub fn new(address: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            secret: Zeroizing::new(secret.into()),
        }
    }
}

impl fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailCredentials")
            .field("address", &self.address)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// A notification field that must be present before anything is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Recipient,
    SenderAddress,
    SenderSecret,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recipient => write!(f, "recipient address"),
            Self::SenderAddress => write!(f, "sender address"),
            Self::SenderSecret => write!(f, "sender secret"),
        }
    }
}

/// Parameters for one backup run
#[derive(Clone)]
pub struct BackupJob {
    /// Name of the database to dump
    pub database: String,
    pub credentials: DatabaseCredentials,
    /// Destination directory; relative paths resolve against the current dir
    pub directory: PathBuf,
    pub send_notification: bool,
    pub recipient: Option<String>,
    pub sender: Option<String>,
    pub sender_secret: Option<Zeroizing<String>>,
    /// Delete the uncompressed dump once the archive exists
    pub remove_dump: bool,
    /// Attach the archive to the notification
    pub attach_archive: bool,
}

impl BackupJob {
    /// Create a job with the documented defaults: local host, no password,
    /// current directory, no notification, dump removed, archive attached.
    pub fn new(database: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            credentials: DatabaseCredentials::new(username),
            directory: PathBuf::new(),
            send_notification: false,
            recipient: None,
            sender: None,
            sender_secret: None,
            remove_dump: true,
            attach_archive: true,
        }
    }

    /// Check that the job can produce well-formed file names and a dump command
    pub fn validate(&self) -> BackupResult<()> {
        if self.database.trim().is_empty() {
            return Err(BackupError::Validation("Database name is required".into()));
        }
        if self.database.contains(['/', '\\']) || self.database.starts_with('-') {
            return Err(BackupError::Validation(format!(
                "Invalid database name: {}",
                self.database
            )));
        }
        if self.credentials.username.trim().is_empty() {
            return Err(BackupError::Validation("Database user is required".into()));
        }
        Ok(())
    }

    /// Resolve the notification recipient and sender account
    ///
    /// Blank values count as missing. Every missing field is returned so the
    /// caller can report them all at once.
    pub fn notification_target(&self) -> Result<(String, MailCredentials), Vec<MissingField>> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.trim().is_empty())
        }

        let recipient = present(self.recipient.as_deref());
        let sender = present(self.sender.as_deref());
        let secret = present(self.sender_secret.as_deref().map(String::as_str));

        match (recipient, sender, secret) {
            (Some(recipient), Some(sender), Some(secret)) => Ok((
                recipient.to_string(),
                MailCredentials::new(sender, secret),
            )),
            (recipient, sender, secret) => {
                let mut missing = Vec::new();
                if recipient.is_none() {
                    missing.push(MissingField::Recipient);
                }
                if sender.is_none() {
                    missing.push(MissingField::SenderAddress);
                }
                if secret.is_none() {
                    missing.push(MissingField::SenderSecret);
                }
                Err(missing)
            }
        }
    }
}

impl fmt::Debug for BackupJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackupJob")
            .field("database", &self.database)
            .field("credentials", &self.credentials)
            .field("directory", &self.directory)
            .field("send_notification", &self.send_notification)
            .field("recipient", &self.recipient)
            .field("sender", &self.sender)
            .field("sender_secret", &self.sender_secret.as_ref().map(|_| "[REDACTED]"))
            .field("remove_dump", &self.remove_dump)
            .field("attach_archive", &self.attach_archive)
            .finish()
    }
}
