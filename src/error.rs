//! Custom error types for backupr
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Only fatal outcomes are errors; recoverable
//! conditions are reported through [`crate::backup::JobWarning`].

use std::process::ExitStatus;

use thiserror::Error;

/// The main error type for backupr operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid job parameters
    #[error("Validation error: {0}")]
    Validation(String),

    /// Destination directory could not be created and is not usable
    #[error("Destination directory {path} is not usable: {reason}")]
    Directory { path: String, reason: String },

    /// The dump program could not be started or exited non-zero
    #[error("Database dump failed: {0}")]
    DumpFailed(String),

    /// Archive creation failed
    #[error("Archive error: {0}")]
    Archive(String),

    /// Notification message could not be composed
    #[error("Mail error: {0}")]
    Mail(String),

    /// Relay connection, authentication or transmission failed
    #[error("Mail transport error: {0}")]
    Transport(String),

    /// Console input was closed or unreadable
    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl BackupError {
    /// Create a dump failure from the dump program's exit status
    pub fn dump_exit(program: &str, status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => Self::DumpFailed(format!("{} exited with status {}", program, code)),
            None => Self::DumpFailed(format!("{} was terminated by a signal", program)),
        }
    }

    /// Check if this is a fatal dump failure
    pub fn is_fatal_dump(&self) -> bool {
        matches!(self, Self::DumpFailed(_))
    }

    /// Check if this is a mail transport failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for backupr operations
pub type BackupResult<T> = Result<T, BackupError>;
