//! Core data models for backupr
//!
//! - `job`: the parameters of one backup run, including credentials
//! - `artifacts`: run timestamps and the dump/archive paths derived from them

pub mod artifacts;
pub mod job;

pub use artifacts::{BackupArtifacts, RunTimestamp};
pub use job::{BackupJob, DatabaseCredentials, MailCredentials, MissingField, DEFAULT_DB_HOST};
