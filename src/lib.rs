//! backupr - unattended MySQL backups
//!
//! This library dumps a database with `mysqldump`, packs the dump into a
//! `.tar.gz` archive, optionally deletes the uncompressed dump and optionally
//! emails a notification with the archive attached.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Job parameters, credentials and derived artifact paths
//! - `backup`: Dump, archive and the orchestrator sequencing them
//! - `mail`: Notification composition and SMTP delivery
//! - `display`: Console reporter and history formatting
//! - `history`: Append-only run log
//! - `cli`: Command handlers and the confirmation prompt
//!
//! # Example
//!
//! ```rust,ignore
//! use backupr::config::{paths::BackuprPaths, settings::Settings};
//!
//! let paths = BackuprPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod history;
pub mod mail;
pub mod models;

pub use error::{BackupError, BackupResult};
