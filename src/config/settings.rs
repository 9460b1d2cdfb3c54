//! User settings for backupr
//!
//! Holds the defaults that are not worth repeating on every invocation: the
//! dump program, the mail relay, and console preferences.

use serde::{Deserialize, Serialize};

use super::paths::BackuprPaths;
use crate::error::BackupError;

/// When to color console output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when writing to a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

/// Mail relay settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaySettings {
    /// Submission host
    #[serde(default = "default_relay_host")]
    pub host: String,

    /// STARTTLS submission port
    #[serde(default = "default_relay_port")]
    pub port: u16,

    /// Name announced in EHLO
    #[serde(default = "default_hello_name")]
    pub hello_name: String,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            host: default_relay_host(),
            port: default_relay_port(),
            hello_name: default_hello_name(),
        }
    }
}

/// User settings for backupr
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Program invoked to produce the logical dump
    #[serde(default = "default_dump_program")]
    pub dump_program: String,

    /// Database host used when none is given on the command line
    #[serde(default = "default_db_host")]
    pub default_db_host: String,

    /// Destination directory used when none is given (empty = current dir)
    #[serde(default)]
    pub default_directory: String,

    #[serde(default)]
    pub relay: RelaySettings,

    #[serde(default)]
    pub color: ColorMode,
}

fn default_schema_version() -> u32 {
    1
}

fn default_dump_program() -> String {
    "mysqldump".to_string()
}

fn default_db_host() -> String {
    "127.0.0.1".to_string()
}

fn default_relay_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_relay_port() -> u16 {
    587
}

fn default_hello_name() -> String {
    "localhost".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            dump_program: default_dump_program(),
            default_db_host: default_db_host(),
            default_directory: String::new(),
            relay: RelaySettings::default(),
            color: ColorMode::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use default settings if the file doesn't exist
    pub fn load_or_create(paths: &BackuprPaths) -> Result<Self, BackupError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BackupError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BackupError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BackuprPaths) -> Result<(), BackupError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BackupError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            BackupError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
