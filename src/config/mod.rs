//! Configuration module for backupr
//!
//! This module provides configuration management including:
//! - Configuration directory resolution
//! - User settings persistence (dump program, mail relay, colors)

pub mod paths;
pub mod settings;

pub use paths::BackuprPaths;
pub use settings::{ColorMode, RelaySettings, Settings};
