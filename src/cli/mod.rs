//! CLI command handlers
//!
//! This module bridges clap argument parsing with the backup library.

pub mod prompt;
pub mod run;

pub use prompt::{confirm, confirm_with};
pub use run::{handle_run_command, RunArgs, RunOutcome};
