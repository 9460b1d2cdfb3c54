//! Display formatting for terminal output
//!
//! Provides the console reporter used for every status line and the
//! formatting of the run history.

pub mod console;
pub mod report;

pub use console::{ConsoleReporter, Severity};
pub use report::format_history;
