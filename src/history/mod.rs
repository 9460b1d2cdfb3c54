//! Run history for backupr
//!
//! Every run appends one JSON line to `runs.log` in the configuration
//! directory. The log is never rewritten; `backupr history` reads it back.

mod logger;
mod record;

pub use logger::RunLog;
pub use record::{RunRecord, RunStatus};
