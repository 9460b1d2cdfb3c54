//! Run history record
//!
//! One record per backup run, successful or not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backup::{BackupReport, NotificationOutcome};
use crate::error::BackupError;
use crate::models::RunTimestamp;

/// Overall result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Archive produced, no cleanup or notification problem
    Succeeded,
    /// Archive produced, but cleanup or notification failed
    Degraded,
    /// No archive produced
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Succeeded => write!(f, "OK"),
            RunStatus::Degraded => write!(f, "DEGRADED"),
            RunStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// A single run history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub database: String,
    pub status: RunStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_path: Option<String>,

    /// Notification result in words, absent when none was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunRecord {
    /// Record a run that produced an archive
    pub fn from_report(report: &BackupReport) -> Self {
        let status = if report.is_clean() {
            RunStatus::Succeeded
        } else {
            RunStatus::Degraded
        };

        let notification = match &report.notification {
            NotificationOutcome::NotRequested => None,
            NotificationOutcome::Skipped(missing) => Some(format!(
                "skipped (missing {})",
                missing
                    .iter()
                    .map(|field| field.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            NotificationOutcome::Sent { recipient, .. } => Some(format!("sent to {}", recipient)),
            NotificationOutcome::Failed(err) => Some(format!("failed: {}", err)),
        };

        Self {
            id: Uuid::new_v4(),
            started_at: report.started.datetime().with_timezone(&Utc),
            finished_at: Utc::now(),
            database: report.database.clone(),
            status,
            archive_path: Some(report.artifacts.archive_path.display().to_string()),
            notification,
            warnings: report.warnings.iter().map(|w| w.to_string()).collect(),
            error: None,
        }
    }

    /// Record a run that ended with a fatal error
    pub fn failed(database: &str, started: &RunTimestamp, error: &BackupError) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: started.datetime().with_timezone(&Utc),
            finished_at: Utc::now(),
            database: database.to_string(),
            status: RunStatus::Failed,
            archive_path: None,
            notification: None,
            warnings: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_record() {
        let err = BackupError::DumpFailed("mysqldump exited with status 2".into());
        let record = RunRecord::failed("orders", &RunTimestamp::now(), &err);

        assert_eq!(record.status, RunStatus::Failed);
        assert!(record.archive_path.is_none());
        assert_eq!(
            record.error.as_deref(),
            Some("Database dump failed: mysqldump exited with status 2")
        );
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let err = BackupError::Validation("Database name is required".into());
        let record = RunRecord::failed("", &RunTimestamp::now(), &err);

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("archive_path"));
        assert!(!json.contains("warnings"));
        assert!(json.contains("\"status\":\"failed\""));

        let parsed: RunRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
