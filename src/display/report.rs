//! Run history display formatting

use chrono::Local;

use crate::history::RunRecord;

/// Format run records as a table, oldest first
pub fn format_history(records: &[RunRecord]) -> String {
    if records.is_empty() {
        return "No backup runs recorded.".to_string();
    }

    let db_width = records
        .iter()
        .map(|r| r.database.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<16}  {:<db_width$}  {:<8}  {}\n",
        "Started",
        "Database",
        "Status",
        "Details",
        db_width = db_width,
    ));
    output.push_str(&format!(
        "{:-<16}  {:-<db_width$}  {:-<8}  {:-<7}\n",
        "",
        "",
        "",
        "",
        db_width = db_width,
    ));

    for record in records {
        let details = match (&record.error, &record.archive_path) {
            (Some(error), _) => error.clone(),
            (None, Some(archive)) => archive.clone(),
            (None, None) => String::new(),
        };

        output.push_str(&format!(
            "{:<16}  {:<db_width$}  {:<8}  {}\n",
            record
                .started_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            record.database,
            record.status.to_string(),
            details,
            db_width = db_width,
        ));

        for warning in &record.warnings {
            output.push_str(&format!("{:>18}! {}\n", "", warning));
        }
        if let Some(notification) = &record.notification {
            output.push_str(&format!("{:>18}mail: {}\n", "", notification));
        }
    }

    output
}
