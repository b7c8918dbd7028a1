use crate::models::GradeRow;
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

const HEADERS: [&str; 11] = [
    "course_id",
    "course_name",
    "course_work_id",
    "title",
    "state",
    "assigned_grade",
    "draft_grade",
    "max_points",
    "percentage",
    "due_date",
    "late",
];

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Export the cross-course grade listing to a timestamped CSV file in `dir`.
/// Absent values are written as empty cells.
pub fn export_grades_to_csv(rows: &[GradeRow], dir: &Path) -> Result<PathBuf> {
    if rows.is_empty() {
        anyhow::bail!("No grades to export");
    }

    // Generate filename with timestamp
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filepath = dir.join(format!("grades_{}.csv", timestamp));

    let mut wtr = csv::Writer::from_path(&filepath).context("Failed to create CSV file")?;

    wtr.write_record(HEADERS)
        .context("Failed to write CSV headers")?;

    for row in rows {
        let record = [
            row.course_id.clone(),
            row.course_name.clone(),
            row.course_work_id.clone(),
            row.title.clone(),
            cell(row.state.map(|s| s.as_str())),
            cell(row.assigned_grade),
            cell(row.draft_grade),
            cell(row.max_points),
            cell(row.percentage),
            cell(row.due_date.as_deref()),
            cell(row.late),
        ];

        wtr.write_record(&record)
            .context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;

    Ok(filepath)
}
