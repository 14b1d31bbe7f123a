//! JSON export of a status summary.

use super::types::StatusSummary;
use crate::error::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Build the JSON document for a summary.
///
/// # Arguments
/// * `summary` - Aggregated status
/// * `task` - Task identifier the summary belongs to
pub fn summary_json(summary: &StatusSummary, task: &str) -> serde_json::Value {
    use serde_json::json;

    json!({
        "task": task,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "summary": summary,
    })
}

/// Print the JSON document to stdout.
pub fn print_json_summary(summary: &StatusSummary, task: &str) -> Result<()> {
    let report = summary_json(summary, task);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Write the JSON document to a file.
pub fn export_json_summary(summary: &StatusSummary, task: &str, output_path: &Path) -> std::io::Result<()> {
    let report = summary_json(summary, task);

    let mut file = File::create(output_path)?;
    serde_json::to_writer_pretty(&mut file, &report)?;
    writeln!(file)?;

    Ok(())
}
