use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde_json::json;
use uuid::Uuid;

use crate::models::{CollectionReport, RunState};

/// Create a JSON summary of a collection run.
///
/// # Arguments
///
/// * `report` - The report returned by the collection engine
///
/// # Example Output
///
/// ```json
/// {
///   "collection_id": "550e8400-e29b-41d4-a716-446655440000",
///   "workspace_name": "java-ws",
///   "workspace_id": "workspace123",
///   "state": "completed",
///   "succeeded": 2,
///   "failed": 1,
///   "sources": [...]
/// }
/// ```
pub fn create_collection_summary(report: &CollectionReport) -> Result<String> {
    let sources: Vec<_> = report
        .outcomes
        .iter()
        .map(|outcome| {
            // output is only worth keeping for failures
            let output = (!outcome.succeeded).then(|| outcome.diagnostic_text.as_str());
            json!({
                "name": outcome.name,
                "remote_location": outcome.remote_location,
                "succeeded": outcome.succeeded,
                "timed_out": outcome.timed_out,
                "artifact_dir": outcome.artifact_dir,
                "duration_ms": outcome.duration_ms,
                "output": output,
            })
        })
        .collect();

    let (state, abort_reason) = match &report.state {
        RunState::Completed => ("completed", None),
        RunState::Aborted(reason) => ("aborted", Some(reason.to_string())),
    };

    let summary = json!({
        "collection_id": Uuid::new_v4().to_string(),
        "workspace_name": report.workspace_name,
        "workspace_id": report.workspace_id,
        "state": state,
        "abort_reason": abort_reason,
        "started_at": report.started_at.to_rfc3339(),
        "finished_at": report.finished_at.to_rfc3339(),
        "collector_version": env!("CARGO_PKG_VERSION"),
        "succeeded": report.succeeded_count(),
        "failed": report.failed_count(),
        "sources": sources,
    });

    serde_json::to_string_pretty(&summary).context("Failed to serialize collection summary to JSON")
}

/// Write the summary of `report` to `path`, creating parent directories.
pub fn write_collection_summary(report: &CollectionReport, path: &Path) -> Result<()> {
    let summary = create_collection_summary(report)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    fs::write(path, summary)
        .context(format!("Failed to write collection summary to {}", path.display()))?;
    info!("Collection summary written to {}", path.display());
    Ok(())
}
