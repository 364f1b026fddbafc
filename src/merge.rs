//! Enrich parsed records with fields only the task tool can compute.
//!
//! The raw files carry no urgency; the tool's JSON export does. Records are
//! joined to export entries on `uuid`.

use crate::error::{Result, Warning};
use crate::record::{Record, URGENCY};
use serde::Deserialize;
use std::collections::HashMap;

/// The subset of an exported task this crate consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportedTask {
    /// The join key.
    pub uuid: String,
    /// Urgency as computed by the tool.
    #[serde(default)]
    pub urgency: Option<f64>,
}

/// Parse the tool's JSON array export.
///
/// # Errors
///
/// Returns a JSON error if the export is not an array of objects with a
/// `uuid`.
pub fn parse_export(json: &str) -> Result<Vec<ExportedTask>> {
    Ok(serde_json::from_str(json)?)
}

/// Set `urgency` on every record that has an export counterpart.
///
/// Records missing from the export are left untouched and reported as
/// warnings. No other field is modified.
pub fn merge_exported(records: &mut [Record], exported: &[ExportedTask]) -> Vec<Warning> {
    let by_uuid: HashMap<&str, &ExportedTask> =
        exported.iter().map(|task| (task.uuid.as_str(), task)).collect();

    let mut warnings = Vec::new();
    for record in records.iter_mut() {
        let Some(uuid) = record.uuid() else {
            tracing::warn!("Task record has no uuid, cannot merge export");
            warnings.push(Warning::MissingUuid);
            continue;
        };
        let Some(task) = by_uuid.get(uuid) else {
            tracing::warn!(uuid = %uuid, "Task not exported by the task tool");
            warnings.push(Warning::NotExported(uuid.to_string()));
            continue;
        };
        if let Some(urgency) = task.urgency {
            record.insert(URGENCY, urgency);
        }
    }
    warnings
}
