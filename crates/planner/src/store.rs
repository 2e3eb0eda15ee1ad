//! Plan persistence as JSON arrays of trial records.
//!
//! One file per group: `{output_dir}/{group}_arrangements.json`.

use std::path::{Path, PathBuf};

use lexitrial_core::trial::{Trial, TrialRecord};

use crate::error::{PlannerError, PlannerResult};

/// File name suffix of stored plans.
pub const PLAN_FILE_SUFFIX: &str = "_arrangements.json";

pub fn plan_path(output_dir: &Path, group: &str) -> PathBuf {
    output_dir.join(format!("{group}{PLAN_FILE_SUFFIX}"))
}

/// Write `records` to the group's plan file, replacing any previous plan.
pub fn save_plan(
    output_dir: &Path,
    group: &str,
    records: &[TrialRecord],
) -> PlannerResult<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(|e| PlannerError::io(output_dir, e))?;

    let path = plan_path(output_dir, group);
    let json = serde_json::to_string_pretty(records).map_err(|e| PlannerError::json(&path, e))?;
    std::fs::write(&path, json).map_err(|e| PlannerError::io(&path, e))?;

    tracing::info!(group, path = %path.display(), trials = records.len(), "Plan saved");
    Ok(path)
}

/// Read the group's stored plan records.
pub fn load_records(output_dir: &Path, group: &str) -> PlannerResult<Vec<TrialRecord>> {
    let path = plan_path(output_dir, group);
    let raw = std::fs::read_to_string(&path).map_err(|e| PlannerError::io(&path, e))?;
    let records: Vec<TrialRecord> =
        serde_json::from_str(&raw).map_err(|e| PlannerError::json(&path, e))?;
    tracing::info!(group, path = %path.display(), trials = records.len(), "Plan loaded");
    Ok(records)
}

/// Read the group's stored plan as trials, checking each record's shape.
pub fn load_plan(output_dir: &Path, group: &str) -> PlannerResult<Vec<Trial>> {
    load_records(output_dir, group)?
        .into_iter()
        .map(|r| Trial::try_from(r).map_err(PlannerError::InvalidRecord))
        .collect()
}

/// Group names that have a stored plan in `output_dir`, sorted.
pub fn stored_groups(output_dir: &Path) -> PlannerResult<Vec<String>> {
    let entries = std::fs::read_dir(output_dir).map_err(|e| PlannerError::io(output_dir, e))?;

    let mut groups = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PlannerError::io(output_dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(group) = name.strip_suffix(PLAN_FILE_SUFFIX) {
            groups.push(group.to_string());
        }
    }
    groups.sort();
    Ok(groups)
}
