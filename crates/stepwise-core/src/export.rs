//! Export and share formats for an approved plan.
//!
//! The export is a one-way JSON document: the core writes it but never reads
//! it back.

use std::{
    fs,
    path::{Path, PathBuf},
};

use jiff::Timestamp;
use log::info;
use serde::Serialize;

use crate::{
    error::{Result, StepwiseError},
    models::{Plan, Step},
    store::Clock,
};

/// The exported document.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanExport {
    pub goal: String,
    /// Steps in display order
    pub steps: Vec<Step>,
    pub created_at: Timestamp,
    pub approved_at: Timestamp,
}

impl PlanExport {
    /// Snapshots `plan` as approved at `approved_at`.
    pub fn new(plan: &Plan, approved_at: Timestamp) -> Self {
        Self {
            goal: plan.goal.clone(),
            steps: plan.ordered_steps().into_iter().cloned().collect(),
            created_at: plan.created_at,
            approved_at,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// File name for an export written at `at`.
pub fn export_file_name(at: Timestamp) -> String {
    format!("workflow-plan-{}.json", at.as_millisecond())
}

/// Writes `plan` as JSON into `dir` and returns the file path.
///
/// # Errors
///
/// Returns `StepwiseError::FileSystem` if the directory cannot be created or
/// the file cannot be written.
pub fn write_export(plan: &Plan, dir: &Path, clock: &dyn Clock) -> Result<PathBuf> {
    let now = clock.now();
    let export = PlanExport::new(plan, now);
    let json = export.to_json()?;

    fs::create_dir_all(dir).map_err(|e| StepwiseError::FileSystem {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let path = dir.join(export_file_name(now));
    fs::write(&path, json).map_err(|e| StepwiseError::FileSystem {
        path: path.clone(),
        source: e,
    })?;

    info!("export: wrote {}", path.display());
    Ok(path)
}

/// Plain-text summary suitable for pasting into a message.
pub fn share_text(plan: &Plan) -> String {
    let steps = plan
        .ordered_steps()
        .iter()
        .enumerate()
        .map(|(index, step)| format!("{}. {}\n   {}", index + 1, step.title, step.description))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("AI Workflow Plan\n\nGoal: {}\n\nSteps:\n{steps}", plan.goal)
}
