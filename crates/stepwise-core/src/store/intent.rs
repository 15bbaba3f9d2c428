//! The fixed vocabulary of requests the plan store accepts.

use crate::models::{Plan, PlanStatus, Step, StepDraft, StepId, StepPatch};

/// A named request to change plan store state.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Start a new planning session with an empty draft plan for this goal.
    SetGoal(String),
    /// Replace the current plan wholesale, e.g. with a generated plan.
    SetPlan(Plan),
    /// Merge a partial update into one step.
    UpdateStep { id: StepId, patch: StepPatch },
    /// Remove a step and renumber the rest.
    DeleteStep(StepId),
    /// Move the step at `from` to `to` (positions in display order).
    ReorderStep { from: usize, to: usize },
    /// Replace the step list verbatim; the caller owns the numbering.
    ReplaceSteps(Vec<Step>),
    /// Append a new step at the end.
    AddStep(StepDraft),
    /// Move a draft plan to approved or cancelled.
    SetStatus(PlanStatus),
    /// Restore the previous snapshot.
    Undo,
    /// Restore the next snapshot.
    Redo,
}

impl Intent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::SetGoal(_) => "set_goal",
            Intent::SetPlan(_) => "set_plan",
            Intent::UpdateStep { .. } => "update_step",
            Intent::DeleteStep(_) => "delete_step",
            Intent::ReorderStep { .. } => "reorder_step",
            Intent::ReplaceSteps(_) => "replace_steps",
            Intent::AddStep(_) => "add_step",
            Intent::SetStatus(_) => "set_status",
            Intent::Undo => "undo",
            Intent::Redo => "redo",
        }
    }
}

/// What a dispatched intent did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A new plan was computed and pushed onto the history.
    Committed,
    /// A historical snapshot became current.
    Restored,
    /// Nothing changed.
    Unchanged,
}
