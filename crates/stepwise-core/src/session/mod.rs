//! Session-level state around the plan store.
//!
//! A [`Session`] is what a front end talks to. It owns the [`PlanStore`] and
//! adds the state that is not part of any plan: which screen the user is on
//! ([`Stage`]), whether a generation call is outstanding, the last
//! generation error, and the failed request that `retry` would re-issue.
//!
//! Generation calls go through a borrowed [`PlanGenerator`]. A successful
//! call dispatches exactly one store intent (`SetPlan` for a new plan,
//! `UpdateStep` for a revision); a failed one sets exactly one session
//! error. Neither retries on its own.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use jiff::Timestamp;
//! use stepwise_core::{
//!     session::{SessionBuilder, Stage},
//!     store::FixedClock,
//! };
//!
//! let mut session = SessionBuilder::new()
//!     .with_clock(Arc::new(FixedClock(Timestamp::UNIX_EPOCH)))
//!     .build();
//!
//! assert_eq!(session.stage(), Stage::Input);
//! assert!(session.current_plan().is_none());
//! assert!(session.set_stage(Stage::Review).is_err());
//! ```

use std::fmt;

use log::{debug, info, warn};

pub mod builder;
mod handlers;

#[cfg(test)]
mod tests;

pub use builder::SessionBuilder;

use crate::{
    error::{Result, StepwiseError},
    generation::{self, GenerationFailure, PlanGenerator},
    models::{Plan, PlanStatus, StepId},
    store::{Intent, PlanStore, Transition},
};

/// Longest goal accepted, in characters.
pub const MAX_GOAL_CHARS: usize = 500;

/// Goals offered to users who do not know where to start.
pub const SAMPLE_GOALS: [&str; 5] = [
    "Clean up my CRM",
    "Automate invoice processing",
    "Organize project files",
    "Set up customer onboarding",
    "Improve team communication",
];

/// Which screen of the workflow the user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    /// Entering a goal
    #[default]
    Input,
    /// Editing the generated plan
    Planning,
    /// Reviewing the plan before approval
    Review,
    /// The plan has been approved
    Final,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Input => "input",
            Stage::Planning => "planning",
            Stage::Review => "review",
            Stage::Final => "final",
        }
    }

    /// Whether this stage shows a plan and so needs one to exist.
    pub fn needs_plan(&self) -> bool {
        !matches!(self, Stage::Input)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call to the generation service, kept so a failure can be retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    /// Generate a whole plan for a goal
    Plan { goal: String },
    /// Revise one step following an instruction
    Revision { step_id: StepId, instruction: String },
}

/// One user's planning session.
#[derive(Debug)]
pub struct Session {
    store: PlanStore,
    stage: Stage,
    pending: Option<GenerationRequest>,
    error: Option<String>,
    last_request: Option<GenerationRequest>,
}

impl Session {
    pub(crate) fn new(store: PlanStore) -> Self {
        Self {
            store,
            stage: Stage::Input,
            pending: None,
            error: None,
            last_request: None,
        }
    }

    pub fn current_plan(&self) -> Option<&Plan> {
        self.store.current_plan()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Whether a generation call is outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The last generation failure message, until cleared.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The most recent failed request, if any.
    pub fn last_request(&self) -> Option<&GenerationRequest> {
        self.last_request.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    /// Forwards an intent to the plan store.
    pub fn dispatch(&mut self, intent: Intent) -> Transition {
        self.store.dispatch(intent)
    }

    /// Returns the current plan or `NoCurrentPlan`.
    pub fn require_plan(&self) -> Result<&Plan> {
        self.current_plan().ok_or(StepwiseError::NoCurrentPlan)
    }

    /// Moves to another screen.
    ///
    /// # Errors
    ///
    /// Returns `StepwiseError::NoCurrentPlan` when `stage` shows a plan and
    /// none exists.
    pub fn set_stage(&mut self, stage: Stage) -> Result<()> {
        if stage.needs_plan() && self.current_plan().is_none() {
            return Err(StepwiseError::NoCurrentPlan);
        }
        debug!("session: stage {} -> {}", self.stage, stage);
        self.stage = stage;
        Ok(())
    }

    /// Generates a plan for `goal` and makes it current.
    ///
    /// The goal is recorded (`SetGoal`) before the call so the user sees it
    /// while waiting, unless the current plan is already the empty draft for
    /// this goal, as after a failed attempt. On success the generated plan replaces it (`SetPlan`)
    /// and the session moves to [`Stage::Planning`].
    ///
    /// # Errors
    ///
    /// Returns `StepwiseError::InvalidInput` for an empty or overlong goal
    /// (nothing is dispatched), and `StepwiseError::Generation` when the
    /// service fails; the failure is also kept as the session error.
    pub async fn generate_plan(&mut self, goal: &str, generator: &dyn PlanGenerator) -> Result<()> {
        let goal = validate_goal(goal)?;
        let request = GenerationRequest::Plan {
            goal: goal.to_string(),
        };

        self.begin(request.clone());
        if self.has_empty_plan_for(goal) {
            debug!("session: reusing empty plan for goal");
        } else {
            self.store.set_goal(goal);
        }

        info!("session: generating plan");
        let outcome = generator.generate(goal).await;
        self.pending = None;

        match outcome {
            Ok(drafts) => {
                let plan = generation::plan_from_drafts(goal, drafts, self.store.now());
                self.store.set_plan(plan);
                self.last_request = None;
                self.stage = Stage::Planning;
                Ok(())
            }
            Err(failure) => Err(self.fail(request, failure)),
        }
    }

    /// Asks the service to revise one step and merges the result in place.
    ///
    /// Returns `Ok(false)` without calling the service when the step is not
    /// in the current plan.
    ///
    /// # Errors
    ///
    /// Returns `StepwiseError::InvalidInput` for an empty instruction,
    /// `StepwiseError::NoCurrentPlan` without a plan, and
    /// `StepwiseError::Generation` when the service fails.
    pub async fn revise_step(
        &mut self,
        step_id: StepId,
        instruction: &str,
        generator: &dyn PlanGenerator,
    ) -> Result<bool> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(
                StepwiseError::invalid_input("instruction").with_reason("must not be empty")
            );
        }

        let Some(step) = self.require_plan()?.step(&step_id).cloned() else {
            debug!("session: revise skipped, step {step_id} not in plan");
            return Ok(false);
        };

        let request = GenerationRequest::Revision {
            step_id,
            instruction: instruction.to_string(),
        };
        self.begin(request.clone());

        info!("session: revising step {step_id}");
        let outcome = generator.revise(&step, instruction).await;
        self.pending = None;

        match outcome {
            Ok(draft) => {
                self.store
                    .update_step(step_id, generation::revision_patch(draft));
                self.last_request = None;
                Ok(true)
            }
            Err(failure) => Err(self.fail(request, failure)),
        }
    }

    /// Re-issues the last failed request.
    ///
    /// Returns `Ok(false)` when there is nothing to retry.
    pub async fn retry(&mut self, generator: &dyn PlanGenerator) -> Result<bool> {
        let Some(request) = self.last_request.clone() else {
            return Ok(false);
        };

        info!("session: retrying failed request");
        match request {
            GenerationRequest::Plan { goal } => {
                self.generate_plan(&goal, generator).await?;
                Ok(true)
            }
            GenerationRequest::Revision {
                step_id,
                instruction,
            } => self.revise_step(step_id, &instruction, generator).await,
        }
    }

    /// Drops the error and goes back to goal input. The plan and its history
    /// are kept.
    pub fn abandon(&mut self) {
        debug!("session: abandon");
        self.error = None;
        self.last_request = None;
        self.stage = Stage::Input;
    }

    /// Approves the current plan and moves to [`Stage::Final`].
    pub fn approve(&mut self) -> Result<Transition> {
        self.require_plan()?;
        let transition = self.store.set_status(PlanStatus::Approved);
        self.stage = Stage::Final;
        Ok(transition)
    }

    /// Cancels the current plan and returns to goal input.
    pub fn cancel(&mut self) -> Result<Transition> {
        self.require_plan()?;
        let transition = self.store.set_status(PlanStatus::Cancelled);
        self.stage = Stage::Input;
        Ok(transition)
    }

    fn has_empty_plan_for(&self, goal: &str) -> bool {
        self.current_plan().is_some_and(|plan| {
            plan.goal == goal && plan.steps.is_empty() && plan.status == PlanStatus::Draft
        })
    }

    fn begin(&mut self, request: GenerationRequest) {
        self.error = None;
        self.pending = Some(request);
    }

    fn fail(&mut self, request: GenerationRequest, failure: GenerationFailure) -> StepwiseError {
        warn!("session: generation failed: {failure}");
        self.error = Some(failure.message());
        self.last_request = Some(request);
        StepwiseError::Generation(failure)
    }
}

/// Trims `goal` and checks it against the input form's limits.
pub fn validate_goal(goal: &str) -> Result<&str> {
    let goal = goal.trim();
    if goal.is_empty() {
        return Err(StepwiseError::invalid_input("goal").with_reason("must not be empty"));
    }
    if goal.chars().count() > MAX_GOAL_CHARS {
        return Err(StepwiseError::invalid_input("goal")
            .with_reason(format!("must be at most {MAX_GOAL_CHARS} characters")));
    }
    Ok(goal)
}
