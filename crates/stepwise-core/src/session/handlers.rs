//! Parameter-driven session operations shared by the front ends.
//!
//! Each handler resolves user-facing positions to step ids and dispatches
//! one store intent, so the shell and the MCP server behave the same.

use log::debug;

use super::{validate_goal, Session, Stage};
use crate::{
    error::{Result, StepwiseError},
    generation::PlanGenerator,
    models::StepPatch,
    params,
    store::{Intent, Transition},
};

impl Session {
    /// Starts an empty plan for `goal` without calling the generator.
    pub fn start_plan(&mut self, params: &params::Goal) -> Result<Transition> {
        let goal = validate_goal(&params.goal)?;
        let transition = self.dispatch(Intent::SetGoal(goal.to_string()));
        self.error = None;
        self.stage = Stage::Planning;
        Ok(transition)
    }

    /// Appends a step built from manual-entry defaults and the given fields.
    pub fn add_step(&mut self, params: params::AddStep) -> Result<Transition> {
        self.require_plan()?;
        Ok(self.dispatch(Intent::AddStep(params.fields.into_draft())))
    }

    /// Edits the step at a position.
    ///
    /// # Errors
    ///
    /// Returns `StepwiseError::InvalidInput` when no field is given or the
    /// position does not exist.
    pub fn edit_step(&mut self, params: params::UpdateStep) -> Result<Transition> {
        if params.fields.is_empty() {
            return Err(StepwiseError::invalid_input("fields").with_reason("nothing to change"));
        }
        let id = params::StepPosition {
            position: params.position,
        }
        .resolve(self.require_plan()?)?;

        Ok(self.dispatch(Intent::UpdateStep {
            id,
            patch: StepPatch::from(params.fields),
        }))
    }

    /// Deletes the step at a position.
    pub fn delete_step_at(&mut self, params: params::StepPosition) -> Result<Transition> {
        let id = params.resolve(self.require_plan()?)?;
        Ok(self.dispatch(Intent::DeleteStep(id)))
    }

    /// Moves a step. Positions past the end leave the plan unchanged.
    pub fn move_step(&mut self, params: params::ReorderStep) -> Result<Transition> {
        self.require_plan()?;
        let (from, to) = params.indices()?;
        let transition = self.dispatch(Intent::ReorderStep { from, to });
        if transition == Transition::Unchanged {
            debug!("session: move {from} -> {to} out of range");
        }
        Ok(transition)
    }

    /// Puts every step in the order given by their current positions.
    pub fn arrange_steps(&mut self, params: &params::ArrangeSteps) -> Result<Transition> {
        let steps = params.arrange(self.require_plan()?)?;
        Ok(self.dispatch(Intent::ReplaceSteps(steps)))
    }

    /// Asks the generator to revise the step at a position.
    pub async fn revise_step_at(
        &mut self,
        params: &params::ReviseStep,
        generator: &dyn PlanGenerator,
    ) -> Result<bool> {
        let id = params::StepPosition {
            position: params.position,
        }
        .resolve(self.require_plan()?)?;
        self.revise_step(id, &params.instruction, generator).await
    }
}
