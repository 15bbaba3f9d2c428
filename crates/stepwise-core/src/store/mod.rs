//! The plan store: a synchronous state machine over one plan and its history.
//!
//! Every mutating [`Intent`] follows the same two phases:
//!
//! 1. compute the next plan from the current plan and the intent payload,
//!    stamping `updated_at` from the injected [`Clock`];
//! 2. push that plan onto the [`HistoryLedger`], which makes it current.
//!
//! [`Intent::Undo`] and [`Intent::Redo`] skip phase one and restore a
//! snapshot the ledger already holds, so they never create history entries
//! of their own.
//!
//! The current plan is always the snapshot under the ledger cursor, so the
//! two can never disagree.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use jiff::Timestamp;
//! use stepwise_core::{
//!     models::StepDraft,
//!     store::{FixedClock, Intent, PlanStore},
//! };
//!
//! let mut store = PlanStore::new(Arc::new(FixedClock(Timestamp::UNIX_EPOCH)));
//! store.dispatch(Intent::SetGoal("Clean up my CRM".to_string()));
//! store.dispatch(Intent::AddStep(StepDraft::manual()));
//!
//! assert_eq!(store.current_plan().map(|plan| plan.steps.len()), Some(1));
//! assert!(store.can_undo());
//!
//! store.dispatch(Intent::Undo);
//! assert_eq!(store.current_plan().map(|plan| plan.steps.len()), Some(0));
//! ```

use std::{fmt, sync::Arc};

use jiff::Timestamp;
use log::debug;

pub mod clock;
pub mod intent;
pub mod transitions;


pub use clock::{Clock, FixedClock, SystemClock, TickingClock};
pub use intent::{Intent, Transition};

use crate::{
    history::HistoryLedger,
    models::{Plan, PlanStatus, Step, StepDraft, StepId, StepPatch},
};

/// Owner of the authoritative plan and its undo/redo history.
pub struct PlanStore {
    history: HistoryLedger<Plan>,
    clock: Arc<dyn Clock>,
}

impl PlanStore {
    /// Creates a store with an empty history.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            history: HistoryLedger::new(),
            clock,
        }
    }

    /// Creates a store with a custom history capacity.
    pub fn with_history_capacity(clock: Arc<dyn Clock>, capacity: usize) -> Self {
        Self {
            history: HistoryLedger::with_capacity(capacity),
            clock,
        }
    }

    /// The current plan, if one has been created.
    pub fn current_plan(&self) -> Option<&Plan> {
        self.history.current()
    }

    /// Whether [`Intent::Undo`] would change the current plan.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether [`Intent::Redo`] would change the current plan.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Read access to the snapshot history.
    pub fn history(&self) -> &HistoryLedger<Plan> {
        &self.history
    }

    /// Reads the store's clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Applies one intent atomically.
    ///
    /// Never fails: intents that do not apply (no current plan, positions out
    /// of range, nothing to undo) leave the state as it was.
    pub fn dispatch(&mut self, intent: Intent) -> Transition {
        let kind = intent.kind();
        let transition = match intent {
            Intent::Undo => self.restore(HistoryLedger::can_undo, |history| {
                history.undo();
            }),
            Intent::Redo => self.restore(HistoryLedger::can_redo, |history| {
                history.redo();
            }),
            mutating => match self.next_plan(mutating) {
                Some(plan) => {
                    self.history.push(plan);
                    Transition::Committed
                }
                None => Transition::Unchanged,
            },
        };

        debug!(
            "store: {kind} -> {transition:?} (cursor {:?}, {} snapshot(s))",
            self.history.cursor(),
            self.history.len()
        );
        transition
    }

    fn restore(
        &mut self,
        available: fn(&HistoryLedger<Plan>) -> bool,
        step: fn(&mut HistoryLedger<Plan>),
    ) -> Transition {
        if available(&self.history) {
            step(&mut self.history);
            Transition::Restored
        } else {
            Transition::Unchanged
        }
    }

    /// Phase one: compute the next plan, or `None` when the intent does not
    /// apply to the current state.
    fn next_plan(&self, intent: Intent) -> Option<Plan> {
        let now = self.now();

        match intent {
            Intent::SetGoal(goal) => Some(transitions::set_goal(goal, now)),
            Intent::SetPlan(plan) => Some(transitions::set_plan(plan, now)),
            Intent::UpdateStep { id, patch } => {
                let plan = self.current_plan()?;
                Some(transitions::update_step(plan, &id, &patch, now))
            }
            Intent::DeleteStep(id) => {
                let plan = self.current_plan()?;
                Some(transitions::delete_step(plan, &id, now))
            }
            Intent::ReorderStep { from, to } => {
                let plan = self.current_plan()?;
                transitions::reorder_step(plan, from, to, now)
            }
            Intent::ReplaceSteps(steps) => {
                let plan = self.current_plan()?;
                Some(transitions::replace_steps(plan, steps, now))
            }
            Intent::AddStep(draft) => {
                let plan = self.current_plan()?;
                Some(transitions::add_step(plan, draft, StepId::new(), now))
            }
            Intent::SetStatus(status) => {
                let plan = self.current_plan()?;
                Some(transitions::set_status(plan, status, now))
            }
            Intent::Undo | Intent::Redo => None,
        }
    }

    // Convenience wrappers, one per intent.

    pub fn set_goal(&mut self, goal: impl Into<String>) -> Transition {
        self.dispatch(Intent::SetGoal(goal.into()))
    }

    pub fn set_plan(&mut self, plan: Plan) -> Transition {
        self.dispatch(Intent::SetPlan(plan))
    }

    pub fn update_step(&mut self, id: StepId, patch: StepPatch) -> Transition {
        self.dispatch(Intent::UpdateStep { id, patch })
    }

    pub fn delete_step(&mut self, id: StepId) -> Transition {
        self.dispatch(Intent::DeleteStep(id))
    }

    pub fn reorder_step(&mut self, from: usize, to: usize) -> Transition {
        self.dispatch(Intent::ReorderStep { from, to })
    }

    pub fn replace_steps(&mut self, steps: Vec<Step>) -> Transition {
        self.dispatch(Intent::ReplaceSteps(steps))
    }

    pub fn add_step(&mut self, draft: StepDraft) -> Transition {
        self.dispatch(Intent::AddStep(draft))
    }

    pub fn set_status(&mut self, status: PlanStatus) -> Transition {
        self.dispatch(Intent::SetStatus(status))
    }

    pub fn undo(&mut self) -> Transition {
        self.dispatch(Intent::Undo)
    }

    pub fn redo(&mut self) -> Transition {
        self.dispatch(Intent::Redo)
    }
}

impl fmt::Debug for PlanStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanStore")
            .field("current", &self.current_plan().map(|plan| plan.id))
            .field("cursor", &self.history.cursor())
            .field("snapshots", &self.history.len())
            .field("clock", &self.clock)
            .finish()
    }
}
