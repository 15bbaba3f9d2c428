//! Plan model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{PlanId, PlanStatus, Step, StepId};

/// A goal plus the ordered steps that accomplish it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Unique identifier assigned at creation
    pub id: PlanId,

    /// The user's original free-text goal
    pub goal: String,

    /// Steps of the plan; sort by `order` before presenting
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Lifecycle status
    #[serde(default)]
    pub status: PlanStatus,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp of the last mutating transition (UTC)
    pub updated_at: Timestamp,
}

impl Plan {
    /// Creates an empty draft plan for `goal`.
    pub fn new(goal: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: PlanId::new(),
            goal: goal.into(),
            steps: Vec::new(),
            status: PlanStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the steps sorted by their `order` field.
    pub fn ordered_steps(&self) -> Vec<&Step> {
        let mut steps: Vec<&Step> = self.steps.iter().collect();
        steps.sort_by_key(|step| step.order);
        steps
    }

    /// Looks up a step by id.
    pub fn step(&self, id: &StepId) -> Option<&Step> {
        self.steps.iter().find(|step| &step.id == id)
    }

    /// Returns the id of the step at a 0-based position in display order.
    pub fn step_id_at(&self, position: usize) -> Option<StepId> {
        self.ordered_steps().get(position).map(|step| step.id)
    }

    /// Whether the `order` values form exactly `0..n` with no repeats.
    pub fn has_contiguous_order(&self) -> bool {
        let mut orders: Vec<u32> = self.steps.iter().map(|step| step.order).collect();
        orders.sort_unstable();
        orders
            .iter()
            .enumerate()
            .all(|(index, order)| usize::try_from(*order).map_or(false, |o| o == index))
    }
}
