//! Pure plan transitions, one per mutating intent.
//!
//! Every function takes the current plan by reference and returns a new plan
//! stamped with `now`. Positional intents work on the order-sorted sequence
//! and renumber `order` to `0..n` afterwards.

use jiff::Timestamp;

use crate::models::{Plan, PlanStatus, Step, StepDraft, StepId, StepPatch};

/// Fresh empty draft plan for a goal.
pub fn set_goal(goal: String, now: Timestamp) -> Plan {
    Plan::new(goal, now)
}

/// Accepts an externally built plan as the new current plan.
pub fn set_plan(mut plan: Plan, now: Timestamp) -> Plan {
    plan.updated_at = now;
    plan
}

/// Merges `patch` into the step with `id`; other steps are untouched.
///
/// An unknown id yields the same steps with a fresh `updated_at`.
pub fn update_step(plan: &Plan, id: &StepId, patch: &StepPatch, now: Timestamp) -> Plan {
    let mut next = plan.clone();
    if let Some(step) = next.steps.iter_mut().find(|step| &step.id == id) {
        step.apply(patch.clone());
    }
    next.updated_at = now;
    next
}

/// Removes the step with `id` and renumbers the remaining steps.
pub fn delete_step(plan: &Plan, id: &StepId, now: Timestamp) -> Plan {
    let steps = sorted_steps(plan)
        .into_iter()
        .filter(|step| &step.id != id)
        .collect();

    with_steps(plan, renumber(steps), now)
}

/// Single-element move from `from` to `to`, then renumber.
///
/// Returns `None` when either position is outside the sequence.
pub fn reorder_step(plan: &Plan, from: usize, to: usize, now: Timestamp) -> Option<Plan> {
    let mut steps = sorted_steps(plan);
    if from >= steps.len() || to >= steps.len() {
        return None;
    }

    let moved = steps.remove(from);
    steps.insert(to, moved);

    Some(with_steps(plan, renumber(steps), now))
}

/// Replaces the step list as given.
///
/// The numbering is not validated; callers must supply contiguous `order`
/// values themselves.
pub fn replace_steps(plan: &Plan, steps: Vec<Step>, now: Timestamp) -> Plan {
    with_steps(plan, steps, now)
}

/// Appends a step built from `draft` with `order = step count`.
pub fn add_step(plan: &Plan, draft: StepDraft, id: StepId, now: Timestamp) -> Plan {
    let order = u32::try_from(plan.steps.len()).unwrap_or(u32::MAX);
    let mut next = plan.clone();
    next.steps.push(Step::from_draft(id, order, draft));
    next.updated_at = now;
    next
}

/// Applies a status change when the lifecycle allows it.
///
/// A disallowed change propagates the plan unchanged apart from `updated_at`.
pub fn set_status(plan: &Plan, status: PlanStatus, now: Timestamp) -> Plan {
    let mut next = plan.clone();
    if plan.status.can_transition_to(status) {
        next.status = status;
    }
    next.updated_at = now;
    next
}

fn sorted_steps(plan: &Plan) -> Vec<Step> {
    let mut steps = plan.steps.clone();
    // Stable, so equal orders (only possible after unchecked ReplaceSteps)
    // keep their stored relative order.
    steps.sort_by_key(|step| step.order);
    steps
}

fn renumber(steps: Vec<Step>) -> Vec<Step> {
    steps
        .into_iter()
        .zip(0u32..)
        .map(|(mut step, order)| {
            step.order = order;
            step
        })
        .collect()
}

fn with_steps(plan: &Plan, steps: Vec<Step>, now: Timestamp) -> Plan {
    Plan {
        id: plan.id,
        goal: plan.goal.clone(),
        steps,
        status: plan.status,
        created_at: plan.created_at,
        updated_at: now,
    }
}
