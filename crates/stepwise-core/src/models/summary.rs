//! Review summary of a plan.

use serde::Serialize;

use super::{Confidence, Plan, PlanStatus};

/// Aggregate figures shown before a plan is approved.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    /// The plan's goal
    pub goal: String,
    /// Plan status at the time of review
    pub status: PlanStatus,
    /// Number of steps
    pub total_steps: usize,
    /// Mean step confidence, 0 for an empty plan
    pub average_confidence: Confidence,
    /// Distinct tool names, in first-seen order
    pub tools: Vec<String>,
    /// Distinct provenance tags, in first-seen order
    pub agents: Vec<String>,
}

impl ReviewSummary {
    /// Computes the summary over the plan's steps in display order.
    pub fn of(plan: &Plan) -> Self {
        let steps = plan.ordered_steps();

        let average_confidence = if steps.is_empty() {
            Confidence::MIN
        } else {
            let total: f64 = steps.iter().map(|step| step.confidence.value()).sum();
            Confidence::new(total / steps.len() as f64)
        };

        let mut tools: Vec<String> = Vec::new();
        let mut agents: Vec<String> = Vec::new();
        for step in &steps {
            if !tools.contains(&step.tool_name) {
                tools.push(step.tool_name.clone());
            }
            if !agents.contains(&step.ai_agent) {
                agents.push(step.ai_agent.clone());
            }
        }

        Self {
            goal: plan.goal.clone(),
            status: plan.status,
            total_steps: steps.len(),
            average_confidence,
            tools,
            agents,
        }
    }
}

impl From<&Plan> for ReviewSummary {
    fn from(plan: &Plan) -> Self {
        Self::of(plan)
    }
}
