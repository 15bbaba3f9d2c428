//! The plan generation service boundary.
//!
//! A [`PlanGenerator`] turns a goal into step drafts and revises single
//! steps. Drafts carry no identity; [`plan_from_drafts`] and
//! [`revision_patch`] are where the core assigns ids, order and the
//! provenance tag before anything reaches the store.

use async_trait::async_trait;
use jiff::Timestamp;

pub mod error;
pub mod openai;
pub mod prompts;

pub use error::GenerationFailure;
pub use openai::OpenAiGenerator;

use crate::models::{Plan, Step, StepDraft, StepId, StepPatch};

/// Provenance tag stamped on every generated or revised step.
pub const AI_PROVENANCE_TAG: &str = "GPT-4";

/// A source of AI-produced steps.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    /// Decomposes `goal` into an ordered list of steps.
    async fn generate(&self, goal: &str) -> Result<Vec<StepDraft>, GenerationFailure>;

    /// Produces a replacement for `step` following `instruction`.
    async fn revise(&self, step: &Step, instruction: &str) -> Result<StepDraft, GenerationFailure>;
}

/// Builds a fresh plan from generated drafts.
///
/// Each step gets a new id, `order` equal to its position in `drafts`, and
/// the [`AI_PROVENANCE_TAG`].
pub fn plan_from_drafts(goal: impl Into<String>, drafts: Vec<StepDraft>, now: Timestamp) -> Plan {
    let mut plan = Plan::new(goal, now);
    plan.steps = (0u32..)
        .zip(drafts)
        .map(|(order, draft)| {
            Step::from_draft(StepId::new(), order, draft.with_agent(AI_PROVENANCE_TAG))
        })
        .collect();
    plan
}

/// Turns a revised draft into a patch that overwrites every content field
/// of the existing step, keeping its id and order.
pub fn revision_patch(draft: StepDraft) -> StepPatch {
    StepPatch::from(draft.with_agent(AI_PROVENANCE_TAG))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::models::Confidence;

    fn bare(title: &str) -> StepDraft {
        StepDraft {
            title: title.to_string(),
            description: format!("{title} description"),
            tool_name: "Salesforce".to_string(),
            reasoning: String::new(),
            confidence: Confidence::new(0.9),
            ai_agent: String::new(),
        }
    }

    #[test]
    fn test_plan_from_drafts_assigns_identity() {
        let plan = plan_from_drafts(
            "Clean up my CRM",
            vec![bare("Audit records"), bare("Dedupe contacts")],
            Timestamp::UNIX_EPOCH,
        );

        assert_eq!(plan.goal, "Clean up my CRM");
        assert_eq!(plan.steps[0].title, "Audit records");
        assert_eq!(plan.steps[0].order, 0);
        assert_eq!(plan.steps[1].title, "Dedupe contacts");
        assert_eq!(plan.steps[1].order, 1);
        assert_ne!(plan.steps[0].id, plan.steps[1].id);
        assert!(plan.steps.iter().all(|s| s.ai_agent == AI_PROVENANCE_TAG));
    }

    #[test]
    fn test_plan_from_drafts_ids_are_unique() {
        let drafts = (0..50).map(|i| bare(&format!("step {i}"))).collect();
        let plan = plan_from_drafts("goal", drafts, Timestamp::UNIX_EPOCH);

        let ids: HashSet<_> = plan.steps.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 50);
        assert!(plan.has_contiguous_order());
    }

    #[test]
    fn test_revision_patch_overwrites_agent() {
        let patch = revision_patch(bare("Audit records").with_agent("Manual Entry"));
        assert_eq!(patch.ai_agent.as_deref(), Some(AI_PROVENANCE_TAG));
        assert_eq!(patch.title.as_deref(), Some("Audit records"));
    }
}
