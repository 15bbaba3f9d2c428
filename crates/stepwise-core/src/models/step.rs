//! Step model definition and related functionality.

use serde::{Deserialize, Serialize};

use super::{Confidence, StepDraft, StepId, StepPatch};

/// One actionable unit of work within a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Unique identifier, immutable after creation
    pub id: StepId,

    /// Brief title/summary of the step
    pub title: String,

    /// What needs to be done
    pub description: String,

    /// Tool best suited to carry out the step
    pub tool_name: String,

    /// Why this step is necessary
    pub reasoning: String,

    /// How confident the author is in this step
    pub confidence: Confidence,

    /// Provenance tag: which agent (or human) produced or last revised the step
    pub ai_agent: String,

    /// Position of the step within the plan (0-indexed)
    pub order: u32,
}

impl Step {
    /// Builds a step from a draft, assigning identity and position.
    pub fn from_draft(id: StepId, order: u32, draft: StepDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            tool_name: draft.tool_name,
            reasoning: draft.reasoning,
            confidence: draft.confidence,
            ai_agent: draft.ai_agent,
            order,
        }
    }

    /// Merges a partial update into this step.
    ///
    /// Only fields present in the patch change; `id` and `order` are never
    /// touched.
    pub fn apply(&mut self, patch: StepPatch) {
        let StepPatch {
            title,
            description,
            tool_name,
            reasoning,
            confidence,
            ai_agent,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(tool_name) = tool_name {
            self.tool_name = tool_name;
        }
        if let Some(reasoning) = reasoning {
            self.reasoning = reasoning;
        }
        if let Some(confidence) = confidence {
            self.confidence = confidence;
        }
        if let Some(ai_agent) = ai_agent {
            self.ai_agent = ai_agent;
        }
    }

    /// Returns the step's content without identity or position.
    pub fn to_draft(&self) -> StepDraft {
        StepDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            tool_name: self.tool_name.clone(),
            reasoning: self.reasoning.clone(),
            confidence: self.confidence,
            ai_agent: self.ai_agent.clone(),
        }
    }
}
