//! Step payloads that carry content without identity.

use serde::{Deserialize, Serialize};

use super::Confidence;

/// Provenance tag for steps entered by hand.
pub const MANUAL_PROVENANCE_TAG: &str = "Manual Entry";

/// Step content without `id` or `order`.
///
/// This is what callers hand to `AddStep` and what the generation service
/// returns; the store assigns identity and position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub ai_agent: String,
}

impl StepDraft {
    /// Placeholder content for a step added by hand.
    pub fn manual() -> Self {
        Self {
            title: "New Step".to_string(),
            description: "Describe what needs to be done in this step".to_string(),
            tool_name: "Tool Name".to_string(),
            reasoning: "Explain why this step is necessary".to_string(),
            confidence: Confidence::new(0.8),
            ai_agent: MANUAL_PROVENANCE_TAG.to_string(),
        }
    }

    /// Replaces the provenance tag.
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.ai_agent = agent.into();
        self
    }
}

impl Default for StepDraft {
    fn default() -> Self {
        Self::manual()
    }
}

/// Partial update for a step. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tool_name: Option<String>,
    pub reasoning: Option<String>,
    pub confidence: Option<Confidence>,
    pub ai_agent: Option<String>,
}

impl StepPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl From<StepDraft> for StepPatch {
    /// A patch that overwrites every content field, as a revision does.
    fn from(draft: StepDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
            tool_name: Some(draft.tool_name),
            reasoning: Some(draft.reasoning),
            confidence: Some(draft.confidence),
            ai_agent: Some(draft.ai_agent),
        }
    }
}
