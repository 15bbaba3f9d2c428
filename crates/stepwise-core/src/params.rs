//! Parameter structures shared by the front ends.
//!
//! The shell and the MCP server both take these. They carry no framework
//! derives except an optional `JsonSchema` behind the `schema` feature, so
//! the MCP layer can wrap them transparently.
//!
//! Steps are addressed by 1-based position in display order, the way users
//! see them. [`StepPosition::resolve`] turns a position into a [`StepId`].

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, StepwiseError},
    models::{Confidence, Plan, Step, StepDraft, StepId, StepPatch},
};

/// Parameters carrying just a goal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Goal {
    /// Plain-language description of what the user wants to achieve
    pub goal: String,
}

/// Parameters addressing one step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StepPosition {
    /// Position of the step as displayed (1-based)
    pub position: usize,
}

impl StepPosition {
    /// Looks up the id of the step at this position.
    ///
    /// # Errors
    ///
    /// Returns `StepwiseError::InvalidInput` when the position is 0 or past
    /// the last step.
    pub fn resolve(&self, plan: &Plan) -> Result<StepId> {
        self.position
            .checked_sub(1)
            .and_then(|index| plan.step_id_at(index))
            .ok_or_else(|| {
                StepwiseError::invalid_input("position").with_reason(format!(
                    "no step at position {} (plan has {} step(s))",
                    self.position,
                    plan.steps.len()
                ))
            })
    }
}

/// Editable step fields. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StepFields {
    /// Short title of the step
    pub title: Option<String>,
    /// What needs to be done
    pub description: Option<String>,
    /// Tool best suited for the step
    pub tool_name: Option<String>,
    /// Why the step is necessary
    pub reasoning: Option<String>,
    /// Confidence between 0 and 1; values outside are clamped
    pub confidence: Option<f64>,
}

impl StepFields {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.tool_name.is_none()
            && self.reasoning.is_none()
            && self.confidence.is_none()
    }

    /// A manual-entry draft with these fields filled in.
    pub fn into_draft(self) -> StepDraft {
        let mut draft = StepDraft::manual();
        draft.apply_fields(self);
        draft
    }
}

impl From<StepFields> for StepPatch {
    fn from(fields: StepFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            tool_name: fields.tool_name,
            reasoning: fields.reasoning,
            confidence: fields.confidence.map(Confidence::new),
            ai_agent: None,
        }
    }
}

impl StepDraft {
    fn apply_fields(&mut self, fields: StepFields) {
        if let Some(title) = fields.title {
            self.title = title;
        }
        if let Some(description) = fields.description {
            self.description = description;
        }
        if let Some(tool_name) = fields.tool_name {
            self.tool_name = tool_name;
        }
        if let Some(reasoning) = fields.reasoning {
            self.reasoning = reasoning;
        }
        if let Some(confidence) = fields.confidence {
            self.confidence = Confidence::new(confidence);
        }
    }
}

/// Parameters for adding a step at the end of the plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddStep {
    /// Fields to set; the rest take the manual-entry placeholders
    #[serde(flatten)]
    pub fields: StepFields,
}

/// Parameters for editing a step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateStep {
    /// Position of the step to edit (1-based)
    pub position: usize,
    /// Fields to change
    #[serde(flatten)]
    pub fields: StepFields,
}

/// Parameters for moving a step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ReorderStep {
    /// Current position of the step (1-based)
    pub from: usize,
    /// Position to move it to (1-based)
    pub to: usize,
}

impl ReorderStep {
    /// Converts to 0-based indices.
    ///
    /// # Errors
    ///
    /// Returns `StepwiseError::InvalidInput` for position 0. Positions past
    /// the end are left for the store to ignore.
    pub fn indices(&self) -> Result<(usize, usize)> {
        let index = |field: &str, position: usize| {
            position.checked_sub(1).ok_or_else(|| {
                StepwiseError::invalid_input(field).with_reason("positions start at 1")
            })
        };
        Ok((index("from", self.from)?, index("to", self.to)?))
    }
}

/// Parameters for putting every step in a new order at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ArrangeSteps {
    /// Current positions (1-based) listed in the desired order, each exactly once
    pub positions: Vec<usize>,
}

impl ArrangeSteps {
    /// Builds the rearranged, renumbered step list.
    ///
    /// # Errors
    ///
    /// Returns `StepwiseError::InvalidInput` unless the positions name every
    /// step of the plan exactly once.
    pub fn arrange(&self, plan: &Plan) -> Result<Vec<Step>> {
        let count = plan.steps.len();
        if self.positions.len() != count {
            return Err(StepwiseError::invalid_input("positions").with_reason(format!(
                "expected {count} position(s), got {}",
                self.positions.len()
            )));
        }

        let mut seen = vec![false; count];
        let mut steps = Vec::with_capacity(count);
        for (order, &position) in (0u32..).zip(&self.positions) {
            let index = position.checked_sub(1).filter(|&index| index < count);
            let Some(index) = index.filter(|&index| !seen[index]) else {
                return Err(StepwiseError::invalid_input("positions")
                    .with_reason(format!("position {position} is out of range or repeated")));
            };
            seen[index] = true;
            let mut step = plan.steps[index].clone();
            step.order = order;
            steps.push(step);
        }
        Ok(steps)
    }
}

/// Parameters for an AI revision of one step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ReviseStep {
    /// Position of the step to revise (1-based)
    pub position: usize,
    /// What to change, in plain language
    pub instruction: String,
}

/// Parameters for exporting the plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ExportPlan {
    /// Directory to write into; defaults to the current directory
    pub directory: Option<String>,
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn plan_with(titles: &[&str]) -> Plan {
        let mut plan = Plan::new("Improve team communication", Timestamp::UNIX_EPOCH);
        plan.steps = (0u32..)
            .zip(titles)
            .map(|(order, title)| {
                let mut draft = StepDraft::manual();
                draft.title = (*title).to_string();
                Step::from_draft(StepId::new(), order, draft)
            })
            .collect();
        plan
    }

    #[test]
    fn test_resolve_position() {
        let plan = plan_with(&["a", "b"]);

        let id = StepPosition { position: 2 }.resolve(&plan).unwrap();
        assert_eq!(plan.step(&id).unwrap().title, "b");

        assert!(StepPosition { position: 0 }.resolve(&plan).is_err());
        assert!(StepPosition { position: 3 }.resolve(&plan).is_err());
    }

    #[test]
    fn test_fields_into_draft_keeps_placeholders() {
        let draft = StepFields {
            title: Some("Set up Slack channels".to_string()),
            confidence: Some(1.7),
            ..Default::default()
        }
        .into_draft();

        assert_eq!(draft.title, "Set up Slack channels");
        assert_eq!(draft.confidence, Confidence::MAX);
        assert_eq!(draft.tool_name, "Tool Name");
        assert_eq!(draft.ai_agent, "Manual Entry");
    }

    #[test]
    fn test_fields_into_patch_leaves_agent_alone() {
        let patch = StepPatch::from(StepFields {
            description: Some("Weekly sync".to_string()),
            ..Default::default()
        });

        assert_eq!(patch.description.as_deref(), Some("Weekly sync"));
        assert!(patch.title.is_none());
        assert!(patch.ai_agent.is_none());
    }

    #[test]
    fn test_reorder_indices() {
        assert_eq!(ReorderStep { from: 3, to: 1 }.indices().unwrap(), (2, 0));
        assert!(ReorderStep { from: 0, to: 1 }.indices().is_err());
    }

    #[test]
    fn test_arrange_renumbers_in_new_order() {
        let plan = plan_with(&["a", "b", "c"]);

        let steps = ArrangeSteps {
            positions: vec![3, 1, 2],
        }
        .arrange(&plan)
        .unwrap();

        let titles: Vec<&str> = steps.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["c", "a", "b"]);
        assert!(steps.iter().zip(0u32..).all(|(s, order)| s.order == order));
        assert_eq!(steps[0].id, plan.steps[2].id);
    }

    #[test]
    fn test_arrange_rejects_partial_or_repeated_positions() {
        let plan = plan_with(&["a", "b", "c"]);

        for positions in [vec![1, 2], vec![1, 1, 2], vec![0, 1, 2], vec![1, 2, 4]] {
            let result = ArrangeSteps { positions }.arrange(&plan);
            assert!(matches!(result, Err(StepwiseError::InvalidInput { .. })));
        }
    }

    #[test]
    fn test_update_step_deserializes_flat() {
        let json = r#"{"position": 1, "title": "Kickoff", "confidence": 0.5}"#;
        let params: UpdateStep = serde_json::from_str(json).unwrap();
        assert_eq!(params.position, 1);
        assert_eq!(params.fields.title.as_deref(), Some("Kickoff"));
        assert_eq!(params.fields.confidence, Some(0.5));
    }
}
