//! Prompt text and response parsing for chat-completion models.

use serde::Deserialize;

use super::GenerationFailure;
use crate::models::{Confidence, Step, StepDraft};

/// System prompt describing the expected JSON shape.
pub const SYSTEM_PROMPT: &str = r#"You are an AI assistant that helps users break down their goals into actionable workflow steps.
For each step, provide:
1. A clear, concise title
2. A detailed description of what needs to be done
3. The most appropriate tool to use
4. Your reasoning for why this step is necessary
5. Your confidence level in this suggestion (0-1)

Format your response as a JSON object with the following structure:
{
  "steps": [
    {
      "title": "string",
      "description": "string",
      "toolName": "string",
      "reasoning": "string",
      "confidence": number
    }
  ],
  "overallConfidence": number,
  "reasoning": "string"
}"#;

/// User message asking for a full plan.
pub fn generate_message(goal: &str) -> String {
    format!("Please break down this goal into actionable steps: {goal}")
}

/// User message asking for a single revised step.
pub fn revise_message(step: &Step, instruction: &str) -> String {
    let context = serde_json::json!({
        "title": step.title,
        "description": step.description,
        "toolName": step.tool_name,
        "reasoning": step.reasoning,
        "confidence": step.confidence.value(),
    });

    format!(
        "Here is the current step:\n{context}\n\n\
         Please revise this step based on the following instruction: {instruction}\n\
         Respond with a \"steps\" array containing exactly one revised step."
    )
}

/// Model output shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    #[serde(default)]
    pub steps: Vec<StepDraft>,
    #[serde(default)]
    pub overall_confidence: Option<Confidence>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Parses the model's message content into step drafts.
///
/// Empty or missing `steps` counts as malformed output.
pub fn parse_steps(content: &str) -> Result<Vec<StepDraft>, GenerationFailure> {
    let response: GenerationResponse = serde_json::from_str(content)
        .map_err(|e| GenerationFailure::MalformedOutput(format!("invalid JSON: {e}")))?;

    if response.steps.is_empty() {
        return Err(GenerationFailure::MalformedOutput(
            "response contained no steps".to_string(),
        ));
    }

    Ok(response.steps)
}
