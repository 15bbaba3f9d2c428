//! OpenAI-compatible chat-completion client.
//!
//! Talks to any server exposing `POST {base_url}/chat/completions` with JSON
//! mode. No retries: a failed request is reported once and the caller decides
//! whether to try again.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;

use super::{prompts, GenerationFailure, PlanGenerator};
use crate::{
    config::GeneratorConfig,
    error::{Result, StepwiseError},
    models::{Step, StepDraft},
};

/// Plan generator backed by a chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    config: GeneratorConfig,
    api_key: String,
    http: Client,
}

impl OpenAiGenerator {
    /// Creates a client from configuration, reading the API key from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `StepwiseError::Configuration` for an empty model or base URL
    /// and `StepwiseError::Generation` when the API key is missing or the
    /// HTTP client cannot be built.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| GenerationFailure::MissingApiKey {
                env: config.api_key_env.clone(),
            })?;
        Self::with_api_key(config, api_key)
    }

    /// Creates a client with an explicit API key.
    pub fn with_api_key(config: &GeneratorConfig, api_key: impl Into<String>) -> Result<Self> {
        if config.model.trim().is_empty() {
            return Err(StepwiseError::Configuration {
                message: "model must not be empty".to_string(),
            });
        }
        if config.base_url.trim().is_empty() {
            return Err(StepwiseError::Configuration {
                message: "base-url must not be empty".to_string(),
            });
        }

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(GenerationFailure::Network)?;

        Ok(Self {
            config: config.clone(),
            api_key: api_key.into(),
            http,
        })
    }

    /// Model this client requests.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn request_body(&self, user_message: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": prompts::SYSTEM_PROMPT },
                { "role": "user", "content": user_message },
            ],
            "temperature": self.config.temperature,
            "response_format": { "type": "json_object" },
        })
    }

    /// Sends one completion request and returns the parsed step drafts.
    async fn complete(
        &self,
        user_message: &str,
    ) -> std::result::Result<Vec<StepDraft>, GenerationFailure> {
        let url = self.endpoint();
        debug!("openai: POST {url} (model {})", self.config.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(user_message))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("openai: request failed with {status}");
            return Err(GenerationFailure::Api {
                status: status.as_u16(),
                message: api_error_message(&message),
            });
        }

        let completion: ChatCompletion = response.json().await.map_err(|e| self.classify(e))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationFailure::MalformedOutput("empty completion".to_string()))?;

        prompts::parse_steps(&content)
    }

    fn classify(&self, error: reqwest::Error) -> GenerationFailure {
        if error.is_timeout() {
            GenerationFailure::Timeout(self.config.timeout())
        } else if error.is_decode() {
            GenerationFailure::MalformedOutput(error.to_string())
        } else {
            GenerationFailure::Network(error)
        }
    }
}

#[async_trait]
impl PlanGenerator for OpenAiGenerator {
    async fn generate(&self, goal: &str) -> std::result::Result<Vec<StepDraft>, GenerationFailure> {
        info!("openai: generating plan");
        let steps = self.complete(&prompts::generate_message(goal)).await?;
        info!("openai: received {} step(s)", steps.len());
        Ok(steps)
    }

    async fn revise(
        &self,
        step: &Step,
        instruction: &str,
    ) -> std::result::Result<StepDraft, GenerationFailure> {
        info!("openai: revising step {}", step.id);
        let steps = self
            .complete(&prompts::revise_message(step, instruction))
            .await?;
        steps.into_iter().next().ok_or_else(|| {
            GenerationFailure::MalformedOutput("response contained no steps".to_string())
        })
    }
}

/// Extracts `error.message` from an OpenAI-style error body, falling back to
/// the raw body.
fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
