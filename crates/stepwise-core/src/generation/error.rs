//! Failures of the plan generation service.

use std::time::Duration;

use thiserror::Error;

/// The generation service could not produce a result.
///
/// The `Display` form is the human-readable message shown to the user.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("No API key found: set the {env} environment variable")]
    MissingApiKey { env: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Generation service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Generation service returned malformed output: {0}")]
    MalformedOutput(String),

    #[error("Generation service timed out after {0:?}")]
    Timeout(Duration),
}

impl GenerationFailure {
    /// Human-readable message for the session error state.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether re-dispatching the same request might succeed.
    ///
    /// The core never retries on its own; this only informs the retry offer.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationFailure::Network(_) | GenerationFailure::Timeout(_) => true,
            GenerationFailure::Api { status, .. } => *status == 429 || *status >= 500,
            GenerationFailure::MalformedOutput(_) => true,
            GenerationFailure::MissingApiKey { .. } => false,
        }
    }
}
