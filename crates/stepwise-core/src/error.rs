//! Error types for the stepwise library.
//!
//! Plan store transitions never fail; these errors come from the session
//! boundary (input validation, generation) and from I/O around it
//! (configuration, export).

use std::path::PathBuf;

use thiserror::Error;

use crate::generation::GenerationFailure;

/// Comprehensive error type for stepwise operations.
#[derive(Error, Debug)]
pub enum StepwiseError {
    /// The plan generation service failed
    #[error(transparent)]
    Generation(#[from] GenerationFailure),
    /// An operation needs a current plan but none exists
    #[error("No plan has been created yet")]
    NoCurrentPlan,
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> StepwiseError {
        StepwiseError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl StepwiseError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Whether the error came from the generation service.
    pub fn is_generation_failure(&self) -> bool {
        matches!(self, StepwiseError::Generation(_))
    }
}

/// Result type alias for stepwise operations
pub type Result<T> = std::result::Result<T, StepwiseError>;
