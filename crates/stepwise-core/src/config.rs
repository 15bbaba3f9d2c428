//! Configuration for the plan generation service.
//!
//! Values are resolved in order: built-in defaults, then a JSON config file
//! (an explicit path, or `$XDG_CONFIG_HOME/stepwise/config.json` when it
//! exists), then the `STEPWISE_MODEL` and `STEPWISE_BASE_URL` environment
//! variables. The API key itself is never stored in the file; only the name
//! of the environment variable that holds it.

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StepwiseError};

/// Environment variable overriding the model name.
pub const MODEL_ENV: &str = "STEPWISE_MODEL";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "STEPWISE_BASE_URL";

/// Settings for the chat-completion client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneratorConfig {
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    pub api_key_env: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4-turbo-preview".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.7,
            timeout_ms: 60_000,
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from `path`, or from the default location.
    ///
    /// # Errors
    ///
    /// Returns `StepwiseError::FileSystem` if an explicit file cannot be read,
    /// and `StepwiseError::Serialization` if a file is not valid JSON. A
    /// missing default file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_config_path().filter(|path| path.exists()),
        };

        let config = match file {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("config: no config file, using defaults");
                Self::default()
            }
        };

        Ok(config.with_env_overrides())
    }

    /// Reads a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("config: loading {}", path.display());
        let raw = fs::read_to_string(path).map_err(|e| StepwiseError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Applies `STEPWISE_MODEL` / `STEPWISE_BASE_URL` when set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(model) = non_empty_var(MODEL_ENV) {
            self.model = model;
        }
        if let Some(base_url) = non_empty_var(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        self
    }

    /// Sets the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Reads the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        non_empty_var(&self.api_key_env)
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the default config file path following the XDG Base
    /// Directory specification, when a home directory is known.
    fn default_config_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("stepwise").get_config_file("config.json")
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
