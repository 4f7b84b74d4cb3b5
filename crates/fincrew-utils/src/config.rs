//! Environment configuration
//!
//! API credentials and model selection are read from the process
//! environment. Binaries load a `.env` file before calling
//! [`EnvConfig::from_env`].

use std::fmt;
use thiserror::Error;

/// Environment variable holding the chat-completions API key
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the Serper search API key
pub const SERPER_API_KEY: &str = "SERPER_API_KEY";
/// Environment variable overriding the model name
pub const OPENAI_MODEL_NAME: &str = "OPENAI_MODEL_NAME";
/// Environment variable overriding the API base URL
pub const OPENAI_API_BASE: &str = "OPENAI_API_BASE";

/// Model used when `OPENAI_MODEL_NAME` is not set
pub const DEFAULT_MODEL_NAME: &str = "gpt-4o-mini";
/// Base URL used when `OPENAI_API_BASE` is not set
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required keys are absent
    #[error("{}", missing_keys_message(.0))]
    MissingKeys(Vec<&'static str>),
}

fn missing_keys_message(keys: &[&'static str]) -> String {
    let mut message = keys
        .iter()
        .map(|k| format!("{k} not found in environment variables. Please check your .env file."))
        .collect::<Vec<_>>()
        .join("\n");
    message.push_str(
        "\n\nMake sure to create a .env file with your API keys in the project root directory.",
    );
    message
}

/// Settings resolved from the environment
#[derive(Clone)]
pub struct EnvConfig {
    /// Chat-completions API key
    pub openai_api_key: String,
    /// Serper search API key
    pub serper_api_key: String,
    /// Requested model name (not yet checked against any allow-list)
    pub model_name: String,
    /// Chat-completions base URL
    pub api_base: String,
}

impl EnvConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup
    ///
    /// Empty values count as absent. Every missing required key is
    /// reported in a single error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = get(OPENAI_API_KEY);
        let serper_api_key = get(SERPER_API_KEY);

        let mut missing = Vec::new();
        if openai_api_key.is_none() {
            missing.push(OPENAI_API_KEY);
        }
        if serper_api_key.is_none() {
            missing.push(SERPER_API_KEY);
        }

        match (openai_api_key, serper_api_key) {
            (Some(openai_api_key), Some(serper_api_key)) => Ok(Self {
                openai_api_key,
                serper_api_key,
                model_name: get(OPENAI_MODEL_NAME)
                    .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
                api_base: get(OPENAI_API_BASE).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            }),
            _ => Err(ConfigError::MissingKeys(missing)),
        }
    }
}

impl fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvConfig")
            .field("openai_api_key", &"<redacted>")
            .field("serper_api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("api_base", &self.api_base)
            .finish()
    }
}
