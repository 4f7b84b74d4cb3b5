//! Configuration for analysis runs

use fincrew_core::RetryPolicy;
use fincrew_core::retry::DEFAULT_MAX_RETRIES;
use fincrew_utils::EnvConfig;
use std::time::Duration;

use crate::models::DEFAULT_MODEL;

/// Configuration for analysis runs
#[derive(Debug, Clone)]
pub struct CrewConfig {
    /// Requested manager model; checked against the allow-list at assembly
    pub model: String,

    /// Manager sampling temperature
    pub temperature: f32,

    /// Attempts allowed for rate-limited engine calls
    pub max_retries: u32,

    /// Backoff unit for rate-limit retries
    pub retry_backoff_unit: Duration,
}

impl Default for CrewConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_unit: Duration::from_secs(1),
        }
    }
}

impl CrewConfig {
    /// Create a new configuration builder
    pub fn builder() -> CrewConfigBuilder {
        CrewConfigBuilder::default()
    }

    /// Configuration using the model named in the environment
    pub fn from_env_config(env: &EnvConfig) -> Self {
        Self {
            model: env.model_name.clone(),
            ..Self::default()
        }
    }

    /// Retry policy for engine calls
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries).with_backoff_unit(self.retry_backoff_unit)
    }
}

/// Builder for CrewConfig
#[derive(Debug, Default)]
pub struct CrewConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_retries: Option<u32>,
    retry_backoff_unit: Option<Duration>,
}

impl CrewConfigBuilder {
    /// Set the manager model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the manager temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set maximum retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the retry backoff unit
    pub fn retry_backoff_unit(mut self, unit: Duration) -> Self {
        self.retry_backoff_unit = Some(unit);
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrewConfig {
        let defaults = CrewConfig::default();

        CrewConfig {
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_unit: self
                .retry_backoff_unit
                .unwrap_or(defaults.retry_backoff_unit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CrewConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_retries, 5);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_builder() {
        let config = CrewConfig::builder()
            .model("gpt-4o")
            .max_retries(2)
            .retry_backoff_unit(Duration::from_millis(1))
            .build();

        assert_eq!(config.model, "gpt-4o");
        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.backoff_unit, Duration::from_millis(1));
    }
}
