//! Error types for crew orchestration

use thiserror::Error;

/// Result type alias for fincrew-core
pub type Result<T> = std::result::Result<T, CrewError>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by an execution engine
///
/// The message is what retry classification inspects; the optional source
/// keeps the engine's original error available to callers.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl EngineError {
    /// Create an error from a message alone
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, reusing its display text as the message
    pub fn from_source<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// Error message as reported by the engine
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced by an analysis run
#[derive(Debug, Error)]
pub enum CrewError {
    /// A required input parameter is missing or empty
    #[error("Missing required parameter: {field}")]
    Validation { field: String },

    /// Every attempt failed with a rate-limit error
    #[error("Maximum retry attempts reached for API rate limits")]
    RetryExhausted {
        attempts: u32,
        #[source]
        last: EngineError,
    },

    /// Any other engine failure, passed through unchanged
    #[error(transparent)]
    Execution(#[from] EngineError),

    /// The crew could not be put together
    #[error("Crew assembly failed: {0}")]
    Assembly(String),
}

impl CrewError {
    /// Shorthand for a validation failure on `field`
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
        }
    }

    /// Whether the failure came from exhausted rate-limit retries
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RetryExhausted { .. })
    }
}
