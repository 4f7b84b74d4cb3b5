//! Retry logic for rate-limited operations
//!
//! [`RetryPolicy`] wraps any zero-argument async operation. Failures whose
//! message is classified as a rate limit are retried with exponential
//! backoff plus jitter; every other failure is returned immediately.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Lower-cased markers identifying a rate-limit failure
const RATE_LIMIT_MARKERS: &[&str] = &["rate limit", "too many requests"];

/// Default number of attempts before giving up on rate limits
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Whether an error message describes a rate-limit failure
///
/// Case-insensitive substring match against "rate limit" and
/// "too many requests".
pub fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    RATE_LIMIT_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Outcome of a failed [`RetryPolicy::execute`]
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every attempt hit a rate limit
    #[error("Maximum retry attempts reached for API rate limits")]
    Exhausted {
        attempts: u32,
        #[source]
        last: E,
    },

    /// A failure that is not retried, returned as produced
    #[error(transparent)]
    Failed(E),
}

impl<E> RetryError<E> {
    /// The underlying operation error
    pub fn into_inner(self) -> E {
        match self {
            Self::Exhausted { last, .. } => last,
            Self::Failed(e) => e,
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts that may fail with a rate limit
    pub max_retries: u32,

    /// Backoff unit; the wait after the n-th rate limit is
    /// `unit * 2^n + unit * uniform(0, 1)`
    pub backoff_unit: Duration,

    /// Decides from an error message whether the failure is retryable
    pub classifier: fn(&str) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_unit: Duration::from_secs(1),
            classifier: is_rate_limit_message,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt bound and one-second backoff unit
    ///
    /// The operation always runs at least once, so a bound of zero is
    /// treated as one.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.max(1),
            ..Self::default()
        }
    }

    /// Create a policy with millisecond backoff (for testing)
    pub fn fast() -> Self {
        Self {
            backoff_unit: Duration::from_millis(1),
            ..Self::default()
        }
    }

    /// Replace the attempt bound
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Replace the backoff unit
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Replace the error classifier
    pub fn with_classifier(mut self, classifier: fn(&str) -> bool) -> Self {
        self.classifier = classifier;
        self
    }

    /// Deterministic part of the wait after `retry_count` rate limits
    fn base_backoff(&self, retry_count: u32) -> Duration {
        self.backoff_unit
            .saturating_mul(2_u32.saturating_pow(retry_count))
    }

    fn backoff_with_jitter(&self, retry_count: u32) -> Duration {
        self.base_backoff(retry_count) + self.backoff_unit.mul_f64(fastrand::f64())
    }

    /// Execute an async operation, retrying rate-limit failures
    ///
    /// # Arguments
    ///
    /// * `operation_name` - Name of the operation (for logging)
    /// * `operation` - Async operation to execute
    ///
    /// # Returns
    ///
    /// The first success, [`RetryError::Failed`] with the untouched error
    /// for a non-retryable failure, or [`RetryError::Exhausted`] once
    /// `max_retries` attempts have all been rate limited.
    pub async fn execute<F, Fut, T, E>(
        &self,
        operation_name: &str,
        mut operation: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut retry_count = 0;

        loop {
            match operation().await {
                Ok(value) => {
                    if retry_count > 0 {
                        debug!(
                            "Operation '{}' succeeded after {} retries",
                            operation_name, retry_count
                        );
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !(self.classifier)(&error.to_string()) {
                        debug!(
                            "Operation '{}' failed with non-retryable error",
                            operation_name
                        );
                        return Err(RetryError::Failed(error));
                    }

                    retry_count += 1;
                    if retry_count >= self.max_retries {
                        warn!(
                            "Operation '{}' still rate limited after {} attempts: {}",
                            operation_name, retry_count, error
                        );
                        return Err(RetryError::Exhausted {
                            attempts: retry_count,
                            last: error,
                        });
                    }

                    let wait = self.backoff_with_jitter(retry_count);
                    warn!(
                        attempt = retry_count,
                        max = self.max_retries,
                        "Rate limit hit. Retrying in {:.2} seconds...",
                        wait.as_secs_f64()
                    );
                    sleep(wait).await;
                }
            }
        }
    }
}

/// Run `operation` under a default policy with `max_retries` attempts
pub async fn execute_with_retry<F, Fut, T, E>(
    operation: F,
    max_retries: u32,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    RetryPolicy::new(max_retries)
        .execute("operation", operation)
        .await
}
