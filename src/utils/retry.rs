//! Retry utilities for resilient API calls
//!
//! Bounded exponential backoff shared by the identifier resolver and the
//! comment aggregator. Only errors the caller marks as transient are retried;
//! an authoritative "not found" from the API returns immediately.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Base delay in milliseconds for exponential backoff
    pub base_delay_ms: u64,

    /// Maximum delay in milliseconds (caps exponential growth)
    pub max_delay_ms: u64,

    /// Multiplier for exponential backoff (default: 2.0)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with custom max retries
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Create a retry configuration with custom delays
    pub fn with_delays(max_retries: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms,
            backoff_multiplier: 2.0,
        }
    }

    /// No retries at all
    pub fn disabled() -> Self {
        Self::new(0)
    }

    /// Delay before the given attempt (attempt 0 is the first try)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let delay_ms = if attempt == 0 {
            0
        } else {
            let exponential =
                self.base_delay_ms as f64 * self.backoff_multiplier.powi((attempt - 1) as i32);
            (exponential as u64).min(self.max_delay_ms)
        };

        Duration::from_millis(delay_ms)
    }
}

/// Execute an operation, retrying errors accepted by `should_retry`
///
/// # Arguments
///
/// * `config` - Retry configuration
/// * `operation` - Async operation to retry
/// * `should_retry` - Predicate deciding whether an error is worth another attempt
///
/// # Returns
///
/// Returns `Ok(T)` on success, the first non-retryable error, or the last
/// error once all retries are exhausted
///
/// # Example
///
/// ```no_run
/// use bangumi_score::utils::error::FetchError;
/// use bangumi_score::utils::retry::{with_retry_if, RetryConfig};
///
/// async fn fetch_stat() -> Result<u64, FetchError> {
///     Ok(42)
/// }
///
/// # async fn example() -> Result<(), FetchError> {
/// let config = RetryConfig::default();
/// let views = with_retry_if(&config, fetch_stat, FetchError::is_transient).await?;
/// # Ok(())
/// # }
/// ```
pub async fn with_retry_if<T, E, F, Fut, P>(
    config: &RetryConfig,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(attempt = attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) => {
                if !should_retry(&e) {
                    return Err(e);
                }

                if attempt >= config.max_retries {
                    warn!(
                        attempt = attempt,
                        max_retries = config.max_retries,
                        error = %e,
                        "Retries exhausted"
                    );
                    return Err(e);
                }

                attempt += 1;
                let delay = config.delay_for(attempt);
                warn!(
                    attempt = attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Operation failed, will retry"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
