use moltfilter_core::{CoreError, MoltbookApiError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Base delay for exponential backoff (in milliseconds)
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds)
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    pub fn moltbook(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms: 500,
            max_delay_ms: 10000,
            jitter_factor: 0.2,
            ..Default::default()
        }
    }

    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetryStrategy {
    /// Retry with exponential backoff
    Retry,
    /// Retry after a server-specified delay
    RetryWithDelay(Duration),
    /// Don't retry (for permanent failures)
    NoRetry,
}

pub fn get_retry_strategy(error: &CoreError) -> RetryStrategy {
    match error {
        CoreError::MoltbookApi(api_error) => match api_error {
            MoltbookApiError::RateLimitExceeded { retry_after } => {
                RetryStrategy::RetryWithDelay(Duration::from_secs(*retry_after))
            }
            MoltbookApiError::ServerError { .. } => RetryStrategy::Retry,
            MoltbookApiError::RequestTimeout => RetryStrategy::Retry,
            // A malformed page is not going to fix itself
            MoltbookApiError::InvalidResponse { .. } => RetryStrategy::NoRetry,
            MoltbookApiError::InvalidApiKey => RetryStrategy::NoRetry,
            MoltbookApiError::Forbidden { .. } => RetryStrategy::NoRetry,
            MoltbookApiError::SubmoltNotFound { .. } => RetryStrategy::NoRetry,
            MoltbookApiError::RequestRejected { .. } => RetryStrategy::NoRetry,
        },
        CoreError::Network(reqwest_error) => {
            if reqwest_error.is_timeout() || reqwest_error.is_connect() {
                RetryStrategy::Retry
            } else {
                RetryStrategy::NoRetry
            }
        }
        CoreError::Timeout { .. } => RetryStrategy::Retry,
        _ => RetryStrategy::NoRetry,
    }
}

/// Calculate delay with exponential backoff and jitter
pub fn calculate_delay(attempt: u32, config: &RetryConfig) -> Duration {
    let base_delay = Duration::from_millis(config.base_delay_ms);
    let max_delay = Duration::from_millis(config.max_delay_ms);

    let exponential_delay = if attempt == 0 {
        base_delay
    } else {
        let multiplier = config.backoff_multiplier.powi(attempt as i32);
        let delay_ms = (config.base_delay_ms as f64 * multiplier) as u64;
        Duration::from_millis(delay_ms.min(config.max_delay_ms))
    };

    let jitter_range = (exponential_delay.as_millis() as f64 * config.jitter_factor) as u64;
    let jitter = fastrand::u64(0..=jitter_range);
    let final_delay = exponential_delay + Duration::from_millis(jitter);

    final_delay.min(max_delay)
}

#[derive(Debug, Clone, Default)]
pub struct RetryMetrics {
    pub total_retries: u64,
    pub successful_retries: u64,
    pub failed_operations: u64,
}

/// Wraps fallible async operations with retry logic.
#[derive(Debug)]
pub struct RetryExecutor {
    config: RetryConfig,
    metrics: Arc<Mutex<RetryMetrics>>,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(Mutex::new(RetryMetrics::default())),
        }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Run `operation` until it succeeds, fails permanently, or attempts run out.
    ///
    /// The error from the final attempt is returned unchanged.
    pub async fn execute<F, Fut, T>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, CoreError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut attempt = 0u32;
        let mut total_delay_ms = 0u64;

        loop {
            if attempt > 0 {
                debug!("Retry attempt {} for {}", attempt, operation_name);
            }

            let error = match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        self.record(|metrics| {
                            metrics.total_retries += u64::from(attempt);
                            metrics.successful_retries += 1;
                        });
                        info!(
                            "Operation {} succeeded after {} retries (total delay: {}ms)",
                            operation_name, attempt, total_delay_ms
                        );
                    }
                    return Ok(result);
                }
                Err(error) => error,
            };

            let has_attempts_left = attempt + 1 < self.config.max_attempts;
            let delay = match get_retry_strategy(&error) {
                RetryStrategy::Retry if has_attempts_left => {
                    calculate_delay(attempt, &self.config)
                }
                RetryStrategy::RetryWithDelay(delay) if has_attempts_left => delay,
                RetryStrategy::NoRetry => {
                    debug!("Not retrying {} due to error type: {}", operation_name, error);
                    return Err(self.fail(operation_name, attempt, error));
                }
                _ => {
                    debug!("Max retry attempts reached for {}", operation_name);
                    return Err(self.fail(operation_name, attempt, error));
                }
            };

            info!("Retrying {} in {:?} due to: {}", operation_name, delay, error);
            total_delay_ms += delay.as_millis() as u64;
            sleep(delay).await;
            attempt += 1;
        }
    }

    pub fn get_metrics(&self) -> RetryMetrics {
        self.metrics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn fail(&self, operation_name: &str, attempt: u32, error: CoreError) -> CoreError {
        self.record(|metrics| {
            metrics.total_retries += u64::from(attempt);
            metrics.failed_operations += 1;
        });
        error!(
            "Operation {} failed after {} attempts: {}",
            operation_name,
            attempt + 1,
            error
        );
        error
    }

    fn record(&self, update: impl FnOnce(&mut RetryMetrics)) {
        let mut metrics = self
            .metrics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        update(&mut metrics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            base_delay_ms: 1,
            max_delay_ms: 5,
            jitter_factor: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_retry_config_moltbook() {
        let config = RetryConfig::moltbook(4);
        assert_eq!(config.max_attempts, 4);
        assert_eq!(config.base_delay_ms, 500);
        assert_eq!(RetryConfig::moltbook(0).max_attempts, 1);
        assert_eq!(RetryConfig::none().max_attempts, 1);
    }

    #[test]
    fn test_retry_strategy_for_errors() {
        let rate_limit_error =
            CoreError::MoltbookApi(MoltbookApiError::RateLimitExceeded { retry_after: 60 });
        assert_eq!(
            get_retry_strategy(&rate_limit_error),
            RetryStrategy::RetryWithDelay(Duration::from_secs(60))
        );

        let auth_error = CoreError::MoltbookApi(MoltbookApiError::InvalidApiKey);
        assert_eq!(get_retry_strategy(&auth_error), RetryStrategy::NoRetry);

        let malformed = CoreError::MoltbookApi(MoltbookApiError::InvalidResponse {
            details: "missing field `upvotes`".to_string(),
        });
        assert_eq!(get_retry_strategy(&malformed), RetryStrategy::NoRetry);

        let server_error =
            CoreError::MoltbookApi(MoltbookApiError::ServerError { status_code: 502 });
        assert_eq!(get_retry_strategy(&server_error), RetryStrategy::Retry);
    }

    #[test]
    fn test_exponential_backoff_calculation() {
        let config = RetryConfig {
            base_delay_ms: 1000,
            max_delay_ms: 10000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.0,
            ..Default::default()
        };

        assert_eq!(calculate_delay(0, &config), Duration::from_millis(1000));
        assert_eq!(calculate_delay(1, &config), Duration::from_millis(2000));
        assert_eq!(calculate_delay(3, &config), Duration::from_millis(8000));
        assert_eq!(calculate_delay(10, &config), Duration::from_millis(10000));
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let config = RetryConfig {
            base_delay_ms: 1000,
            max_delay_ms: 10000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.5,
            ..Default::default()
        };

        for _ in 0..20 {
            let delay = calculate_delay(1, &config);
            assert!(delay >= Duration::from_millis(2000));
            assert!(delay <= Duration::from_millis(3000));
        }
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let executor = RetryExecutor::new(fast_config(3));

        let result = executor
            .execute("fetch_posts", || async { Ok::<i32, CoreError>(42) })
            .await;

        assert_eq!(result.unwrap(), 42);
        let metrics = executor.get_metrics();
        assert_eq!(metrics.total_retries, 0);
        assert_eq!(metrics.successful_retries, 0);
    }

    #[tokio::test]
    async fn test_success_after_retries() {
        let executor = RetryExecutor::new(fast_config(3));
        let counter = AtomicU32::new(0);
        let attempts = &counter;

        let result = executor
            .execute("fetch_posts", || async move {
                if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(CoreError::MoltbookApi(MoltbookApiError::ServerError {
                        status_code: 500,
                    }))
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        let metrics = executor.get_metrics();
        assert_eq!(metrics.total_retries, 2);
        assert_eq!(metrics.successful_retries, 1);
    }

    #[tokio::test]
    async fn test_no_retry_on_auth_error() {
        let executor = RetryExecutor::new(fast_config(3));
        let counter = AtomicU32::new(0);
        let attempts = &counter;

        let result = executor
            .execute("fetch_posts", || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<i32, CoreError>(CoreError::MoltbookApi(MoltbookApiError::InvalidApiKey))
            })
            .await;

        assert!(matches!(
            result,
            Err(CoreError::MoltbookApi(MoltbookApiError::InvalidApiKey))
        ));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(executor.get_metrics().failed_operations, 1);
    }

    #[tokio::test]
    async fn test_last_error_is_returned_unchanged() {
        let executor = RetryExecutor::new(fast_config(2));
        let counter = AtomicU32::new(0);
        let attempts = &counter;

        let result = executor
            .execute("fetch_posts", || async move {
                let status_code = 500 + attempts.fetch_add(1, Ordering::SeqCst) as u16;
                Err::<i32, CoreError>(CoreError::MoltbookApi(MoltbookApiError::ServerError {
                    status_code,
                }))
            })
            .await;

        assert!(matches!(
            result,
            Err(CoreError::MoltbookApi(MoltbookApiError::ServerError { status_code: 501 }))
        ));
        let metrics = executor.get_metrics();
        assert_eq!(metrics.total_retries, 1);
        assert_eq!(metrics.failed_operations, 1);
    }
}
