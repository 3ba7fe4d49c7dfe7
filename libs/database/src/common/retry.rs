use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Exponential backoff settings for connection attempts
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Scale each delay by a random factor in [0.5, 1.0]
    pub use_jitter: bool,
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings for waiting on a database that starts alongside the service
    /// (e.g. docker compose): 5 retries from 500ms, capped at 10s.
    pub fn startup() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 500,
            max_delay_ms: 10_000,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    fn next_delay(&self, delay: u64) -> u64 {
        ((delay as f64 * self.backoff_multiplier) as u64).min(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Retry an async operation with exponential backoff.
///
/// Returns the last error once `max_retries` is exhausted.
///
/// ```ignore
/// let db = retry_with_backoff(|| postgres::connect(&url), RetryConfig::startup()).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay_ms;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!("Operation succeeded after {} retries", attempt);
                }
                return Ok(result);
            }
            Err(e) => {
                attempt += 1;
                if attempt > config.max_retries {
                    warn!("Operation failed after {} attempts: {}", attempt, e);
                    return Err(e);
                }

                let wait = if config.use_jitter {
                    apply_jitter(delay)
                } else {
                    delay
                };
                warn!(
                    "Attempt {}/{} failed: {}. Retrying in {}ms",
                    attempt,
                    config.max_retries + 1,
                    e,
                    wait
                );

                tokio::time::sleep(Duration::from_millis(wait)).await;
                delay = config.next_delay(delay);
            }
        }
    }
}

/// Scale a delay to 50%..100% of its value
fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let random_factor =
        (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5;

    (delay as f64 * random_factor) as u64
}

/// [`retry_with_backoff`] with [`RetryConfig::default`]
pub async fn retry<F, Fut, T, E>(operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_with_backoff(operation, RetryConfig::default()).await
}
