use std::fmt::Display;
use std::future::Future;

use rand::Rng;
use tokio::time::{sleep, Duration};

use crate::logging::{log, obj, v_num, v_str, Domain, Level};

/// Retry configuration
#[derive(Clone, Debug)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 200,
            max_delay_ms: 5000,
            jitter_factor: 0.3,
        }
    }
}

impl RetryConfig {
    /// Exponential backoff clamped to `max_delay_ms`, then ±`jitter_factor`.
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.base_delay_ms as f64 * 2.0_f64.powi(attempt as i32);
        let clamped = base.min(self.max_delay_ms as f64);

        let jitter_range = clamped * self.jitter_factor;
        let jitter: f64 = if jitter_range > 0.0 {
            rand::thread_rng().gen_range(-jitter_range..=jitter_range)
        } else {
            0.0
        };
        let final_delay = (clamped + jitter).max(0.0);

        Duration::from_millis(final_delay as u64)
    }
}

/// Retry an async operation with exponential backoff while `should_retry`
/// accepts the error. Returns the last error once attempts run out.
pub async fn retry_async_if<F, Fut, T, E, P>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt >= config.max_retries || !should_retry(&e) {
                    return Err(e);
                }
                let delay = config.delay_for_attempt(attempt);
                log(
                    Level::Warn,
                    Domain::Fetch,
                    "retry",
                    obj(&[
                        ("operation", v_str(operation_name)),
                        ("attempt", v_num((attempt + 1) as f64)),
                        ("max_attempts", v_num((config.max_retries + 1) as f64)),
                        ("error", v_str(&e.to_string())),
                        ("delay_ms", v_num(delay.as_millis() as f64)),
                    ]),
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

pub fn is_retryable_http_error(status: u16) -> bool {
    matches!(status,
        408 |   // Request Timeout
        429 |   // Too Many Requests
        500 |   // Internal Server Error
        502 |   // Bad Gateway
        503 |   // Service Unavailable
        504     // Gateway Timeout
    )
}

pub fn is_retryable_network_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
