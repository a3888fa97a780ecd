//! Retry policy with exponential backoff and jitter.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

/// How many times to attempt an operation and how long to wait in between.
///
/// After the `n`-th failed attempt (1-based) the helper sleeps
/// `base_delay * factor^n` plus a uniformly random jitter in `[0, jitter]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub factor: f64,
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(300),
            factor: 2.0,
            jitter: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Policy used by the floor-proxy edge: 3 attempts, 900 ms then 2.7 s.
    pub fn edge() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(300),
            factor: 3.0,
            jitter: Duration::ZERO,
        }
    }

    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            factor: 1.0,
            jitter: Duration::ZERO,
        }
    }

    /// Deterministic part of the delay after `failures` failed attempts.
    pub fn backoff(&self, failures: u32) -> Duration {
        let scale = self.factor.max(0.0).powi(failures as i32);
        Duration::from_nanos((self.base_delay.as_nanos() as f64 * scale).round() as u64)
    }

    /// Full delay after `failures` failed attempts, jitter included.
    pub fn delay_for(&self, failures: u32) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
        };
        self.backoff(failures) + jitter
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Run `op` until it succeeds, returns a non-retryable error, or the attempt
/// budget is spent.
///
/// `op` receives the 0-based attempt number. `is_retryable` decides whether
/// an error is worth another attempt; the first non-retryable error is
/// returned immediately. Sleeping uses `tokio::time::sleep` and never blocks
/// the executor.
pub async fn retry_with_policy<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    is_retryable: R,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
{
    let attempts = policy.attempts();
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if attempt >= attempts || !is_retryable(&err) {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                debug!(attempt, ?delay, "retrying after failure");
                tokio::time::sleep(delay).await;
            }
        }
    }
}
