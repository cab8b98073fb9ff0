//! Bounded retry around an injected attempt.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::{ProviderError, ResolveError};

/// Retry schedule for upstream attempts.
///
/// Rate-limit signals are honoured by sleeping the suggested wait, provided it
/// does not exceed `max_suggested_wait`. Other failures back off
/// exponentially from `backoff_base`. Sleeps happen between attempts, so
/// nothing an attempt acquires is held while waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Longest rate-limit wait honoured before giving up.
    pub max_suggested_wait: Duration,
    /// Backoff before the second attempt; doubles each time after.
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            max_suggested_wait: Duration::from_secs(5),
            backoff_base: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Pause after failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.backoff_base.saturating_mul(1u32 << exponent)
    }

    /// Run `attempt` until it succeeds or the budget is spent.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, ResolveError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut made = 0;
        loop {
            made += 1;
            let err = match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let pause = match &err {
                ProviderError::RateLimited { retry_after } => {
                    if *retry_after > self.max_suggested_wait {
                        warn!(?retry_after, "upstream wait exceeds cap, giving up");
                        return Err(ResolveError::WaitTooLong {
                            retry_after: *retry_after,
                            cap: self.max_suggested_wait,
                        });
                    }
                    *retry_after
                }
                ProviderError::Transient(_) | ProviderError::Timeout(_) => self.backoff(made),
            };

            if made >= max_attempts {
                warn!(attempts = made, error = %err, "retry budget exhausted");
                return Err(ResolveError::Exhausted {
                    attempts: made,
                    last: err,
                });
            }

            warn!(attempt = made, error = %err, ?pause, "upstream attempt failed, retrying");
            tokio::time::sleep(pause).await;
        }
    }
}
