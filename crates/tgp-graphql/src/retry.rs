//! Retry policy helpers.

use std::time::Duration;

use rand::Rng;

use crate::error::GraphqlClientError;

/// Retry decision result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after a delay (possibly zero).
    RetryAfter(Duration),
    /// Do not retry.
    DoNotRetry,
}

/// Bounded retry policy for transport failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first one.
    pub max_retries: usize,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Maximum jitter added to each delay.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_jitter: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    /// Retry up to `max_retries` times with no delay.
    #[must_use]
    pub const fn immediate(max_retries: usize) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    /// Never retry.
    #[must_use]
    pub const fn none() -> Self {
        Self::immediate(0)
    }

    /// Same backoff, different bound.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Decide whether to retry after `retries_done` retries have already run.
    #[must_use]
    pub fn decide(&self, error: &GraphqlClientError, retries_done: usize) -> RetryDecision {
        if retries_done >= self.max_retries || !error.is_retryable() {
            return RetryDecision::DoNotRetry;
        }

        if let Some(retry_after) = error.retry_after() {
            return RetryDecision::RetryAfter(retry_after.min(self.max_delay));
        }

        let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
        let exp = 2_u64.saturating_pow(u32::try_from(retries_done).unwrap_or(u32::MAX));
        let max_ms = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);
        let delay_ms = base_ms.saturating_mul(exp).min(max_ms);

        let jitter_ms = if self.max_jitter.is_zero() {
            0
        } else {
            let jitter_max = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
            rand::thread_rng().gen_range(0..=jitter_max)
        };

        RetryDecision::RetryAfter(Duration::from_millis(delay_ms.saturating_add(jitter_ms)))
    }
}
