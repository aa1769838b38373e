//! Retry policy for archive requests.
//!
//! Retried: network errors, 5xx responses and 429 rate limiting.
//! Not retried: every other non-success status.

use log::debug;
use reqwest::StatusCode;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 0.2;
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(120);

/// Bounded exponential backoff.
///
/// The delay after failed attempt `n` (1-based) is `backoff_factor * 2^(n-1)` seconds,
/// capped at `max_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Base delay in seconds.
    pub backoff_factor: f64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_factor: f64) -> Self {
        Self {
            max_attempts,
            backoff_factor,
            ..Self::default()
        }
    }

    /// Delay to wait after `failed_attempt` (1-based) before trying again.
    pub fn delay_after(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1).min(63) as i32;
        let secs = self.backoff_factor * 2f64.powi(exponent);
        let capped = secs.min(self.max_delay.as_secs_f64()).max(0.0);
        Duration::from_secs_f64(capped)
    }

    /// Attempts actually made; a policy of zero still makes one.
    pub(crate) fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

pub fn is_retryable_status(status: StatusCode) -> RetryDecision {
    if status.is_server_error() {
        debug!("Server error ({}), will retry", status);
        return RetryDecision::Retry;
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        debug!("Rate limited (429), will retry");
        return RetryDecision::Retry;
    }
    RetryDecision::NoRetry
}

/// Whether a failed `send` is worth retrying. Only errors raised while building
/// the request are permanent.
pub fn is_retryable_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_builder() {
        return RetryDecision::NoRetry;
    }
    if let Some(status) = error.status() {
        return is_retryable_status(status);
    }
    RetryDecision::Retry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.backoff_factor, 0.2);
    }

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_millis(200));
        assert_eq!(policy.delay_after(2), Duration::from_millis(400));
        assert_eq!(policy.delay_after(3), Duration::from_millis(800));
        assert_eq!(policy.delay_after(4), Duration::from_millis(1600));
    }

    #[test]
    fn test_delay_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(20), DEFAULT_MAX_DELAY);
        assert_eq!(policy.delay_after(u32::MAX), DEFAULT_MAX_DELAY);
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        assert_eq!(RetryPolicy::new(0, 0.2).attempts(), 1);
    }

    #[test]
    fn test_retryable_status_codes() {
        assert_eq!(is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR), RetryDecision::Retry);
        assert_eq!(is_retryable_status(StatusCode::BAD_GATEWAY), RetryDecision::Retry);
        assert_eq!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE), RetryDecision::Retry);
        assert_eq!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS), RetryDecision::Retry);

        assert_eq!(is_retryable_status(StatusCode::BAD_REQUEST), RetryDecision::NoRetry);
        assert_eq!(is_retryable_status(StatusCode::NOT_FOUND), RetryDecision::NoRetry);
        assert_eq!(is_retryable_status(StatusCode::FORBIDDEN), RetryDecision::NoRetry);
        assert_eq!(is_retryable_status(StatusCode::OK), RetryDecision::NoRetry);
    }
}
