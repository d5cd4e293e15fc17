//! Retry logic.
//!
//! # Responsibilities
//! - Determine if an upstream call is retryable (idempotent methods only)
//! - Decide how many attempts a call gets and how long to wait between them
//!
//! # Design Decisions
//! - Never retry POST (the GraphHopper custom-model call is a POST)
//! - Connection errors, timeouts, 429 and 5xx are retryable
//! - Jittered backoff prevents synchronized retries

use std::time::Duration;

use reqwest::{Method, StatusCode};

use crate::config::RetryConfig;
use crate::resilience::backoff::calculate_backoff;

/// Bounded retry policy for upstream calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        if !config.enabled {
            return Self::none();
        }
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }

    /// Number of attempts allowed for a call with this method.
    pub fn attempts_for(&self, method: &Method) -> u32 {
        if is_idempotent(method) {
            self.max_attempts
        } else {
            1
        }
    }

    /// Delay before the next attempt, given how many attempts were made.
    pub fn backoff(&self, attempts_made: u32) -> Duration {
        calculate_backoff(attempts_made, self.base_delay_ms, self.max_delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Whether a failed attempt may be retried.
///
/// `status` is `None` when the attempt failed before a response arrived.
pub fn is_retryable(method: &Method, status: Option<StatusCode>, network_error: bool) -> bool {
    if !is_idempotent(method) {
        return false;
    }
    if network_error {
        return true;
    }
    match status {
        Some(status) => status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error(),
        None => false,
    }
}
