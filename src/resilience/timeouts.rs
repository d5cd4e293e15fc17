//! Timeout enforcement.
//!
//! # Responsibilities
//! - Build the upstream HTTP client with connect and total-call deadlines
//! - Derive the overall deadline for one route request, retries included
//!
//! # Design Decisions
//! - Every outbound call has a deadline; the client default is never relied on
//! - Timed-out calls surface as upstream errors (500) like any other failure
//! - The retry loop finishes before the inbound request timeout fires

use std::time::Duration;

use crate::config::{RetryConfig, TimeoutConfig};

/// User agent sent to directions providers and geocoders.
pub const USER_AGENT: &str = concat!("bike-planner/", env!("CARGO_PKG_VERSION"));

/// Gap left between the upstream deadline and the inbound request timeout.
pub const DEADLINE_MARGIN: Duration = Duration::from_millis(500);

/// Build an HTTP client honouring the configured upstream deadlines.
pub fn upstream_client(
    config: &TimeoutConfig,
    system_proxy: bool,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(config.connect_secs))
        .timeout(Duration::from_secs(config.upstream_secs));
    if !system_proxy {
        builder = builder.no_proxy();
    }
    builder.build()
}

/// Overall deadline for all attempts of one upstream call.
///
/// Ends [`DEADLINE_MARGIN`] before the inbound request timeout, or halfway
/// through it when the timeout is shorter than the margin.
pub fn upstream_deadline(config: &TimeoutConfig) -> Duration {
    let request = Duration::from_secs(config.request_secs);
    match request.checked_sub(DEADLINE_MARGIN) {
        Some(deadline) if !deadline.is_zero() => deadline,
        _ => request / 2,
    }
}

/// Worst-case duration of an idempotent call: every attempt times out and
/// every backoff wait hits the cap plus its jitter.
pub fn upstream_budget(timeouts: &TimeoutConfig, retries: &RetryConfig) -> Duration {
    let attempts = if retries.enabled {
        retries.max_attempts.max(1)
    } else {
        1
    };
    let waits = u64::from(attempts - 1);
    let max_wait_ms = retries.max_delay_ms.saturating_add(retries.max_delay_ms / 10);

    Duration::from_secs(timeouts.upstream_secs.saturating_mul(u64::from(attempts)))
        + Duration::from_millis(max_wait_ms.saturating_mul(waits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_ends_before_request_timeout() {
        let mut config = TimeoutConfig::default();
        assert_eq!(upstream_deadline(&config), Duration::from_millis(59_500));

        config.request_secs = 2;
        assert_eq!(upstream_deadline(&config), Duration::from_millis(1_500));
    }

    #[test]
    fn test_default_budget_fits_request_timeout() {
        let timeouts = TimeoutConfig::default();
        let budget = upstream_budget(&timeouts, &RetryConfig::default());
        assert_eq!(budget, Duration::from_millis(15_000 * 3 + 2_200 * 2));
        assert!(budget < upstream_deadline(&timeouts));
    }

    #[test]
    fn test_disabled_retries_budget_is_one_attempt() {
        let retries = RetryConfig {
            enabled: false,
            ..RetryConfig::default()
        };
        let budget = upstream_budget(&TimeoutConfig::default(), &retries);
        assert_eq!(budget, Duration::from_secs(15));
    }
}
