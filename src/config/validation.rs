//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the selected provider has its secret
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Keep the retry budget inside the inbound request timeout
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PlannerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::schema::{PlannerConfig, ProviderKind};
use crate::resilience::timeouts::{upstream_budget, DEADLINE_MARGIN};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("retries.base_delay_ms ({base}) exceeds retries.max_delay_ms ({max})")]
    BackoffRange { base: u64, max: u64 },

    #[error(
        "timeouts.request_secs ({request_secs}s) must exceed the worst-case upstream time \
         ({budget_ms}ms for every attempt and backoff) by at least {margin_ms}ms"
    )]
    RetryBudget {
        request_secs: u64,
        budget_ms: u128,
        margin_ms: u128,
    },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &PlannerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.map.access_token.trim().is_empty() {
        errors.push(ValidationError::Missing { field: "map.access_token" });
    }

    match config.provider.kind {
        ProviderKind::GraphHopper => {
            if config.graphhopper.api_key.trim().is_empty() {
                errors.push(ValidationError::Missing { field: "graphhopper.api_key" });
            }
            check_url(&mut errors, "graphhopper.base_url", &config.graphhopper.base_url);
            if config.graphhopper.profile.trim().is_empty() {
                errors.push(ValidationError::Missing { field: "graphhopper.profile" });
            }
        }
        ProviderKind::Mapbox => {
            // An empty directions token falls back to the map token checked above.
            check_url(&mut errors, "mapbox.base_url", &config.mapbox.base_url);
            if config.mapbox.profile.trim().is_empty() {
                errors.push(ValidationError::Missing { field: "mapbox.profile" });
            }
        }
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.connect_secs", timeouts.connect_secs),
        ("timeouts.upstream_secs", timeouts.upstream_secs),
        ("timeouts.request_secs", timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if config.retries.enabled {
        if config.retries.max_attempts == 0 {
            errors.push(ValidationError::Zero { field: "retries.max_attempts" });
        }
        if config.retries.base_delay_ms > config.retries.max_delay_ms {
            errors.push(ValidationError::BackoffRange {
                base: config.retries.base_delay_ms,
                max: config.retries.max_delay_ms,
            });
        }
    }

    if timeouts.request_secs > 0 {
        let budget = upstream_budget(timeouts, &config.retries);
        if budget + DEADLINE_MARGIN >= Duration::from_secs(timeouts.request_secs) {
            errors.push(ValidationError::RetryBudget {
                request_secs: timeouts.request_secs,
                budget_ms: budget.as_millis(),
                margin_ms: DEADLINE_MARGIN.as_millis(),
            });
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero { field: "security.max_body_size" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> PlannerConfig {
        let mut config = PlannerConfig::default();
        config.graphhopper.api_key = "gh-key".into();
        config.map.access_token = "pk.test".into();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_secrets_are_reported_together() {
        let config = PlannerConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::Missing { field: "map.access_token" }));
        assert!(errors.contains(&ValidationError::Missing { field: "graphhopper.api_key" }));
    }

    #[test]
    fn test_mapbox_does_not_need_graphhopper_key() {
        let mut config = valid_config();
        config.graphhopper.api_key.clear();
        config.provider.kind = ProviderKind::Mapbox;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_ranges_and_addresses() {
        let mut config = valid_config();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.upstream_secs = 0;
        config.retries.base_delay_ms = 5000;
        config.graphhopper.base_url = "ftp://example.com".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero { field: "timeouts.upstream_secs" }));
        assert!(errors.contains(&ValidationError::BackoffRange { base: 5000, max: 2000 }));
    }

    #[test]
    fn test_disabled_retries_skip_backoff_checks() {
        let mut config = valid_config();
        config.retries.enabled = false;
        config.retries.max_attempts = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_retry_budget_must_fit_request_timeout() {
        let mut config = valid_config();
        config.timeouts.upstream_secs = 1;
        config.timeouts.request_secs = 2;
        config.retries.max_attempts = 3;
        config.retries.base_delay_ms = 10;
        config.retries.max_delay_ms = 50;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::RetryBudget {
                request_secs: 2,
                budget_ms: 3_000 + 2 * 55,
                margin_ms: 500,
            }]
        );

        config.timeouts.request_secs = 4;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_single_attempt_budget_when_retries_disabled() {
        let mut config = valid_config();
        config.timeouts.upstream_secs = 30;
        config.timeouts.request_secs = 31;
        config.retries.enabled = false;
        assert!(validate_config(&config).is_ok());

        config.retries.enabled = true;
        assert!(matches!(
            validate_config(&config).unwrap_err().as_slice(),
            [ValidationError::RetryBudget { request_secs: 31, .. }]
        ));
    }
}
