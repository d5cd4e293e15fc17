//! The directions provider seam and shared upstream plumbing.
//!
//! Each provider turns a validated [`RouteRequest`] into one outbound HTTP
//! request. [`Upstream`] executes it under the retry policy and translates
//! every failure into [`RouteError::Upstream`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use serde_json::Value;
use thiserror::Error;

use crate::config::{PlannerConfig, ProviderKind};
use crate::directions::error::RouteError;
use crate::directions::graphhopper::GraphHopperProvider;
use crate::directions::mapbox::MapboxProvider;
use crate::directions::request::RouteRequest;
use crate::observability::metrics;
use crate::resilience::{is_retryable, upstream_client, upstream_deadline, RetryPolicy};

/// A routing engine that can answer a route request.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Issue the outbound call and return the provider's body unmodified.
    async fn route(&self, request: &RouteRequest) -> Result<RouteResult, RouteError>;
}

/// The provider's response body, known to be JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    body: Bytes,
}

impl RouteResult {
    /// Wrap a provider body, rejecting anything that is not JSON.
    pub fn from_bytes(body: Bytes) -> Result<Self, serde_json::Error> {
        serde_json::from_slice::<serde::de::IgnoredAny>(&body)?;
        Ok(Self { body })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Errors building a provider at startup.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("invalid provider URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Build the provider selected by configuration.
pub fn build_provider(
    config: &PlannerConfig,
) -> Result<Arc<dyn DirectionsProvider>, ProviderBuildError> {
    let client = upstream_client(&config.timeouts, config.provider.system_proxy)?;
    let retry = RetryPolicy::from_config(&config.retries);
    let deadline = upstream_deadline(&config.timeouts);

    let provider: Arc<dyn DirectionsProvider> = match config.provider.kind {
        ProviderKind::GraphHopper => Arc::new(GraphHopperProvider::new(
            &config.graphhopper,
            Upstream::new(ProviderKind::GraphHopper, client, retry).with_deadline(deadline),
        )?),
        ProviderKind::Mapbox => Arc::new(MapboxProvider::new(
            &config.mapbox,
            config.mapbox.effective_token(&config.map),
            Upstream::new(ProviderKind::Mapbox, client, retry).with_deadline(deadline),
        )?),
    };

    tracing::info!(provider = %config.provider.kind, "Directions provider ready");
    Ok(provider)
}

/// HTTP client plus retry policy for one provider.
#[derive(Debug, Clone)]
pub struct Upstream {
    kind: ProviderKind,
    client: reqwest::Client,
    retry: RetryPolicy,
    deadline: Option<Duration>,
}

impl Upstream {
    pub fn new(kind: ProviderKind, client: reqwest::Client, retry: RetryPolicy) -> Self {
        Self {
            kind,
            client,
            retry,
            deadline: None,
        }
    }

    /// Bound every call, retries and backoff included, by `deadline`.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Execute a request, retrying idempotent calls per the policy.
    pub async fn execute(&self, request: reqwest::Request) -> Result<RouteResult, RouteError> {
        let Some(deadline) = self.deadline else {
            return self.execute_attempts(request).await;
        };

        match tokio::time::timeout(deadline, self.execute_attempts(request)).await {
            Ok(result) => result,
            Err(_) => {
                let provider = self.kind.as_str();
                metrics::record_upstream_attempt(provider, "deadline");
                tracing::error!(provider, deadline = ?deadline, "Upstream deadline exceeded");
                Err(RouteError::upstream(format!(
                    "{provider} request timed out after {:.1}s",
                    deadline.as_secs_f64()
                )))
            }
        }
    }

    async fn execute_attempts(&self, request: reqwest::Request) -> Result<RouteResult, RouteError> {
        let provider = self.kind.as_str();
        let method = request.method().clone();
        let max_attempts = self.retry.attempts_for(&method);
        let mut attempts = 0;

        loop {
            attempts += 1;
            // Bodies are built from in-memory JSON, so cloning only fails for streams.
            let attempt = match request.try_clone() {
                Some(req) => req,
                None => return Err(RouteError::upstream(format!(
                    "{provider} request could not be replayed"
                ))),
            };

            match self.client.execute(attempt).await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        metrics::record_upstream_attempt(provider, "success");
                        let body = response.bytes().await.map_err(|e| {
                            RouteError::upstream(format!(
                                "{provider} response could not be read: {}",
                                e.without_url()
                            ))
                        })?;
                        return RouteResult::from_bytes(body).map_err(|e| {
                            tracing::error!(provider, error = %e, "Provider returned non-JSON body");
                            RouteError::upstream(format!("{provider} returned invalid JSON: {e}"))
                        });
                    }

                    metrics::record_upstream_attempt(provider, "http_error");
                    if attempts < max_attempts && is_retryable(&method, Some(status), false) {
                        let delay = self.retry.backoff(attempts);
                        tracing::info!(provider, attempt = attempts, delay = ?delay, status = %status, "Retrying route request");
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    let text = response.text().await.unwrap_or_default();
                    tracing::warn!(provider, status = %status, attempt = attempts, "Provider returned error status");
                    return Err(RouteError::upstream(format!(
                        "{provider} returned {status}: {}",
                        error_detail(&text)
                    )));
                }
                Err(e) => {
                    // The URL carries the API key; strip it before it reaches logs or clients.
                    let e = e.without_url();
                    let outcome = if e.is_timeout() { "timeout" } else { "network_error" };
                    metrics::record_upstream_attempt(provider, outcome);
                    tracing::error!(provider, attempt = attempts, error = %e, "Upstream error");

                    if attempts < max_attempts && is_retryable(&method, None, true) {
                        let delay = self.retry.backoff(attempts);
                        tracing::info!(provider, attempt = attempts, delay = ?delay, "Retrying after network error");
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    let message = if e.is_timeout() {
                        format!("{provider} request timed out: {e}")
                    } else {
                        format!("{provider} request failed: {e}")
                    };
                    return Err(RouteError::upstream(message));
                }
            }
        }
    }
}

/// Pull the human-readable message out of a provider error body.
///
/// GraphHopper and Mapbox both answer errors with `{"message": "..."}`;
/// anything else is relayed as trimmed text.
fn error_detail(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(message)) = map.get("message") {
            return message.clone();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        trimmed.to_string()
    }
}
