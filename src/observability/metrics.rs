//! Metrics collection and exposition.
//!
//! # Metrics
//! - `planner_route_requests_total` (counter): route requests by provider, status
//! - `planner_route_duration_seconds` (histogram): end-to-end latency by provider
//! - `planner_upstream_attempts_total` (counter): provider calls by outcome
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished `/route` request.
pub fn record_route_request(provider: &'static str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!(
        "planner_route_requests_total",
        "provider" => provider,
        "status" => status
    )
    .increment(1);
    metrics::histogram!("planner_route_duration_seconds", "provider" => provider)
        .record(start.elapsed().as_secs_f64());
}

/// Record one attempt against a directions provider.
pub fn record_upstream_attempt(provider: &'static str, outcome: &'static str) {
    metrics::counter!(
        "planner_upstream_attempts_total",
        "provider" => provider,
        "outcome" => outcome
    )
    .increment(1);
}
