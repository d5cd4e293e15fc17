//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP layer and providers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) is attached to every request span
//! - Metrics are cheap (atomic increments) and off by default

pub mod logging;
pub mod metrics;
