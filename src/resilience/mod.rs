//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to directions provider:
//!     → timeouts.rs (client with connect/total deadlines, overall deadline)
//!     → On failure: retries.rs (check if retryable, retry with backoff)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Retries only for idempotent requests (GET, HEAD, OPTIONS)
//! - Attempts are bounded by configuration

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use retries::{is_retryable, RetryPolicy};
pub use timeouts::{upstream_budget, upstream_client, upstream_deadline};
