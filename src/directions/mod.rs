//! Route request construction and dispatch.
//!
//! # Data Flow
//! ```text
//! POST /route body
//!     → request.rs (RouteBody → validated RouteRequest)
//!     → planner.rs (RoutePlanner::plan)
//!     → provider.rs (DirectionsProvider selected by config)
//!         → graphhopper.rs (POST + custom model JSON)
//!         → mapbox.rs      (GET + query string)
//!     → RouteResult (provider body, unmodified) | RouteError
//! ```
//!
//! Routing semantics live entirely in the provider. Custom model rules are
//! passed through as opaque JSON.

pub mod error;
pub mod graphhopper;
pub mod mapbox;
pub mod planner;
pub mod preferences;
pub mod provider;
pub mod request;
pub mod waypoint;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::RouteError;
pub use planner::RoutePlanner;
pub use preferences::{CustomModel, RoutingPreferences, DEFAULT_MAX_SPEED};
pub use provider::{build_provider, DirectionsProvider, ProviderBuildError, RouteResult};
pub use request::{RouteBody, RouteRequest};
pub use waypoint::Waypoint;
