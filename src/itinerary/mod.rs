//! Overnight stop planning along a route.
//!
//! # Data Flow
//! ```text
//! hotels.geojson / shelters.geojson
//!     → lodging.rs (LodgingCatalog, loaded once at startup)
//!
//! POST /itinerary body (route coordinates + daily target)
//!     → planner.rs (project lodgings onto the route, pick day stops)
//!     → Itinerary { days: [DayPlan { stop, alternatives }] }
//!
//! POST /lodging/nearby body (points)
//!     → lodging.rs (closest lodgings per point)
//! ```
//!
//! The route geometry comes from the client, usually the coordinates of the
//! route `/route` returned. Distances are great-circle distances.

pub mod lodging;
pub mod planner;

pub use lodging::{Lodging, LodgingCatalog, LodgingError, LodgingKind, NearbyLodging};
pub use planner::{plan_itinerary, DayPlan, Itinerary, ItineraryBody, Stop, StopKind};
