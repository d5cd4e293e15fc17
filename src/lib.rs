//! Bike route planner.
//!
//! A small web service that takes waypoints and routing preferences from the
//! map UI, shapes them into a GraphHopper (custom model) or Mapbox
//! Directions request, and relays the provider's route JSON.
//!
//! ```text
//!   Browser ── POST /route ──▶ http ──▶ directions::RoutePlanner
//!                                            │ validate (400 on failure)
//!                                            ▼
//!                                     DirectionsProvider ──▶ GraphHopper / Mapbox
//!   Browser ◀── route JSON | {"error"} ──────┘ (500 on upstream failure)
//! ```
//!
//! `POST /itinerary` splits the returned route geometry into days ending at
//! hotels or shelters loaded at startup (see [`itinerary`]).

pub mod config;
pub mod directions;
pub mod geocoding;
pub mod http;
pub mod itinerary;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::PlannerConfig;
pub use directions::{RouteError, RoutePlanner};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
