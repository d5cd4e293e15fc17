//! Client for the bike planner HTTP API.

mod client;

pub use client::{PlannerClient, RoutePlanRequest, RouteResponse};
