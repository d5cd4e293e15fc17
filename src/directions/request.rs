//! Inbound route request parsing and validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::directions::error::RouteError;
use crate::directions::preferences::{CustomModel, RoutingPreferences};
use crate::directions::waypoint::{parse_waypoints, Waypoint};

/// JSON body of `POST /route` as sent by the map UI.
///
/// Two shapes are accepted: `points` (start, via..., end), or `start` and
/// `end` with optional `via` points between them. `points` wins when both
/// are present. Points stay as raw JSON here so that malformed entries
/// produce a targeted message instead of a generic deserialization error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RouteBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub via: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_model: Option<CustomModel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

/// A validated, provider-independent route request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    waypoints: Vec<Waypoint>,
    preferences: RoutingPreferences,
}

impl RouteRequest {
    pub fn new(waypoints: Vec<Waypoint>, preferences: RoutingPreferences) -> Result<Self, RouteError> {
        if waypoints.len() < 2 {
            return Err(RouteError::invalid(
                "At least a start and end point are required",
            ));
        }
        Ok(Self { waypoints, preferences })
    }

    /// Validate an inbound body.
    pub fn from_body(body: RouteBody) -> Result<Self, RouteError> {
        let raw_points = match body.points {
            Some(points) => points,
            None => {
                let mut points = Vec::with_capacity(body.via.len() + 2);
                points.extend(body.start);
                points.extend(body.via);
                points.extend(body.end);
                points
            }
        };

        let waypoints = parse_waypoints(&raw_points)?;
        let preferences =
            RoutingPreferences::from_parts(body.max_speed, body.custom_model, body.exclude)?;

        Self::new(waypoints, preferences)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn preferences(&self) -> &RoutingPreferences {
        &self.preferences
    }
}
