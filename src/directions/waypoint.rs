//! Waypoints and their validation.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::directions::error::RouteError;

/// A `(longitude, latitude)` pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub lon: f64,
    pub lat: f64,
}

impl Waypoint {
    /// Create a waypoint, rejecting non-finite or out-of-range coordinates.
    pub fn new(lon: f64, lat: f64) -> Result<Self, RouteError> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(RouteError::invalid("Coordinates must be finite numbers"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(RouteError::invalid(format!(
                "Longitude {lon} is outside [-180, 180]"
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(RouteError::invalid(format!(
                "Latitude {lat} is outside [-90, 90]"
            )));
        }
        Ok(Self { lon, lat })
    }

    /// Parse a JSON `[lon, lat]` array.
    pub fn from_json(value: &Value) -> Result<Self, RouteError> {
        let pair = match value.as_array() {
            Some(pair) if pair.len() == 2 => pair,
            _ => {
                return Err(RouteError::invalid(
                    "Each point must be a [longitude, latitude] pair",
                ))
            }
        };
        match (pair[0].as_f64(), pair[1].as_f64()) {
            (Some(lon), Some(lat)) => Self::new(lon, lat),
            _ => Err(RouteError::invalid("Point coordinates must be numbers")),
        }
    }

    /// `lon,lat` as used in URL paths.
    pub fn to_path_segment(&self) -> String {
        format!("{},{}", self.lon, self.lat)
    }
}

impl Serialize for Waypoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.lon, self.lat].serialize(serializer)
    }
}

/// Parse an ordered list of JSON points, keeping input order.
///
/// Errors name the offending index so the UI can point at the right marker.
pub fn parse_waypoints(values: &[Value]) -> Result<Vec<Waypoint>, RouteError> {
    if values.len() < 2 {
        return Err(RouteError::invalid(
            "At least a start and end point are required",
        ));
    }
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            Waypoint::from_json(v).map_err(|e| RouteError::invalid(format!("Point {i}: {e}")))
        })
        .collect()
}
