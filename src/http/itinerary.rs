//! Itinerary and lodging lookup handlers.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use geo::Point;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::directions::{RouteError, Waypoint};
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;
use crate::itinerary::{plan_itinerary, ItineraryBody, NearbyLodging};

const DEFAULT_NEARBY_LIMIT: usize = 5;
const DEFAULT_NEARBY_RADIUS_KM: f64 = 5.0;

/// Body of `POST /lodging/nearby`.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyBody {
    pub points: Vec<Value>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub radius_km: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyResult {
    pub point: [f64; 2],
    pub lodgings: Vec<NearbyLodging>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyResponse {
    pub results: Vec<NearbyResult>,
}

/// `POST /itinerary`: split a route into days ending at lodgings.
pub async fn plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ItineraryBody>, JsonRejection>,
) -> Response {
    let start_time = Instant::now();
    let request_id = headers.request_id();

    let outcome = match payload {
        Ok(Json(body)) => plan_itinerary(body, &state.lodging),
        Err(rejection) => Err(RouteError::invalid(rejection.body_text())),
    };

    match outcome {
        Ok(itinerary) => {
            tracing::info!(
                request_id = %request_id,
                days = itinerary.days.len(),
                total_distance_m = itinerary.total_distance_m as u64,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Itinerary planned"
            );
            Json(itinerary).into_response()
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected itinerary request");
            e.into_response()
        }
    }
}

/// `POST /lodging/nearby`: closest lodgings to each point.
pub async fn nearby(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<NearbyBody>, JsonRejection>,
) -> Response {
    let request_id = headers.request_id();

    let outcome = match payload {
        Ok(Json(body)) => find_nearby(body, &state),
        Err(rejection) => Err(RouteError::invalid(rejection.body_text())),
    };

    match outcome {
        Ok(response) => {
            tracing::debug!(request_id = %request_id, points = response.results.len(), "Lodging lookup");
            Json(response).into_response()
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected lodging lookup");
            e.into_response()
        }
    }
}

fn find_nearby(body: NearbyBody, state: &AppState) -> Result<NearbyResponse, RouteError> {
    if body.points.is_empty() {
        return Err(RouteError::invalid("At least one point is required"));
    }
    let radius_km = body.radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    if !(radius_km.is_finite() && radius_km > 0.0) {
        return Err(RouteError::invalid(format!(
            "radius_km must be a positive number, got {radius_km}"
        )));
    }
    let limit = body.limit.unwrap_or(DEFAULT_NEARBY_LIMIT);

    let results = body
        .points
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let waypoint = Waypoint::from_json(value)
                .map_err(|e| RouteError::invalid(format!("Point {i}: {e}")))?;
            let point = Point::new(waypoint.lon, waypoint.lat);
            Ok(NearbyResult {
                point: [waypoint.lon, waypoint.lat],
                lodgings: state.lodging.nearby(point, radius_km * 1000.0, limit),
            })
        })
        .collect::<Result<Vec<_>, RouteError>>()?;

    Ok(NearbyResponse { results })
}
