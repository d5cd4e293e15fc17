use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};

use crate::directions::{RouteBody, RouteError};
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;
use crate::observability::metrics;

/// `POST /route`: validate, call the provider, relay its answer.
pub async fn plan_route(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<RouteBody>, JsonRejection>,
) -> Response {
    let start_time = Instant::now();
    let request_id = headers.request_id();
    let provider = state.planner.provider_kind().as_str();

    let outcome = match payload {
        Ok(Json(body)) => state.planner.plan(body).await,
        Err(rejection) => Err(RouteError::invalid(rejection.body_text())),
    };

    match outcome {
        Ok(route) => {
            tracing::info!(
                request_id = %request_id,
                provider,
                bytes = route.as_bytes().len(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Route planned"
            );
            metrics::record_route_request(provider, 200, start_time);
            route.into_response()
        }
        Err(e) => {
            match &e {
                RouteError::InvalidInput(message) => {
                    tracing::warn!(request_id = %request_id, provider, error = %message, "Rejected route request");
                }
                RouteError::Upstream(message) => {
                    tracing::error!(request_id = %request_id, provider, error = %message, "Route request failed upstream");
                }
            }
            metrics::record_route_request(provider, e.status_code().as_u16(), start_time);
            e.into_response()
        }
    }
}
