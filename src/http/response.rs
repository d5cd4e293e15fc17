//! Response mapping.
//!
//! # Responsibilities
//! - Relay provider bodies byte-for-byte as `application/json`
//! - Map route errors to status codes with an `{"error": ...}` body

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::directions::{RouteError, RouteResult};

/// Error body returned for every failed `/route` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

impl IntoResponse for RouteResult {
    fn into_response(self) -> Response {
        (
            [(header::CONTENT_TYPE, "application/json")],
            self.into_bytes(),
        )
            .into_response()
    }
}
