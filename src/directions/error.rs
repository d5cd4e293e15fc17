//! Route request errors.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors produced while building or executing a route request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Caller-supplied waypoints or preferences were rejected before any
    /// outbound call was made.
    #[error("{0}")]
    InvalidInput(String),

    /// The directions provider failed, timed out or answered with something
    /// that is not a route.
    #[error("{0}")]
    Upstream(String),
}

impl RouteError {
    pub fn invalid(message: impl Into<String>) -> Self {
        RouteError::InvalidInput(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        RouteError::Upstream(message.into())
    }

    /// HTTP status returned to the caller for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RouteError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RouteError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RouteError::InvalidInput(_) => "invalid_input",
            RouteError::Upstream(_) => "upstream",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RouteError::invalid("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RouteError::upstream("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_is_displayed_verbatim() {
        let err = RouteError::upstream("graphhopper returned 401 Unauthorized");
        assert_eq!(err.to_string(), "graphhopper returned 401 Unauthorized");
    }
}
