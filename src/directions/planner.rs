//! Route request builder: validate, shape, dispatch.

use std::sync::Arc;

use crate::config::ProviderKind;
use crate::directions::error::RouteError;
use crate::directions::provider::{DirectionsProvider, RouteResult};
use crate::directions::request::{RouteBody, RouteRequest};

/// Turns inbound route bodies into provider calls.
///
/// Validation happens entirely before the provider is touched, so a
/// rejected body never costs an outbound call.
#[derive(Clone)]
pub struct RoutePlanner {
    provider: Arc<dyn DirectionsProvider>,
}

impl RoutePlanner {
    pub fn new(provider: Arc<dyn DirectionsProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    pub async fn plan(&self, body: RouteBody) -> Result<RouteResult, RouteError> {
        let request = RouteRequest::from_body(body)?;
        self.plan_request(&request).await
    }

    pub async fn plan_request(&self, request: &RouteRequest) -> Result<RouteResult, RouteError> {
        self.provider.route(request).await
    }
}
