//! In-memory provider for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Bytes;

use crate::config::ProviderKind;
use crate::directions::error::RouteError;
use crate::directions::provider::{DirectionsProvider, RouteResult};
use crate::directions::request::RouteRequest;

/// Provider that returns a canned outcome and records what it was asked.
pub struct StubProvider {
    outcome: Result<&'static str, RouteError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<RouteRequest>>,
}

impl StubProvider {
    pub fn with_body(body: &'static str) -> Self {
        Self::new(Ok(body))
    }

    pub fn with_error(error: RouteError) -> Self {
        Self::new(Err(error))
    }

    fn new(outcome: Result<&'static str, RouteError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<RouteRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectionsProvider for StubProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GraphHopper
    }

    async fn route(&self, request: &RouteRequest) -> Result<RouteResult, RouteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match &self.outcome {
            Ok(body) => Ok(RouteResult::from_bytes(Bytes::from_static(body.as_bytes()))
                .expect("stub body must be JSON")),
            Err(e) => Err(e.clone()),
        }
    }
}
