//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind server to listener
//! - Drain in-flight requests on shutdown

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::PlannerConfig;
use crate::directions::{build_provider, DirectionsProvider, ProviderBuildError, RoutePlanner};
use crate::http::health;
use crate::http::itinerary;
use crate::http::map::{self, render_index};
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::route;
use crate::itinerary::{LodgingCatalog, LodgingError};

#[derive(Debug, Error)]
pub enum ServerBuildError {
    #[error("failed to initialise directions provider: {0}")]
    Provider(#[from] ProviderBuildError),

    #[error("failed to load lodging catalog: {0}")]
    Lodging(#[from] LodgingError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub planner: RoutePlanner,
    pub index_page: Arc<str>,
    pub lodging: Arc<LodgingCatalog>,
}

/// HTTP server for the route planner.
pub struct HttpServer {
    router: Router,
    config: Arc<PlannerConfig>,
}

impl HttpServer {
    /// Create a server using the provider and lodging files selected by
    /// configuration.
    pub fn new(config: PlannerConfig) -> Result<Self, ServerBuildError> {
        let provider = build_provider(&config)?;
        let lodging = LodgingCatalog::load(&config.lodging)?;
        tracing::info!(lodgings = lodging.len(), "Lodging catalog ready");
        Ok(Self::with_parts(config, provider, lodging))
    }

    /// Create a server around an explicit provider, with no lodgings.
    pub fn with_provider(config: PlannerConfig, provider: Arc<dyn DirectionsProvider>) -> Self {
        Self::with_parts(config, provider, LodgingCatalog::default())
    }

    pub fn with_parts(
        config: PlannerConfig,
        provider: Arc<dyn DirectionsProvider>,
        lodging: LodgingCatalog,
    ) -> Self {
        let state = AppState {
            planner: RoutePlanner::new(provider),
            index_page: render_index(&config.map.access_token).into(),
            lodging: Arc::new(lodging),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config: Arc::new(config),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &PlannerConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        Router::new()
            .route("/", get(map::index))
            .route("/route", post(route::plan_route))
            .route("/itinerary", post(itinerary::plan))
            .route("/lodging/nearby", post(itinerary::nearby))
            .route("/health", get(health::get_status))
            .fallback(not_found)
            .with_state(state)
            .layer(middleware)
    }

    /// A clone of the router, for driving the app without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            provider = %self.config.provider.kind,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
