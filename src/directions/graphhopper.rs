//! GraphHopper Routing API with a custom model.
//!
//! Requests are a JSON `POST` to the route endpoint with the API key in the
//! `key` query parameter. Custom models require the flexible mode, so
//! `ch.disable` is always set.

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use crate::config::{GraphHopperConfig, ProviderKind};
use crate::directions::error::RouteError;
use crate::directions::preferences::CustomModel;
use crate::directions::provider::{DirectionsProvider, ProviderBuildError, RouteResult, Upstream};
use crate::directions::request::RouteRequest;
use crate::directions::waypoint::Waypoint;

/// JSON body sent to GraphHopper.
#[derive(Debug, Serialize)]
pub struct GraphHopperPayload<'a> {
    pub points: &'a [Waypoint],
    pub profile: &'a str,
    pub calc_points: bool,
    pub instructions: bool,
    pub points_encoded: bool,
    pub max_speed: f64,
    #[serde(rename = "ch.disable")]
    pub ch_disable: bool,
    pub custom_model: &'a CustomModel,
}

pub struct GraphHopperProvider {
    endpoint: Url,
    profile: String,
    upstream: Upstream,
}

impl GraphHopperProvider {
    pub fn new(config: &GraphHopperConfig, upstream: Upstream) -> Result<Self, ProviderBuildError> {
        let mut endpoint = Url::parse(&config.base_url).map_err(|source| {
            ProviderBuildError::InvalidUrl {
                url: config.base_url.clone(),
                source,
            }
        })?;
        endpoint.query_pairs_mut().append_pair("key", &config.api_key);

        Ok(Self {
            endpoint,
            profile: config.profile.clone(),
            upstream,
        })
    }

    /// Shape the request body. Points keep the caller's order.
    pub fn build_payload<'a>(&'a self, request: &'a RouteRequest) -> GraphHopperPayload<'a> {
        let prefs = request.preferences();
        GraphHopperPayload {
            points: request.waypoints(),
            profile: &self.profile,
            calc_points: true,
            instructions: false,
            points_encoded: false,
            max_speed: prefs.max_speed,
            ch_disable: true,
            custom_model: &prefs.custom_model,
        }
    }

    pub fn build_request(&self, request: &RouteRequest) -> Result<reqwest::Request, RouteError> {
        self.upstream
            .client()
            .post(self.endpoint.clone())
            .json(&self.build_payload(request))
            .build()
            .map_err(|e| RouteError::upstream(format!("failed to build graphhopper request: {}", e.without_url())))
    }
}

impl std::fmt::Debug for GraphHopperProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The endpoint embeds the API key.
        f.debug_struct("GraphHopperProvider")
            .field("host", &self.endpoint.host_str())
            .field("profile", &self.profile)
            .finish()
    }
}

#[async_trait]
impl DirectionsProvider for GraphHopperProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GraphHopper
    }

    async fn route(&self, request: &RouteRequest) -> Result<RouteResult, RouteError> {
        let prefs = request.preferences();
        if !prefs.exclude.is_empty() {
            tracing::debug!(exclude = ?prefs.exclude, "GraphHopper ignores exclusion tags; express them in the custom model");
        }
        tracing::debug!(
            waypoints = request.waypoints().len(),
            max_speed = prefs.max_speed,
            rules = prefs.custom_model.rule_count(),
            "Requesting GraphHopper route"
        );

        let outbound = self.build_request(request)?;
        self.upstream.execute(outbound).await
    }
}
