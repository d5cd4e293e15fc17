//! Mapbox Directions API.
//!
//! Requests are a `GET` to `<base_url>/<profile>/<lon,lat>;<lon,lat>...`
//! asking for full GeoJSON overview geometry, step instructions and
//! alternatives. `exclude` is only sent when there is something to exclude.

use async_trait::async_trait;
use url::Url;

use crate::config::{MapboxConfig, ProviderKind};
use crate::directions::error::RouteError;
use crate::directions::preferences::DEFAULT_MAX_SPEED;
use crate::directions::provider::{DirectionsProvider, ProviderBuildError, RouteResult, Upstream};
use crate::directions::request::RouteRequest;

pub struct MapboxProvider {
    base: Url,
    access_token: String,
    upstream: Upstream,
}

impl MapboxProvider {
    pub fn new(
        config: &MapboxConfig,
        access_token: &str,
        upstream: Upstream,
    ) -> Result<Self, ProviderBuildError> {
        let raw = format!(
            "{}/{}/",
            config.base_url.trim_end_matches('/'),
            config.profile.trim_matches('/')
        );
        let base = Url::parse(&raw).map_err(|source| ProviderBuildError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;

        Ok(Self {
            base,
            access_token: access_token.to_string(),
            upstream,
        })
    }

    /// Full request URL for a route request.
    pub fn build_url(&self, request: &RouteRequest) -> Result<Url, RouteError> {
        let coordinates = request
            .waypoints()
            .iter()
            .map(|w| w.to_path_segment())
            .collect::<Vec<_>>()
            .join(";");

        let mut url = self
            .base
            .join(&coordinates)
            .map_err(|e| RouteError::upstream(format!("failed to build mapbox URL: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("access_token", &self.access_token)
                .append_pair("geometries", "geojson")
                .append_pair("overview", "full")
                .append_pair("steps", "true")
                .append_pair("alternatives", "true");
            if let Some(exclude) = request.preferences().exclude_param() {
                query.append_pair("exclude", &exclude);
            }
        }
        Ok(url)
    }

    pub fn build_request(&self, request: &RouteRequest) -> Result<reqwest::Request, RouteError> {
        let url = self.build_url(request)?;
        self.upstream
            .client()
            .get(url)
            .build()
            .map_err(|e| RouteError::upstream(format!("failed to build mapbox request: {}", e.without_url())))
    }
}

impl std::fmt::Debug for MapboxProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxProvider")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DirectionsProvider for MapboxProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Mapbox
    }

    async fn route(&self, request: &RouteRequest) -> Result<RouteResult, RouteError> {
        let prefs = request.preferences();
        if !prefs.custom_model.is_empty() {
            tracing::debug!("Mapbox ignores the custom model");
        }
        if prefs.max_speed != DEFAULT_MAX_SPEED {
            tracing::debug!(max_speed = prefs.max_speed, "Mapbox ignores max_speed");
        }
        tracing::debug!(
            waypoints = request.waypoints().len(),
            exclude = ?prefs.exclude,
            "Requesting Mapbox route"
        );

        let outbound = self.build_request(request)?;
        self.upstream.execute(outbound).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::preferences::RoutingPreferences;
    use crate::directions::waypoint::Waypoint;
    use crate::resilience::RetryPolicy;
    use std::collections::HashMap;

    fn provider() -> MapboxProvider {
        let upstream = Upstream::new(ProviderKind::Mapbox, reqwest::Client::new(), RetryPolicy::none());
        MapboxProvider::new(&MapboxConfig::default(), "pk.token", upstream).unwrap()
    }

    fn request(points: &[(f64, f64)], exclude: Vec<String>) -> RouteRequest {
        let waypoints = points
            .iter()
            .map(|&(lon, lat)| Waypoint::new(lon, lat).unwrap())
            .collect();
        let prefs = RoutingPreferences::from_parts(None, None, Some(exclude)).unwrap();
        RouteRequest::new(waypoints, prefs).unwrap()
    }

    fn query(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_url_path_and_flags() {
        let url = provider()
            .build_url(&request(&[(12.57, 55.68), (12.59, 55.7)], vec![]))
            .unwrap();

        assert_eq!(
            url.path(),
            "/directions/v5/mapbox/cycling/12.57,55.68;12.59,55.7"
        );
        let q = query(&url);
        assert_eq!(q["access_token"], "pk.token");
        assert_eq!(q["geometries"], "geojson");
        assert_eq!(q["overview"], "full");
        assert_eq!(q["steps"], "true");
        assert_eq!(q["alternatives"], "true");
    }

    #[test]
    fn test_empty_exclusions_omit_parameter() {
        let url = provider()
            .build_url(&request(&[(1.0, 1.0), (2.0, 2.0)], vec![]))
            .unwrap();
        assert!(!url.query_pairs().any(|(k, _)| k == "exclude"));
        assert!(!url.as_str().contains("exclude"));
    }

    #[test]
    fn test_exclusions_are_joined() {
        let url = provider()
            .build_url(&request(&[(1.0, 1.0), (2.0, 2.0)], vec!["ferry".into(), "toll".into()]))
            .unwrap();
        assert_eq!(query(&url)["exclude"], "ferry,toll");
    }

    #[test]
    fn test_via_points_keep_order() {
        let url = provider()
            .build_url(&request(&[(-0.1, 51.5), (-0.2, 51.6), (-0.3, 51.7)], vec![]))
            .unwrap();
        assert!(url.path().ends_with("/-0.1,51.5;-0.2,51.6;-0.3,51.7"));
    }

    #[test]
    fn test_request_is_get() {
        let outbound = provider()
            .build_request(&request(&[(1.0, 1.0), (2.0, 2.0)], vec![]))
            .unwrap();
        assert_eq!(outbound.method(), reqwest::Method::GET);
        assert!(outbound.body().is_none());
    }

    #[test]
    fn test_trailing_slashes_in_config() {
        let config = MapboxConfig {
            base_url: "http://127.0.0.1:9000/directions/v5/mapbox/".into(),
            profile: "walking".into(),
            ..MapboxConfig::default()
        };
        let upstream = Upstream::new(ProviderKind::Mapbox, reqwest::Client::new(), RetryPolicy::none());
        let provider = MapboxProvider::new(&config, "pk", upstream).unwrap();
        let url = provider.build_url(&request(&[(1.0, 1.0), (2.0, 2.0)], vec![])).unwrap();
        assert_eq!(url.path(), "/directions/v5/mapbox/walking/1,1;2,2");
    }
}
