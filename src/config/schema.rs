//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the planner.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the route planner.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PlannerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Which directions provider answers `/route`.
    pub provider: ProviderConfig,

    /// GraphHopper custom-model provider settings.
    pub graphhopper: GraphHopperConfig,

    /// Mapbox Directions provider settings.
    pub mapbox: MapboxConfig,

    /// Map display settings for the UI page.
    pub map: MapConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration for idempotent upstream calls.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Overnight stop catalogs for itinerary planning.
    pub lodging: LodgingConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Supported directions providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// GraphHopper Routing API with a custom model (POST + JSON).
    #[default]
    GraphHopper,
    /// Mapbox Directions API (GET + query string).
    Mapbox,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::GraphHopper => "graphhopper",
            ProviderKind::Mapbox => "mapbox",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` for upstream calls.
    pub system_proxy: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            system_proxy: true,
        }
    }
}

/// GraphHopper settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphHopperConfig {
    /// Route endpoint, the API key is appended as `key`.
    pub base_url: String,

    /// GraphHopper API key.
    pub api_key: String,

    /// Travel profile sent with every request.
    pub profile: String,
}

impl Default for GraphHopperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://graphhopper.com/api/1/route".to_string(),
            api_key: String::new(),
            profile: "bike".to_string(),
        }
    }
}

/// Mapbox Directions settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MapboxConfig {
    /// Directions endpoint without profile, e.g. ".../directions/v5/mapbox".
    pub base_url: String,

    /// Directions access token. Falls back to `map.access_token` when empty.
    pub access_token: String,

    /// Routing profile appended to `base_url`.
    pub profile: String,
}

impl Default for MapboxConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mapbox.com/directions/v5/mapbox".to_string(),
            access_token: String::new(),
            profile: "cycling".to_string(),
        }
    }
}

impl MapboxConfig {
    /// Token used for directions calls, given the map display token.
    pub fn effective_token<'a>(&'a self, map: &'a MapConfig) -> &'a str {
        if self.access_token.is_empty() {
            &map.access_token
        } else {
            &self.access_token
        }
    }
}

/// Map display settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MapConfig {
    /// Public access token handed to the browser map.
    pub access_token: String,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time allowed for a single upstream call in seconds.
    pub upstream_secs: u64,

    /// Inbound request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 15,
            request_secs: 60,
        }
    }
}

/// Retry configuration.
///
/// Only idempotent upstream calls (GET) are ever retried.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Lodging catalogs, as GeoJSON point FeatureCollections.
///
/// Empty paths load nothing; itineraries then only know the route's ends.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LodgingConfig {
    pub hotels_path: String,
    pub shelters_path: String,
}

/// Request hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}
