//! Place-name lookup via Nominatim.
//!
//! Used by the `geocode` binary to turn an address into the `lon, lat`
//! pair the route API expects.

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use url::Url;

use crate::config::TimeoutConfig;
use crate::resilience::upstream_client;

/// Public OpenStreetMap Nominatim instance.
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("invalid geocoder URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoder returned {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },
}

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    pub display_name: String,
    #[serde(deserialize_with = "coordinate")]
    pub lat: f64,
    #[serde(deserialize_with = "coordinate")]
    pub lon: f64,
}

impl Place {
    /// `lon, lat`, ready to paste into a route request.
    pub fn lon_lat(&self) -> String {
        format!("{}, {}", self.lon, self.lat)
    }
}

/// Nominatim sends coordinates as strings; accept numbers as well.
fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

pub struct NominatimClient {
    client: reqwest::Client,
    base_url: Url,
}

impl NominatimClient {
    /// Client with the default connect and total timeouts.
    pub fn new(base_url: &str) -> Result<Self, GeocodeError> {
        Self::with_timeouts(base_url, &TimeoutConfig::default(), true)
    }

    /// Client built like the directions upstream: connect and total
    /// deadlines from `timeouts`, optionally bypassing `HTTP(S)_PROXY`.
    pub fn with_timeouts(
        base_url: &str,
        timeouts: &TimeoutConfig,
        system_proxy: bool,
    ) -> Result<Self, GeocodeError> {
        let client = upstream_client(timeouts, system_proxy)?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, GeocodeError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    pub fn search_url(&self, query: &str) -> Result<Url, GeocodeError> {
        let mut url = self.base_url.join("search")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "jsonv2")
            .append_pair("limit", "1");
        Ok(url)
    }

    /// Best match for `query`, or `None` if the geocoder found nothing.
    pub async fn search(&self, query: &str) -> Result<Option<Place>, GeocodeError> {
        let url = self.search_url(query)?;
        tracing::debug!(query, "Geocoding");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Status { status, body });
        }

        let places: Vec<Place> = response.json().await?;
        Ok(places.into_iter().next())
    }
}
