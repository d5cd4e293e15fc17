//! Hotel and shelter catalogs.

use std::path::{Path, PathBuf};

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::LodgingConfig;

#[derive(Debug, Error)]
pub enum LodgingError {
    #[error("failed to read lodging file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse lodging file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LodgingKind {
    Hotel,
    Shelter,
}

impl LodgingKind {
    fn fallback_name(self) -> &'static str {
        match self {
            LodgingKind::Hotel => "Unknown Hotel",
            LodgingKind::Shelter => "Unknown Shelter",
        }
    }
}

/// A place to spend the night.
#[derive(Debug, Clone, PartialEq)]
pub struct Lodging {
    pub name: String,
    pub kind: LodgingKind,
    pub position: Point<f64>,
}

/// A lodging and its straight-line distance to some point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyLodging {
    pub name: String,
    pub kind: LodgingKind,
    pub coordinates: [f64; 2],
    pub distance_m: f64,
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Value,
}

/// All known lodgings. Immutable after startup.
#[derive(Debug, Clone, Default)]
pub struct LodgingCatalog {
    lodgings: Vec<Lodging>,
}

impl LodgingCatalog {
    pub fn new(lodgings: Vec<Lodging>) -> Self {
        Self { lodgings }
    }

    /// Load the configured catalogs. Empty paths are skipped.
    pub fn load(config: &LodgingConfig) -> Result<Self, LodgingError> {
        let mut lodgings = Vec::new();
        for (path, kind) in [
            (&config.hotels_path, LodgingKind::Hotel),
            (&config.shelters_path, LodgingKind::Shelter),
        ] {
            if path.trim().is_empty() {
                continue;
            }
            let loaded = load_file(Path::new(path), kind)?;
            tracing::info!(path = %path, kind = ?kind, count = loaded.len(), "Loaded lodging catalog");
            lodgings.extend(loaded);
        }
        Ok(Self { lodgings })
    }

    /// Parse a GeoJSON FeatureCollection of points.
    ///
    /// Features without point geometry are skipped; a missing `name`
    /// property gets a generic name.
    pub fn parse_geojson(content: &str, kind: LodgingKind) -> Result<Vec<Lodging>, serde_json::Error> {
        let collection: FeatureCollection = serde_json::from_str(content)?;
        let lodgings = collection
            .features
            .into_iter()
            .filter_map(|feature| {
                let geometry = feature.geometry?;
                if geometry.kind != "Point" {
                    return None;
                }
                let lon = geometry.coordinates.get(0)?.as_f64()?;
                let lat = geometry.coordinates.get(1)?.as_f64()?;
                let name = feature
                    .properties
                    .as_ref()
                    .and_then(|p| p.get("name"))
                    .and_then(Value::as_str)
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or(kind.fallback_name())
                    .to_string();
                Some(Lodging {
                    name,
                    kind,
                    position: Point::new(lon, lat),
                })
            })
            .collect();
        Ok(lodgings)
    }

    pub fn lodgings(&self) -> &[Lodging] {
        &self.lodgings
    }

    pub fn len(&self) -> usize {
        self.lodgings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lodgings.is_empty()
    }

    /// Up to `limit` lodgings within `radius_m` of `point`, closest first.
    pub fn nearby(&self, point: Point<f64>, radius_m: f64, limit: usize) -> Vec<NearbyLodging> {
        let mut found: Vec<NearbyLodging> = self
            .lodgings
            .iter()
            .map(|lodging| NearbyLodging {
                name: lodging.name.clone(),
                kind: lodging.kind,
                coordinates: [lodging.position.x(), lodging.position.y()],
                distance_m: Haversine.distance(point, lodging.position),
            })
            .filter(|n| n.distance_m <= radius_m)
            .collect();
        found.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        found.truncate(limit);
        found
    }
}

fn load_file(path: &Path, kind: LodgingKind) -> Result<Vec<Lodging>, LodgingError> {
    let content = std::fs::read_to_string(path).map_err(|source| LodgingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    LodgingCatalog::parse_geojson(&content, kind).map_err(|source| LodgingError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HOTELS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Hotel Nyhavn"}, "geometry": {"type": "Point", "coordinates": [12.590, 55.680]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [12.600, 55.690]}},
            {"type": "Feature", "properties": {"name": "Harbour"}, "geometry": {"type": "LineString", "coordinates": [[12.0, 55.0], [12.1, 55.1]]}},
            {"type": "Feature", "properties": {"name": "Nowhere"}, "geometry": null}
        ]
    }"#;

    #[test]
    fn test_parse_points_only() {
        let lodgings = LodgingCatalog::parse_geojson(HOTELS, LodgingKind::Hotel).unwrap();
        assert_eq!(lodgings.len(), 2);
        assert_eq!(lodgings[0].name, "Hotel Nyhavn");
        assert_eq!(lodgings[0].position, Point::new(12.590, 55.680));
        assert_eq!(lodgings[1].name, "Unknown Hotel");
    }

    #[test]
    fn test_nearby_sorted_and_limited() {
        let catalog = LodgingCatalog::new(vec![
            Lodging { name: "far".into(), kind: LodgingKind::Shelter, position: Point::new(12.70, 55.68) },
            Lodging { name: "near".into(), kind: LodgingKind::Hotel, position: Point::new(12.571, 55.68) },
            Lodging { name: "mid".into(), kind: LodgingKind::Shelter, position: Point::new(12.60, 55.68) },
        ]);
        let origin = Point::new(12.57, 55.68);

        let found = catalog.nearby(origin, 5_000.0, 5);
        let names: Vec<_> = found.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["near", "mid"]);
        assert!(found[0].distance_m < 100.0);

        let limited = catalog.nearby(origin, 50_000.0, 1);
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].name, "near");
    }

    #[test]
    fn test_load_skips_empty_paths_and_reports_bad_files() {
        let mut hotels = tempfile::NamedTempFile::new().unwrap();
        hotels.write_all(HOTELS.as_bytes()).unwrap();

        let config = LodgingConfig {
            hotels_path: hotels.path().to_string_lossy().into_owned(),
            shelters_path: String::new(),
        };
        let catalog = LodgingCatalog::load(&config).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.lodgings().iter().all(|l| l.kind == LodgingKind::Hotel));

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        broken.write_all(b"not json").unwrap();
        let config = LodgingConfig {
            hotels_path: String::new(),
            shelters_path: broken.path().to_string_lossy().into_owned(),
        };
        assert!(matches!(LodgingCatalog::load(&config), Err(LodgingError::Parse { .. })));

        let config = LodgingConfig {
            hotels_path: "/nonexistent/hotels.geojson".into(),
            shelters_path: String::new(),
        };
        assert!(matches!(LodgingCatalog::load(&config), Err(LodgingError::Io { .. })));
    }
}
