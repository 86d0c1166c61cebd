//! The input dataset document.
//!
//! One JSON object describes the whole world: `base_requests` populate the
//! catalogue, `routing_settings` and `render_settings` parameterize the
//! planner and the map, and an optional `stat_requests` array carries batch
//! queries for one-shot runs. Stops are applied before buses regardless of
//! their order in the document, so a bus may be listed ahead of its stops.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::catalogue::TransitCatalogue;
use crate::geo::Coordinates;
use crate::render::RenderSettings;
use crate::requests::StatRequest;
use crate::routing::RoutingSettings;

/// Why a dataset could not be loaded. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A command populating the catalogue.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop {
        name: String,
        latitude: f64,
        longitude: f64,
        /// Road distances to neighboring stops, in meters.
        #[serde(default)]
        road_distances: BTreeMap<String, u32>,
    },
    Bus {
        name: String,
        /// The visit list: a full cycle for round trips, the outbound half
        /// otherwise.
        stops: Vec<String>,
        is_roundtrip: bool,
    },
}

/// The parsed input document.
#[derive(Debug, Default, Deserialize)]
pub struct TransitDataset {
    #[serde(default)]
    pub base_requests: Vec<BaseRequest>,

    #[serde(default)]
    pub routing_settings: RoutingSettings,

    #[serde(default)]
    pub render_settings: RenderSettings,

    #[serde(default)]
    pub stat_requests: Vec<StatRequest>,
}

impl TransitDataset {
    /// Parse a dataset from JSON text.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a dataset file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Apply the base requests to a fresh catalogue.
    pub fn build_catalogue(&self) -> TransitCatalogue {
        let mut catalogue = TransitCatalogue::new();

        for request in &self.base_requests {
            if let BaseRequest::Stop {
                name,
                latitude,
                longitude,
                road_distances,
            } = request
            {
                catalogue.add_stop_with_distances(
                    name,
                    Coordinates::new(*latitude, *longitude),
                    road_distances.iter().map(|(to, &meters)| (to.as_str(), meters)),
                );
            }
        }
        for request in &self.base_requests {
            if let BaseRequest::Bus {
                name,
                stops,
                is_roundtrip,
            } = request
            {
                catalogue.add_bus(name, stops.iter().map(String::as_str), *is_roundtrip);
            }
        }
        catalogue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const DATASET: &str = r#"{
        "base_requests": [
            {
                "type": "Bus",
                "name": "114",
                "stops": ["Marina", "Bridge"],
                "is_roundtrip": false
            },
            {
                "type": "Stop",
                "name": "Bridge",
                "latitude": 43.587795,
                "longitude": 39.716901,
                "road_distances": {"Marina": 850}
            },
            {
                "type": "Stop",
                "name": "Marina",
                "latitude": 43.581969,
                "longitude": 39.719848,
                "road_distances": {"Bridge": 850}
            }
        ],
        "routing_settings": {"bus_wait_time": 6, "bus_velocity": 40},
        "render_settings": {"width": 200, "height": 200, "padding": 30},
        "stat_requests": [
            {"id": 1, "type": "Stop", "name": "Marina"},
            {"id": 2, "type": "Bus", "name": "114"},
            {"id": 3, "type": "Route", "from": "Marina", "to": "Bridge"}
        ]
    }"#;

    #[test]
    fn parses_a_full_document() {
        let dataset = TransitDataset::from_json(DATASET).unwrap();

        assert_eq!(dataset.base_requests.len(), 3);
        assert_eq!(dataset.routing_settings.bus_wait_time, 6);
        assert_eq!(dataset.routing_settings.bus_velocity, 40.0);
        assert_eq!(dataset.render_settings.width, 200.0);
        assert_eq!(dataset.stat_requests.len(), 3);
    }

    #[test]
    fn missing_sections_default() {
        let dataset = TransitDataset::from_json("{}").unwrap();

        assert!(dataset.base_requests.is_empty());
        assert_eq!(dataset.routing_settings, RoutingSettings::default());
        assert_eq!(dataset.render_settings, RenderSettings::default());
        assert!(dataset.stat_requests.is_empty());
    }

    #[test]
    fn buses_resolve_even_when_listed_first() {
        let dataset = TransitDataset::from_json(DATASET).unwrap();
        let catalogue = dataset.build_catalogue();

        // The bus appears before its stops in the document, yet the
        // stops-first pass makes every name resolvable.
        let stats = catalogue.bus_stats("114").expect("bus exists");
        assert_eq!(stats.stop_count, 3);
        assert_eq!(stats.unique_stop_count, 2);
        assert_eq!(stats.road_length, 1700.0);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        assert!(matches!(
            TransitDataset::from_json("{"),
            Err(LoadError::Parse(_))
        ));
        // Unknown command types are rejected too.
        let bad = r#"{"base_requests": [{"type": "Tram", "name": "T"}]}"#;
        assert!(matches!(
            TransitDataset::from_json(bad),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DATASET.as_bytes()).unwrap();

        let dataset = TransitDataset::from_file(file.path()).unwrap();
        assert_eq!(dataset.base_requests.len(), 3);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = TransitDataset::from_file("/nonexistent/dataset.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/dataset.json"));
    }
}
