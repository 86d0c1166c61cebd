//! The routing subsystem: graph construction and fastest-path queries.
//!
//! Built in layers. `graph` and `router` form a reusable shortest-path
//! engine over any weight implementing [`RouteWeight`]; `builder` turns a
//! catalogue snapshot into the bus-network graph; `planner` answers route
//! queries and folds raw edge paths into human-meaningful itineraries.

pub mod graph;
pub mod router;
pub mod weight;

mod builder;
mod planner;

pub use builder::{BuildError, StopVertices, TransitGraph};
pub use planner::{Itinerary, RouteItem, RoutePlanner};
pub use weight::{EdgeKind, EdgeWeight, RouteWeight};

use serde::Deserialize;

const METERS_PER_KM: f64 = 1000.0;
const MINUTES_PER_HOUR: f64 = 60.0;

/// Uniform routing parameters applied to every stop and bus.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoutingSettings {
    /// Minutes spent waiting at a stop before every boarding.
    pub bus_wait_time: u32,

    /// Bus velocity in km/h. Must be positive.
    pub bus_velocity: f64,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            bus_wait_time: 0,
            bus_velocity: 1.0,
        }
    }
}

impl RoutingSettings {
    /// The velocity converted once for duration math.
    pub(crate) fn velocity_m_per_min(&self) -> f64 {
        self.bus_velocity * METERS_PER_KM / MINUTES_PER_HOUR
    }

    /// The wait time as fractional minutes.
    pub(crate) fn wait_minutes(&self) -> f64 {
        f64::from(self.bus_wait_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_protocol() {
        let settings = RoutingSettings::default();
        assert_eq!(settings.bus_wait_time, 0);
        assert_eq!(settings.bus_velocity, 1.0);
    }

    #[test]
    fn velocity_conversion() {
        let settings = RoutingSettings {
            bus_wait_time: 5,
            bus_velocity: 60.0,
        };
        // 60 km/h is exactly 1000 m/min.
        assert_eq!(settings.velocity_m_per_min(), 1000.0);
        assert_eq!(settings.wait_minutes(), 5.0);
    }

    #[test]
    fn deserializes_with_defaults() {
        let settings: RoutingSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, RoutingSettings::default());

        let settings: RoutingSettings =
            serde_json::from_str(r#"{"bus_wait_time": 6, "bus_velocity": 40}"#).unwrap();
        assert_eq!(settings.bus_wait_time, 6);
        assert_eq!(settings.bus_velocity, 40.0);
    }
}
