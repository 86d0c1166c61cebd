//! Domain types shared by the catalogue, the router and the renderer.
//!
//! Stops and buses live in arenas owned by the catalogue and are referenced
//! everywhere else through the `StopId` / `BusId` handles, which stay valid
//! for the lifetime of the catalogue regardless of later insertions.

mod error;

pub use error::CatalogueError;

use std::collections::HashSet;

use crate::geo::Coordinates;

/// Stable handle to a stop in the catalogue arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(pub usize);

/// Stable handle to a bus in the catalogue arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusId(pub usize);

/// A named physical location.
///
/// A stop may be created with no coordinates when it is first mentioned only
/// in another stop's distance table; the coordinates are backfilled when the
/// stop is later defined properly. Such a stop still carries distances and
/// participates in routing, but cannot be placed on the map.
#[derive(Debug, Clone)]
pub struct Stop {
    pub name: String,
    pub coordinates: Option<Coordinates>,
}

/// A named route over the stop network.
#[derive(Debug, Clone)]
pub struct Bus {
    pub name: String,

    /// Stops in driving order. For a round trip this is the cyclic visit
    /// list as given (first stop repeated at the end); for a linear route it
    /// is the out-and-back expansion, with the turnaround not duplicated.
    pub route: Vec<StopId>,

    /// Distinct stops on the route, for stop-count queries.
    pub unique_stops: HashSet<StopId>,

    pub is_roundtrip: bool,
}

/// Aggregate answer to a bus statistics query.
#[derive(Debug, Clone, PartialEq)]
pub struct BusStats {
    /// Number of stops in driving order (the expanded sequence length).
    pub stop_count: usize,
    pub unique_stop_count: usize,
    /// Straight-line length of the route in meters.
    pub geo_length: f64,
    /// Length of the route along the roads in meters.
    pub road_length: f64,
}

impl BusStats {
    /// How much longer the roads are than the straight lines.
    pub fn curvature(&self) -> f64 {
        if self.geo_length > 0.0 {
            self.road_length / self.geo_length
        } else {
            0.0
        }
    }
}

/// Aggregate answer to a stop statistics query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopStats {
    /// Names of the buses serving the stop, sorted. Empty when the stop
    /// exists but sees no traffic.
    pub buses: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curvature_is_road_over_geo() {
        let stats = BusStats {
            stop_count: 3,
            unique_stop_count: 2,
            geo_length: 2000.0,
            road_length: 2500.0,
        };
        assert_eq!(stats.curvature(), 1.25);
    }

    #[test]
    fn curvature_of_degenerate_route_is_zero() {
        let stats = BusStats {
            stop_count: 1,
            unique_stop_count: 1,
            geo_length: 0.0,
            road_length: 0.0,
        };
        assert_eq!(stats.curvature(), 0.0);
    }
}
