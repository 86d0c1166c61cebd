//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{BusStats, StopStats};
use crate::requests::RouteItemDto;
use crate::routing::Itinerary;

/// Response for a bus statistics query.
#[derive(Debug, Serialize)]
pub struct BusResponse {
    /// Route length along the roads, meters.
    pub route_length: f64,

    /// Road length over straight-line length.
    pub curvature: f64,

    /// Stops in driving order.
    pub stop_count: usize,

    /// Distinct stops.
    pub unique_stop_count: usize,
}

impl From<BusStats> for BusResponse {
    fn from(stats: BusStats) -> Self {
        Self {
            route_length: stats.road_length,
            curvature: stats.curvature(),
            stop_count: stats.stop_count,
            unique_stop_count: stats.unique_stop_count,
        }
    }
}

/// Response for a stop statistics query.
#[derive(Debug, Serialize)]
pub struct StopResponse {
    /// Buses serving the stop, sorted by name.
    pub buses: Vec<String>,
}

impl From<StopStats> for StopResponse {
    fn from(stats: StopStats) -> Self {
        Self { buses: stats.buses }
    }
}

/// Query string of a route request.
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    /// Origin stop name.
    pub from: String,

    /// Destination stop name.
    pub to: String,
}

/// Response for a route query.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// Total trip time in minutes.
    pub total_time: f64,

    /// Wait/Ride legs in travel order.
    pub items: Vec<RouteItemDto>,
}

impl From<Itinerary> for RouteResponse {
    fn from(itinerary: Itinerary) -> Self {
        Self {
            total_time: itinerary.total_time,
            items: itinerary.items.iter().map(RouteItemDto::from).collect(),
        }
    }
}

/// Error body returned for failed requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_message: String,
}
