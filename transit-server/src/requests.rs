//! The stat-request protocol and the facade answering it.
//!
//! Requests carry a caller-chosen `id` which every response echoes as
//! `request_id`; a query about something the catalogue has never heard of
//! answers `{"request_id": ..., "error_message": "not found"}` instead of a
//! payload. Both the batch driver and the web layer speak this protocol
//! through [`RequestHandler`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalogue::TransitCatalogue;
use crate::render::MapRenderer;
use crate::routing::{Itinerary, RouteItem, RoutePlanner};

/// One query against the catalogue.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum StatRequest {
    /// Which buses serve a stop.
    Stop { id: i64, name: String },
    /// Route statistics for a bus.
    Bus { id: i64, name: String },
    /// Fastest itinerary between two stops.
    Route { id: i64, from: String, to: String },
    /// The schematic network map.
    Map { id: i64 },
}

impl StatRequest {
    pub fn id(&self) -> i64 {
        match self {
            StatRequest::Stop { id, .. }
            | StatRequest::Bus { id, .. }
            | StatRequest::Route { id, .. }
            | StatRequest::Map { id } => *id,
        }
    }
}

/// One answer, matched to its request through `request_id`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StatResponse {
    Stop {
        request_id: i64,
        buses: Vec<String>,
    },
    Bus {
        request_id: i64,
        route_length: f64,
        curvature: f64,
        stop_count: usize,
        unique_stop_count: usize,
    },
    Route {
        request_id: i64,
        total_time: f64,
        items: Vec<RouteItemDto>,
    },
    Map {
        request_id: i64,
        map: String,
    },
    NotFound {
        request_id: i64,
        error_message: String,
    },
}

impl StatResponse {
    fn not_found(request_id: i64) -> Self {
        StatResponse::NotFound {
            request_id,
            error_message: "not found".to_string(),
        }
    }
}

/// Wire form of one itinerary leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum RouteItemDto {
    Wait {
        stop_name: String,
        time: f64,
    },
    Bus {
        bus: String,
        span_count: u32,
        time: f64,
    },
}

impl From<&RouteItem> for RouteItemDto {
    fn from(item: &RouteItem) -> Self {
        match item {
            RouteItem::Wait { stop, time } => RouteItemDto::Wait {
                stop_name: stop.clone(),
                time: *time,
            },
            RouteItem::Ride {
                bus,
                span_count,
                time,
            } => RouteItemDto::Bus {
                bus: bus.clone(),
                span_count: *span_count,
                time: *time,
            },
        }
    }
}

/// Facade wiring the catalogue, the planner and the renderer to the
/// protocol. Cheap to clone the `Arc`s into; holds no other state.
#[derive(Debug)]
pub struct RequestHandler {
    catalogue: Arc<TransitCatalogue>,
    planner: Arc<RoutePlanner>,
    renderer: Arc<MapRenderer>,
}

impl RequestHandler {
    pub fn new(
        catalogue: Arc<TransitCatalogue>,
        planner: Arc<RoutePlanner>,
        renderer: Arc<MapRenderer>,
    ) -> Self {
        Self {
            catalogue,
            planner,
            renderer,
        }
    }

    /// Answer a single request.
    pub fn handle(&self, request: &StatRequest) -> StatResponse {
        match request {
            StatRequest::Stop { id, name } => match self.catalogue.stop_stats(name) {
                Some(stats) => StatResponse::Stop {
                    request_id: *id,
                    buses: stats.buses,
                },
                None => StatResponse::not_found(*id),
            },
            StatRequest::Bus { id, name } => match self.catalogue.bus_stats(name) {
                Some(stats) => StatResponse::Bus {
                    request_id: *id,
                    route_length: stats.road_length,
                    curvature: stats.curvature(),
                    stop_count: stats.stop_count,
                    unique_stop_count: stats.unique_stop_count,
                },
                None => StatResponse::not_found(*id),
            },
            StatRequest::Route { id, from, to } => match self.planner.plan(from, to) {
                Some(itinerary) => route_response(*id, &itinerary),
                None => StatResponse::not_found(*id),
            },
            StatRequest::Map { id } => StatResponse::Map {
                request_id: *id,
                map: self.renderer.render(&self.catalogue),
            },
        }
    }

    /// Answer a batch in order.
    pub fn handle_all(&self, requests: &[StatRequest]) -> Vec<StatResponse> {
        debug!(count = requests.len(), "processing stat requests");
        requests.iter().map(|request| self.handle(request)).collect()
    }
}

fn route_response(request_id: i64, itinerary: &Itinerary) -> StatResponse {
    StatResponse::Route {
        request_id,
        total_time: itinerary.total_time,
        items: itinerary.items.iter().map(RouteItemDto::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;
    use crate::render::RenderSettings;
    use crate::routing::RoutingSettings;
    use serde_json::json;

    fn handler() -> RequestHandler {
        let mut catalogue = TransitCatalogue::new();
        catalogue.add_stop_with_distances("Marina", Coordinates::new(0.0, 0.0), [("Bridge", 3000)]);
        catalogue.add_stop("Bridge", Coordinates::new(0.0, 0.05));
        catalogue.add_bus("114", ["Marina", "Bridge", "Marina"], true);

        let catalogue = Arc::new(catalogue);
        let planner = Arc::new(
            RoutePlanner::new(
                catalogue.clone(),
                RoutingSettings {
                    bus_wait_time: 5,
                    bus_velocity: 60.0,
                },
            )
            .expect("fixture graph builds"),
        );
        let renderer = Arc::new(MapRenderer::new(RenderSettings::default()));
        RequestHandler::new(catalogue, planner, renderer)
    }

    #[test]
    fn request_ids_are_extracted_per_variant() {
        let requests: Vec<StatRequest> = serde_json::from_value(json!([
            {"id": 1, "type": "Stop", "name": "Marina"},
            {"id": 2, "type": "Bus", "name": "114"},
            {"id": 3, "type": "Route", "from": "A", "to": "B"},
            {"id": 4, "type": "Map"}
        ]))
        .unwrap();

        let ids: Vec<i64> = requests.iter().map(StatRequest::id).collect();
        assert_eq!(ids, [1, 2, 3, 4]);
    }

    #[test]
    fn stop_request_lists_buses() {
        let response = handler().handle(&StatRequest::Stop {
            id: 1,
            name: "Marina".into(),
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"request_id": 1, "buses": ["114"]})
        );
    }

    #[test]
    fn bus_request_reports_route_stats() {
        let response = handler().handle(&StatRequest::Bus {
            id: 2,
            name: "114".into(),
        });
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["request_id"], 2);
        assert_eq!(value["route_length"], 6000.0);
        assert_eq!(value["stop_count"], 3);
        assert_eq!(value["unique_stop_count"], 2);
        assert!(value["curvature"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn route_request_reports_itinerary() {
        let response = handler().handle(&StatRequest::Route {
            id: 3,
            from: "Marina".into(),
            to: "Bridge".into(),
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "request_id": 3,
                "total_time": 8.0,
                "items": [
                    {"type": "Wait", "stop_name": "Marina", "time": 5.0},
                    {"type": "Bus", "bus": "114", "span_count": 1, "time": 3.0}
                ]
            })
        );
    }

    #[test]
    fn map_request_embeds_svg() {
        let response = handler().handle(&StatRequest::Map { id: 4 });
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["request_id"], 4);
        let map = value["map"].as_str().unwrap();
        assert!(map.starts_with("<?xml"));
        assert!(map.contains("<svg"));
    }

    #[test]
    fn unknown_names_answer_not_found() {
        let handler = handler();
        for request in [
            StatRequest::Stop {
                id: 5,
                name: "Nowhere".into(),
            },
            StatRequest::Bus {
                id: 5,
                name: "404".into(),
            },
            StatRequest::Route {
                id: 5,
                from: "Marina".into(),
                to: "Nowhere".into(),
            },
        ] {
            assert_eq!(
                serde_json::to_value(handler.handle(&request)).unwrap(),
                json!({"request_id": 5, "error_message": "not found"})
            );
        }
    }

    #[test]
    fn batches_answer_in_order() {
        let handler = handler();
        let requests: Vec<StatRequest> = serde_json::from_value(json!([
            {"id": 10, "type": "Stop", "name": "Bridge"},
            {"id": 11, "type": "Bus", "name": "114"},
            {"id": 12, "type": "Route", "from": "Marina", "to": "Marina"}
        ]))
        .unwrap();

        let responses = handler.handle_all(&requests);
        let values: Vec<serde_json::Value> = responses
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();

        assert_eq!(values[0]["request_id"], 10);
        assert_eq!(values[1]["request_id"], 11);
        // Same-stop route: empty items, zero total, not "not found".
        assert_eq!(
            values[2],
            json!({"request_id": 12, "total_time": 0.0, "items": []})
        );
    }
}
