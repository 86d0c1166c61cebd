//! Fastest-route queries and itinerary translation.
//!
//! The planner owns the built graph (inside its router) and the tables
//! mapping vertices and bus slots back to catalogue handles. Queries run
//! from the origin's *arrive* vertex to the destination's *arrive* vertex:
//! every non-empty path therefore opens with the origin's wait edge, and the
//! itinerary total equals the router's reported weight with nothing added
//! on top. A query from a stop to itself degenerates to the empty path.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use crate::catalogue::TransitCatalogue;
use crate::domain::{BusId, StopId};

use super::RoutingSettings;
use super::builder::{BuildError, StopVertices, TransitGraph};
use super::router::{RouteInfo, Router};
use super::weight::{EdgeKind, EdgeWeight};

/// One leg of an itinerary.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteItem {
    /// Wait at a stop before boarding.
    Wait { stop: String, time: f64 },
    /// Ride one bus without leaving it, advancing `span_count` stops.
    Ride {
        bus: String,
        span_count: u32,
        time: f64,
    },
}

impl RouteItem {
    /// Duration of this leg in minutes.
    pub fn time(&self) -> f64 {
        match self {
            RouteItem::Wait { time, .. } | RouteItem::Ride { time, .. } => *time,
        }
    }
}

/// A complete answer to a route query.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub items: Vec<RouteItem>,
    /// Sum of the item durations, in minutes.
    pub total_time: f64,
}

/// Fastest-path planner over an immutable catalogue snapshot.
///
/// Building one builds the routing graph and the all-pairs router index, so
/// construction is the expensive step and queries are cheap. The catalogue
/// must not be modified while the planner is alive.
#[derive(Debug)]
pub struct RoutePlanner {
    catalogue: Arc<TransitCatalogue>,
    settings: RoutingSettings,
    transit: TransitGraphTables,
    router: Router<EdgeWeight>,
}

/// The builder's tables, kept after the graph itself moved into the router.
#[derive(Debug)]
struct TransitGraphTables {
    stop_vertices: HashMap<StopId, StopVertices>,
    vertex_stops: Vec<StopId>,
    bus_slots: Vec<BusId>,
}

impl RoutePlanner {
    /// Build the graph and router for the catalogue.
    pub fn new(
        catalogue: Arc<TransitCatalogue>,
        settings: RoutingSettings,
    ) -> Result<Self, BuildError> {
        let TransitGraph {
            graph,
            stop_vertices,
            vertex_stops,
            bus_slots,
        } = TransitGraph::build(&catalogue, &settings)?;

        Ok(Self {
            catalogue,
            settings,
            transit: TransitGraphTables {
                stop_vertices,
                vertex_stops,
                bus_slots,
            },
            router: Router::new(graph),
        })
    }

    pub fn settings(&self) -> &RoutingSettings {
        &self.settings
    }

    /// The fastest itinerary between two stops.
    ///
    /// Returns `None` when either stop is unknown to the graph (including
    /// catalogue stops no bus visits) or no connection exists. A query from
    /// a stop to itself yields the empty itinerary with zero total.
    pub fn plan(&self, from: &str, to: &str) -> Option<Itinerary> {
        let from_vertices = self.vertices_for(from)?;
        let to_vertices = self.vertices_for(to)?;

        let route = self
            .router
            .build_route(from_vertices.arrive, to_vertices.arrive)?;
        trace!(
            from,
            to,
            edges = route.edges.len(),
            total = route.weight.duration,
            "route query"
        );
        Some(self.translate(&route))
    }

    fn vertices_for(&self, stop: &str) -> Option<StopVertices> {
        let id = self.catalogue.find_stop(stop)?;
        self.transit.stop_vertices.get(&id).copied()
    }

    /// Fold a graph path into Wait/Ride items.
    ///
    /// Each edge maps to exactly one item: a ride edge already covers a full
    /// single-boarding span, so it is never split or merged with neighbors.
    fn translate(&self, route: &RouteInfo<EdgeWeight>) -> Itinerary {
        let mut items = Vec::with_capacity(route.edges.len());
        let mut total_time = 0.0;

        for &edge_id in &route.edges {
            let edge = self.router.graph().edge(edge_id);
            match edge.weight.kind {
                EdgeKind::Wait => {
                    debug_assert_eq!(
                        self.transit.vertex_stops[edge.from.0],
                        self.transit.vertex_stops[edge.to.0],
                        "wait edges never leave their stop",
                    );
                    let stop = self.transit.vertex_stops[edge.from.0];
                    items.push(RouteItem::Wait {
                        stop: self.catalogue.stop_name(stop).to_string(),
                        time: edge.weight.duration,
                    });
                }
                EdgeKind::Ride { bus, span_count } => {
                    let bus = self.transit.bus_slots[bus];
                    items.push(RouteItem::Ride {
                        bus: self.catalogue.bus_name(bus).to_string(),
                        span_count,
                        time: edge.weight.duration,
                    });
                }
            }
            total_time += edge.weight.duration;
        }

        Itinerary { items, total_time }
    }
}
