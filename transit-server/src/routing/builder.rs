//! One-shot construction of the routing graph from the catalogue.
//!
//! Every stop visited by at least one bus gets two vertices: riders land on
//! the `arrive` vertex and must cross the stop's wait edge to reach the
//! `depart` vertex before boarding anything. For each bus, a ride edge is
//! emitted for every ordered pair of positions reachable without leaving
//! the vehicle, so the router can pick a multi-stop span directly instead
//! of chaining single hops through extra boardings.

use std::collections::HashMap;

use tracing::debug;

use crate::catalogue::TransitCatalogue;
use crate::domain::{BusId, StopId};

use super::RoutingSettings;
use super::graph::{DirectedWeightedGraph, Edge, VertexId};
use super::weight::EdgeWeight;

/// Fatal data problems detected while building the graph.
///
/// These indicate broken input data, not a failed query: the caller is
/// expected to abort loudly rather than recover.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// A bus route contains consecutive stops with no recorded road
    /// distance in either direction.
    #[error("bus {bus}: no road distance between consecutive stops {from} and {to}")]
    MissingDistance {
        bus: String,
        from: String,
        to: String,
    },

    /// The configured velocity cannot produce finite durations.
    #[error("bus velocity must be positive, got {0} km/h")]
    NonPositiveVelocity(f64),
}

/// The pair of graph vertices representing one stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopVertices {
    /// Vertex a rider departs from (after waiting).
    pub depart: VertexId,
    /// Vertex a rider arrives at.
    pub arrive: VertexId,
}

/// The routing graph plus the tables linking it back to the catalogue.
#[derive(Debug)]
pub struct TransitGraph {
    pub(crate) graph: DirectedWeightedGraph<EdgeWeight>,
    pub(crate) stop_vertices: HashMap<StopId, StopVertices>,
    /// Stop behind each vertex, two entries per stop.
    pub(crate) vertex_stops: Vec<StopId>,
    /// Bus behind each ride-edge bus slot, in catalogue order.
    pub(crate) bus_slots: Vec<BusId>,
}

impl TransitGraph {
    /// Build the graph for every bus in the catalogue.
    ///
    /// The catalogue must not change afterwards for as long as the graph
    /// (or a router over it) is alive; the id tables assume it.
    pub fn build(
        catalogue: &TransitCatalogue,
        settings: &RoutingSettings,
    ) -> Result<Self, BuildError> {
        if !(settings.bus_velocity > 0.0) {
            return Err(BuildError::NonPositiveVelocity(settings.bus_velocity));
        }

        let mut builder = Builder {
            catalogue,
            wait_time: settings.wait_minutes(),
            velocity: settings.velocity_m_per_min(),
            stop_vertices: HashMap::new(),
            vertex_stops: Vec::new(),
            edges: Vec::new(),
            bus_slots: Vec::new(),
        };

        for bus_id in catalogue.all_buses() {
            let slot = builder.bus_slots.len();
            builder.bus_slots.push(bus_id);

            let bus = catalogue.bus(bus_id);
            if bus.route.is_empty() {
                continue;
            }
            if bus.is_roundtrip {
                builder.add_ride_edges(&bus.route, slot)?;
            } else {
                // The stored sequence is out-and-back; splitting it at the
                // turnaround keeps the two directions edge-disjoint, so no
                // span can cut through the turnaround as a mere through-stop.
                let turnaround = bus.route.len() / 2;
                builder.add_ride_edges(&bus.route[..=turnaround], slot)?;
                builder.add_ride_edges(&bus.route[turnaround..], slot)?;
            }
        }

        let mut graph = DirectedWeightedGraph::new(builder.vertex_stops.len());
        for edge in builder.edges {
            graph.add_edge(edge);
        }
        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            buses = builder.bus_slots.len(),
            "routing graph built"
        );

        Ok(TransitGraph {
            graph,
            stop_vertices: builder.stop_vertices,
            vertex_stops: builder.vertex_stops,
            bus_slots: builder.bus_slots,
        })
    }

    pub fn graph(&self) -> &DirectedWeightedGraph<EdgeWeight> {
        &self.graph
    }

    /// Vertices of a stop, `None` when no bus visits it.
    pub fn stop_vertices(&self, stop: StopId) -> Option<StopVertices> {
        self.stop_vertices.get(&stop).copied()
    }

    /// The stop a vertex belongs to.
    pub fn stop_at(&self, vertex: VertexId) -> StopId {
        self.vertex_stops[vertex.0]
    }

    /// The catalogue bus behind a ride-edge bus slot.
    pub fn bus_at(&self, slot: usize) -> BusId {
        self.bus_slots[slot]
    }
}

struct Builder<'a> {
    catalogue: &'a TransitCatalogue,
    wait_time: f64,
    /// Meters per minute.
    velocity: f64,
    stop_vertices: HashMap<StopId, StopVertices>,
    vertex_stops: Vec<StopId>,
    edges: Vec<Edge<EdgeWeight>>,
    bus_slots: Vec<BusId>,
}

impl Builder<'_> {
    /// Vertices of a stop, assigning the next free pair on first sight.
    ///
    /// First sight also emits the stop's wait edge (arrive → depart).
    fn ensure_vertices(&mut self, stop: StopId) -> StopVertices {
        if let Some(&vertices) = self.stop_vertices.get(&stop) {
            return vertices;
        }
        let depart = VertexId(self.vertex_stops.len());
        let arrive = VertexId(self.vertex_stops.len() + 1);
        self.vertex_stops.push(stop);
        self.vertex_stops.push(stop);

        let vertices = StopVertices { depart, arrive };
        self.stop_vertices.insert(stop, vertices);
        self.edges.push(Edge {
            from: arrive,
            to: depart,
            weight: EdgeWeight::wait(self.wait_time),
        });
        vertices
    }

    /// Emit ride edges for every ordered pair of positions in `leg`.
    ///
    /// The road distance accumulates leg by leg, so a span's duration is
    /// the true driving distance over the roads, not a straight line.
    fn add_ride_edges(&mut self, leg: &[StopId], slot: usize) -> Result<(), BuildError> {
        for (start, &from_stop) in leg.iter().enumerate() {
            let from = self.ensure_vertices(from_stop);

            let mut distance: u32 = 0;
            let mut span_count: u32 = 0;
            let mut prev_stop = from_stop;
            for &to_stop in &leg[start + 1..] {
                let to = self.ensure_vertices(to_stop);

                let leg_meters = self
                    .catalogue
                    .distance_between_ids(prev_stop, to_stop)
                    .ok_or_else(|| BuildError::MissingDistance {
                        bus: self.catalogue.bus_name(self.bus_slots[slot]).to_string(),
                        from: self.catalogue.stop_name(prev_stop).to_string(),
                        to: self.catalogue.stop_name(to_stop).to_string(),
                    })?;
                distance += leg_meters;
                span_count += 1;

                let duration = f64::from(distance) / self.velocity;
                self.edges.push(Edge {
                    from: from.depart,
                    to: to.arrive,
                    weight: EdgeWeight::ride(duration, slot, span_count),
                });
                prev_stop = to_stop;
            }
        }
        Ok(())
    }
}
