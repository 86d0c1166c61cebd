//! Generic shortest-path engine over a directed weighted graph.
//!
//! All auxiliary state is computed once at construction: the router stores,
//! for every ordered vertex pair, the minimum path weight and the last edge
//! of one minimal path. Queries then only backtrack predecessor edges, so
//! repeated queries against the same graph are cheap.
//!
//! Ties are broken first-found: relaxation replaces an entry only when the
//! candidate is strictly lighter, so the (stable) edge and vertex iteration
//! order decides between equal-weight paths deterministically.

use std::cmp::Ordering;

use super::graph::{DirectedWeightedGraph, EdgeId, VertexId};
use super::weight::RouteWeight;

/// A minimal path: its edge sequence and accumulated weight.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo<W> {
    pub weight: W,
    pub edges: Vec<EdgeId>,
}

#[derive(Debug, Clone, Copy)]
struct RouteEntry<W> {
    weight: W,
    /// Last edge of a minimal path, `None` for the trivial self-path.
    prev_edge: Option<EdgeId>,
}

/// Shortest-path index over an immutable graph.
#[derive(Debug)]
pub struct Router<W> {
    graph: DirectedWeightedGraph<W>,
    routes: Vec<Vec<Option<RouteEntry<W>>>>,
}

impl<W: RouteWeight> Router<W> {
    /// Build the all-pairs shortest-path index for `graph`.
    pub fn new(graph: DirectedWeightedGraph<W>) -> Self {
        let vertex_count = graph.vertex_count();
        let mut routes: Vec<Vec<Option<RouteEntry<W>>>> = vec![vec![None; vertex_count]; vertex_count];

        for vertex in 0..vertex_count {
            routes[vertex][vertex] = Some(RouteEntry {
                weight: W::zero(),
                prev_edge: None,
            });
        }
        for (id, edge) in graph.edges() {
            relax(
                &mut routes[edge.from.0][edge.to.0],
                RouteEntry {
                    weight: edge.weight,
                    prev_edge: Some(id),
                },
            );
        }

        for through in 0..vertex_count {
            for from in 0..vertex_count {
                let Some(head) = routes[from][through] else {
                    continue;
                };
                for to in 0..vertex_count {
                    let Some(tail) = routes[through][to] else {
                        continue;
                    };
                    relax(
                        &mut routes[from][to],
                        RouteEntry {
                            weight: head.weight.combine(tail.weight),
                            prev_edge: tail.prev_edge,
                        },
                    );
                }
            }
        }

        Self { graph, routes }
    }

    /// The graph this router indexes.
    pub fn graph(&self) -> &DirectedWeightedGraph<W> {
        &self.graph
    }

    /// The minimal path from `from` to `to`, or `None` if unreachable.
    ///
    /// `from == to` yields the empty path with zero weight.
    pub fn build_route(&self, from: VertexId, to: VertexId) -> Option<RouteInfo<W>> {
        let entry = self.routes[from.0][to.0]?;

        let mut edges = Vec::new();
        let mut cursor = entry.prev_edge;
        while let Some(edge_id) = cursor {
            edges.push(edge_id);
            let prev_vertex = self.graph.edge(edge_id).from;
            cursor = self.routes[from.0][prev_vertex.0]
                .expect("every prefix of a built route is itself a route")
                .prev_edge;
        }
        edges.reverse();

        Some(RouteInfo {
            weight: entry.weight,
            edges,
        })
    }
}

/// Replace `slot` when the candidate is strictly lighter (or the first).
fn relax<W: RouteWeight>(slot: &mut Option<RouteEntry<W>>, candidate: RouteEntry<W>) {
    let better = match slot {
        None => true,
        Some(existing) => candidate.weight.compare(&existing.weight) == Ordering::Less,
    };
    if better {
        *slot = Some(candidate);
    }
}
