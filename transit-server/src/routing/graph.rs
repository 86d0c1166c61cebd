//! Directed weighted graph with stable integer identifiers.
//!
//! The graph is write-once: edges are added during construction and the
//! finished graph is then only read. Edge identifiers are insertion indices
//! and never change.

/// Index of a vertex in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

/// Index of an edge in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// A directed edge carrying an arbitrary weight payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge<W> {
    pub from: VertexId,
    pub to: VertexId,
    pub weight: W,
}

/// A directed graph over a fixed set of vertices.
#[derive(Debug, Clone, Default)]
pub struct DirectedWeightedGraph<W> {
    edges: Vec<Edge<W>>,
    incidence: Vec<Vec<EdgeId>>,
}

impl<W> DirectedWeightedGraph<W> {
    /// Create a graph with `vertex_count` vertices and no edges.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            edges: Vec::new(),
            incidence: vec![Vec::new(); vertex_count],
        }
    }

    /// Add an edge and return its identifier.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is out of range; edges are only created
    /// from vertex ids the builder handed out itself.
    pub fn add_edge(&mut self, edge: Edge<W>) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.incidence[edge.from.0].push(id);
        assert!(edge.to.0 < self.incidence.len(), "edge endpoint out of range");
        self.edges.push(edge);
        id
    }

    pub fn vertex_count(&self) -> usize {
        self.incidence.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, id: EdgeId) -> &Edge<W> {
        &self.edges[id.0]
    }

    /// Identifiers of the edges leaving a vertex, in insertion order.
    pub fn edges_from(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.incidence[vertex.0].iter().copied()
    }

    /// All edges with their identifiers, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge<W>)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }
}
