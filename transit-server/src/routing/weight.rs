//! Edge weights and the ordering contract used by the router.

use std::cmp::Ordering;

/// What a graph edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Dwell at a stop before boarding.
    Wait,
    /// An uninterrupted ride on one bus, advancing `span_count` stops.
    Ride {
        /// The graph's bus slot (see `TransitGraph::bus_at`).
        bus: usize,
        span_count: u32,
    },
}

/// Weight of one graph edge: a duration in minutes plus the payload
/// describing what the edge is.
///
/// Only the duration participates in route comparison; the payload rides
/// along for the itinerary translation. The type deliberately does not
/// implement `PartialOrd`: all ordering goes through
/// [`RouteWeight::compare`], so no field can sneak into the relation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeWeight {
    /// Duration in minutes.
    pub duration: f64,
    pub kind: EdgeKind,
}

impl EdgeWeight {
    pub fn wait(duration: f64) -> Self {
        Self {
            duration,
            kind: EdgeKind::Wait,
        }
    }

    pub fn ride(duration: f64, bus: usize, span_count: u32) -> Self {
        Self {
            duration,
            kind: EdgeKind::Ride { bus, span_count },
        }
    }
}

/// Accumulation and ordering contract for router weights.
///
/// `compare` is the only ordering the router consults; implementations
/// decide which fields count.
pub trait RouteWeight: Copy {
    /// The weight of an empty path.
    fn zero() -> Self;

    /// The weight of a path followed by another.
    fn combine(self, rhs: Self) -> Self;

    /// Total order used for relaxation. Must be a total order over the
    /// values the graph actually contains.
    fn compare(&self, other: &Self) -> Ordering;
}

impl RouteWeight for EdgeWeight {
    fn zero() -> Self {
        Self::wait(0.0)
    }

    fn combine(self, rhs: Self) -> Self {
        // The payload of a combined weight is meaningless; keep the tail's.
        Self {
            duration: self.duration + rhs.duration,
            kind: rhs.kind,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.duration.total_cmp(&other.duration)
    }
}

/// Plain durations are also valid router weights.
impl RouteWeight for f64 {
    fn zero() -> Self {
        0.0
    }

    fn combine(self, rhs: Self) -> Self {
        self + rhs
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}
