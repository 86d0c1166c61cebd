//! The in-memory transit catalogue.
//!
//! Owns every stop and bus, the directed stop-to-stop road distances and the
//! derived indices (buses per stop, stops with through traffic). The
//! catalogue is populated first and then treated as immutable by the graph
//! builder and the renderer; nothing here mutates on the query path.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::domain::{Bus, BusId, BusStats, CatalogueError, Stop, StopId, StopStats};
use crate::geo::{self, Coordinates};

/// Stops, buses, distances and lookup tables.
#[derive(Debug, Default)]
pub struct TransitCatalogue {
    stops: Vec<Stop>,
    stop_ids: HashMap<String, StopId>,

    buses: Vec<Bus>,
    bus_ids: HashMap<String, BusId>,

    /// Buses serving each stop, parallel to `stops`.
    buses_at_stop: Vec<Vec<BusId>>,

    /// Directed road distances in meters.
    ///
    /// An explicit entry always wins: recording A→B also records B→A with
    /// the same value, but only when B→A has no entry yet, and an explicit
    /// later B→A overwrites a mirrored value.
    distances: HashMap<(StopId, StopId), u32>,

    /// Stops visited by at least one bus.
    with_service: HashSet<StopId>,
}

impl TransitCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stop, or update its coordinates if it already exists.
    ///
    /// The upsert covers the backfill case: a stop auto-created by another
    /// stop's distance table gains its coordinates here.
    pub fn add_stop(&mut self, name: &str, coordinates: Coordinates) -> StopId {
        let id = self.intern_stop(name);
        self.stops[id.0].coordinates = Some(coordinates);
        id
    }

    /// Add a stop together with road distances to its neighbors.
    ///
    /// Neighbors that do not exist yet are created as coordinate-less stops.
    pub fn add_stop_with_distances<'a>(
        &mut self,
        name: &str,
        coordinates: Coordinates,
        distances: impl IntoIterator<Item = (&'a str, u32)>,
    ) -> StopId {
        let from = self.add_stop(name, coordinates);
        for (neighbor, meters) in distances {
            let to = self.intern_stop(neighbor);
            self.record_distance(from, to, meters);
        }
        from
    }

    /// Add a bus route.
    ///
    /// `stops` is the outbound visit list; for a round trip it must already
    /// be the full cycle (first stop repeated at the end), for a linear
    /// route the stored sequence is expanded to the out-and-back form.
    /// Names the catalogue has never seen are skipped.
    pub fn add_bus<'a>(
        &mut self,
        name: &str,
        stops: impl IntoIterator<Item = &'a str>,
        is_roundtrip: bool,
    ) -> BusId {
        if let Some(&existing) = self.bus_ids.get(name) {
            warn!(bus = name, "bus already defined, keeping the first definition");
            return existing;
        }

        let mut route = Vec::new();
        for stop_name in stops {
            match self.stop_ids.get(stop_name) {
                Some(&id) => route.push(id),
                None => warn!(bus = name, stop = stop_name, "skipping unknown stop"),
            }
        }

        if !is_roundtrip {
            // Out-and-back: the return mirrors the outbound in reverse,
            // without duplicating the turnaround stop.
            let inbound: Vec<StopId> = route.iter().rev().skip(1).copied().collect();
            route.extend(inbound);
        }

        let unique_stops: HashSet<StopId> = route.iter().copied().collect();

        let id = BusId(self.buses.len());
        for &stop in &unique_stops {
            self.buses_at_stop[stop.0].push(id);
            self.with_service.insert(stop);
        }
        self.buses.push(Bus {
            name: name.to_string(),
            route,
            unique_stops,
            is_roundtrip,
        });
        self.bus_ids.insert(name.to_string(), id);
        id
    }

    pub fn find_stop(&self, name: &str) -> Option<StopId> {
        self.stop_ids.get(name).copied()
    }

    pub fn find_bus(&self, name: &str) -> Option<BusId> {
        self.bus_ids.get(name).copied()
    }

    pub fn stop(&self, id: StopId) -> &Stop {
        &self.stops[id.0]
    }

    pub fn bus(&self, id: BusId) -> &Bus {
        &self.buses[id.0]
    }

    pub fn stop_name(&self, id: StopId) -> &str {
        &self.stops[id.0].name
    }

    pub fn bus_name(&self, id: BusId) -> &str {
        &self.buses[id.0].name
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }

    /// Statistics for a bus, or `None` if the bus is unknown.
    pub fn bus_stats(&self, name: &str) -> Option<BusStats> {
        let bus = self.bus(self.find_bus(name)?);
        Some(BusStats {
            stop_count: bus.route.len(),
            unique_stop_count: bus.unique_stops.len(),
            geo_length: self.geo_route_length(bus),
            road_length: self.road_route_length(bus),
        })
    }

    /// The sorted bus names serving a stop, or `None` if the stop is
    /// unknown. A known stop with no traffic yields an empty list.
    pub fn stop_stats(&self, name: &str) -> Option<StopStats> {
        let id = self.find_stop(name)?;
        let mut buses: Vec<String> = self.buses_at_stop[id.0]
            .iter()
            .map(|&bus| self.bus_name(bus).to_string())
            .collect();
        buses.sort();
        Some(StopStats { buses })
    }

    /// The road distance from one stop to another, in meters.
    ///
    /// Prefers the recorded forward direction and falls back to the
    /// mirrored reverse one.
    pub fn distance_between(&self, from: &str, to: &str) -> Result<u32, CatalogueError> {
        let from_id = self
            .find_stop(from)
            .ok_or_else(|| CatalogueError::UnknownStop(from.to_string()))?;
        let to_id = self
            .find_stop(to)
            .ok_or_else(|| CatalogueError::UnknownStop(to.to_string()))?;
        self.distance_between_ids(from_id, to_id)
            .ok_or_else(|| CatalogueError::NoDistanceData {
                from: from.to_string(),
                to: to.to_string(),
            })
    }

    /// Distance lookup by handle: forward direction, then the reverse.
    pub fn distance_between_ids(&self, from: StopId, to: StopId) -> Option<u32> {
        self.distances
            .get(&(from, to))
            .or_else(|| self.distances.get(&(to, from)))
            .copied()
    }

    /// All buses, sorted by name.
    pub fn all_buses(&self) -> Vec<BusId> {
        let mut ids: Vec<BusId> = (0..self.buses.len()).map(BusId).collect();
        ids.sort_by(|a, b| self.bus_name(*a).cmp(self.bus_name(*b)));
        ids
    }

    /// All stops visited by at least one bus, sorted by name.
    pub fn stops_with_service(&self) -> Vec<StopId> {
        let mut ids: Vec<StopId> = self.with_service.iter().copied().collect();
        ids.sort_by(|a, b| self.stop_name(*a).cmp(self.stop_name(*b)));
        ids
    }

    /// Look up a stop by name, creating a coordinate-less one if absent.
    fn intern_stop(&mut self, name: &str) -> StopId {
        if let Some(&id) = self.stop_ids.get(name) {
            return id;
        }
        let id = StopId(self.stops.len());
        self.stops.push(Stop {
            name: name.to_string(),
            coordinates: None,
        });
        self.buses_at_stop.push(Vec::new());
        self.stop_ids.insert(name.to_string(), id);
        id
    }

    /// Record a directed distance and mirror it.
    ///
    /// The explicit direction overwrites whatever was there; the mirror is
    /// only a default and never replaces an existing entry.
    fn record_distance(&mut self, from: StopId, to: StopId, meters: u32) {
        self.distances.insert((from, to), meters);
        self.distances.entry((to, from)).or_insert(meters);
    }

    fn geo_route_length(&self, bus: &Bus) -> f64 {
        bus.route
            .windows(2)
            .filter_map(|leg| {
                let from = self.stop(leg[0]).coordinates?;
                let to = self.stop(leg[1]).coordinates?;
                Some(geo::distance(from, to))
            })
            .sum()
    }

    fn road_route_length(&self, bus: &Bus) -> f64 {
        let mut total = 0.0;
        for leg in bus.route.windows(2) {
            match self.distance_between_ids(leg[0], leg[1]) {
                Some(meters) => total += f64::from(meters),
                None => warn!(
                    bus = %bus.name,
                    from = self.stop_name(leg[0]),
                    to = self.stop_name(leg[1]),
                    "no road distance for consecutive stops"
                ),
            }
        }
        total
    }
}
