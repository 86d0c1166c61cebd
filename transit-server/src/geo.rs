//! Geographic coordinates and great-circle distance.

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A point on the Earth's surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    /// Latitude in degrees, north positive.
    pub lat: f64,
    /// Longitude in degrees, east positive.
    pub lng: f64,
}

impl Coordinates {
    /// Create coordinates from latitude and longitude in degrees.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance between two points in meters.
///
/// Uses the spherical law of cosines, which is accurate enough for
/// city-scale stop spacing.
pub fn distance(from: Coordinates, to: Coordinates) -> f64 {
    if from == to {
        return 0.0;
    }
    let lat_a = from.lat.to_radians();
    let lat_b = to.lat.to_radians();
    let delta_lng = (from.lng - to.lng).abs().to_radians();

    let central = (lat_a.sin() * lat_b.sin() + lat_a.cos() * lat_b.cos() * delta_lng.cos())
        .clamp(-1.0, 1.0)
        .acos();
    central * EARTH_RADIUS_M
}
