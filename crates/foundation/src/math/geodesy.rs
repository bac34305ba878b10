use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the Haversine formula (meters).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
/// Flat-earth approximation of one degree of latitude (meters).
///
/// Pixel thresholds, spiral offsets and jitter all convert through this
/// constant, so it has to stay consistent across the workspace.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// WGS84 coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns a copy shifted by the given degree deltas.
    pub fn offset(self, d: DegreeOffset) -> Self {
        Self::new(self.latitude + d.d_lat, self.longitude + d.d_lon)
    }
}

/// Latitude/longitude deltas in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DegreeOffset {
    pub d_lat: f64,
    pub d_lon: f64,
}

impl DegreeOffset {
    pub const fn new(d_lat: f64, d_lon: f64) -> Self {
        Self { d_lat, d_lon }
    }
}

/// Haversine great-circle distance in meters.
///
/// Deltas are taken as absolute values so `distance_meters(a, b)` and
/// `distance_meters(b, a)` are bit-identical. NaN inputs yield NaN.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).abs().to_radians();
    let d_lon = (b.longitude - a.longitude).abs().to_radians();

    let sin_lat = (d_lat * 0.5).sin();
    let sin_lon = (d_lon * 0.5).sin();
    let mut h = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lon * sin_lon;
    // Rounding can push antipodal points a hair past 1.
    if h > 1.0 {
        h = 1.0;
    }

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    distance_meters(a, b) / 1000.0
}

pub fn meters_to_lat_degrees(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}

/// Degrees of longitude spanned by `meters` at latitude `at_lat` (degrees).
pub fn meters_to_lon_degrees(meters: f64, at_lat: f64) -> f64 {
    meters / (METERS_PER_DEGREE * at_lat.to_radians().cos())
}
