use super::{DegreeOffset, meters_to_lat_degrees, meters_to_lon_degrees};

/// Planar offset around an anchor, in meters (east = +x, north = +y).
///
/// Valid only for the short distances marker layouts deal with; the
/// conversion back to degrees uses the flat-earth `METERS_PER_DEGREE`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LocalOffset {
    pub east_m: f64,
    pub north_m: f64,
}

impl LocalOffset {
    pub const fn new(east_m: f64, north_m: f64) -> Self {
        Self { east_m, north_m }
    }

    /// Offset at `radius_m` along `theta_rad`, measured counter-clockwise from east.
    pub fn from_polar(radius_m: f64, theta_rad: f64) -> Self {
        Self::new(radius_m * theta_rad.cos(), radius_m * theta_rad.sin())
    }

    pub fn length_m(&self) -> f64 {
        (self.east_m * self.east_m + self.north_m * self.north_m).sqrt()
    }

    /// Converts to degree deltas at `anchor_lat` (degrees).
    pub fn to_degrees(self, anchor_lat: f64) -> DegreeOffset {
        DegreeOffset::new(
            meters_to_lat_degrees(self.north_m),
            meters_to_lon_degrees(self.east_m, anchor_lat),
        )
    }
}
