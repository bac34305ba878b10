use std::collections::HashMap;

use foundation::math::{DegreeOffset, meters_to_lat_degrees, meters_to_lon_degrees};
use scene::item::MapItem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterConfig {
    /// Ring radius for items sharing a coordinate.
    pub radius_m: f64,
    /// Coordinates equal to this many decimal places are "the same" (4 ≈ 11 m).
    pub precision_decimals: u32,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            radius_m: 6.0,
            precision_decimals: 4,
        }
    }
}

type CoordKey = (i64, i64);

fn coord_key(item: &MapItem, scale: f64) -> CoordKey {
    (
        (item.point.latitude * scale).round() as i64,
        (item.point.longitude * scale).round() as i64,
    )
}

/// Spreads items that share a coordinate onto a small ring so no two markers
/// stack exactly.
///
/// Runs once per data fetch on the host's copy. Output keeps input order;
/// items alone at their coordinate come back unchanged. In a group of `n`,
/// the `i`-th item (input order) moves to angle `2π·i/n` on the ring.
pub fn jitter_items(items: &[MapItem], config: &JitterConfig) -> Vec<MapItem> {
    let scale = 10f64.powi(config.precision_decimals as i32);

    let mut group_sizes: HashMap<CoordKey, usize> = HashMap::new();
    for item in items {
        *group_sizes.entry(coord_key(item, scale)).or_insert(0) += 1;
    }

    let mut seen: HashMap<CoordKey, usize> = HashMap::new();
    items
        .iter()
        .map(|item| {
            let key = coord_key(item, scale);
            let size = group_sizes.get(&key).copied().unwrap_or(1);
            if size <= 1 {
                return item.clone();
            }
            let slot = seen.entry(key).or_insert(0);
            let idx = *slot;
            *slot += 1;

            let angle = (idx as f64 / size as f64) * std::f64::consts::TAU;
            let lat = item.point.latitude;
            let off = DegreeOffset::new(
                meters_to_lat_degrees(config.radius_m) * angle.cos(),
                meters_to_lon_degrees(config.radius_m, lat) * angle.sin(),
            );

            let mut out = item.clone();
            out.point = item.point.offset(off);
            out
        })
        .collect()
}
