use foundation::ids::ItemId;
use foundation::math::{DegreeOffset, GeoPoint, LocalOffset, distance_meters};
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralConfig {
    /// Fraction of the spiral step used as the radius unit.
    pub radius_factor: f64,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self { radius_factor: 0.9 }
    }
}

/// Golden angle, `π·(3 − √5)` radians (~137.5°).
pub fn golden_angle() -> f64 {
    std::f64::consts::PI * (3.0 - 5.0_f64.sqrt())
}

/// Planar golden-angle spiral slots around an anchor.
///
/// Slot `k` (1-based, so nothing sits on the anchor itself) lies at radius
/// `step_m · radius_factor · √k` and angle `k · golden_angle`. Radii grow
/// strictly with `k`, so no two slots coincide for a positive step.
pub fn spiral_local_offsets(count: usize, step_m: f64, config: &SpiralConfig) -> Vec<LocalOffset> {
    let theta_step = golden_angle();
    (1..=count)
        .map(|k| {
            let k = k as f64;
            let radius = step_m * config.radius_factor * k.sqrt();
            LocalOffset::from_polar(radius, k * theta_step)
        })
        .collect()
}

/// Spiral slots as degree deltas at `anchor_lat`.
pub fn spiral_offsets(
    count: usize,
    anchor_lat: f64,
    step_m: f64,
    config: &SpiralConfig,
) -> Vec<DegreeOffset> {
    spiral_local_offsets(count, step_m, config)
        .into_iter()
        .map(|off| off.to_degrees(anchor_lat))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpiralSlot {
    pub id: ItemId,
    pub point: GeoPoint,
}

/// Expanded positions of a cluster's members.
///
/// Slots are assigned to members in the order given, so callers must pass
/// a deterministic member order (proximity order) to keep re-expansions stable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpiralLayout {
    pub anchor: GeoPoint,
    pub slots: Vec<SpiralSlot>,
    /// Farthest expanded member from the anchor.
    pub radius_m: f64,
}

impl SpiralLayout {
    pub fn build<'a, I>(anchor: GeoPoint, members: I, step_m: f64, config: &SpiralConfig) -> Self
    where
        I: IntoIterator<Item = &'a ItemId>,
    {
        let ids: Vec<&ItemId> = members.into_iter().collect();
        let offsets = spiral_offsets(ids.len(), anchor.latitude, step_m, config);

        let slots: Vec<SpiralSlot> = ids
            .into_iter()
            .zip(offsets)
            .map(|(id, off)| SpiralSlot {
                id: id.clone(),
                point: anchor.offset(off),
            })
            .collect();

        let radius_m = slots
            .iter()
            .map(|s| distance_meters(anchor, s.point))
            .fold(0.0, f64::max);

        Self {
            anchor,
            slots,
            radius_m,
        }
    }

    pub fn position_of(&self, id: &ItemId) -> Option<GeoPoint> {
        self.slots.iter().find(|s| &s.id == id).map(|s| s.point)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.slots.iter().any(|s| &s.id == id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
