use foundation::ids::ItemId;
use foundation::math::{GeoPoint, distance_meters};
use scene::viewport::ViewportMetrics;
use serde::{Deserialize, Serialize};

use crate::spiral::SpiralLayout;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    /// Fraction of the overlap threshold that counts as crowding when no
    /// cluster is expanded. Looser than clustering, so labels drop out before
    /// markers fully overlap.
    pub idle_crowding_factor: f64,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            idle_crowding_factor: 0.15,
        }
    }
}

/// A marker at the position it will be drawn.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlacedMarker<'a> {
    pub id: &'a ItemId,
    pub point: GeoPoint,
}

/// Decides which price labels render in one pass.
///
/// Precedence:
/// 1. Members of the expanded cluster always show.
/// 2. With a cluster expanded, other items show only when strictly outside
///    `radius + buffer` of the anchor and clear of neighbors by
///    `label_separation_m`.
/// 3. With nothing expanded, an item shows unless another sits within
///    `idle_crowding_factor · overlap_threshold_m`.
///
/// All distances are measured between drawn positions.
#[derive(Debug, Copy, Clone)]
pub struct LabelPolicy<'a> {
    pub metrics: ViewportMetrics,
    pub config: LabelsConfig,
    pub expanded: Option<&'a SpiralLayout>,
}

impl<'a> LabelPolicy<'a> {
    pub fn new(
        metrics: ViewportMetrics,
        config: LabelsConfig,
        expanded: Option<&'a SpiralLayout>,
    ) -> Self {
        Self {
            metrics,
            config,
            expanded,
        }
    }

    pub fn should_show_label(
        &self,
        id: &ItemId,
        point: GeoPoint,
        all: &[PlacedMarker<'_>],
    ) -> bool {
        match self.expanded {
            Some(layout) if layout.contains(id) => true,
            Some(layout) => {
                let exclusion = layout.radius_m + self.metrics.cluster_buffer_m;
                distance_meters(point, layout.anchor) > exclusion
                    && !has_neighbor_within(id, point, all, self.metrics.label_separation_m)
            }
            None => {
                let crowding = self.config.idle_crowding_factor * self.metrics.overlap_threshold_m;
                !has_neighbor_within(id, point, all, crowding)
            }
        }
    }
}

fn has_neighbor_within(
    id: &ItemId,
    point: GeoPoint,
    all: &[PlacedMarker<'_>],
    radius_m: f64,
) -> bool {
    all.iter()
        .any(|other| other.id != id && distance_meters(point, other.point) <= radius_m)
}
