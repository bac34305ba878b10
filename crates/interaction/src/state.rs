use foundation::ids::ItemId;
use foundation::math::{GeoPoint, LocalOffset};
use layers::spiral::{SpiralConfig, SpiralLayout};
use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    #[default]
    Idle,
    Expanded,
}

/// Controller-owned view state. `mode` is `Expanded` exactly while a
/// [`Cluster`] is active.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct InteractionState {
    pub mode: InteractionMode,
    pub active_detail: Option<ItemId>,
}

/// Combined mode and detail state, as the host sees it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionPhase {
    Idle,
    Expanded,
    ExpandedWithDetail,
    DetailOnly,
}

impl InteractionState {
    pub fn phase(&self) -> InteractionPhase {
        match (self.mode, self.active_detail.is_some()) {
            (InteractionMode::Idle, false) => InteractionPhase::Idle,
            (InteractionMode::Idle, true) => InteractionPhase::DetailOnly,
            (InteractionMode::Expanded, false) => InteractionPhase::Expanded,
            (InteractionMode::Expanded, true) => InteractionPhase::ExpandedWithDetail,
        }
    }
}

/// The expanded group of overlapping items.
///
/// `member_ids` is in proximity order around `anchor` and always holds at
/// least two ids while the cluster is live.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub anchor: GeoPoint,
    pub member_ids: Vec<ItemId>,
    pub layout: SpiralLayout,
}

impl Cluster {
    pub fn new(
        anchor: GeoPoint,
        member_ids: Vec<ItemId>,
        step_m: f64,
        spiral: &SpiralConfig,
    ) -> Self {
        let layout = SpiralLayout::build(anchor, member_ids.iter(), step_m, spiral);
        Self {
            anchor,
            member_ids,
            layout,
        }
    }

    /// Farthest expanded member from the anchor.
    pub fn radius_meters(&self) -> f64 {
        self.layout.radius_m
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.member_ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }

    /// Rebuilds the spiral for a new step. Member order, and therefore slot
    /// assignment, is unchanged.
    pub fn relayout(&mut self, step_m: f64, spiral: &SpiralConfig) {
        self.layout = SpiralLayout::build(self.anchor, self.member_ids.iter(), step_m, spiral);
    }

    /// Keeps members for which `keep` holds; returns how many were dropped.
    /// The layout is left stale until [`Cluster::relayout`].
    pub fn retain_members(&mut self, mut keep: impl FnMut(&ItemId) -> bool) -> usize {
        let before = self.member_ids.len();
        self.member_ids.retain(|id| keep(id));
        before - self.member_ids.len()
    }

    /// Where the close control sits: due north of the anchor, just past the
    /// outermost slot.
    pub fn close_marker_point(&self, step_m: f64, gap_steps: f64) -> GeoPoint {
        let north = self.radius_meters() + step_m * gap_steps;
        self.anchor
            .offset(LocalOffset::new(0.0, north).to_degrees(self.anchor.latitude))
    }
}
