use foundation::ids::ItemId;
use foundation::math::{GeoPoint, distance_meters};
use foundation::time::Timestamp;
use layers::labels::LabelPolicy;
use layers::markers::{RenderPosition, render_positions};
use runtime::event_bus::{Event, EventBus};
use runtime::metrics::Metrics;
use scene::item::MapItem;
use scene::picking::{find_cluster, nearest_item};
use scene::viewport::{ViewportMetrics, ViewportState};
use scene::world::MarkerSet;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::DeclusterConfig;
use crate::events::InteractionEvent;
use crate::state::{Cluster, InteractionMode, InteractionPhase, InteractionState};

/// Id the host gives the synthetic close marker; pressing it collapses the
/// cluster.
pub const CLOSE_MARKER_ID: &str = "__cluster_close__";

/// One full render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub positions: Vec<RenderPosition>,
    /// Present while a cluster is expanded.
    pub close_marker: Option<GeoPoint>,
}

/// Owns the interaction state of one map screen and turns host gestures into
/// state transitions, events and render passes.
///
/// Single-threaded: every input runs to completion inside the host callback
/// that delivered it. Rendering is recomputed from scratch on every call.
#[derive(Debug)]
pub struct ClusterController {
    config: DeclusterConfig,
    items: MarkerSet,
    viewport: ViewportState,
    state: InteractionState,
    cluster: Option<Cluster>,
    last_marker_press: Option<Timestamp>,
    /// Latest timestamp seen on any input; stamps events from untimed inputs.
    clock: Timestamp,
    events: EventBus<InteractionEvent>,
    metrics: Metrics,
}

impl Default for ClusterController {
    fn default() -> Self {
        Self::new(DeclusterConfig::default())
    }
}

impl ClusterController {
    pub fn new(config: DeclusterConfig) -> Self {
        let viewport = config.fallback_viewport;
        Self {
            config,
            items: MarkerSet::new(),
            viewport,
            state: InteractionState::default(),
            cluster: None,
            last_marker_press: None,
            clock: Timestamp::default(),
            events: EventBus::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn config(&self) -> &DeclusterConfig {
        &self.config
    }

    pub fn items(&self) -> &MarkerSet {
        &self.items
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn viewport_metrics(&self) -> ViewportMetrics {
        ViewportMetrics::compute(&self.viewport, &self.config.thresholds)
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn phase(&self) -> InteractionPhase {
        self.state.phase()
    }

    pub fn cluster(&self) -> Option<&Cluster> {
        self.cluster.as_ref()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn events(&self) -> &[Event<InteractionEvent>] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event<InteractionEvent>> {
        self.events.drain()
    }

    /// Replaces the item snapshot after a data fetch.
    ///
    /// Cluster members that vanished are dropped; a cluster left with one
    /// member or none collapses, otherwise it is laid out again. A detail
    /// whose item vanished is closed.
    pub fn set_items(&mut self, items: Vec<MapItem>) {
        self.items = MarkerSet::from_items(items);
        let at = self.clock;
        debug!("item snapshot replaced: {} items", self.items.len());

        if let Some(id) = &self.state.active_detail
            && !self.items.contains(id)
        {
            debug!("detail item {id} no longer present");
            self.close_detail(at);
        }

        let step = self.viewport_metrics().spiral_step_m;
        let mut collapse = false;
        if let Some(cluster) = self.cluster.as_mut() {
            let items = &self.items;
            let dropped = cluster.retain_members(|id| items.contains(id));
            if cluster.len() <= 1 {
                collapse = true;
            } else if dropped > 0 {
                cluster.relayout(step, &self.config.spiral);
                self.metrics.set_gauge("cluster.members", cluster.len() as i64);
            }
        }
        if collapse {
            debug!("cluster lost its members on refresh");
            self.collapse(at);
        }
    }

    /// Stores the new region and re-lays out an expanded cluster for the new
    /// spiral step.
    pub fn on_viewport_change(&mut self, viewport: ViewportState) {
        self.viewport = viewport;
        let step = self.viewport_metrics().spiral_step_m;
        if let Some(cluster) = self.cluster.as_mut() {
            cluster.relayout(step, &self.config.spiral);
            trace!("cluster relaid out with step {step:.1} m");
        }
    }

    /// A tap on a marker.
    ///
    /// Idle: expands the cluster around the item, or opens its detail when it
    /// stands alone. Expanded: members and items clear of the exclusion ring
    /// (`radius + cluster buffer`) open their detail; other items sit under
    /// the spiral and the press is dropped.
    pub fn on_marker_press(&mut self, id: &ItemId, at: Timestamp) {
        self.observe(at);
        self.metrics.inc("marker_press");
        self.last_marker_press = Some(at);
        if id.as_str() == CLOSE_MARKER_ID {
            self.on_cluster_close(at);
            return;
        }

        let Some(item) = self.items.get(id).cloned() else {
            warn!("marker press for unknown item {id}");
            return;
        };

        if let Some(cluster) = &self.cluster
            && !cluster.contains(&item.id)
        {
            let exclusion = cluster.radius_meters() + self.viewport_metrics().cluster_buffer_m;
            if distance_meters(item.point, cluster.anchor) <= exclusion {
                trace!("press on {id} hidden behind the expanded cluster ignored");
                return;
            }
        }

        if self.state.mode == InteractionMode::Idle {
            let members = self.cluster_around(item.point);
            if members.len() > 1 {
                self.expand(item.point, members, at);
                return;
            }
        }
        self.open_detail(&item, at);
    }

    /// A press on empty map. Presses right after a marker press are the same
    /// tap reaching the map too and are ignored.
    pub fn on_map_press(&mut self, at: Timestamp) {
        self.observe(at);
        self.metrics.inc("map_press");

        if let Some(last) = self.last_marker_press
            && at.millis_since(last) < self.config.press_debounce_ms
        {
            self.metrics.inc("map_press.debounced");
            trace!("map press {}ms after marker press ignored", at.millis_since(last));
            return;
        }

        if self.state.active_detail.is_some() {
            self.close_detail(at);
        } else if self.cluster.is_some() {
            self.collapse(at);
        }
    }

    pub fn on_map_long_press(&mut self, point: GeoPoint, at: Timestamp) {
        self.observe(at);
        self.metrics.inc("long_press");

        let members = self.cluster_around(point);
        if members.len() > 1 {
            self.expand(point, members, at);
            return;
        }
        if let Some(item) = nearest_item(self.items.items(), point).cloned() {
            self.open_detail(&item, at);
        }
    }

    /// Collapses the cluster and closes any detail, returning to idle.
    ///
    /// A tap on the close marker should arrive through
    /// [`ClusterController::on_marker_press`] with [`CLOSE_MARKER_ID`] so the
    /// map press it bubbles into is debounced.
    pub fn on_cluster_close(&mut self, at: Timestamp) {
        self.observe(at);
        self.close_detail(at);
        self.collapse(at);
    }

    pub fn render(&self) -> RenderFrame {
        let metrics = self.viewport_metrics();
        let layout = self.cluster.as_ref().map(|c| &c.layout);
        let policy = LabelPolicy::new(metrics, self.config.labels, layout);
        let positions = render_positions(self.items.items(), &policy);
        let close_marker = self.cluster.as_ref().map(|c| {
            c.close_marker_point(metrics.spiral_step_m, self.config.close_marker_gap_steps)
        });
        RenderFrame {
            positions,
            close_marker,
        }
    }

    fn observe(&mut self, at: Timestamp) {
        self.clock = self.clock.max(at);
    }

    fn cluster_around(&self, point: GeoPoint) -> Vec<ItemId> {
        let threshold = self.viewport_metrics().overlap_threshold_m;
        find_cluster(self.items.items(), point, threshold)
            .into_iter()
            .map(|item| item.id.clone())
            .collect()
    }

    fn expand(&mut self, anchor: GeoPoint, members: Vec<ItemId>, at: Timestamp) {
        self.collapse(at);
        self.close_detail(at);

        let step = self.viewport_metrics().spiral_step_m;
        let cluster = Cluster::new(anchor, members, step, &self.config.spiral);
        let size = cluster.len() as i64;
        debug!(
            "cluster expanded: {size} members, radius {:.1} m",
            cluster.radius_meters()
        );

        self.metrics.inc("cluster.expand");
        self.metrics.record("cluster.size", size);
        self.metrics.set_gauge("cluster.members", size);
        self.events.emit(
            at,
            InteractionEvent::ClusterExpanded {
                cluster: cluster.clone(),
            },
        );
        self.cluster = Some(cluster);
        self.state.mode = InteractionMode::Expanded;
    }

    fn collapse(&mut self, at: Timestamp) {
        if self.cluster.take().is_none() {
            return;
        }
        self.state.mode = InteractionMode::Idle;
        debug!("cluster collapsed");
        self.metrics.inc("cluster.collapse");
        self.metrics.set_gauge("cluster.members", 0);
        self.events.emit(at, InteractionEvent::ClusterCollapsed);
    }

    fn open_detail(&mut self, item: &MapItem, at: Timestamp) {
        if self.state.active_detail.as_ref() == Some(&item.id) {
            debug!("detail {} activated", item.id);
            self.events.emit(
                at,
                InteractionEvent::DetailActivated {
                    item_id: item.id.clone(),
                },
            );
            return;
        }
        debug!("detail {} opened", item.id);
        self.state.active_detail = Some(item.id.clone());
        self.metrics.inc("detail.open");
        self.events.emit(
            at,
            InteractionEvent::DetailOpened {
                item_id: item.id.clone(),
            },
        );
        self.events
            .emit(at, InteractionEvent::FocusRequested { point: item.point });
    }

    fn close_detail(&mut self, at: Timestamp) {
        if let Some(id) = self.state.active_detail.take() {
            debug!("detail {id} closed");
            self.metrics.inc("detail.close");
            self.events.emit(at, InteractionEvent::DetailClosed);
        }
    }
}
