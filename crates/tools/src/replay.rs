use foundation::time::Timestamp;
use interaction::{
    ClusterController, DeclusterConfig, InteractionEvent, InteractionPhase, RenderFrame,
};
use layers::jitter::jitter_items;
use runtime::metrics::MetricsSnapshot;
use scene::item::MapItem;
use scene::query::{CategoryFilter, available_categories};
use scene::viewport::ViewportState;
use serde::Serialize;
use tracing::debug;

use crate::scenario::{Scenario, ScenarioStep};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayedEvent {
    pub seq: u64,
    pub at: Timestamp,
    pub event: InteractionEvent,
}

/// Everything a replay produced, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub events: Vec<ReplayedEvent>,
    pub final_phase: InteractionPhase,
    pub frame: RenderFrame,
    pub viewport: ViewportState,
    /// Categories present in the last unfiltered snapshot, for the chip row.
    pub categories: Vec<String>,
    pub filter: CategoryFilter,
    pub metrics: MetricsSnapshot,
}

#[derive(Debug, Copy, Clone, Default)]
pub struct ReplayOptions {
    /// Spread items sharing a coordinate before each snapshot is handed over.
    pub jitter: bool,
}

/// Feeds `scenario` through a fresh controller.
pub fn replay(
    scenario: &Scenario,
    config: DeclusterConfig,
    options: ReplayOptions,
) -> ReplayReport {
    let prepare = |items: &[MapItem], filter: &CategoryFilter, config: &DeclusterConfig| {
        let visible = filter.apply(items);
        if options.jitter {
            jitter_items(&visible, &config.jitter)
        } else {
            visible
        }
    };

    let mut controller = ClusterController::new(config);
    if let Some(viewport) = scenario.viewport {
        controller.on_viewport_change(viewport);
    }
    let mut filter = scenario.filter.clone();
    let mut snapshot = scenario.items.clone();
    let items = prepare(&snapshot, &filter, controller.config());
    controller.set_items(items);

    for (i, step) in scenario.events.iter().enumerate() {
        debug!("replay step {i}: {step:?}");
        match step {
            ScenarioStep::Viewport { viewport } => controller.on_viewport_change(*viewport),
            ScenarioStep::Zoom { level } => {
                let range = controller.config().zoom;
                let viewport = controller.viewport().with_zoom(*level, &range);
                controller.on_viewport_change(viewport);
            }
            ScenarioStep::ZoomIn | ScenarioStep::ZoomOut => {
                let range = controller.config().zoom;
                let level = controller.viewport().zoom_level(&range);
                let level = match step {
                    ScenarioStep::ZoomIn => range.zoom_in(level),
                    _ => range.zoom_out(level),
                };
                let viewport = controller.viewport().with_zoom(level, &range);
                controller.on_viewport_change(viewport);
            }
            ScenarioStep::ToggleCategory { category } => {
                filter.toggle(category);
                let items = prepare(&snapshot, &filter, controller.config());
                controller.set_items(items);
            }
            ScenarioStep::Items { items } => {
                snapshot = items.clone();
                let items = prepare(&snapshot, &filter, controller.config());
                controller.set_items(items);
            }
            ScenarioStep::MarkerPress { id, at } => controller.on_marker_press(id, *at),
            ScenarioStep::MapPress { at } => controller.on_map_press(*at),
            ScenarioStep::LongPress { point, at } => controller.on_map_long_press(*point, *at),
            ScenarioStep::ClusterClose { at } => controller.on_cluster_close(*at),
        }
    }

    let events = controller
        .drain_events()
        .into_iter()
        .map(|e| ReplayedEvent {
            seq: e.seq,
            at: e.at,
            event: e.kind,
        })
        .collect();

    ReplayReport {
        events,
        final_phase: controller.phase(),
        frame: controller.render(),
        viewport: *controller.viewport(),
        categories: available_categories(&snapshot),
        filter,
        metrics: controller.metrics().snapshot(),
    }
}

#[cfg(test)]
mod tests {
    use super::{ReplayOptions, replay};
    use crate::scenario::Scenario;
    use foundation::ids::ItemId;
    use interaction::{DeclusterConfig, InteractionEvent, InteractionPhase};
    use scene::query::CategoryFilter;
    use pretty_assertions::assert_eq;

    const SAN_JOSE: &str = include_str!("../scenarios/san_jose.json");

    #[test]
    fn bundled_scenario_ends_expanded_with_detail() {
        let scenario = Scenario::from_json_str(SAN_JOSE).unwrap();
        let report = replay(&scenario, DeclusterConfig::default(), ReplayOptions::default());

        assert_eq!(report.final_phase, InteractionPhase::ExpandedWithDetail);
        assert!(report.frame.close_marker.is_some());
        let kinds: Vec<&InteractionEvent> = report.events.iter().map(|e| &e.event).collect();
        assert!(matches!(kinds[0], InteractionEvent::ClusterExpanded { .. }));
        assert_eq!(
            kinds[1],
            &InteractionEvent::DetailOpened {
                item_id: ItemId::new("t-102")
            }
        );
        assert_eq!(report.events.len(), 3);
        let seqs: Vec<u64> = report.events.iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn category_filter_hides_items_from_the_controller() {
        let scenario = Scenario::from_json_str(
            r#"{
                "filter": { "only": ["plumbing"] },
                "items": [
                    { "id": "a", "category": "plumbing",
                      "latitude": 9.9281, "longitude": -84.0907 },
                    { "id": "b", "category": "cleaning",
                      "latitude": 9.92811, "longitude": -84.09071 }
                ],
                "events": [{ "type": "marker_press", "id": "a", "at": 0 }]
            }"#,
        )
        .unwrap();
        let report = replay(&scenario, DeclusterConfig::default(), ReplayOptions::default());
        assert_eq!(report.final_phase, InteractionPhase::DetailOnly);
        assert_eq!(report.frame.positions.len(), 1);
    }

    #[test]
    fn jitter_separates_stacked_items() {
        let scenario = Scenario::from_json_str(
            r#"{
                "items": [
                    { "id": "a", "latitude": 9.9281, "longitude": -84.0907 },
                    { "id": "b", "latitude": 9.9281, "longitude": -84.0907 }
                ]
            }"#,
        )
        .unwrap();
        let plain = replay(&scenario, DeclusterConfig::default(), ReplayOptions::default());
        assert_eq!(plain.frame.positions[0].point, plain.frame.positions[1].point);

        let options = ReplayOptions { jitter: true };
        let jittered = replay(&scenario, DeclusterConfig::default(), options);
        assert_ne!(jittered.frame.positions[0].point, jittered.frame.positions[1].point);
    }

    #[test]
    fn zoom_step_changes_viewport_span() {
        let scenario = Scenario::from_json_str(
            r#"{
                "items": [
                    { "id": "a", "latitude": 9.9281, "longitude": -84.0907 },
                    { "id": "b", "latitude": 9.9290, "longitude": -84.0907 }
                ],
                "events": [
                    { "type": "zoom", "level": 1.0 },
                    { "type": "marker_press", "id": "a", "at": 0 }
                ]
            }"#,
        )
        .unwrap();
        // 100 m apart clusters at the default span but not at the closest
        // zoom, where the overlap threshold is ~62 m.
        let report = replay(&scenario, DeclusterConfig::default(), ReplayOptions::default());
        assert_eq!(report.final_phase, InteractionPhase::DetailOnly);
    }

    #[test]
    fn zoom_buttons_step_from_the_current_level() {
        let scenario = Scenario::from_json_str(
            r#"{
                "events": [
                    { "type": "zoom", "level": 0.5 },
                    { "type": "zoom_in" },
                    { "type": "zoom_in" },
                    { "type": "zoom_out" }
                ]
            }"#,
        )
        .unwrap();
        let config = DeclusterConfig::default();
        let range = config.zoom;
        let report = replay(&scenario, config, ReplayOptions::default());
        // 0.5 + 0.1 + 0.1 - 0.1
        let level = report.viewport.zoom_level(&range);
        assert!((level - 0.6).abs() < 1e-9, "level {level}");
    }

    #[test]
    fn zoom_out_stops_at_the_widest_span() {
        let scenario = Scenario::from_json_str(
            r#"{ "events": [{ "type": "zoom", "level": 0.05 }, { "type": "zoom_out" }] }"#,
        )
        .unwrap();
        let config = DeclusterConfig::default();
        let widest = config.zoom.max_span;
        let report = replay(&scenario, config, ReplayOptions::default());
        assert!((report.viewport.latitude_span - widest).abs() < 1e-12);
    }

    #[test]
    fn toggling_a_category_refilters_the_last_snapshot() {
        let scenario = Scenario::from_json_str(
            r#"{
                "items": [
                    { "id": "a", "category": "plumbing",
                      "latitude": 9.9281, "longitude": -84.0907 },
                    { "id": "b", "category": "cleaning",
                      "latitude": 9.9381, "longitude": -84.0907 },
                    { "id": "c", "latitude": 9.9481, "longitude": -84.0907 }
                ],
                "events": [
                    { "type": "toggle_category", "category": "cleaning" },
                    { "type": "marker_press", "id": "a", "at": 0 }
                ]
            }"#,
        )
        .unwrap();
        let report = replay(&scenario, DeclusterConfig::default(), ReplayOptions::default());

        // "a" is filtered out, so pressing it does nothing.
        assert!(report.events.is_empty());
        assert_eq!(report.final_phase, InteractionPhase::Idle);
        let ids: Vec<&str> = report.frame.positions.iter().map(|p| p.item_id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
        assert_eq!(report.filter, CategoryFilter::only(["cleaning"]));
        assert_eq!(report.categories, vec!["cleaning", "plumbing"]);
    }
}
