use foundation::ids::ItemId;
use foundation::math::GeoPoint;
use scene::item::MapItem;
use serde::Serialize;

use crate::labels::{LabelPolicy, PlacedMarker};

/// Where and how the host should draw one item this pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPosition {
    pub item_id: ItemId,
    pub point: GeoPoint,
    pub show_label: bool,
}

/// Computes one render pass from scratch.
///
/// Expanded cluster members are drawn at their spiral slot; every other item
/// at its own coordinates. Slots whose item is no longer in `items` are
/// skipped. Output follows `items` order.
pub fn render_positions(items: &[MapItem], policy: &LabelPolicy<'_>) -> Vec<RenderPosition> {
    let placed: Vec<PlacedMarker<'_>> = items
        .iter()
        .map(|item| PlacedMarker {
            id: &item.id,
            point: policy
                .expanded
                .and_then(|layout| layout.position_of(&item.id))
                .unwrap_or(item.point),
        })
        .collect();

    placed
        .iter()
        .map(|p| RenderPosition {
            item_id: p.id.clone(),
            point: p.point,
            show_label: policy.should_show_label(p.id, p.point, &placed),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::render_positions;
    use crate::labels::{LabelPolicy, LabelsConfig};
    use crate::spiral::{SpiralConfig, SpiralLayout};
    use foundation::ids::ItemId;
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;
    use scene::item::MapItem;
    use scene::viewport::{ThresholdConfig, ViewportMetrics, ViewportState};

    fn metrics() -> ViewportMetrics {
        let v = ViewportState::new(GeoPoint::new(9.93, -84.09), 0.03, 800.0);
        ViewportMetrics::compute(&v, &ThresholdConfig::default())
    }

    fn items() -> Vec<MapItem> {
        vec![
            MapItem::new("a", 9.9281, -84.0907),
            MapItem::new("b", 9.92811, -84.09071),
            MapItem::new("lone", 9.99, -84.2),
        ]
    }

    #[test]
    fn idle_pass_draws_originals() {
        let items = items();
        let policy = LabelPolicy::new(metrics(), LabelsConfig::default(), None);
        let out = render_positions(&items, &policy);

        let points: Vec<GeoPoint> = out.iter().map(|r| r.point).collect();
        let originals: Vec<GeoPoint> = items.iter().map(|i| i.point).collect();
        assert_eq!(points, originals);
        let labels: Vec<bool> = out.iter().map(|r| r.show_label).collect();
        assert_eq!(labels, vec![false, false, true]);
    }

    #[test]
    fn expanded_pass_draws_members_at_slots() {
        let items = items();
        let anchor = items[0].point;
        let members = [items[0].id.clone(), items[1].id.clone(), ItemId::new("gone")];
        let layout = SpiralLayout::build(anchor, members.iter(), 266.4, &SpiralConfig::default());
        let policy = LabelPolicy::new(metrics(), LabelsConfig::default(), Some(&layout));
        let out = render_positions(&items, &policy);

        assert_eq!(out.len(), 3);
        assert_eq!(Some(out[0].point), layout.position_of(&items[0].id));
        assert_eq!(Some(out[1].point), layout.position_of(&items[1].id));
        assert_eq!(out[2].point, items[2].point);
        assert!(out[0].show_label && out[1].show_label);
    }
}
