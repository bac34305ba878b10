use foundation::ids::ItemId;
use foundation::math::GeoPoint;
use serde::Serialize;

use crate::state::Cluster;

/// Notifications for the host UI, drained after each input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent {
    /// Show the detail card for an item. Replaces any card already shown.
    DetailOpened { item_id: ItemId },
    DetailClosed,
    /// The open card's item was pressed again; the host navigates to its page.
    DetailActivated { item_id: ItemId },
    ClusterExpanded { cluster: Cluster },
    ClusterCollapsed,
    /// Pan the camera to `point`.
    FocusRequested { point: GeoPoint },
}
