use foundation::ids::ItemId;
use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};

/// A task marker as handed over by the host screen.
///
/// Coordinates are flattened in the wire form, so a host record reads
/// `{"id": .., "latitude": .., "longitude": .., "display_reward": .., "category": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapItem {
    pub id: ItemId,
    #[serde(flatten)]
    pub point: GeoPoint,
    #[serde(default)]
    pub display_reward: f64,
    #[serde(default)]
    pub category: String,
}

impl MapItem {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: ItemId::new(id),
            point: GeoPoint::new(latitude, longitude),
            display_reward: 0.0,
            category: String::new(),
        }
    }

    pub fn with_reward(mut self, reward: f64) -> Self {
        self.display_reward = reward;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}
