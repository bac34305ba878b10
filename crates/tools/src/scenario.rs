use std::path::Path;

use foundation::ids::ItemId;
use foundation::math::GeoPoint;
use foundation::time::Timestamp;
use scene::item::MapItem;
use scene::query::CategoryFilter;
use scene::viewport::ViewportState;
use serde::Deserialize;

/// A recorded map session: the starting snapshot plus host inputs in order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    /// Starting region; the config's fallback viewport when absent.
    #[serde(default)]
    pub viewport: Option<ViewportState>,
    /// Category chips applied to every item snapshot.
    #[serde(default)]
    pub filter: CategoryFilter,
    #[serde(default)]
    pub items: Vec<MapItem>,
    #[serde(default)]
    pub events: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Viewport { viewport: ViewportState },
    /// Normalized zoom level, 0 = far, 1 = near.
    Zoom { level: f64 },
    /// One press of the zoom-in button.
    ZoomIn,
    ZoomOut,
    /// Tap on a category chip; re-filters the last item snapshot.
    ToggleCategory { category: String },
    Items { items: Vec<MapItem> },
    MarkerPress { id: ItemId, at: Timestamp },
    MapPress { at: Timestamp },
    LongPress { point: GeoPoint, at: Timestamp },
    ClusterClose { at: Timestamp },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::Io(msg) => write!(f, "scenario read failed: {msg}"),
            ScenarioError::Parse(msg) => write!(f, "scenario parse failed: {msg}"),
        }
    }
}

impl std::error::Error for ScenarioError {}

impl Scenario {
    pub fn from_json_str(text: &str) -> Result<Self, ScenarioError> {
        serde_json::from_str(text).map_err(|e| ScenarioError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ScenarioError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }
}
