use std::path::Path;

use layers::jitter::JitterConfig;
use layers::labels::LabelsConfig;
use layers::spiral::SpiralConfig;
use scene::viewport::{ThresholdConfig, ViewportState, ZoomRange};
use serde::{Deserialize, Serialize};

/// Every tunable of the declustering engine.
///
/// Missing JSON fields fall back to the defaults, so a config file only needs
/// the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclusterConfig {
    pub thresholds: ThresholdConfig,
    pub spiral: SpiralConfig,
    pub jitter: JitterConfig,
    pub labels: LabelsConfig,
    pub zoom: ZoomRange,
    /// Map presses this soon after a marker press are treated as the same tap.
    pub press_debounce_ms: i64,
    /// Gap between the outermost spiral slot and the close marker, in spiral steps.
    pub close_marker_gap_steps: f64,
    /// Used until the host reports its first viewport.
    pub fallback_viewport: ViewportState,
}

impl Default for DeclusterConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            spiral: SpiralConfig::default(),
            jitter: JitterConfig::default(),
            labels: LabelsConfig::default(),
            zoom: ZoomRange::default(),
            press_debounce_ms: 250,
            close_marker_gap_steps: 0.5,
            fallback_viewport: ViewportState::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config read failed: {msg}"),
            ConfigError::Parse(msg) => write!(f, "config parse failed: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl DeclusterConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: DeclusterConfig =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Rejects values that would make the geometry meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        let lengths = [
            ("thresholds.overlap_px", t.overlap_px),
            ("thresholds.overlap_floor_m", t.overlap_floor_m),
            ("thresholds.label_separation_px", t.label_separation_px),
            ("thresholds.label_separation_floor_m", t.label_separation_floor_m),
            ("thresholds.spiral_step_px", t.spiral_step_px),
            ("thresholds.spiral_step_floor_m", t.spiral_step_floor_m),
            ("thresholds.cluster_buffer_px", t.cluster_buffer_px),
            ("jitter.radius_m", self.jitter.radius_m),
            ("labels.idle_crowding_factor", self.labels.idle_crowding_factor),
            ("close_marker_gap_steps", self.close_marker_gap_steps),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !self.spiral.radius_factor.is_finite() || self.spiral.radius_factor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "spiral.radius_factor must be positive, got {}",
                self.spiral.radius_factor
            )));
        }
        let z = &self.zoom;
        if !(z.min_span > 0.0 && z.min_span < z.max_span) {
            return Err(ConfigError::Invalid(format!(
                "zoom spans must satisfy 0 < min_span < max_span, got {} / {}",
                z.min_span, z.max_span
            )));
        }
        if self.press_debounce_ms < 0 {
            return Err(ConfigError::Invalid(format!(
                "press_debounce_ms must not be negative, got {}",
                self.press_debounce_ms
            )));
        }
        Ok(())
    }
}
