use foundation::math::{GeoPoint, METERS_PER_DEGREE};
use serde::{Deserialize, Serialize};

/// Last-known map region as reported by the host surface.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub center: GeoPoint,
    /// Visible latitude span in degrees.
    pub latitude_span: f64,
    pub screen_height_px: f64,
}

impl Default for ViewportState {
    /// The map screen's defaults before the first region change arrives.
    fn default() -> Self {
        Self {
            center: GeoPoint::default(),
            latitude_span: 0.03,
            screen_height_px: 800.0,
        }
    }
}

impl ViewportState {
    pub fn new(center: GeoPoint, latitude_span: f64, screen_height_px: f64) -> Self {
        Self {
            center,
            latitude_span,
            screen_height_px,
        }
    }

    /// Real-world meters covered by one screen pixel, vertically.
    pub fn meters_per_pixel(&self) -> f64 {
        (self.latitude_span * METERS_PER_DEGREE) / self.screen_height_px.max(1.0)
    }

    /// Same viewport with the span replaced by the span for zoom level `z`.
    pub fn with_zoom(self, z: f64, range: &ZoomRange) -> Self {
        Self {
            latitude_span: range.span_for_zoom(z),
            ..self
        }
    }

    pub fn zoom_level(&self, range: &ZoomRange) -> f64 {
        range.zoom_for_span(self.latitude_span)
    }
}

/// Pixel-based UX thresholds and the meter floors that keep them usable at
/// far zoom.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub overlap_px: f64,
    pub overlap_floor_m: f64,
    pub label_separation_px: f64,
    pub label_separation_floor_m: f64,
    /// Marker diameter (40px) plus gap (24px).
    pub spiral_step_px: f64,
    pub spiral_step_floor_m: f64,
    pub cluster_buffer_px: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            overlap_px: 90.0,
            overlap_floor_m: 25.0,
            label_separation_px: 28.0,
            label_separation_floor_m: 10.0,
            spiral_step_px: 64.0,
            spiral_step_floor_m: 35.0,
            cluster_buffer_px: 66.0,
        }
    }
}

/// Meter thresholds derived from a viewport. Recompute on every use; the
/// viewport changes far more often than these are read.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportMetrics {
    pub meters_per_pixel: f64,
    /// Items closer than this collide visually.
    pub overlap_threshold_m: f64,
    /// Minimum spacing for a price label to render without clutter.
    pub label_separation_m: f64,
    /// Base radial spacing of the expansion spiral.
    pub spiral_step_m: f64,
    /// Exclusion ring around an expanded cluster.
    pub cluster_buffer_m: f64,
}

impl ViewportMetrics {
    pub fn compute(viewport: &ViewportState, config: &ThresholdConfig) -> Self {
        let mpp = viewport.meters_per_pixel();
        Self {
            meters_per_pixel: mpp,
            overlap_threshold_m: (mpp * config.overlap_px).max(config.overlap_floor_m),
            label_separation_m: (mpp * config.label_separation_px)
                .max(config.label_separation_floor_m),
            spiral_step_m: (mpp * config.spiral_step_px).max(config.spiral_step_floor_m),
            cluster_buffer_m: mpp * config.cluster_buffer_px,
        }
    }
}

/// Linear mapping between a normalized zoom level (0 = far, 1 = near) and
/// the visible latitude span.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomRange {
    pub min_span: f64,
    pub max_span: f64,
    /// Increment applied by a single zoom-in/zoom-out button press.
    pub step: f64,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            min_span: 0.005,
            max_span: 0.3,
            step: 0.1,
        }
    }
}

impl ZoomRange {
    pub fn span_for_zoom(&self, z: f64) -> f64 {
        let z = z.clamp(0.0, 1.0);
        self.max_span - (self.max_span - self.min_span) * z
    }

    pub fn zoom_for_span(&self, span: f64) -> f64 {
        let width = self.max_span - self.min_span;
        if width <= 0.0 {
            return 0.0;
        }
        ((self.max_span - span) / width).clamp(0.0, 1.0)
    }

    pub fn zoom_in(&self, z: f64) -> f64 {
        (z + self.step).clamp(0.0, 1.0)
    }

    pub fn zoom_out(&self, z: f64) -> f64 {
        (z - self.step).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{ThresholdConfig, ViewportMetrics, ViewportState, ZoomRange};
    use foundation::math::GeoPoint;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn viewport(span: f64, height: f64) -> ViewportState {
        ViewportState::new(GeoPoint::new(9.93, -84.09), span, height)
    }

    #[test]
    fn city_zoom_thresholds() {
        let m = ViewportMetrics::compute(&viewport(0.03, 800.0), &ThresholdConfig::default());
        assert_close(m.meters_per_pixel, 4.1625, 1e-9);
        assert_close(m.overlap_threshold_m, 374.625, 1e-6);
        assert_close(m.label_separation_m, 116.55, 1e-6);
        assert_close(m.spiral_step_m, 266.4, 1e-6);
        assert_close(m.cluster_buffer_m, 274.725, 1e-6);
    }

    #[test]
    fn street_zoom_hits_floors() {
        let m = ViewportMetrics::compute(&viewport(0.0001, 1000.0), &ThresholdConfig::default());
        assert_eq!(m.overlap_threshold_m, 25.0);
        assert_eq!(m.label_separation_m, 10.0);
        assert_eq!(m.spiral_step_m, 35.0);
        assert!(m.cluster_buffer_m < 1.0);
    }

    #[test]
    fn zero_height_screen_is_treated_as_one_pixel() {
        let v = viewport(0.01, 0.0);
        assert_close(v.meters_per_pixel(), 1110.0, 1e-9);
    }

    #[test]
    fn zoom_endpoints_and_clamping() {
        let range = ZoomRange::default();
        assert_close(range.span_for_zoom(0.0), 0.3, 1e-12);
        assert_close(range.span_for_zoom(1.0), 0.005, 1e-12);
        assert_close(range.span_for_zoom(7.0), 0.005, 1e-12);
        assert_close(range.span_for_zoom(-1.0), 0.3, 1e-12);
        assert_close(range.zoom_for_span(range.span_for_zoom(0.4)), 0.4, 1e-12);
    }

    #[test]
    fn zoom_buttons_step_and_clamp() {
        let range = ZoomRange::default();
        assert_close(range.zoom_in(0.5), 0.6, 1e-12);
        assert_close(range.zoom_out(0.05), 0.0, 1e-12);
        assert_close(range.zoom_in(0.95), 1.0, 1e-12);

        let v = viewport(0.03, 800.0).with_zoom(1.0, &range);
        assert_close(v.latitude_span, 0.005, 1e-12);
        assert_close(v.zoom_level(&range), 1.0, 1e-12);
    }

    #[test]
    fn partial_threshold_config_uses_defaults() {
        let cfg: ThresholdConfig = serde_json::from_str(r#"{"overlap_px": 120.0}"#).expect("json");
        assert_eq!(cfg.overlap_px, 120.0);
        assert_eq!(cfg.spiral_step_px, 64.0);
    }
}
