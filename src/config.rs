use serde::{Deserialize, Serialize};

use crate::error::CameraError;

// ── CameraConfig ──────────────────────────────────────────────────────────────

/// Tuning values for a [`ViewCamera`](crate::camera::ViewCamera).
///
/// Missing fields fall back to [`CameraConfig::default`], so a config file
/// only needs to list what it changes:
///
/// ```json
/// { "lerp_speed": 0.1, "debug": true }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of the remaining distance covered per frame, shared by
    /// position, zoom and rotation. Range `[0, 1]`.
    pub lerp_speed: f32,
    /// Lower bound for the zoom target.
    pub zoom_min: f32,
    /// Upper bound for the zoom target.
    pub zoom_max: f32,
    /// Trauma removed per frame while shaking.
    pub trauma_decay: f32,
    /// Peak shake translation in pixels (at trauma 1).
    pub shake_translation: f32,
    /// Peak shake rotation in radians (at trauma 1).
    pub shake_rotation: f32,
    /// Emit debug overlay shapes.
    pub debug: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            lerp_speed:        0.05,
            zoom_min:          0.0,
            zoom_max:          100.0,
            trauma_decay:      0.02,
            shake_translation: 400.0,
            shake_rotation:    0.35,
            debug:             false,
        }
    }
}

impl CameraConfig {
    /// Parse a config from JSON. Unknown fields are ignored; missing ones take
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, CameraError> {
        let cfg: CameraConfig = serde_json::from_str(json)?;
        Ok(cfg.sanitized())
    }

    pub fn to_json(&self) -> Result<String, CameraError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp `lerp_speed` into `[0, 1]`, swap inverted zoom bounds and keep
    /// the trauma decay non-negative.
    pub fn sanitized(mut self) -> Self {
        self.lerp_speed = self.lerp_speed.clamp(0.0, 1.0);
        if self.zoom_min > self.zoom_max {
            std::mem::swap(&mut self.zoom_min, &mut self.zoom_max);
        }
        self.trauma_decay = self.trauma_decay.max(0.0);
        self
    }
}
