use serde::{Deserialize, Serialize};
use crate::error::ConfigError;
use crate::extensions::easing::Easing;

/// Nominal solar radius in meters.
pub const SUN_RADIUS: f64 = 6.957e8;
/// Mean Sun-Earth distance in meters.
pub const SUN_MEAN_DISTANCE_TO_EARTH: f64 = 1.495_978_707e11;

/// Viewer configuration, usually loaded from JSON. Every section and field is
/// optional; missing values fall back to the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
    pub interaction: InteractionConfig,
    pub roi: RoiConfig,
}

/// Projection and distance limits. Distances are expressed in solar radii
/// (or AU for the far limit) so that the whole scene scales with `sun_radius`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Radius of the reference sphere in physical units (default: meters).
    pub sun_radius: f64,
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,
    pub clip_near_radii: f64,
    pub clip_far_radii: f64,
    /// Camera distance after a reset.
    pub default_distance_radii: f64,
    /// Closest allowed camera distance.
    pub min_distance_radii: f64,
    /// Farthest allowed camera distance, in AU.
    pub max_distance_au: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sun_radius: SUN_RADIUS,
            fov_degrees: 10.0,
            clip_near_radii: 0.1,
            clip_far_radii: 1000.0,
            default_distance_radii: 12.0,
            min_distance_radii: 1.2,
            max_distance_au: 1.8,
        }
    }
}

impl CameraConfig {
    /// Closest z translation (negative, camera looks down -z).
    pub fn min_distance(&self) -> f64 {
        -self.sun_radius * self.min_distance_radii
    }

    /// Farthest z translation (more negative than `min_distance`).
    pub fn max_distance(&self) -> f64 {
        let au = self.sun_radius * (SUN_MEAN_DISTANCE_TO_EARTH / SUN_RADIUS);
        -au * self.max_distance_au
    }

    pub fn default_distance(&self) -> f64 {
        -self.sun_radius * self.default_distance_radii
    }

    pub fn clip_near(&self) -> f64 {
        self.sun_radius * self.clip_near_radii
    }

    pub fn clip_far(&self) -> f64 {
        self.sun_radius * self.clip_far_radii
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Duration of a rotation animation when none is given.
    pub default_duration_ms: f64,
    /// Duration of the zoom animation queued per wheel notch.
    pub zoom_duration_ms: f64,
    /// Progress curve of rotation and zoom animations.
    pub easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 2000.0,
            zoom_duration_ms: 400.0,
            easing: Easing::SineInOut,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Fraction of the current distance moved per wheel notch.
    pub zoom_step: f64,
    /// Multiplier on pan drag distance (1.0 = the point under the cursor follows it).
    pub pan_speed: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            zoom_step: 0.1,
            pan_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiConfig {
    /// Number of grid intervals per axis; `grid_steps + 1` samples are cast per axis.
    pub grid_steps: u32,
    /// Padding added to each side, as a fraction of the region's extent.
    pub padding: f64,
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            grid_steps: 10,
            padding: 0.1,
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        let finite = [
            ("camera.sun_radius", cam.sun_radius),
            ("camera.fov_degrees", cam.fov_degrees),
            ("camera.clip_near_radii", cam.clip_near_radii),
            ("camera.clip_far_radii", cam.clip_far_radii),
            ("camera.default_distance_radii", cam.default_distance_radii),
            ("camera.min_distance_radii", cam.min_distance_radii),
            ("camera.max_distance_au", cam.max_distance_au),
            ("animation.default_duration_ms", self.animation.default_duration_ms),
            ("animation.zoom_duration_ms", self.animation.zoom_duration_ms),
            ("interaction.zoom_step", self.interaction.zoom_step),
            ("interaction.pan_speed", self.interaction.pan_speed),
            ("roi.padding", self.roi.padding),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{} must be finite, got {}", name, value)));
        }
        if !(cam.sun_radius > 0.0) {
            return Err(ConfigError::Invalid(format!("sun_radius must be positive, got {}", cam.sun_radius)));
        }
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!("fov_degrees must be in (0, 180), got {}", cam.fov_degrees)));
        }
        if !(cam.clip_near_radii > 0.0 && cam.clip_far_radii > cam.clip_near_radii) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got {} / {}",
                cam.clip_near_radii, cam.clip_far_radii
            )));
        }
        if !(cam.max_distance() < cam.min_distance()) {
            return Err(ConfigError::Invalid("max distance must be farther than min distance".into()));
        }
        let default = cam.default_distance();
        if !(default <= cam.min_distance() && default >= cam.max_distance()) {
            return Err(ConfigError::Invalid(format!(
                "default distance of {} radii lies outside the distance limits",
                cam.default_distance_radii
            )));
        }
        if !(self.interaction.zoom_step > -1.0) {
            return Err(ConfigError::Invalid(format!(
                "interaction.zoom_step must be greater than -1, got {}",
                self.interaction.zoom_step
            )));
        }
        if self.roi.grid_steps == 0 {
            return Err(ConfigError::Invalid("roi.grid_steps must be at least 1".into()));
        }
        if !(self.roi.padding >= 0.0) {
            return Err(ConfigError::Invalid(format!("roi.padding must be non-negative, got {}", self.roi.padding)));
        }
        if !(self.animation.default_duration_ms >= 0.0 && self.animation.zoom_duration_ms >= 0.0) {
            return Err(ConfigError::Invalid("animation durations must be non-negative".into()));
        }
        Ok(())
    }
}
