// extensions/easing.rs
//
// Easing curves for camera animation.
// No dependencies on Camera or the scene graph, just math.

use std::f64::consts::PI;
use serde::{Deserialize, Serialize};

/// Progress curve of a camera animation, selectable from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// Half cosine wave, `0.5 - cos(t·π)·0.5`.
    #[default]
    SineInOut,
}

impl Easing {
    /// Apply the curve to a normalized time value `t` in [0, 1].
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SineInOut => 0.5 - (t * PI).cos() * 0.5,
        }
    }
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
