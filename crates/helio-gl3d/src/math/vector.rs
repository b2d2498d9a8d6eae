// math/vector.rs
//
// Vector helpers. DVec3/DVec4 are Copy, so every operation returns a new
// value and nothing is ever mutated through a shared reference.

use glam::{DVec3, DVec4};
use crate::error::{MathError, MathResult};

/// Lengths below this are treated as zero by `try_normalize`.
pub const MIN_LENGTH: f64 = 1e-12;

/// Component-wise comparison with an absolute tolerance.
#[inline]
pub fn approx_eq(a: DVec3, b: DVec3, eps: f64) -> bool {
    a.abs_diff_eq(b, eps)
}

/// Normalize, reporting near-zero input instead of producing NaN.
#[inline]
pub fn try_normalize(v: DVec3) -> MathResult<DVec3> {
    let len = v.length();
    if len.is_finite() && len > MIN_LENGTH {
        Ok(v / len)
    } else {
        Err(MathError::ZeroLength(len))
    }
}

/// Homogeneous position (w = 1). Affected by translation.
#[inline]
pub fn point(v: DVec3) -> DVec4 {
    v.extend(1.0)
}

/// Homogeneous direction (w = 0). Ignores translation.
#[inline]
pub fn direction(v: DVec3) -> DVec4 {
    v.extend(0.0)
}
