// math/quat.rs
//
// Rotation quaternions. All constructors return unit quaternions; callers that
// compose rotations re-normalize the product to keep drift out of the camera.

use glam::{DQuat, DVec3};
use crate::error::{MathError, MathResult};
use super::vector::try_normalize;
use super::EPSILON;

/// Above this dot product two rotations are close enough that slerp falls
/// back to a normalized lerp.
const SLERP_LINEAR_THRESHOLD: f64 = 0.9995;

/// Rotation of `angle` radians around `axis`. The axis need not be unit length
/// but must not be zero.
pub fn axis_angle(axis: DVec3, angle: f64) -> MathResult<DQuat> {
    let axis = try_normalize(axis)?;
    Ok(DQuat::from_axis_angle(axis, angle))
}

/// The rotation that carries direction `from` onto direction `to`.
///
/// Coincident directions give the identity. Antiparallel directions have no
/// unique axis and are reported as `DegenerateRotation`.
pub fn rotation_between(from: DVec3, to: DVec3) -> MathResult<DQuat> {
    let a = try_normalize(from)?;
    let b = try_normalize(to)?;
    let cos = a.dot(b).clamp(-1.0, 1.0);

    if cos >= 1.0 - EPSILON {
        return Ok(DQuat::IDENTITY);
    }
    if cos <= -1.0 + EPSILON {
        return Err(MathError::DegenerateRotation);
    }

    let axis = try_normalize(a.cross(b)).map_err(|_| MathError::DegenerateRotation)?;
    Ok(DQuat::from_axis_angle(axis, cos.acos()))
}

/// Spherical linear interpolation along the shorter arc.
///
/// `t = 0` yields `a`, `t = 1` yields `b` (or `-b`, the same rotation).
pub fn slerp(a: DQuat, b: DQuat, t: f64) -> DQuat {
    let mut dot = a.dot(b);
    let b = if dot < 0.0 {
        dot = -dot;
        -b
    } else {
        b
    };

    if dot > SLERP_LINEAR_THRESHOLD {
        return (a + (b - a) * t).normalize();
    }

    let theta = dot.min(1.0).acos();
    let sin_theta = theta.sin();
    let s0 = ((1.0 - t) * theta).sin() / sin_theta;
    let s1 = (t * theta).sin() / sin_theta;
    (a * s0 + b * s1).normalize()
}

/// Whether `q` represents no rotation (within `eps` on the scalar part).
#[inline]
pub fn is_identity(q: DQuat, eps: f64) -> bool {
    q.w.abs() >= 1.0 - eps
}

/// Angle in radians between two rotations, in [0, π].
#[inline]
pub fn angle_between(a: DQuat, b: DQuat) -> f64 {
    // atan2 of the relative rotation stays accurate near zero, where acos of
    // the dot product does not.
    let d = a.conjugate() * b;
    2.0 * d.xyz().length().atan2(d.w.abs())
}
