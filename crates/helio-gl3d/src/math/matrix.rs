// math/matrix.rs
//
// 4x4 column-major matrices (glam DMat4) with a checked inverse.

use glam::{DMat4, DQuat, DVec3};
use crate::error::{MathError, MathResult};
use super::vector::try_normalize;

/// Relative determinant below which a matrix counts as singular.
const SINGULAR_RATIO: f64 = 1e-12;

pub fn translation_matrix(t: DVec3) -> DMat4 {
    DMat4::from_translation(t)
}

/// Rotation of `angle` radians around `axis`.
pub fn rotation_matrix(axis: DVec3, angle: f64) -> MathResult<DMat4> {
    let axis = try_normalize(axis)?;
    Ok(DMat4::from_axis_angle(axis, angle))
}

pub fn quat_matrix(q: DQuat) -> DMat4 {
    DMat4::from_quat(q)
}

/// Inverse that fails on singular input.
///
/// The determinant is compared against the product of column lengths
/// (Hadamard's bound), so large translations or uniform scales do not trip
/// the check while collapsed axes do.
pub fn try_inverse(m: &DMat4) -> MathResult<DMat4> {
    let det = m.determinant();
    let bound = m.x_axis.length() * m.y_axis.length() * m.z_axis.length() * m.w_axis.length();

    if !det.is_finite() || bound == 0.0 || det.abs() <= bound * SINGULAR_RATIO {
        return Err(MathError::Singular(det));
    }
    Ok(m.inverse())
}

#[inline]
pub fn transform_point(m: &DMat4, p: DVec3) -> DVec3 {
    m.transform_point3(p)
}

#[inline]
pub fn transform_direction(m: &DMat4, d: DVec3) -> DVec3 {
    m.transform_vector3(d)
}
