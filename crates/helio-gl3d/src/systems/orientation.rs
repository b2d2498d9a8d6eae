//! Alignment of image layers with the scene.
//!
//! An image's orientation is the direction its plane faces, in scene
//! coordinates. Only the rotation about the solar Y axis is used: `phi` is the
//! angle from +Z towards +X of the orientation's XZ projection, so that the
//! image normal is `(sin phi, 0, cos phi)`.

use std::f64::consts::TAU;
use glam::{DQuat, DVec3};
use crate::math::EPSILON;

/// Views closer than this to edge-on are fully transparent.
pub const CORONA_MIN_ANGLE: f64 = 30.0;
/// Views this far from edge-on or more are fully opaque.
pub const CORONA_MAX_ANGLE: f64 = 60.0;

/// Rotation about Y of an image facing `orientation`.
///
/// Orientations along the Y axis have no defined rotation about it and give 0.
pub fn phi_from_orientation(orientation: DVec3) -> f64 {
    let up = orientation.normalize_or_zero();
    if up.abs_diff_eq(DVec3::Y, EPSILON) {
        return 0.0;
    }
    let xz = DVec3::new(orientation.x, 0.0, orientation.z);
    let Some(xz) = xz.try_normalize() else {
        return 0.0;
    };
    let phi = xz.z.clamp(-1.0, 1.0).acos();
    if xz.x < 0.0 {
        -phi
    } else {
        phi
    }
}

/// Brings scene points into the image frame: rotates the image normal onto +Z.
pub fn phi_rotation(phi: f64) -> DQuat {
    DQuat::from_rotation_y(TAU - phi)
}

/// Normal of the image plane for `phi`.
pub fn image_normal(phi: f64) -> DVec3 {
    DVec3::new(phi.sin(), 0.0, phi.cos())
}

/// Angle in degrees between the direction towards the viewer and `layer_normal`.
/// 0 when the layer faces the camera, 90 when seen edge-on.
pub fn view_angle_degrees(camera_rotation: DQuat, layer_normal: DVec3) -> f64 {
    let towards_viewer = camera_rotation.inverse() * DVec3::Z;
    let normal = layer_normal.normalize_or_zero();
    towards_viewer.dot(normal).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Opacity of the off-disc corona for a view angle: fades out as the layer
/// turns edge-on.
pub fn corona_alpha(view_angle_degrees: f64) -> f64 {
    let off_edge = (90.0 - view_angle_degrees).abs();
    ((off_edge - CORONA_MIN_ANGLE) / (CORONA_MAX_ANGLE - CORONA_MIN_ANGLE)).clamp(0.0, 1.0)
}
