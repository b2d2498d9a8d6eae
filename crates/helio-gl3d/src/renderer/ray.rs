//! Ray casting from screen pixels against the reference sphere.
//!
//! A pixel is unprojected through the camera's inverse view transformation
//! into scene space, then into the local frame of a [`HitReferenceShape`]: a
//! sphere of the solar radius rotated about Y by the image's phi angle,
//! optionally backed by the image plane for rays that miss the sphere.

use glam::{DMat4, DQuat, DVec3};
use crate::math::matrix::{transform_direction, transform_point, try_inverse};
use crate::math::vector::try_normalize;
use super::camera::Camera;

/// Relative tolerance on the sphere discriminant, so rays grazing the limb do
/// not flicker between hit and miss.
const DISCRIMINANT_EPSILON: f64 = 1e-9;

/// Rays this close to parallel with the image plane do not hit it.
const PLANE_EPSILON: f64 = 1e-12;

/// Result of a cast. `origin`, `direction` and `hit_point` are in scene
/// space; `view_direction` is the same ray in camera space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
    /// Normalized direction in camera space, before unprojection.
    pub view_direction: DVec3,
    /// Where the ray hit the shape, if it did.
    pub hit_point: Option<DVec3>,
    /// The hit is on the sphere (as opposed to the fallback plane).
    pub on_sun: bool,
}

impl Ray {
    fn miss(origin: DVec3, direction: DVec3, view_direction: DVec3) -> Self {
        Self {
            origin,
            direction,
            view_direction,
            hit_point: None,
            on_sun: false,
        }
    }

    fn hit(mut self, point: DVec3, on_sun: bool) -> Self {
        self.hit_point = Some(point);
        self.on_sun = on_sun;
        self
    }
}

/// Sphere at the origin, rotated by `phi` around Y to match an image's frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitReferenceShape {
    pub radius: f64,
    pub phi: f64,
    /// Also intersect the image plane (local z = 0) when the sphere is missed.
    pub plane: bool,
}

impl HitReferenceShape {
    pub fn new(radius: f64, phi: f64) -> Self {
        Self {
            radius,
            phi,
            plane: false,
        }
    }

    /// Unrotated sphere without a fallback plane.
    pub fn sun(radius: f64) -> Self {
        Self::new(radius, 0.0)
    }

    pub fn with_plane(mut self, plane: bool) -> Self {
        self.plane = plane;
        self
    }

    /// Local to scene rotation.
    pub fn rotation(&self) -> DQuat {
        DQuat::from_rotation_y(self.phi)
    }

    /// Scene-space normal of the image plane.
    pub fn plane_normal(&self) -> DVec3 {
        self.rotation() * DVec3::Z
    }
}

/// Distance along a normalized ray to the first intersection with a sphere
/// of `radius` centred on the origin. Starting inside the sphere yields the
/// exit point.
pub fn intersect_sphere(origin: DVec3, direction: DVec3, radius: f64) -> Option<f64> {
    let b = origin.dot(direction);
    let c = origin.length_squared() - radius * radius;
    let mut disc = b * b - c;

    if disc < 0.0 {
        if disc >= -DISCRIMINANT_EPSILON * radius * radius {
            disc = 0.0;
        } else {
            return None;
        }
    }

    let root = disc.sqrt();
    let near = -b - root;
    let far = -b + root;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

/// Casts rays from pixels of `camera`'s viewport against `shape`.
pub struct RayTracer<'a> {
    shape: &'a HitReferenceShape,
    camera: &'a Camera,
}

impl<'a> RayTracer<'a> {
    pub fn new(shape: &'a HitReferenceShape, camera: &'a Camera) -> Self {
        Self { shape, camera }
    }

    /// Cast through pixel (`x`, `y`), origin top-left, y down.
    pub fn cast(&self, x: f64, y: f64) -> Ray {
        self.cast_with(&self.camera.transformation(), x, y)
    }

    /// Direction of the ray through pixel (`x`, `y`) in view space.
    pub fn view_direction(&self, x: f64, y: f64) -> DVec3 {
        let width = self.camera.width();
        let height = self.camera.height();
        let tan_half = (self.camera.fov_degrees().to_radians() * 0.5).tan();
        let ndc_x = 2.0 * x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * y / height;
        DVec3::new(ndc_x * tan_half * self.camera.aspect(), ndc_y * tan_half, -1.0)
    }

    fn cast_with(&self, transformation: &DMat4, x: f64, y: f64) -> Ray {
        if self.camera.width() <= 0.0 || self.camera.height() <= 0.0 {
            return Ray::miss(DVec3::ZERO, DVec3::NEG_Z, DVec3::NEG_Z);
        }

        let view_dir = self.view_direction(x, y).normalize();
        let inverse = match try_inverse(transformation) {
            Ok(m) => m,
            Err(err) => {
                log::warn!("ray cast skipped: {}", err);
                return Ray::miss(DVec3::ZERO, view_dir, view_dir);
            }
        };

        let origin = transform_point(&inverse, DVec3::ZERO);
        let direction = match try_normalize(transform_direction(&inverse, view_dir)) {
            Ok(d) => d,
            Err(err) => {
                log::warn!("ray cast skipped: {}", err);
                return Ray::miss(origin, view_dir, view_dir);
            }
        };
        let ray = Ray::miss(origin, direction, view_dir);

        let to_scene = self.shape.rotation();
        let to_local = to_scene.inverse();
        let local_origin = to_local * origin;
        let local_dir = to_local * direction;

        if let Some(t) = intersect_sphere(local_origin, local_dir, self.shape.radius) {
            return ray.hit(to_scene * (local_origin + local_dir * t), true);
        }

        if self.shape.plane && local_dir.z.abs() > PLANE_EPSILON {
            let t = -local_origin.z / local_dir.z;
            if t >= 0.0 {
                return ray.hit(to_scene * (local_origin + local_dir * t), false);
            }
        }

        ray
    }
}
