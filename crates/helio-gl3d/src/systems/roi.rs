//! Region-of-interest estimation.
//!
//! A grid of rays is cast across the viewport against a layer's hit shape.
//! The hits, brought into the image frame by the layer's phi rotation, bound
//! the part of the image that is visible. That box is padded, clamped to the
//! image's physical extent and handed to tile selection downstream.

use glam::{DVec2, DVec3};
use crate::api::config::RoiConfig;
use crate::api::types::{MetaDataProvider, Region};
use crate::error::RoiError;
use crate::renderer::camera::Camera;
use crate::renderer::ray::{HitReferenceShape, RayTracer};
use super::orientation::phi_rotation;

/// Pixel positions of a `(steps + 1)²` grid spanning the viewport, edges
/// included, column by column.
pub fn sample_grid(width: f64, height: f64, steps: u32) -> Vec<DVec2> {
    let steps = steps.max(1);
    let n = steps as usize + 1;
    let mut points = Vec::with_capacity(n * n);
    for i in 0..=steps {
        for j in 0..=steps {
            points.push(DVec2::new(
                i as f64 * width / steps as f64,
                j as f64 * height / steps as f64,
            ));
        }
    }
    points
}

/// Scene-space hit points of the sample grid. Plane hits count too when the
/// shape has a plane.
pub fn sample_hits(camera: &Camera, shape: &HitReferenceShape, steps: u32) -> Vec<DVec3> {
    let tracer = RayTracer::new(shape, camera);
    sample_grid(camera.width(), camera.height(), steps)
        .into_iter()
        .filter_map(|p| tracer.cast(p.x, p.y).hit_point)
        .collect()
}

/// Bounding box of the hits' (x, y) after rotating them into the image frame.
pub fn hit_bounds(hits: &[DVec3], phi: f64) -> Option<Region> {
    if hits.is_empty() {
        return None;
    }
    let to_image = phi_rotation(phi);
    let mut min = DVec2::splat(f64::MAX);
    let mut max = DVec2::splat(f64::MIN);
    for hit in hits {
        let p = (to_image * *hit).truncate();
        min = min.min(p);
        max = max.max(p);
    }
    Some(Region::new(min, max))
}

/// Restrict `bounds` to the image's physical extent, pad the result by
/// `padding` of its extent per side, then restrict it again. Padding follows
/// the visible part only, so plane hits far past the image edge do not widen
/// the region.
pub fn finish_region(bounds: Region, metadata: &dyn MetaDataProvider, padding: f64) -> Result<Region, RoiError> {
    let image = metadata.physical_region();
    let visible = bounds.clamp_to(&image);
    if !visible.is_valid() {
        return Err(RoiError::Degenerate {
            width: visible.width(),
            height: visible.height(),
        });
    }
    let region = visible.padded(padding).clamp_to(&image);
    if region.is_valid() {
        Ok(region)
    } else {
        Err(RoiError::Degenerate {
            width: region.width(),
            height: region.height(),
        })
    }
}

/// Visible region of the image described by `metadata`, seen through `camera`.
pub fn estimate_region(
    camera: &Camera,
    shape: &HitReferenceShape,
    metadata: &dyn MetaDataProvider,
    config: &RoiConfig,
) -> Result<Region, RoiError> {
    let hits = sample_hits(camera, shape, config.grid_steps);
    let bounds = hit_bounds(&hits, shape.phi).ok_or(RoiError::NoHits)?;
    log::trace!("{} of {} roi samples hit, bounds {:?}", hits.len(), (config.grid_steps + 1).pow(2), bounds);
    finish_region(bounds, metadata, config.padding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::CameraConfig;
    use crate::api::types::{ImageMetaData, ViewMode};
    use std::f64::consts::FRAC_PI_2;

    const R: f64 = 100.0;

    fn camera(z: f64) -> Camera {
        let config = CameraConfig {
            sun_radius: R,
            ..CameraConfig::default()
        };
        let mut cam = Camera::new(ViewMode::Mode3D, &config);
        cam.set_viewport(800.0, 600.0);
        cam.set_z_translation(z);
        cam.update_transformation_silent();
        cam
    }

    fn metadata() -> ImageMetaData {
        ImageMetaData::new(DVec2::splat(-100.0), DVec2::splat(100.0))
    }

    #[test]
    fn grid_covers_viewport_edges() {
        let grid = sample_grid(800.0, 600.0, 10);
        assert_eq!(grid.len(), 121);
        assert_eq!(grid[0], DVec2::ZERO);
        assert_eq!(grid[120], DVec2::new(800.0, 600.0));
        assert_eq!(grid[11], DVec2::new(80.0, 0.0));
    }

    #[test]
    fn bounds_of_rotated_hits() {
        let hits = [DVec3::new(0.0, 1.0, 5.0), DVec3::new(0.0, -2.0, -3.0)];
        // With phi = 90 degrees scene z maps onto image -x.
        let b = hit_bounds(&hits, FRAC_PI_2).unwrap();
        assert!((b.lower_left - DVec2::new(-5.0, -2.0)).length() < 1e-9, "{:?}", b);
        assert!((b.upper_right - DVec2::new(3.0, 1.0)).length() < 1e-9, "{:?}", b);
        assert!(hit_bounds(&[], 0.0).is_none());
    }

    #[test]
    fn close_view_fills_viewport_with_hits() {
        let cam = camera(-150.0);
        let shape = HitReferenceShape::sun(R).with_plane(true);
        let config = RoiConfig::default();

        let hits = sample_hits(&cam, &shape, config.grid_steps);
        assert_eq!(hits.len(), 121);
        let bounds = hit_bounds(&hits, 0.0).unwrap();

        let region = estimate_region(&cam, &shape, &metadata(), &config).unwrap();
        assert!(region.contains_region(&bounds));
        assert!(metadata().physical_region().contains_region(&region));
        // Padding widens the box by 10% of its extent on each side.
        assert!((region.width() - bounds.width() * 1.2).abs() < 1e-9);
        assert!((region.height() - bounds.height() * 1.2).abs() < 1e-9);
    }

    #[test]
    fn distant_view_is_clamped_to_image() {
        let cam = camera(-1200.0);
        let shape = HitReferenceShape::sun(R).with_plane(true);
        let region = estimate_region(&cam, &shape, &metadata(), &RoiConfig::default()).unwrap();
        assert_eq!(region, metadata().physical_region());
    }

    #[test]
    fn no_hits_is_an_error() {
        let mut cam = camera(-1200.0);
        cam.set_panning(1.0e5, 0.0);
        cam.update_transformation_silent();
        let shape = HitReferenceShape::sun(R);
        assert_eq!(
            estimate_region(&cam, &shape, &metadata(), &RoiConfig::default()),
            Err(RoiError::NoHits)
        );
    }

    #[test]
    fn padding_follows_visible_part_of_image() {
        // Only x in [50, 100] is on the image; plane hits run out to x = 1000.
        let bounds = Region::new(DVec2::new(50.0, -100.0), DVec2::new(1000.0, 100.0));
        let region = finish_region(bounds, &metadata(), 0.1).unwrap();
        assert!((region.lower_left - DVec2::new(45.0, -100.0)).length() < 1e-9, "{:?}", region);
        assert!((region.upper_right - DVec2::new(100.0, 100.0)).length() < 1e-9, "{:?}", region);
    }

    #[test]
    fn region_outside_image_is_degenerate() {
        let bounds = Region::new(DVec2::new(200.0, 200.0), DVec2::new(300.0, 300.0));
        let err = finish_region(bounds, &metadata(), 0.1).unwrap_err();
        assert!(matches!(err, RoiError::Degenerate { .. }));
    }
}
