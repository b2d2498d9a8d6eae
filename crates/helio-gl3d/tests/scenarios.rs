//! End-to-end behaviour of the camera core through its public API.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{DMat4, DQuat, DVec2, DVec3};
use helio_gl3d::math::quat::{angle_between, axis_angle, slerp};
use helio_gl3d::math::matrix::try_inverse;
use helio_gl3d::renderer::ray::intersect_sphere;
use helio_gl3d::systems::orientation::phi_rotation;
use helio_gl3d::systems::roi::{estimate_region, hit_bounds, sample_hits};
use helio_gl3d::{
    Camera, CameraAnimation, CameraConfig, CameraEvent, CameraSnapshot, HitReferenceShape,
    ImageMetaData, InputEvent, MathError, MetaDataProvider, NodeId, RayTracer, Region, RoiConfig,
    TrackballRotation, ViewMode, ViewerConfig, ViewerRunner, Viewport,
};

const R: f64 = 100.0;

fn config() -> CameraConfig {
    CameraConfig {
        sun_radius: R,
        ..CameraConfig::default()
    }
}

fn camera() -> Camera {
    let mut cam = Camera::new(ViewMode::Mode3D, &config());
    cam.set_viewport(800.0, 600.0);
    cam
}

#[test]
fn slerp_endpoints_and_monotonic() {
    let a = axis_angle(DVec3::new(1.0, 2.0, 0.5), 0.3).unwrap();
    let b = axis_angle(DVec3::new(-1.0, 0.0, 1.0), 2.1).unwrap();
    assert!(angle_between(slerp(a, b, 0.0), a) < 1e-9);
    assert!(angle_between(slerp(a, b, 1.0), b) < 1e-9);

    let mut last = 0.0;
    for i in 1..=20 {
        let d = angle_between(a, slerp(a, b, i as f64 / 20.0));
        assert!(d >= last - 1e-12, "step {} went back: {} < {}", i, d, last);
        last = d;
    }
}

#[test]
fn zero_angle_rotation_is_identity() {
    let q = axis_angle(DVec3::new(0.3, -0.2, 0.9), 0.0).unwrap();
    for v in [DVec3::X, DVec3::Y, DVec3::Z, DVec3::new(1.0, 1.0, 1.0).normalize()] {
        assert!((q * v).abs_diff_eq(v, 1e-12));
    }
}

#[test]
fn inverse_composes_to_identity_and_singular_is_reported() {
    let m = DMat4::from_translation(DVec3::new(3.0, -2.0, 7.0))
        * DMat4::from_quat(axis_angle(DVec3::Y, 0.8).unwrap())
        * DMat4::from_scale(DVec3::new(2.0, 0.5, 1.5));
    let inv = try_inverse(&m).unwrap();
    assert!((inv * m).abs_diff_eq(DMat4::IDENTITY, 1e-9));

    let singular = DMat4::from_scale(DVec3::new(1.0, 0.0, 1.0));
    assert!(matches!(try_inverse(&singular), Err(MathError::Singular(_))));
}

#[test]
fn rays_at_centre_hit_and_parallel_outside_miss() {
    let cam = camera();
    let shape = HitReferenceShape::sun(R);
    let ray = RayTracer::new(&shape, &cam).cast(400.0, 300.0);
    assert!(ray.on_sun);

    let outside = DVec3::new(R * 1.01, 0.0, 10.0 * R);
    assert!(intersect_sphere(outside, DVec3::NEG_Z, R).is_none());
}

#[test]
fn z_translation_clamps_exactly() {
    let mut cam = camera();
    cam.set_z_translation(cam.min_distance() + 1.0);
    assert_eq!(cam.z_translation(), cam.min_distance());
    cam.set_z_translation(cam.max_distance() - 1.0);
    assert_eq!(cam.z_translation(), cam.max_distance());
}

#[test]
fn merged_rotation_runs_remaining_plus_new_and_settles_on_newest() {
    let q1 = axis_angle(DVec3::Y, 0.6).unwrap();
    let q2 = axis_angle(DVec3::X, -0.4).unwrap();
    let mut cam = camera();

    cam.queue_animation(CameraAnimation::rotation(q1, 1000.0));
    cam.apply_animations(300.0);
    cam.queue_animation(CameraAnimation::rotation(q2, 500.0));

    let merged = cam.animations().iter().next().unwrap();
    assert_eq!(cam.animations().len(), 1);
    assert!((merged.remaining_ms() - 1200.0).abs() < 1e-9);

    cam.apply_animations(1199.0);
    assert!(cam.has_animations());
    cam.apply_animations(1.0);
    assert!(!cam.has_animations());
    assert!(angle_between(cam.rotation(), q2) < 1e-12);
}

#[test]
fn horizontal_trackball_drag_turns_about_vertical_axis() {
    let mut cam = camera();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    cam.add_listener(Box::new(move |e: CameraEvent, _: &CameraSnapshot| sink.borrow_mut().push(e)));

    let mut trackball = TrackballRotation::new();
    trackball.press(DVec2::new(400.0, 300.0), &cam);
    trackball.drag(DVec2::new(410.0, 300.0), &mut cam);
    trackball.release(&mut cam);

    let (axis, angle) = cam.rotation().to_axis_angle();
    assert!(angle > 0.0);
    assert!(axis.cross(DVec3::Y).length() < 1e-9, "axis {:?}", axis);
    assert_eq!(*events.borrow(), vec![CameraEvent::Moving, CameraEvent::Moved]);
}

#[test]
fn roi_is_hit_bounds_padded_and_clamped() {
    let meta = ImageMetaData::new(DVec2::splat(-100.0), DVec2::splat(100.0));
    let bounds = meta.physical_region();
    let config = RoiConfig::default();
    let shape = HitReferenceShape::sun(R).with_plane(true);

    for z in [-130.0, -400.0, -1200.0] {
        let mut cam = camera();
        cam.set_z_translation(z);
        cam.update_transformation_silent();

        let hits = sample_hits(&cam, &shape, config.grid_steps);
        assert_eq!(hits.len(), 121, "every ray hits sphere or plane");
        let hull = hit_bounds(&hits, shape.phi).unwrap();
        let to_image = phi_rotation(shape.phi);
        for h in &hits {
            assert!(hull.contains((to_image * *h).truncate()));
        }

        let region = estimate_region(&cam, &shape, &meta, &config).unwrap();
        assert!(bounds.contains_region(&region), "z {}: {:?}", z, region);
        assert!(region.contains_region(&hull.clamp_to(&bounds)));
    }
}

#[test]
fn runner_pushes_regions_and_retains_them_when_view_leaves_the_image() {
    let config = ViewerConfig {
        camera: config(),
        ..ViewerConfig::default()
    };
    let mut runner = ViewerRunner::new(config).unwrap();
    let meta = ImageMetaData::new(DVec2::splat(-100.0), DVec2::splat(100.0));
    let id = runner
        .scene_mut()
        .add_image_layer("euvi", None, Box::new(meta), DVec3::Z);
    let viewport = Viewport::new(800, 600);
    let mut sink: Vec<(NodeId, Region)> = Vec::new();

    runner.tick(16.0, &viewport, &mut sink);
    assert_eq!(sink.len(), 1);
    let first = runner.scene().layer(id).unwrap().region();

    // Pan the image out of view: the estimate fails and the old region stays.
    runner.push_input(InputEvent::SelectInteraction(helio_gl3d::InteractionKind::Pan));
    runner.push_input(InputEvent::PointerDown { x: 0.0, y: 300.0 });
    runner.push_input(InputEvent::PointerMove { x: 800.0, y: 300.0 });
    runner.push_input(InputEvent::PointerMove { x: 1.0e7, y: 300.0 });
    runner.push_input(InputEvent::PointerUp { x: 1.0e7, y: 300.0 });
    let frame = runner.tick(16.0, &viewport, &mut sink);
    assert_eq!(frame.regions_pushed, 0);
    assert_eq!(runner.scene().layer(id).unwrap().region(), first);
    assert!(runner.camera().translation().x > 1.0e3);
}

#[test]
fn switching_modes_keeps_the_view() {
    let mut runner = ViewerRunner::new(ViewerConfig {
        camera: config(),
        ..ViewerConfig::default()
    })
    .unwrap();
    let q = DQuat::from_rotation_x(0.4);
    runner.rotate_to(q, Some(0.0));
    let mut sink: Vec<(NodeId, Region)> = Vec::new();
    runner.tick(16.0, &Viewport::new(400, 400), &mut sink);

    runner.set_view_mode(ViewMode::Mode2D);
    assert!(angle_between(runner.camera().rotation(), q) < 1e-12);
    assert!(!runner.camera_for(ViewMode::Mode3D).has_animations());
}
