//! Pointer-driven camera interactions: trackball rotation, pan and zoom.
//!
//! Each interaction is a small state machine fed press/drag/release from the
//! runner. Drags commit the camera silently and notify `Moving`; release
//! notifies `Moved` once.

use glam::{DVec2, DVec3};
use crate::api::config::{AnimationConfig, InteractionConfig};
use crate::api::types::ViewMode;
use crate::extensions::animation::{AnimationKind, AnimationTarget, CameraAnimation};
use crate::math::quat::{is_identity, rotation_between};
use crate::math::vector::try_normalize;
use crate::math::EPSILON;
use crate::renderer::camera::Camera;
use crate::renderer::ray::{HitReferenceShape, RayTracer};
use super::queue::InputEvent;

/// What a pointer drag does to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Pan,
    Rotate,
    Zoom,
}

impl InteractionKind {
    /// Rotate in 3D, pan in 2D.
    pub fn default_for(mode: ViewMode) -> Self {
        match mode {
            ViewMode::Mode2D => InteractionKind::Pan,
            ViewMode::Mode3D => InteractionKind::Rotate,
        }
    }
}

/// Virtual trackball: the point on the solar sphere grabbed at press time
/// stays under the cursor for the whole drag.
#[derive(Debug, Clone, Default)]
pub struct TrackballRotation {
    start: Option<DVec3>,
    end: Option<DVec3>,
}

impl TrackballRotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }

    pub fn press(&mut self, pos: DVec2, camera: &Camera) {
        self.start = Self::sphere_point(pos, camera);
        self.end = None;
    }

    /// Rotate so the grabbed point moves to `pos`. Always notifies `Moving`,
    /// even when the frame's rotation was degenerate and skipped.
    pub fn drag(&mut self, pos: DVec2, camera: &mut Camera) {
        self.end = Self::sphere_point(pos, camera);
        if let (Some(start), Some(end)) = (self.start, self.end) {
            match rotation_between(start, end) {
                Ok(q) if is_identity(q, EPSILON) => {}
                Ok(q) => {
                    camera.rotate(q);
                    camera.update_transformation_silent();
                }
                Err(err) => log::warn!("trackball drag ignored: {}", err),
            }
        }
        camera.fire_moving();
    }

    pub fn release(&mut self, camera: &mut Camera) {
        self.start = None;
        self.end = None;
        camera.fire_moved();
    }

    /// Unit vector from the sun centre to the point under `pos`, in scene
    /// space.
    ///
    /// Off the disc, the cursor offset from the viewport centre is lifted onto
    /// the view plane and brought into scene space with the current camera
    /// rotation inverse. The rotation keeps turning the same way as the cursor
    /// crosses the limb.
    pub fn sphere_point(pos: DVec2, camera: &Camera) -> Option<DVec3> {
        let shape = HitReferenceShape::sun(camera.config().sun_radius);
        let ray = RayTracer::new(&shape, camera).cast(pos.x, pos.y);
        let point = match ray.hit_point {
            Some(hit) if ray.on_sun => try_normalize(hit),
            _ => {
                let (w, h) = (camera.width(), camera.height());
                if w <= 0.0 || h <= 0.0 {
                    return None;
                }
                let x = (pos.x - w / 2.0) / w;
                let y = (h / 2.0 - pos.y) / h;
                try_normalize(DVec3::new(x, y, 0.0)).map(|v| camera.rotation().inverse() * v)
            }
        };
        match point {
            Ok(p) => Some(p),
            Err(err) => {
                log::warn!("no trackball point at {:?}: {}", pos, err);
                None
            }
        }
    }
}

/// Translates the camera so the scene follows the cursor.
#[derive(Debug, Clone, Default)]
pub struct PanInteraction {
    last: Option<DVec2>,
    moved: bool,
}

impl PanInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, pos: DVec2) {
        self.last = Some(pos);
        self.moved = false;
    }

    pub fn drag(&mut self, pos: DVec2, camera: &mut Camera, speed: f64) {
        let Some(last) = self.last.replace(pos) else {
            return;
        };
        let delta = pos - last;
        if delta == DVec2::ZERO {
            return;
        }
        let scale = world_per_pixel(camera) * speed;
        camera.pan(delta.x * scale, -delta.y * scale);
        camera.update_transformation_moving();
        self.moved = true;
    }

    pub fn release(&mut self, camera: &mut Camera) {
        self.last = None;
        if std::mem::take(&mut self.moved) {
            camera.fire_moved();
        }
    }
}

/// Physical size of one pixel on the plane through the sun centre.
pub fn world_per_pixel(camera: &Camera) -> f64 {
    if camera.height() <= 0.0 {
        return 0.0;
    }
    let tan_half = (camera.fov_degrees().to_radians() * 0.5).tan();
    2.0 * camera.z_translation().abs() * tan_half / camera.height()
}

/// Drag up to move closer, down to move away. The wheel zooms by animation.
#[derive(Debug, Clone, Default)]
pub struct ZoomInteraction {
    last: Option<DVec2>,
    moved: bool,
}

impl ZoomInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, pos: DVec2) {
        self.last = Some(pos);
        self.moved = false;
    }

    pub fn drag(&mut self, pos: DVec2, camera: &mut Camera) {
        let Some(last) = self.last.replace(pos) else {
            return;
        };
        let dy = pos.y - last.y;
        if dy == 0.0 || camera.height() <= 0.0 {
            return;
        }
        let z = camera.z_translation();
        camera.set_z_translation(z * (1.0 + dy / camera.height()));
        camera.update_transformation_moving();
        self.moved = true;
    }

    pub fn release(&mut self, camera: &mut Camera) {
        self.last = None;
        if std::mem::take(&mut self.moved) {
            camera.fire_moved();
        }
    }

    /// Queue a zoom animation of `step` of the distance per notch. Notches
    /// arriving while a zoom is in flight stack on its target.
    pub fn wheel(notches: f64, camera: &mut Camera, step: f64, animation: &AnimationConfig) {
        if notches == 0.0 || !notches.is_finite() {
            return;
        }
        let base = match camera.animations().get(AnimationKind::Zoom).map(|a| a.target()) {
            Some(AnimationTarget::Zoom(z)) => z,
            _ => camera.z_translation(),
        };
        let target = (base * (1.0 + step).powf(notches)).clamp(camera.max_distance(), camera.min_distance());
        camera.queue_animation(CameraAnimation::zoom(target, animation.zoom_duration_ms).with_easing(animation.easing));
    }
}

/// Routes input events to the interaction selected on the camera.
#[derive(Debug, Clone, Default)]
pub struct Interactions {
    pub rotate: TrackballRotation,
    pub pan: PanInteraction,
    pub zoom: ZoomInteraction,
    config: InteractionConfig,
    animation: AnimationConfig,
    /// Interaction that received the current press.
    active: Option<InteractionKind>,
}

impl Interactions {
    pub fn new(config: &InteractionConfig, animation: &AnimationConfig) -> Self {
        Self {
            config: config.clone(),
            animation: animation.clone(),
            ..Self::default()
        }
    }

    pub fn active(&self) -> Option<InteractionKind> {
        self.active
    }

    pub fn handle(&mut self, event: &InputEvent, camera: &mut Camera) {
        match *event {
            InputEvent::PointerDown { x, y } => {
                // A press without a release in between ends the stale drag first.
                self.cancel(camera);
                let pos = DVec2::new(x, y);
                let kind = camera.interaction();
                match kind {
                    InteractionKind::Rotate => self.rotate.press(pos, camera),
                    InteractionKind::Pan => self.pan.press(pos),
                    InteractionKind::Zoom => self.zoom.press(pos),
                }
                self.active = Some(kind);
            }
            InputEvent::PointerMove { x, y } => {
                let pos = DVec2::new(x, y);
                match self.active {
                    Some(InteractionKind::Rotate) => self.rotate.drag(pos, camera),
                    Some(InteractionKind::Pan) => self.pan.drag(pos, camera, self.config.pan_speed),
                    Some(InteractionKind::Zoom) => self.zoom.drag(pos, camera),
                    None => {}
                }
            }
            InputEvent::PointerUp { .. } => {
                self.cancel(camera);
            }
            InputEvent::Wheel { notches } => {
                ZoomInteraction::wheel(notches, camera, self.config.zoom_step, &self.animation);
            }
            InputEvent::SelectInteraction(kind) => {
                self.cancel(camera);
                camera.set_interaction(kind);
            }
            InputEvent::ResetCamera => {
                self.cancel(camera);
                camera.reset();
            }
        }
    }

    /// End the drag in progress, if any.
    pub fn cancel(&mut self, camera: &mut Camera) {
        match self.active.take() {
            Some(InteractionKind::Rotate) => self.rotate.release(camera),
            Some(InteractionKind::Pan) => self.pan.release(camera),
            Some(InteractionKind::Zoom) => self.zoom.release(camera),
            None => {}
        }
    }
}
