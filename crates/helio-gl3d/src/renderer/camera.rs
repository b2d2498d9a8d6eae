use bytemuck::{Pod, Zeroable};
use glam::{DMat4, DQuat, DVec3};
use crate::api::config::CameraConfig;
use crate::api::types::{RenderContext, ViewMode};
use crate::extensions::animation::{AnimationQueue, CameraAnimation, CameraPose};
use crate::input::interaction::InteractionKind;
use crate::math::matrix::{quat_matrix, translation_matrix};
use super::events::{CameraEvent, CameraListener, CameraListeners, CameraSnapshot, ListenerId};

/// Perspective camera looking down -z at the Sun, which sits at the origin.
///
/// The view transformation is `translate(translation) * rotation`. Rotation
/// and translation are replaced wholesale; every committed change goes through
/// one of the `update_transformation*` methods, which recompute the matrix and
/// notify listeners.
///
/// All methods run on the render thread. Nothing here locks.
#[derive(Debug)]
pub struct Camera {
    mode: ViewMode,
    config: CameraConfig,
    rotation: DQuat,
    translation: DVec3,
    transformation: DMat4,
    width: f64,
    height: f64,
    aspect: f64,
    interaction: InteractionKind,
    animations: AnimationQueue,
    listeners: CameraListeners,
    /// Bumped on every transformation update, silent or not.
    revision: u64,
    /// Bumped on every `Moved` notification.
    moved_generation: u64,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub model_view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl Camera {
    pub fn new(mode: ViewMode, config: &CameraConfig) -> Self {
        let mut camera = Self {
            mode,
            config: config.clone(),
            rotation: DQuat::IDENTITY,
            translation: DVec3::ZERO,
            transformation: DMat4::IDENTITY,
            width: 0.0,
            height: 0.0,
            aspect: 0.0,
            interaction: InteractionKind::default_for(mode),
            animations: AnimationQueue::new(),
            listeners: CameraListeners::new(),
            revision: 0,
            moved_generation: 0,
        };
        camera.reset_pose();
        camera
    }

    pub fn name(&self) -> &'static str {
        match self.mode {
            ViewMode::Mode2D => "2D Camera",
            ViewMode::Mode3D => "Trackball Camera",
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    // ---- Lifecycle ----

    /// Take over the state of the camera that was active before this one.
    /// Without a predecessor the camera resets to its default pose.
    pub fn activate(&mut self, preceding: Option<&Camera>) {
        match preceding {
            Some(prev) => {
                self.rotation = prev.rotation;
                self.translation = prev.translation;
                self.clamp_translation();
                self.width = prev.width;
                self.height = prev.height;
                self.aspect = prev.aspect;
                self.set_interaction(prev.interaction);
                self.update_transformation();
            }
            None => {
                log::debug!("{}: no preceding camera, resetting", self.name());
                self.reset();
            }
        }
    }

    /// Cancel pending animations. In-flight interpolation is dropped as is.
    pub fn deactivate(&mut self) {
        self.animations.clear();
    }

    /// Back to identity rotation at the default distance.
    pub fn reset(&mut self) {
        self.animations.clear();
        self.reset_pose();
        self.update_transformation();
    }

    fn reset_pose(&mut self) {
        self.rotation = DQuat::IDENTITY;
        self.translation = DVec3::new(0.0, 0.0, self.config.default_distance());
        self.recompute_transformation();
    }

    // ---- Pose ----

    pub fn rotation(&self) -> DQuat {
        self.rotation
    }

    pub fn translation(&self) -> DVec3 {
        self.translation
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            rotation: self.rotation,
            translation: self.translation,
        }
    }

    /// Replace the rotation. Takes effect at the next transformation update.
    pub fn set_rotation(&mut self, rotation: DQuat) {
        self.rotation = rotation.normalize();
    }

    /// Compose `delta` onto the current rotation (`delta` applies first, in
    /// world space) and re-normalize.
    pub fn rotate(&mut self, delta: DQuat) {
        self.rotation = (self.rotation * delta).normalize();
    }

    /// Replace the translation; z is clamped to the distance limits.
    pub fn set_translation(&mut self, translation: DVec3) {
        self.translation = translation;
        self.clamp_translation();
    }

    /// Shift x/y by the given amounts.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.set_panning(self.translation.x + dx, self.translation.y + dy);
    }

    pub fn set_panning(&mut self, x: f64, y: f64) {
        self.translation.x = x;
        self.translation.y = y;
    }

    /// Set the camera distance, clamped to `[max_distance, min_distance]`.
    pub fn set_z_translation(&mut self, z: f64) {
        self.translation.z = z;
        self.clamp_translation();
    }

    pub fn z_translation(&self) -> f64 {
        self.translation.z
    }

    fn clamp_translation(&mut self) {
        let z = self.translation.z;
        self.translation.z = if z.is_nan() {
            self.config.default_distance()
        } else {
            z.clamp(self.max_distance(), self.min_distance())
        };
    }

    /// Closest allowed z translation.
    pub fn min_distance(&self) -> f64 {
        self.config.min_distance()
    }

    /// Farthest allowed z translation.
    pub fn max_distance(&self) -> f64 {
        self.config.max_distance()
    }

    /// Distance from the camera to the reference sphere's surface.
    pub fn distance_to_sun_surface(&self) -> f64 {
        // The rotation does not change lengths, so the camera's distance from
        // the origin is the length of the translation.
        self.translation.length() - self.config.sun_radius
    }

    /// World-space direction the camera is looking in.
    pub fn view_direction(&self) -> DVec3 {
        self.rotation.inverse() * DVec3::NEG_Z
    }

    // ---- Transformation ----

    pub fn transformation(&self) -> DMat4 {
        self.transformation
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of `Moved` notifications sent so far.
    pub fn moved_generation(&self) -> u64 {
        self.moved_generation
    }

    fn recompute_transformation(&mut self) {
        self.transformation = translation_matrix(self.translation) * quat_matrix(self.rotation);
        self.revision += 1;
    }

    /// Recompute the transformation and notify `Moved`.
    pub fn update_transformation(&mut self) {
        self.recompute_transformation();
        self.fire_moved();
    }

    /// Recompute the transformation without notifying anyone.
    pub fn update_transformation_silent(&mut self) {
        self.recompute_transformation();
    }

    /// Recompute the transformation and notify `Moving` (drag feedback).
    pub fn update_transformation_moving(&mut self) {
        self.recompute_transformation();
        self.fire_moving();
    }

    pub fn fire_moved(&mut self) {
        self.moved_generation += 1;
        self.dispatch(CameraEvent::Moved);
    }

    pub fn fire_moving(&mut self) {
        self.dispatch(CameraEvent::Moving);
    }

    fn dispatch(&mut self, event: CameraEvent) {
        let snapshot = self.snapshot();
        self.listeners.dispatch(event, &snapshot);
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            rotation: self.rotation,
            translation: self.translation,
            transformation: self.transformation,
            revision: self.revision,
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn CameraListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // ---- Animations ----

    /// Queue an animation; a running animation of the same kind absorbs it.
    pub fn queue_animation(&mut self, animation: CameraAnimation) {
        self.animations.push(animation);
    }

    pub fn animations(&self) -> &AnimationQueue {
        &self.animations
    }

    pub fn has_animations(&self) -> bool {
        !self.animations.is_empty()
    }

    /// Advance all animations by `dt_ms`. Intermediate steps notify `Moving`;
    /// a step in which any animation settles notifies `Moved`.
    /// Returns whether anything was animated.
    pub fn apply_animations(&mut self, dt_ms: f64) -> bool {
        if self.animations.is_empty() {
            return false;
        }

        let step = self.animations.advance(dt_ms, self.pose());
        if !step.advanced {
            return false;
        }

        self.rotation = step.pose.rotation.normalize();
        self.translation = step.pose.translation;
        self.clamp_translation();

        if step.finished > 0 {
            self.update_transformation();
        } else {
            self.update_transformation_moving();
        }
        true
    }

    // ---- Projection ----

    /// Read the viewport size from the render context.
    pub fn apply_perspective(&mut self, ctx: &impl RenderContext) {
        let (width, height) = ctx.viewport_size();
        self.set_viewport(width as f64, height as f64);
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.aspect = if height > 0.0 { width / height } else { 1.0 };
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn fov_degrees(&self) -> f64 {
        self.config.fov_degrees
    }

    pub fn clip_near(&self) -> f64 {
        self.config.clip_near()
    }

    pub fn clip_far(&self) -> f64 {
        self.config.clip_far()
    }

    pub fn projection_matrix(&self) -> DMat4 {
        let aspect = if self.aspect > 0.0 { self.aspect } else { 1.0 };
        DMat4::perspective_rh_gl(self.fov_degrees().to_radians(), aspect, self.clip_near(), self.clip_far())
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            model_view: self.transformation.as_mat4().to_cols_array_2d(),
            projection: self.projection_matrix().as_mat4().to_cols_array_2d(),
        }
    }

    // ---- Interaction ----

    pub fn interaction(&self) -> InteractionKind {
        self.interaction
    }

    /// Select the interaction driven by pointer drags. The 2D camera cannot
    /// rotate and falls back to panning.
    pub fn set_interaction(&mut self, kind: InteractionKind) {
        if kind == InteractionKind::Rotate && self.mode == ViewMode::Mode2D {
            log::warn!("{}: rotate interaction unavailable, using pan", self.name());
            self.interaction = InteractionKind::Pan;
        } else {
            self.interaction = kind;
        }
    }
}
