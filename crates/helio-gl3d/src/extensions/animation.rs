// extensions/animation.rs
//
// Camera animations: time-based interpolation of the camera pose.
// Animations never touch the Camera directly: they take a pose value and
// return the next one, and the camera commits the result.
//
// Usage:
//   camera.queue_animation(CameraAnimation::rotation(target, 1000.0));
//   camera.apply_animations(dt_ms);  // once per frame

use glam::{DQuat, DVec2, DVec3};
use crate::math::quat::slerp;
use super::easing::{Easing, lerp};

/// Rotation and translation of a camera, as a plain value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub rotation: DQuat,
    pub translation: DVec3,
}

/// Kind of animation. At most one running animation per kind is queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Rotation,
    Zoom,
    Pan,
}

/// What an animation drives the camera towards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationTarget {
    /// Final camera rotation.
    Rotation(DQuat),
    /// Final z translation.
    Zoom(f64),
    /// Final x/y translation.
    Pan(DVec2),
}

impl AnimationTarget {
    pub fn kind(&self) -> AnimationKind {
        match self {
            AnimationTarget::Rotation(_) => AnimationKind::Rotation,
            AnimationTarget::Zoom(_) => AnimationKind::Zoom,
            AnimationTarget::Pan(_) => AnimationKind::Pan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Running,
    Finished,
}

/// A single camera animation.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraAnimation {
    target: AnimationTarget,
    /// Total duration in milliseconds.
    duration_ms: f64,
    /// Time left in milliseconds.
    remaining_ms: f64,
    easing: Easing,
    state: AnimationState,
}

impl CameraAnimation {
    pub fn new(target: AnimationTarget, duration_ms: f64) -> Self {
        let duration_ms = duration_ms.max(0.0);
        Self {
            target,
            duration_ms,
            remaining_ms: duration_ms,
            easing: Easing::SineInOut,
            state: AnimationState::Running,
        }
    }

    /// Rotate the camera to `end`.
    pub fn rotation(end: DQuat, duration_ms: f64) -> Self {
        Self::new(AnimationTarget::Rotation(end.normalize()), duration_ms)
    }

    /// Move the camera to distance `z` (negative, camera looks down -z).
    pub fn zoom(z: f64, duration_ms: f64) -> Self {
        Self::new(AnimationTarget::Zoom(z), duration_ms)
    }

    /// Pan the camera to `xy`.
    pub fn pan(xy: DVec2, duration_ms: f64) -> Self {
        Self::new(AnimationTarget::Pan(xy), duration_ms)
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn kind(&self) -> AnimationKind {
        self.target.kind()
    }

    pub fn target(&self) -> AnimationTarget {
        self.target
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn remaining_ms(&self) -> f64 {
        self.remaining_ms
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == AnimationState::Finished
    }

    /// Normalized progress [0, 1] before easing.
    pub fn progress(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (1.0 - self.remaining_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    /// Fold a newer animation of the same kind into this one.
    ///
    /// The merged animation runs for the time this one had left plus the
    /// newer one's duration, starting from the current pose, and ends at the
    /// newer target. Returns the newer animation back if the kinds differ or
    /// this one already finished.
    pub fn merge(&mut self, newer: CameraAnimation) -> Result<(), CameraAnimation> {
        if self.is_finished() || self.kind() != newer.kind() {
            return Err(newer);
        }
        self.duration_ms = self.remaining_ms + newer.duration_ms;
        self.remaining_ms = self.duration_ms;
        self.target = newer.target;
        Ok(())
    }

    /// Advance by `dt_ms` and return the interpolated pose.
    ///
    /// Each step interpolates from the pose passed in (the camera's current
    /// pose) towards the target. On the final step the target is returned
    /// exactly.
    pub fn advance(&mut self, dt_ms: f64, pose: CameraPose) -> CameraPose {
        if self.is_finished() {
            return pose;
        }

        self.remaining_ms -= dt_ms.max(0.0);
        if self.remaining_ms <= 0.0 {
            self.remaining_ms = 0.0;
            self.state = AnimationState::Finished;
        }

        let finished = self.is_finished();
        let t = self.easing.apply(self.progress());
        let mut next = pose;

        match self.target {
            AnimationTarget::Rotation(end) => {
                next.rotation = if finished { end } else { slerp(pose.rotation, end, t) };
            }
            AnimationTarget::Zoom(z) => {
                next.translation.z = if finished { z } else { lerp(pose.translation.z, z, t) };
            }
            AnimationTarget::Pan(xy) => {
                let current = pose.translation.truncate();
                let xy = if finished { xy } else { current + (xy - current) * t };
                next.translation.x = xy.x;
                next.translation.y = xy.y;
            }
        }

        next
    }
}

/// Outcome of one queue step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationStep {
    pub pose: CameraPose,
    /// At least one animation advanced.
    pub advanced: bool,
    /// Number of animations that finished during this step.
    pub finished: usize,
}

/// Pending camera animations, at most one running per kind.
#[derive(Debug, Clone, Default)]
pub struct AnimationQueue {
    animations: Vec<CameraAnimation>,
}

impl AnimationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an animation, merging it into a running animation of the same kind.
    pub fn push(&mut self, animation: CameraAnimation) {
        let mut pending = animation;
        for running in self.animations.iter_mut() {
            match running.merge(pending) {
                Ok(()) => {
                    log::debug!(
                        "merged {:?} animation, {:.0}ms remaining",
                        running.kind(),
                        running.remaining_ms()
                    );
                    return;
                }
                Err(returned) => pending = returned,
            }
        }
        log::debug!("queued {:?} animation over {:.0}ms", pending.kind(), pending.duration_ms());
        self.animations.push(pending);
    }

    /// Advance every animation by `dt_ms`, threading the pose through them in
    /// queue order. Finished animations are removed.
    pub fn advance(&mut self, dt_ms: f64, pose: CameraPose) -> AnimationStep {
        let mut step = AnimationStep {
            pose,
            advanced: false,
            finished: 0,
        };

        for animation in self.animations.iter_mut() {
            if animation.is_finished() {
                continue;
            }
            step.pose = animation.advance(dt_ms, step.pose);
            step.advanced = true;
            if animation.is_finished() {
                step.finished += 1;
            }
        }

        self.animations.retain(|a| !a.is_finished());
        step
    }

    pub fn get(&self, kind: AnimationKind) -> Option<&CameraAnimation> {
        self.animations.iter().find(|a| a.kind() == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CameraAnimation> {
        self.animations.iter()
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Drop all animations immediately, without completing them.
    pub fn clear(&mut self) {
        self.animations.clear();
    }
}
