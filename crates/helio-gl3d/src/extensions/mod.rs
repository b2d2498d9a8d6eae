// extensions/mod.rs
//
// Time-based camera motion: easing curves and the camera animation queue.

pub mod animation;
pub mod easing;

pub use animation::{AnimationKind, AnimationQueue, AnimationState, AnimationTarget, CameraAnimation, CameraPose};
pub use easing::{Easing, lerp};
