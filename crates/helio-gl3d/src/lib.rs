pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod input;
pub mod math;
pub mod renderer;
pub mod runner;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{AnimationConfig, CameraConfig, InteractionConfig, RoiConfig, ViewerConfig};
pub use api::types::{
    ImageMetaData, MetaDataProvider, NodeId, Region, RegionSink, RenderContext, ViewMode, Viewport,
};
pub use error::{ConfigError, MathError, MathResult, RoiError};
pub use crate::core::scene::{DrawItem, ImageLayer, NodeKind, SceneGraph, SceneNode};
pub use crate::core::time::FrameClock;
pub use renderer::camera::{Camera, CameraUniform};
pub use renderer::events::{CameraEvent, CameraListener, CameraSnapshot, ListenerId};
pub use renderer::ray::{HitReferenceShape, Ray, RayTracer};
pub use input::queue::{InputEvent, InputQueue};
pub use input::interaction::{InteractionKind, Interactions, PanInteraction, TrackballRotation, ZoomInteraction};
pub use runner::{FrameOutput, ViewerRunner};

// Extensions: camera motion over time
pub use extensions::{
    AnimationKind, AnimationQueue, AnimationTarget, CameraAnimation, CameraPose,
    Easing, lerp,
};
