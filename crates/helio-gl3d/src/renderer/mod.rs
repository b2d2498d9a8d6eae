pub mod camera;
pub mod events;
pub mod ray;

pub use camera::{Camera, CameraUniform};
pub use events::{CameraEvent, CameraListener, CameraListeners, CameraSnapshot, ListenerId};
pub use ray::{HitReferenceShape, Ray, RayTracer};
