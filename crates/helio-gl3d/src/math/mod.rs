// math/mod.rs
//
// Double precision math on top of glam's DVec3/DVec4/DQuat/DMat4.
// glam covers the arithmetic; these modules add the checked operations the
// camera core relies on (tolerant comparisons, failing normalize, checked
// inverse, rotation between two vectors).

pub mod matrix;
pub mod quat;
pub mod vector;

pub use glam::{DMat4, DQuat, DVec2, DVec3, DVec4};

/// Default tolerance for "is this the same vector/rotation" checks.
pub const EPSILON: f64 = 1e-9;

pub use matrix::{rotation_matrix, transform_direction, transform_point, translation_matrix, try_inverse};
pub use quat::{axis_angle, is_identity, rotation_between, slerp};
pub use vector::{approx_eq, direction, point, try_normalize};
