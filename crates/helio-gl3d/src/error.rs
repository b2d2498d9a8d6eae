//! Error types for the camera and scene-graph core

use thiserror::Error;

/// Numeric failures in the vector/quaternion/matrix helpers.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum MathError {
    /// A vector was too short to normalize or to serve as a rotation axis
    #[error("vector length {0:e} is too small")]
    ZeroLength(f64),

    /// Matrix has no usable inverse
    #[error("matrix is singular (determinant {0:e})")]
    Singular(f64),

    /// Start and end vectors of a rotation are antiparallel, so the axis is undefined
    #[error("rotation between antiparallel vectors is undefined")]
    DegenerateRotation,
}

/// Result type for math operations
pub type MathResult<T> = Result<T, MathError>;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON could not be parsed
    #[error("failed to parse viewer config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values parsed but are not usable
    #[error("invalid viewer config: {0}")]
    Invalid(String),
}

/// Reasons a visible region could not be estimated. The previous region stays
/// in effect.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum RoiError {
    /// No sample ray hit the reference shape
    #[error("no sample ray hit the reference shape")]
    NoHits,

    /// The estimate has no area or is not finite
    #[error("illegal region {width}:{height}")]
    Degenerate { width: f64, height: f64 },
}
