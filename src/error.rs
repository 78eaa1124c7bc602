//! Error types for lotus.
//!
//! All errors are construction-time domain errors: bad shape dimensions,
//! an unusable stem centerline, or an empty petal layer. The per-frame
//! simulation itself cannot fail - once a scene builds, it runs forever.

use std::fmt;

/// Errors that can occur while building a flower or scene.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// A shape dimension (length, width, radius) was zero or negative.
    NonPositiveDimension {
        /// Which dimension was rejected (e.g. "petal length").
        what: &'static str,
        /// The offending value.
        value: f32,
    },
    /// The stem centerline had fewer than two control points.
    EmptyCenterline,
    /// A petal layer was configured with a count of zero.
    EmptyPetalLayer,
    /// The stem height was zero or negative.
    NonPositiveStemHeight(f32),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::NonPositiveDimension { what, value } => {
                write!(f, "{} must be positive, got {}", what, value)
            }
            BuildError::EmptyCenterline => {
                write!(f, "Centerline needs at least 2 control points")
            }
            BuildError::EmptyPetalLayer => {
                write!(f, "Petal layer count must be at least 1")
            }
            BuildError::NonPositiveStemHeight(h) => {
                write!(f, "Stem height must be positive, got {}", h)
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Reject a non-positive dimension with a descriptive error.
pub(crate) fn check_positive(what: &'static str, value: f32) -> Result<f32, BuildError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(BuildError::NonPositiveDimension { what, value })
    }
}
