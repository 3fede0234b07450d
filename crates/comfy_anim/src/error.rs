//! Animation engine error types

use thiserror::Error;

use crate::fixed::Fixed;

/// Fixed-point arithmetic errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedError {
    /// Fixed-point division with a zero divisor
    #[error("fixed-point division by zero")]
    DivisionByZero,
}

/// Errors raised while creating or addressing animations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimError {
    /// Every slot in the pool is owned by someone
    #[error("animation pool exhausted: all {0} slots are in use")]
    PoolExhausted(usize),

    /// Easing animation configured with a zero-frame duration
    #[error("easing duration must be at least one frame")]
    ZeroDuration,

    /// Easing duration too long to express as Q24.8 progress
    #[error(
        "easing duration of {0} frames exceeds the fixed-point limit of {max}",
        max = Fixed::MAX_INT
    )]
    DurationTooLong(u32),

    /// Spring animation configured with zero mass
    #[error("spring mass must be nonzero")]
    ZeroMass,

    /// Handle is out of range or refers to a free slot
    #[error("invalid animation handle: {0}")]
    InvalidHandle(u32),

    /// Spring-only operation requested on a non-spring slot
    #[error("animation {0} is not a spring")]
    NotASpring(u32),
}

/// Unrecognized easing curve name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown easing curve: {0}")]
pub struct UnknownEasing(pub String);

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimError>;
