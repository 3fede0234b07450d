//! Comfy Anim
//!
//! Deterministic fixed-point animation engine for targets without an FPU.
//!
//! # Features
//!
//! - **Q24.8 Arithmetic**: bit-for-bit reproducible math, no floats
//! - **Easing**: frame-counted interpolation along a catalog of curves
//! - **Spring Physics**: damped springs with optional overshoot clamping
//! - **Fixed Pool**: eight slots, no allocation, explicit release
//! - **Retargeting**: live springs can chase a moving target

pub mod animation;
pub mod config;
pub mod easing;
pub mod error;
pub mod fixed;
pub mod pool;
pub mod presets;

pub use animation::{Animation, AnimationKind, POSITION_PRECISION, STATIONARY_VELOCITY_THRESHOLD};
pub use config::{EasingConfig, SpringConfig};
pub use easing::{Easing, EasingFn};
pub use error::{AnimError, FixedError, UnknownEasing};
pub use fixed::Fixed;
pub use pool::{AnimHandle, AnimationPool, CompletedHandles, POOL_CAPACITY};
pub use presets::{SpringPreset, DEFAULT_SPRING_MASS};
