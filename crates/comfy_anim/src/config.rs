//! Animation configurations
//!
//! Positions and spring constants are Q24.8. An [`EasingConfig`] is frozen
//! once an animation is created from it; a live spring may be retargeted
//! through [`crate::AnimationPool::set_spring_target`].

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{AnimError, Result};
use crate::fixed::Fixed;
use crate::presets::{SpringPreset, DEFAULT_SPRING_MASS};

/// Time-bounded interpolation between two values
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EasingConfig {
    /// Total duration in frames (~60 per second)
    pub duration_frames: u32,
    pub from: Fixed,
    pub to: Fixed,
    #[serde(default)]
    pub easing: Easing,
    /// Carried for parity with springs; the easing driver does not wait on it
    #[serde(default)]
    pub delay_frames: u32,
}

impl EasingConfig {
    pub fn new(duration_frames: u32, from: Fixed, to: Fixed) -> Self {
        Self {
            duration_frames,
            from,
            to,
            easing: Easing::Linear,
            delay_frames: 0,
        }
    }

    /// Builder: set the easing curve
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Builder: set the delay
    pub fn delay(mut self, frames: u32) -> Self {
        self.delay_frames = frames;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.duration_frames == 0 {
            return Err(AnimError::ZeroDuration);
        }
        if self.duration_frames > Fixed::MAX_INT as u32 {
            return Err(AnimError::DurationTooLong(self.duration_frames));
        }
        Ok(())
    }
}

/// Damped spring converging on `to`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub from: Fixed,
    pub to: Fixed,
    pub tension: Fixed,
    pub friction: Fixed,
    /// Must be nonzero
    pub mass: Fixed,
    /// Overshoots allowed before the spring is snapped to `to` (0 = unlimited)
    ///
    /// A clamped spring lands on `to` with zero velocity, so it reads as
    /// completed from then on instead of swinging past the target again.
    #[serde(default)]
    pub clamp_after: u32,
    /// Frames to wait before the simulation starts
    #[serde(default)]
    pub delay_frames: u32,
}

impl SpringConfig {
    /// Spring using the default preset and mass
    pub fn new(from: Fixed, to: Fixed) -> Self {
        let preset = SpringPreset::Default;
        Self {
            from,
            to,
            tension: preset.tension(),
            friction: preset.friction(),
            mass: Fixed::from_int(DEFAULT_SPRING_MASS),
            clamp_after: 0,
            delay_frames: 0,
        }
    }

    /// Builder: take tension and friction from a preset
    pub fn preset(mut self, preset: SpringPreset) -> Self {
        self.tension = preset.tension();
        self.friction = preset.friction();
        self
    }

    /// Builder: set tension
    pub fn tension(mut self, tension: Fixed) -> Self {
        self.tension = tension;
        self
    }

    /// Builder: set friction
    pub fn friction(mut self, friction: Fixed) -> Self {
        self.friction = friction;
        self
    }

    /// Builder: set mass
    pub fn mass(mut self, mass: Fixed) -> Self {
        self.mass = mass;
        self
    }

    /// Builder: limit overshoots
    pub fn clamp_after(mut self, overshoots: u32) -> Self {
        self.clamp_after = overshoots;
        self
    }

    /// Builder: set the delay
    pub fn delay(mut self, frames: u32) -> Self {
        self.delay_frames = frames;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.mass == Fixed::ZERO {
            return Err(AnimError::ZeroMass);
        }
        Ok(())
    }
}
