//! Easing functions for animations
//!
//! Each curve maps normalized progress `t` to normalized output, both in
//! Q24.8. Inputs and outputs conventionally lie in `[0, 1]`, but overshoot
//! curves such as [`Easing::EaseInOutBack`] leave that range on purpose.
//! The arithmetic here defines the visual contract, so every curve is
//! written against [`Fixed`] primitives and must stay bit-for-bit stable.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownEasing;
use crate::fixed::Fixed;

/// Back-easing overshoot constant (1.70158 * 1.525)
const BACK_C2: Fixed = Fixed::from_bits(0x298);

/// Signature of a caller-supplied easing curve
pub type EasingFn = fn(Fixed) -> Fixed;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInOutBack,
    /// Caller-supplied curve
    #[serde(skip)]
    Custom(EasingFn),
}

impl Easing {
    /// Every named curve, in catalog order
    pub const ALL: [Easing; 8] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInOutBack,
    ];

    /// Apply the easing function to a progress value
    pub fn apply(&self, t: Fixed) -> Fixed {
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => {
                let v = Fixed::ONE - t;
                Fixed::ONE - v * v
            }
            Easing::EaseInOutQuad => {
                if t < Fixed::HALF {
                    (t * t) * 2
                } else {
                    let v = t * -2 + Fixed::from_int(2);
                    Fixed::ONE - ((v * v) >> 1)
                }
            }
            Easing::EaseInCubic => t * (t * t),
            Easing::EaseOutCubic => {
                let v = Fixed::ONE - t;
                Fixed::ONE - v * (v * v)
            }
            Easing::EaseInOutCubic => {
                if t < Fixed::HALF {
                    (t * (t * t)) * 4
                } else {
                    let v = t * -2 + Fixed::from_int(2);
                    Fixed::ONE - ((v * (v * v)) >> 1)
                }
            }
            Easing::EaseInOutBack => ease_in_out_back(t),
            Easing::Custom(f) => f(t),
        }
    }

    /// Catalog name, `None` for custom curves
    pub fn name(&self) -> Option<&'static str> {
        let name = match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "ease_in_quad",
            Easing::EaseOutQuad => "ease_out_quad",
            Easing::EaseInOutQuad => "ease_in_out_quad",
            Easing::EaseInCubic => "ease_in_cubic",
            Easing::EaseOutCubic => "ease_out_cubic",
            Easing::EaseInOutCubic => "ease_in_out_cubic",
            Easing::EaseInOutBack => "ease_in_out_back",
            Easing::Custom(_) => return None,
        };
        Some(name)
    }
}

impl FromStr for Easing {
    type Err = UnknownEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::ALL
            .into_iter()
            .find(|easing| easing.name() == Some(s))
            .ok_or_else(|| UnknownEasing(s.to_string()))
    }
}

fn ease_in_out_back(t: Fixed) -> Fixed {
    if t < Fixed::HALF {
        let v = t * 2;
        let a = v * v;
        let b = ((BACK_C2 + Fixed::ONE) * 2) * t - BACK_C2;
        (a * b) >> 1
    } else {
        let v = t * 2 - Fixed::from_int(2);
        let a = v * v;
        let b = (BACK_C2 + Fixed::ONE) * v + BACK_C2;
        (a * b + Fixed::from_int(2)) >> 1
    }
}
