//! Spring presets
//!
//! Tension/friction pairs for common motion profiles, from gentle to
//! molasses. They were tuned against a mass of [`DEFAULT_SPRING_MASS`];
//! other masses shift the feel proportionally.

use serde::{Deserialize, Serialize};

use crate::fixed::Fixed;

/// Mass assumed by every preset, in whole units
pub const DEFAULT_SPRING_MASS: i32 = 50;

/// Named spring stiffness profiles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpringPreset {
    #[default]
    Default,
    Gentle,
    Wobbly,
    Stiff,
    Slow,
    Molasses,
}

impl SpringPreset {
    pub const ALL: [SpringPreset; 6] = [
        SpringPreset::Default,
        SpringPreset::Gentle,
        SpringPreset::Wobbly,
        SpringPreset::Stiff,
        SpringPreset::Slow,
        SpringPreset::Molasses,
    ];

    /// Tension (stiffness)
    pub const fn tension(self) -> Fixed {
        Fixed::from_int(match self {
            SpringPreset::Default => 175,
            SpringPreset::Gentle => 124,
            SpringPreset::Wobbly => 185,
            SpringPreset::Stiff => 185,
            SpringPreset::Slow => 285,
            SpringPreset::Molasses => 285,
        })
    }

    /// Friction (damping)
    pub const fn friction(self) -> Fixed {
        Fixed::from_int(match self {
            SpringPreset::Default => 1000,
            SpringPreset::Gentle => 900,
            SpringPreset::Wobbly => 700,
            SpringPreset::Stiff => 1150,
            SpringPreset::Slow => 2000,
            SpringPreset::Molasses => 4000,
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            SpringPreset::Default => "default",
            SpringPreset::Gentle => "gentle",
            SpringPreset::Wobbly => "wobbly",
            SpringPreset::Stiff => "stiff",
            SpringPreset::Slow => "slow",
            SpringPreset::Molasses => "molasses",
        }
    }
}
