//! Scenario file handling
//!
//! A scenario (`scenario.toml`) lists the animations to start on frame 0,
//! in whole units, plus any spring retargets to apply on later frames.

use anyhow::{Context, Result};
use comfy_anim::{Easing, EasingConfig, Fixed, SpringConfig, SpringPreset, DEFAULT_SPRING_MASS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level scenario
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scenario {
    /// Frames to simulate
    #[serde(default = "default_frames")]
    pub frames: u32,
    #[serde(default, rename = "animation")]
    pub animations: Vec<AnimationSpec>,
}

fn default_frames() -> u32 {
    60
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecKind {
    Easing,
    Spring,
}

/// One animation entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnimationSpec {
    pub name: String,
    pub kind: SpecKind,
    pub from: i32,
    pub to: i32,
    /// Easing only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<SpringPreset>,
    /// Overrides the preset's tension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<i32>,
    /// Overrides the preset's friction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friction: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<i32>,
    #[serde(default)]
    pub clamp_after: u32,
    #[serde(default)]
    pub delay: u32,
    /// Spring only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub retarget: Vec<Retarget>,
}

/// Move a spring's target before the given frame is ticked
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct Retarget {
    pub frame: u32,
    pub to: i32,
}

/// Engine configuration built from a scenario entry
#[derive(Debug, Clone, Copy)]
pub enum AnimationConfig {
    Easing(EasingConfig),
    Spring(SpringConfig),
}

impl AnimationSpec {
    /// Convert to an engine configuration
    pub fn build(&self) -> Result<AnimationConfig> {
        let from = whole("from", self.from)?;
        let to = whole("to", self.to)?;

        match self.kind {
            SpecKind::Easing => {
                let Some(duration) = self.duration else {
                    anyhow::bail!("easing `{}` needs a `duration`", self.name);
                };
                if !self.retarget.is_empty() {
                    anyhow::bail!("easing `{}` cannot be retargeted", self.name);
                }
                let config = EasingConfig::new(duration, from, to)
                    .easing(self.easing.unwrap_or_default())
                    .delay(self.delay);
                Ok(AnimationConfig::Easing(config))
            }
            SpecKind::Spring => {
                let mass = whole("mass", self.mass.unwrap_or(DEFAULT_SPRING_MASS))?;
                let mut config = SpringConfig::new(from, to)
                    .preset(self.preset.unwrap_or_default())
                    .mass(mass)
                    .clamp_after(self.clamp_after)
                    .delay(self.delay);
                if let Some(tension) = self.tension {
                    config = config.tension(whole("tension", tension)?);
                }
                if let Some(friction) = self.friction {
                    config = config.friction(whole("friction", friction)?);
                }
                for retarget in &self.retarget {
                    retarget.target()?;
                }
                Ok(AnimationConfig::Spring(config))
            }
        }
    }
}

impl Retarget {
    /// New target in Q24.8
    pub fn target(&self) -> Result<Fixed> {
        whole("retarget `to`", self.to)
    }
}

/// Convert a scenario value, rejecting what Q24.8 cannot hold
fn whole(field: &str, value: i32) -> Result<Fixed> {
    Fixed::checked_from_int(value.into()).with_context(|| {
        format!(
            "`{field}` = {value} is outside {}..={}",
            Fixed::MIN_INT,
            Fixed::MAX_INT
        )
    })
}

impl Scenario {
    /// Load a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "No scenario found at {}. Run `comfy-anim init` to create one.",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Sample scenario: a cursor spring pair chasing two moves, and a fade
    pub fn example() -> Self {
        let cursor = |name: &str, from: i32, retarget: Vec<Retarget>| AnimationSpec {
            name: name.to_string(),
            kind: SpecKind::Spring,
            from,
            to: from,
            duration: None,
            easing: None,
            preset: None,
            tension: Some(285),
            friction: Some(1150),
            mass: None,
            clamp_after: 0,
            delay: 0,
            retarget,
        };

        Self {
            frames: default_frames(),
            animations: vec![
                cursor(
                    "cursor_x",
                    8,
                    vec![Retarget { frame: 5, to: 56 }, Retarget { frame: 30, to: 24 }],
                ),
                cursor("cursor_y", 40, vec![Retarget { frame: 5, to: 72 }]),
                AnimationSpec {
                    name: "fade".to_string(),
                    kind: SpecKind::Easing,
                    from: 0,
                    to: 16,
                    duration: Some(20),
                    easing: Some(Easing::EaseOutCubic),
                    preset: None,
                    tension: None,
                    friction: None,
                    mass: None,
                    clamp_after: 0,
                    delay: 0,
                    retarget: Vec::new(),
                },
            ],
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize scenario")
    }
}
