//! Headless frame-trace runner
//!
//! Plays a [`Scenario`] against an [`AnimationPool`], one tick per frame,
//! and records the smoothed value of every animation.

use anyhow::{Context, Result};
use comfy_anim::{AnimError, AnimHandle, AnimationPool, Easing, Fixed};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::{AnimationConfig, Scenario};

/// Values for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSample {
    pub frame: u32,
    /// Smoothed value per animation; `None` when it never got a slot
    pub values: Vec<Option<i32>>,
    /// Animations that completed on this frame
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub completed: Vec<String>,
}

/// Full recording of a scenario run
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    pub names: Vec<String>,
    pub frames: Vec<FrameSample>,
}

/// Run `frames` ticks of the scenario
pub fn run(scenario: &Scenario, frames: u32) -> Result<Trace> {
    let mut pool = AnimationPool::new();
    let mut handles = Vec::with_capacity(scenario.animations.len());

    for spec in &scenario.animations {
        let config = spec
            .build()
            .with_context(|| format!("Invalid animation `{}`", spec.name))?;
        let created = match config {
            AnimationConfig::Easing(config) => pool.try_create_easing(config),
            AnimationConfig::Spring(config) => pool.try_create_spring(config),
        };
        match created {
            Ok(handle) => {
                debug!(name = %spec.name, slot = handle.index(), "animation started");
                handles.push(Some(handle));
            }
            Err(AnimError::PoolExhausted(capacity)) => {
                warn!(name = %spec.name, capacity, "no free slot, animation skipped");
                handles.push(None);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to start `{}`", spec.name));
            }
        }
    }

    let names: Vec<String> = scenario.animations.iter().map(|a| a.name.clone()).collect();
    let mut samples = Vec::with_capacity(frames as usize);

    for frame in 1..=frames {
        for (spec, handle) in scenario.animations.iter().zip(&handles) {
            let Some(handle) = handle else { continue };
            for retarget in spec.retarget.iter().filter(|r| r.frame == frame) {
                pool.set_spring_target(*handle, retarget.target()?)
                    .with_context(|| format!("Failed to retarget `{}`", spec.name))?;
                debug!(name = %spec.name, frame, to = retarget.to, "spring retargeted");
            }
        }

        let finished = pool.tick();

        let completed = finished
            .iter()
            .filter_map(|done| position_of(&handles, *done))
            .map(|i| names[i].clone())
            .collect();
        let values = handles
            .iter()
            .map(|handle| handle.and_then(|h| pool.read_smooth(h)))
            .collect();
        samples.push(FrameSample {
            frame,
            values,
            completed,
        });
    }

    info!(
        frames,
        animations = names.len(),
        still_moving = pool.has_active_animations(),
        "scenario finished"
    );
    pool.release_all();

    Ok(Trace {
        names,
        frames: samples,
    })
}

fn position_of(handles: &[Option<AnimHandle>], handle: AnimHandle) -> Option<usize> {
    handles.iter().position(|h| *h == Some(handle))
}

impl Trace {
    /// Plain-text table, one row per frame
    pub fn render_table(&self) -> String {
        self.to_string()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize trace")
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.names.iter().map(String::len).max().unwrap_or(0).max(6);

        write!(f, "{:>5}", "frame")?;
        for name in &self.names {
            write!(f, "  {name:>width$}")?;
        }
        writeln!(f)?;

        for sample in &self.frames {
            write!(f, "{:>5}", sample.frame)?;
            for value in &sample.values {
                match value {
                    Some(v) => write!(f, "  {v:>width$}")?,
                    None => write!(f, "  {:>width$}", "-")?,
                }
            }
            if !sample.completed.is_empty() {
                write!(f, "  done: {}", sample.completed.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Most intervals a curve can be sampled at; progress has 1/256 resolution
pub const MAX_CURVE_STEPS: u32 = 256;

/// Evaluate `easing` at `steps + 1` evenly spaced points from 0 to 1
///
/// Progress is computed the way the easing driver computes it, as
/// `i / steps` in Q24.8.
pub fn sample_curve(easing: Easing, steps: u32) -> Result<Vec<Fixed>> {
    if !(1..=MAX_CURVE_STEPS).contains(&steps) {
        anyhow::bail!("--steps must be between 1 and {MAX_CURVE_STEPS}, got {steps}");
    }
    let total = Fixed::from_int(steps as i32);
    Ok((0..=steps)
        .map(|i| easing.apply(Fixed::from_int(i as i32) / total))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(text: &str) -> Scenario {
        Scenario::from_toml(text).unwrap()
    }

    #[test]
    fn test_linear_easing_trace() {
        let scenario = scenario(
            r#"
            [[animation]]
            name = "slide"
            kind = "easing"
            from = 0
            to = 100
            duration = 10
            "#,
        );
        let trace = run(&scenario, 12).unwrap();
        assert_eq!(trace.frames.len(), 12);
        assert_eq!(trace.frames[4].values, [Some(50)]);
        assert_eq!(trace.frames[9].values, [Some(100)]);
        assert_eq!(trace.frames[9].completed, ["slide"]);
        assert!(trace.frames[10].completed.is_empty());
    }

    #[test]
    fn test_retarget_moves_spring() {
        let scenario = scenario(
            r#"
            [[animation]]
            name = "cursor_x"
            kind = "spring"
            from = 8
            to = 8
            tension = 285
            friction = 1150

            [[animation.retarget]]
            frame = 3
            to = 56
            "#,
        );
        let trace = run(&scenario, 40).unwrap();
        assert_eq!(trace.frames[0].values, [Some(8)]);
        assert_eq!(trace.frames[1].values, [Some(8)]);
        assert!(trace.frames[2].values[0].unwrap() > 8);
        assert_eq!(trace.frames[39].values, [Some(56)]);
    }

    #[test]
    fn test_exhausted_pool_skips_extra_animations() {
        let text: String = (0..9)
            .map(|i| format!("[[animation]]\nname = \"a{i}\"\nkind = \"spring\"\n"))
            .map(|entry| entry + "from = 0\nto = 0\n")
            .collect();
        let trace = run(&scenario(&text), 1).unwrap();
        assert_eq!(trace.names.len(), 9);
        assert_eq!(trace.frames[0].values[7], Some(0));
        assert_eq!(trace.frames[0].values[8], None);
    }

    #[test]
    fn test_zero_duration_is_an_error() {
        let scenario = scenario(
            r#"
            [[animation]]
            name = "broken"
            kind = "easing"
            from = 0
            to = 1
            duration = 0
            "#,
        );
        let err = run(&scenario, 1).unwrap_err();
        assert!(format!("{err:#}").contains("at least one frame"));
    }

    #[test]
    fn test_table_and_json_output() {
        let trace = run(&Scenario::example(), 3).unwrap();
        let table = trace.render_table();
        assert!(table.starts_with("frame"));
        assert!(table.contains("cursor_x"));
        assert_eq!(table.lines().count(), 4);

        assert_eq!(table, trace.to_string());
        let first_row = table.lines().nth(1).unwrap();
        assert!(first_row.starts_with("    1"));

        let json: serde_json::Value = serde_json::from_str(&trace.to_json().unwrap()).unwrap();
        assert_eq!(json["names"][2], "fade");
        assert_eq!(json["frames"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_sample_curve() {
        let linear = sample_curve(Easing::Linear, 4).unwrap();
        assert_eq!(linear, [0x00, 0x40, 0x80, 0xC0, 0x100].map(Fixed::from_bits));
        let cubic = sample_curve(Easing::EaseOutCubic, 256).unwrap();
        assert_eq!(cubic.len(), 257);
        assert_eq!(cubic[0], Fixed::ZERO);
        assert_eq!(cubic[256], Fixed::ONE);
    }

    #[test]
    fn test_sample_curve_rejects_bad_step_counts() {
        for steps in [0, MAX_CURVE_STEPS + 1, 1 << 24] {
            let err = sample_curve(Easing::Linear, steps).unwrap_err();
            assert!(err.to_string().contains("--steps must be between"), "{err}");
        }
    }
}
