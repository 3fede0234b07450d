//! Animation slots and their per-frame drivers
//!
//! An [`Animation`] is one slot of the pool. The easing driver walks a
//! fixed number of frames along a curve; the spring driver integrates a
//! damped oscillator with a semi-implicit Euler step of one frame.

use tracing::trace;

use crate::config::{EasingConfig, SpringConfig};
use crate::fixed::Fixed;

/// Position tolerance for a spring to count as settled (0.0625)
pub const POSITION_PRECISION: Fixed = Fixed::from_bits(0x10);

/// Speed below which a spring counts as stationary (0.0625)
pub const STATIONARY_VELOCITY_THRESHOLD: Fixed = Fixed::from_bits(0x10);

/// Simulation time step, 0.02 in Q24.8
const SPRING_TIME_STEP: Fixed = Fixed::from_bits(0x5);

/// What drives a slot, with the driver's private state
#[derive(Clone, Copy, Debug, Default)]
pub enum AnimationKind {
    /// Allocated but not yet configured
    #[default]
    None,
    Easing {
        config: EasingConfig,
        cur_frame: u32,
    },
    Spring {
        config: SpringConfig,
        overshoot_count: u32,
    },
}

/// A single animated scalar
#[derive(Clone, Copy, Debug, Default)]
pub struct Animation {
    kind: AnimationKind,
    position: Fixed,
    velocity: Fixed,
    delay_frames: u32,
    completed: bool,
    in_use: bool,
}

impl Animation {
    pub(crate) const EMPTY: Animation = Animation {
        kind: AnimationKind::None,
        position: Fixed::ZERO,
        velocity: Fixed::ZERO,
        delay_frames: 0,
        completed: false,
        in_use: false,
    };

    /// Claimed slot with no driver attached yet
    pub(crate) fn claimed() -> Self {
        Self {
            in_use: true,
            ..Self::EMPTY
        }
    }

    pub(crate) fn easing(config: EasingConfig) -> Self {
        Self {
            kind: AnimationKind::Easing {
                config,
                cur_frame: 0,
            },
            position: config.from,
            velocity: Fixed::ZERO,
            delay_frames: config.delay_frames,
            completed: false,
            in_use: true,
        }
    }

    pub(crate) fn spring(config: SpringConfig) -> Self {
        Self {
            kind: AnimationKind::Spring {
                config,
                overshoot_count: 0,
            },
            position: config.from,
            velocity: Fixed::ZERO,
            delay_frames: config.delay_frames,
            completed: false,
            in_use: true,
        }
    }

    pub fn kind(&self) -> &AnimationKind {
        &self.kind
    }

    /// Current position
    pub fn position(&self) -> Fixed {
        self.position
    }

    /// Change in position over the last simulated frame
    pub fn velocity(&self) -> Fixed {
        self.velocity
    }

    /// Frames still to wait before a spring starts moving
    pub fn remaining_delay(&self) -> u32 {
        self.delay_frames
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_in_use(&self) -> bool {
        self.in_use
    }

    pub(crate) fn release(&mut self) {
        self.in_use = false;
    }

    /// Position rounded to the nearest whole unit
    pub fn value_smooth(&self) -> i32 {
        self.position.round_to_int()
    }

    pub fn spring_config(&self) -> Option<&SpringConfig> {
        match &self.kind {
            AnimationKind::Spring { config, .. } => Some(config),
            _ => None,
        }
    }

    /// Mutable spring configuration
    ///
    /// Edits take effect on the next tick. Changing `to` here leaves
    /// `is_completed` untouched until then; prefer [`Animation::retarget`].
    pub fn spring_config_mut(&mut self) -> Option<&mut SpringConfig> {
        match &mut self.kind {
            AnimationKind::Spring { config, .. } => Some(config),
            _ => None,
        }
    }

    /// Point a spring at a new target
    ///
    /// Clears `completed` when the target moves so the spring resumes on the
    /// next tick. Returns `false` for non-spring slots.
    pub fn retarget(&mut self, to: Fixed) -> bool {
        let AnimationKind::Spring { config, .. } = &mut self.kind else {
            return false;
        };
        if config.to != to {
            config.to = to;
            self.completed = false;
        }
        true
    }

    /// Advance one frame
    ///
    /// Finished easings are skipped; springs always run so they can react to
    /// a new target.
    pub fn try_advance(&mut self) {
        match self.kind {
            AnimationKind::None => {}
            AnimationKind::Easing { .. } => {
                if !self.completed {
                    self.advance_easing();
                }
            }
            AnimationKind::Spring { .. } => self.advance_spring(),
        }
    }

    fn advance_easing(&mut self) {
        let AnimationKind::Easing { config, cur_frame } = &mut self.kind else {
            return;
        };

        *cur_frame += 1;
        let t = Fixed::from_int(*cur_frame as i32)
            / Fixed::from_int(config.duration_frames as i32);

        if t == Fixed::ONE {
            self.position = config.to;
            self.completed = true;
            trace!(frame = *cur_frame, "easing reached its end");
            return;
        }

        let x = config.easing.apply(t);
        let previous = self.position;
        self.position = config.from + x * (config.to - config.from);
        self.velocity = self.position - previous;

        if *cur_frame >= config.duration_frames {
            self.completed = true;
            trace!(frame = *cur_frame, "easing ran out of frames");
        }
    }

    /// One semi-implicit Euler step of the damped spring
    ///
    /// With `clamp_after > 0`, the crossing that exceeds the overshoot budget
    /// snaps the position to `to` and also zeroes the velocity. Keeping the
    /// velocity would fail the settle check on the next tick and the spring
    /// would resume oscillating.
    fn advance_spring(&mut self) {
        let AnimationKind::Spring {
            config,
            overshoot_count,
        } = &mut self.kind
        else {
            return;
        };

        if self.velocity.abs() < STATIONARY_VELOCITY_THRESHOLD
            && (config.to - self.position).abs() < POSITION_PRECISION
        {
            if !self.completed {
                trace!(to = %config.to, "spring settled");
            }
            self.position = config.to;
            self.completed = true;
            return;
        }
        self.completed = false;

        if self.delay_frames > 0 {
            self.delay_frames -= 1;
            return;
        }

        let spring_force = -((config.tension * SPRING_TIME_STEP) * (self.position - config.to));
        let damping_force = -((config.friction * SPRING_TIME_STEP) * self.velocity);
        let acceleration = (spring_force + damping_force) / config.mass;
        self.velocity += acceleration;
        let previous = self.position;
        self.position += self.velocity;

        if config.clamp_after > 0 {
            let was_above = previous - config.to > Fixed::ZERO;
            let is_above = self.position - config.to > Fixed::ZERO;
            if was_above != is_above {
                if *overshoot_count >= config.clamp_after {
                    trace!(overshoots = *overshoot_count, "spring clamped");
                    self.position = config.to;
                    self.velocity = Fixed::ZERO;
                    self.completed = true;
                    return;
                }
                *overshoot_count += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::presets::SpringPreset;

    fn run(anim: &mut Animation, frames: u32) {
        for _ in 0..frames {
            anim.try_advance();
        }
    }

    #[test]
    fn test_linear_easing_halfway_and_end() {
        let config = EasingConfig::new(10, Fixed::ZERO, Fixed::from_int(100));
        let mut anim = Animation::easing(config);

        run(&mut anim, 5);
        assert_eq!(anim.position(), Fixed::from_int(50));
        assert!(!anim.is_completed());

        run(&mut anim, 5);
        assert_eq!(anim.position(), Fixed::from_int(100));
        assert!(anim.is_completed());
    }

    #[test]
    fn test_easing_tracks_velocity() {
        let config = EasingConfig::new(4, Fixed::ZERO, Fixed::from_int(8));
        let mut anim = Animation::easing(config);
        run(&mut anim, 1);
        assert_eq!(anim.position(), Fixed::from_int(2));
        assert_eq!(anim.velocity(), Fixed::from_int(2));
    }

    #[test]
    fn test_completed_easing_is_not_reentered() {
        let config =
            EasingConfig::new(2, Fixed::from_int(5), Fixed::ZERO).easing(Easing::EaseOutQuad);
        let mut anim = Animation::easing(config);
        run(&mut anim, 10);
        assert!(anim.is_completed());
        assert_eq!(anim.position(), Fixed::ZERO);
        let AnimationKind::Easing { cur_frame, .. } = anim.kind() else {
            panic!("expected easing");
        };
        assert_eq!(*cur_frame, 2);
    }

    #[test]
    fn test_easing_ignores_delay() {
        let config = EasingConfig::new(10, Fixed::ZERO, Fixed::from_int(100)).delay(5);
        let mut anim = Animation::easing(config);
        run(&mut anim, 5);
        assert_eq!(anim.position(), Fixed::from_int(50));
        assert_eq!(anim.remaining_delay(), 5);
    }

    #[test]
    fn test_spring_settles_on_target() {
        let config = SpringConfig::new(Fixed::ZERO, Fixed::from_int(100));
        let mut anim = Animation::spring(config);

        run(&mut anim, 31);
        assert!(!anim.is_completed());
        run(&mut anim, 1);
        assert!(anim.is_completed());
        assert_eq!(anim.position(), Fixed::from_int(100));
    }

    #[test]
    fn test_spring_delay_postpones_motion() {
        let config = SpringConfig::new(Fixed::ZERO, Fixed::from_int(100)).delay(5);
        let mut anim = Animation::spring(config);

        run(&mut anim, 5);
        assert_eq!(anim.position(), Fixed::ZERO);
        assert_eq!(anim.remaining_delay(), 0);

        run(&mut anim, 32);
        assert!(anim.is_completed());
    }

    #[test]
    fn test_spring_at_rest_completes_immediately() {
        let config = SpringConfig::new(Fixed::from_int(7), Fixed::from_int(7)).delay(30);
        let mut anim = Animation::spring(config);
        run(&mut anim, 1);
        assert!(anim.is_completed());
        assert_eq!(anim.remaining_delay(), 30);
    }

    #[test]
    fn test_spring_clamp_after_one_overshoot() {
        let config = SpringConfig::new(Fixed::ZERO, Fixed::from_int(100))
            .tension(Fixed::from_int(1000))
            .friction(Fixed::from_int(100))
            .clamp_after(1);
        let mut anim = Animation::spring(config);

        run(&mut anim, 6);
        assert!(!anim.is_completed());
        run(&mut anim, 1);
        assert!(anim.is_completed());
        assert_eq!(anim.position(), Fixed::from_int(100));
        assert_eq!(anim.velocity(), Fixed::ZERO);
        let AnimationKind::Spring {
            overshoot_count, ..
        } = anim.kind()
        else {
            panic!("expected spring");
        };
        assert_eq!(*overshoot_count, 1);

        // Stays settled once clamped
        run(&mut anim, 3);
        assert!(anim.is_completed());
        assert_eq!(anim.position(), Fixed::from_int(100));
    }

    #[test]
    fn test_retarget_clears_completion() {
        let config = SpringConfig::new(Fixed::ZERO, Fixed::ZERO).preset(SpringPreset::Stiff);
        let mut anim = Animation::spring(config);
        run(&mut anim, 1);
        assert!(anim.is_completed());

        assert!(anim.retarget(Fixed::from_int(40)));
        assert!(!anim.is_completed());

        run(&mut anim, 200);
        assert!(anim.is_completed());
        assert_eq!(anim.position(), Fixed::from_int(40));
    }

    #[test]
    fn test_direct_config_edit_is_picked_up_next_tick() {
        let config = SpringConfig::new(Fixed::ZERO, Fixed::ZERO);
        let mut anim = Animation::spring(config);
        run(&mut anim, 1);
        assert!(anim.is_completed());

        anim.spring_config_mut().unwrap().to = Fixed::from_int(16);
        assert!(anim.is_completed());
        run(&mut anim, 1);
        assert!(!anim.is_completed());
        assert!(anim.position() > Fixed::ZERO);
    }

    #[test]
    fn test_retarget_rejects_easing() {
        let mut anim = Animation::easing(EasingConfig::new(3, Fixed::ZERO, Fixed::ONE));
        assert!(!anim.retarget(Fixed::from_int(2)));
        assert!(anim.spring_config_mut().is_none());
    }
}
