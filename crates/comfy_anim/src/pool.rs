//! Animation pool
//!
//! A fixed arena of [`POOL_CAPACITY`] slots, ticked once per logical frame.
//! A slot belongs to whoever created it until released. Completion never
//! frees a slot, so a finished animation keeps reporting its final value.

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::animation::Animation;
use crate::config::{EasingConfig, SpringConfig};
use crate::error::{AnimError, Result};
use crate::fixed::Fixed;

/// Number of animation slots
pub const POOL_CAPACITY: usize = 8;

/// Index of a slot in the pool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimHandle(u32);

impl AnimHandle {
    /// Allocation failure sentinel (equal to the pool capacity)
    pub const INVALID: AnimHandle = AnimHandle(POOL_CAPACITY as u32);

    pub const fn from_raw(raw: u32) -> Self {
        AnimHandle(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether the handle addresses a slot at all
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < POOL_CAPACITY
    }
}

/// Handles that finished during a single tick
pub type CompletedHandles = SmallVec<[AnimHandle; POOL_CAPACITY]>;

/// The fixed-capacity pool that ticks all animations
#[derive(Clone, Debug)]
pub struct AnimationPool {
    slots: [Animation; POOL_CAPACITY],
}

impl AnimationPool {
    pub fn new() -> Self {
        Self {
            slots: [Animation::EMPTY; POOL_CAPACITY],
        }
    }

    /// Claim the lowest free slot
    ///
    /// Returns [`AnimHandle::INVALID`] when every slot is in use.
    pub fn allocate(&mut self) -> AnimHandle {
        match self.claim(Animation::claimed()) {
            Ok(handle) => handle,
            Err(_) => AnimHandle::INVALID,
        }
    }

    /// Start an easing animation
    pub fn try_create_easing(&mut self, config: EasingConfig) -> Result<AnimHandle> {
        config.validate()?;
        self.claim(Animation::easing(config))
    }

    /// Start a spring animation
    pub fn try_create_spring(&mut self, config: SpringConfig) -> Result<AnimHandle> {
        config.validate()?;
        self.claim(Animation::spring(config))
    }

    /// Start an easing animation, or get [`AnimHandle::INVALID`] if the pool is full
    ///
    /// # Panics
    ///
    /// Panics when `duration_frames` is zero or above [`Fixed::MAX_INT`].
    #[track_caller]
    pub fn create_easing(&mut self, config: EasingConfig) -> AnimHandle {
        sentinel_or_panic(self.try_create_easing(config))
    }

    /// Start a spring animation, or get [`AnimHandle::INVALID`] if the pool is full
    ///
    /// # Panics
    ///
    /// Panics when `mass` is zero.
    #[track_caller]
    pub fn create_spring(&mut self, config: SpringConfig) -> AnimHandle {
        sentinel_or_panic(self.try_create_spring(config))
    }

    fn claim(&mut self, animation: Animation) -> Result<AnimHandle> {
        let Some(index) = self.slots.iter().position(|slot| !slot.is_in_use()) else {
            warn!(capacity = POOL_CAPACITY, "animation pool exhausted");
            return Err(AnimError::PoolExhausted(POOL_CAPACITY));
        };
        self.slots[index] = animation;
        debug!(slot = index, kind = ?self.slots[index].kind(), "animation slot claimed");
        Ok(AnimHandle(index as u32))
    }

    /// Free a slot; out-of-range handles and double releases are ignored
    pub fn release(&mut self, handle: AnimHandle) {
        if let Some(slot) = self.slots.get_mut(handle.index()) {
            if slot.is_in_use() {
                debug!(slot = handle.index(), "animation slot released");
            }
            slot.release();
        }
    }

    /// Free every slot
    pub fn release_all(&mut self) {
        for index in 0..POOL_CAPACITY {
            self.release(AnimHandle(index as u32));
        }
    }

    /// Advance every in-use animation by one frame, in slot order
    ///
    /// Returns the handles whose animation completed during this tick.
    pub fn tick(&mut self) -> CompletedHandles {
        let mut completed = CompletedHandles::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if !slot.is_in_use() {
                continue;
            }
            let was_completed = slot.is_completed();
            slot.try_advance();
            if slot.is_completed() && !was_completed {
                completed.push(AnimHandle(index as u32));
            }
        }
        completed
    }

    /// Smoothed integer position (rounded to nearest)
    pub fn read_smooth(&self, handle: AnimHandle) -> Option<i32> {
        self.get(handle).map(Animation::value_smooth)
    }

    /// Animation behind a live handle
    pub fn get(&self, handle: AnimHandle) -> Option<&Animation> {
        self.slots.get(handle.index()).filter(|slot| slot.is_in_use())
    }

    /// Mutable animation behind a live handle
    pub fn get_mut(&mut self, handle: AnimHandle) -> Option<&mut Animation> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.is_in_use())
    }

    pub fn position(&self, handle: AnimHandle) -> Option<Fixed> {
        self.get(handle).map(Animation::position)
    }

    pub fn velocity(&self, handle: AnimHandle) -> Option<Fixed> {
        self.get(handle).map(Animation::velocity)
    }

    pub fn is_in_use(&self, handle: AnimHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn is_completed(&self, handle: AnimHandle) -> bool {
        self.get(handle).is_some_and(Animation::is_completed)
    }

    /// Current target of a live spring
    pub fn spring_target(&self, handle: AnimHandle) -> Option<Fixed> {
        self.get(handle)?.spring_config().map(|config| config.to)
    }

    /// Retarget a live spring, e.g. to follow a moving cursor
    pub fn set_spring_target(&mut self, handle: AnimHandle, to: Fixed) -> Result<()> {
        let animation = self
            .get_mut(handle)
            .ok_or(AnimError::InvalidHandle(handle.raw()))?;
        if animation.retarget(to) {
            Ok(())
        } else {
            Err(AnimError::NotASpring(handle.raw()))
        }
    }

    /// Number of slots in use
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_in_use()).count()
    }

    /// Check if any in-use animation is still moving
    pub fn has_active_animations(&self) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.is_in_use() && !slot.is_completed())
    }

    /// Iterate over in-use slots in index order
    pub fn iter(&self) -> impl Iterator<Item = (AnimHandle, &Animation)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_in_use())
            .map(|(index, slot)| (AnimHandle(index as u32), slot))
    }
}

impl Default for AnimationPool {
    fn default() -> Self {
        Self::new()
    }
}

#[track_caller]
fn sentinel_or_panic(result: Result<AnimHandle>) -> AnimHandle {
    match result {
        Ok(handle) => handle,
        Err(AnimError::PoolExhausted(_)) => AnimHandle::INVALID,
        Err(err) => panic!("invalid animation config: {err}"),
    }
}
