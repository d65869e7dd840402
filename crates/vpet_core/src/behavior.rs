//! Idle/walking state machine gated by a bounded queue of step requests.
//!
//! - Idle becomes Walking on the first update that sees a queued step.
//! - Every completed (non-looping) walk cycle consumes one step. If steps
//!   remain, the walk restarts from frame 0 in the same update; otherwise the
//!   pet returns to Idle.
//! - Switching characters drops back to Idle and clears the queue, even in
//!   the middle of a walk.
//!
//! All time-dependent calls take `now_ms` explicitly, so the machine is a pure
//! function of (state, time, events).

use crate::animation::AnimationCursor;
use crate::catalog::{AnimationKey, SpriteCatalog};
use crate::character::CharacterId;

pub const DEFAULT_MAX_QUEUED_STEPS: u8 = 2;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorState {
    #[default]
    Idle,
    Walking,
}

impl BehaviorState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Walking => "Walking",
        }
    }
}

impl std::fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What happened during one [`PetBehavior::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BehaviorTick {
    /// The pet was walking during this tick's movement phase; scroll layers
    /// should advance.
    pub walking: bool,
    pub frame_index: usize,
    /// A walk cycle finished and consumed a step.
    pub step_consumed: bool,
}

#[derive(Debug, Clone)]
pub struct PetBehavior {
    state: BehaviorState,
    character: CharacterId,
    queued_steps: u8,
    max_queued_steps: u8,
    active: AnimationKey,
    cursor: AnimationCursor,
}

impl PetBehavior {
    pub fn new(character: CharacterId, max_queued_steps: u8, now_ms: u64) -> Self {
        let state = BehaviorState::Idle;
        Self {
            state,
            character,
            queued_steps: 0,
            max_queued_steps: max_queued_steps.max(1),
            active: AnimationKey::new(character, state),
            cursor: AnimationCursor::new(now_ms),
        }
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn character(&self) -> CharacterId {
        self.character
    }

    pub fn queued_steps(&self) -> u8 {
        self.queued_steps
    }

    pub fn max_queued_steps(&self) -> u8 {
        self.max_queued_steps
    }

    pub fn active_key(&self) -> AnimationKey {
        self.active
    }

    pub fn cursor(&self) -> AnimationCursor {
        self.cursor
    }

    /// Queue one step. Returns `false` (and changes nothing) at the cap.
    pub fn request_step(&mut self) -> bool {
        if self.queued_steps >= self.max_queued_steps {
            log::debug!(
                "Step request dropped, queue full ({}/{})",
                self.queued_steps,
                self.max_queued_steps
            );
            return false;
        }
        self.queued_steps += 1;
        log::debug!(
            "Step requested ({}/{} queued)",
            self.queued_steps,
            self.max_queued_steps
        );
        true
    }

    /// Switch pets. Selecting the current character is a no-op and returns `false`.
    pub fn select_character(&mut self, character: CharacterId, now_ms: u64) -> bool {
        if character == self.character {
            return false;
        }
        log::info!("Switched character to {}", character);
        self.character = character;
        self.state = BehaviorState::Idle;
        self.queued_steps = 0;
        self.select_active_animation(true, now_ms);
        true
    }

    /// Run one tick of state transitions and animation playback.
    pub fn update(&mut self, catalog: &SpriteCatalog, now_ms: u64) -> BehaviorTick {
        if self.state == BehaviorState::Idle && self.queued_steps > 0 {
            self.state = BehaviorState::Walking;
            log::info!("State changed to {}", self.state);
            self.select_active_animation(true, now_ms);
        }

        let walking = self.state == BehaviorState::Walking;
        let animation = catalog.get(self.active);
        let result = animation.advance(&mut self.cursor, now_ms);

        let mut step_consumed = false;
        if walking && result.cycle_completed && !animation.looping {
            step_consumed = true;
            self.queued_steps = self.queued_steps.saturating_sub(1);
            log::info!(
                "Walk cycle finished, {} step(s) remaining",
                self.queued_steps
            );
            if self.queued_steps > 0 {
                // Next cycle starts now, not on the following tick.
                self.cursor.reset(now_ms);
            } else {
                self.state = BehaviorState::Idle;
                log::info!("State changed to {}", self.state);
                self.select_active_animation(true, now_ms);
            }
        }

        BehaviorTick {
            walking,
            frame_index: self.cursor.frame_index,
            step_consumed,
        }
    }

    fn select_active_animation(&mut self, force_reset: bool, now_ms: u64) {
        let previous = self.active;
        self.active = AnimationKey::new(self.character, self.state);
        if force_reset || self.active != previous {
            self.cursor.reset(now_ms);
            log::debug!(
                "Animation selected: {} {}",
                self.active.character,
                self.active.behavior
            );
        }
    }
}
