//! Immutable lookup from (character, behavior) to the animation that plays.
//!
//! Built once at startup through [`CatalogBuilder`] and shared behind an
//! `Arc`. The active animation is referred to by [`AnimationKey`] rather than
//! by reference, so "did the animation change" is plain key equality.

use std::collections::HashMap;

use crate::animation::Animation;
use crate::behavior::BehaviorState;
use crate::character::CharacterId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationKey {
    pub character: CharacterId,
    pub behavior: BehaviorState,
}

impl AnimationKey {
    pub fn new(character: CharacterId, behavior: BehaviorState) -> Self {
        Self {
            character,
            behavior,
        }
    }
}

pub struct SpriteCatalog {
    animations: HashMap<AnimationKey, Animation>,
    // Returned for keys with no registered clip; renders nothing.
    empty: Animation,
}

impl SpriteCatalog {
    /// The animation for `key`, or an empty animation if none was registered.
    pub fn get(&self, key: AnimationKey) -> &Animation {
        self.animations.get(&key).unwrap_or(&self.empty)
    }

    pub fn contains(&self, key: AnimationKey) -> bool {
        self.animations.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

#[derive(Default)]
pub struct CatalogBuilder {
    animations: HashMap<AnimationKey, Animation>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        character: CharacterId,
        behavior: BehaviorState,
        animation: Animation,
    ) -> &mut Self {
        self.animations
            .insert(AnimationKey::new(character, behavior), animation);
        self
    }

    /// Freeze the table. Clips that break the playback policy (idle must loop,
    /// walk must play once) are kept but reported, since a looping walk never
    /// consumes its step and a one-shot idle freezes on its last frame.
    pub fn build(self) -> SpriteCatalog {
        for &character in CharacterId::ALL {
            for behavior in [BehaviorState::Idle, BehaviorState::Walking] {
                let key = AnimationKey::new(character, behavior);
                let Some(animation) = self.animations.get(&key) else {
                    log::warn!("No {:?} animation registered for {}", behavior, character);
                    continue;
                };
                if animation.is_empty() {
                    log::warn!("{:?} animation for {} has no frames", behavior, character);
                }
                let expected_looping = behavior == BehaviorState::Idle;
                if animation.looping != expected_looping {
                    log::warn!(
                        "{:?} animation for {} has looping={}, expected {}",
                        behavior,
                        character,
                        animation.looping,
                        expected_looping
                    );
                }
            }
        }

        SpriteCatalog {
            animations: self.animations,
            empty: Animation::default(),
        }
    }
}
