//! Discrete pet actions and the keyboard-backed input source.
//!
//! Window events arrive whenever the platform delivers them, but the
//! simulation only looks at input once per tick. `InputState` therefore keeps
//! two sets:
//!
//! - **pending:** actions triggered since the last `update()`.
//! - **latched:** the actions visible to the current tick. `update()` replaces
//!   it with the pending set, so every press is seen by exactly one tick.
//!
//! Only the first press of a held key counts; OS key repeat is ignored.

use std::collections::HashSet;

use serde::Deserialize;

use crate::character::CharacterId;

/// The closed set of actions the pet reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Quit,
    Step,
    #[serde(rename = "select")]
    SelectCharacter(CharacterId),
}

/// A source of per-tick actions consumed by the frame driver.
pub trait InputSource {
    /// Latch the actions that arrived since the previous call.
    fn update(&mut self);

    /// Whether `action` was triggered in the latched tick.
    fn was_action_pressed(&self, action: Action) -> bool;

    /// Sticky: once quit has been requested it stays requested.
    fn is_quit_requested(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Space,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    F3,
}

impl Key {
    /// The pet action bound to this key, if any.
    pub fn action(self) -> Option<Action> {
        let slot = match self {
            Key::Escape => return Some(Action::Quit),
            Key::Space => return Some(Action::Step),
            Key::F3 => return None,
            Key::Digit1 => 1,
            Key::Digit2 => 2,
            Key::Digit3 => 3,
            Key::Digit4 => 4,
            Key::Digit5 => 5,
            Key::Digit6 => 6,
            Key::Digit7 => 7,
            Key::Digit8 => 8,
        };
        CharacterId::from_slot(slot).map(Action::SelectCharacter)
    }
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    pending: HashSet<Action>,
    latched: HashSet<Action>,
    quit_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if !self.held.insert(key) {
            return;
        }
        self.just_pressed.insert(key);
        if let Some(action) = key.action() {
            self.trigger(action);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Queue an action that did not come from a key (window close, overlay button).
    pub fn trigger(&mut self, action: Action) {
        if action == Action::Quit {
            self.quit_requested = true;
        }
        self.pending.insert(action);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Edge-triggered check for keys outside the action set (e.g. F3).
    /// Cleared by `update()` along with the action latch.
    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }
}

impl InputSource for InputState {
    fn update(&mut self) {
        self.latched = std::mem::take(&mut self.pending);
        self.just_pressed.clear();
    }

    fn was_action_pressed(&self, action: Action) -> bool {
        self.latched.contains(&action)
    }

    fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_is_visible_for_exactly_one_tick() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        assert!(!input.was_action_pressed(Action::Step), "not latched yet");

        input.update();
        assert!(input.was_action_pressed(Action::Step));

        input.update();
        assert!(!input.was_action_pressed(Action::Step));
    }

    #[test]
    fn key_repeat_does_not_retrigger() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.update();
        // OS repeat while still held.
        input.key_down(Key::Space);
        input.update();
        assert!(!input.was_action_pressed(Action::Step));

        input.key_up(Key::Space);
        input.key_down(Key::Space);
        input.update();
        assert!(input.was_action_pressed(Action::Step));
    }

    #[test]
    fn digit_keys_select_characters() {
        assert_eq!(
            Key::Digit1.action(),
            Some(Action::SelectCharacter(CharacterId::Agumon))
        );
        assert_eq!(
            Key::Digit8.action(),
            Some(Action::SelectCharacter(CharacterId::Patamon))
        );
        assert_eq!(Key::F3.action(), None);
    }

    #[test]
    fn escape_requests_quit_and_stays_requested() {
        let mut input = InputState::new();
        assert!(!input.is_quit_requested());
        input.key_down(Key::Escape);
        assert!(input.is_quit_requested());
        input.update();
        input.update();
        assert!(input.is_quit_requested());
    }

    #[test]
    fn triggered_actions_latch_like_keys() {
        let mut input = InputState::new();
        input.trigger(Action::SelectCharacter(CharacterId::Biyomon));
        input.update();
        assert!(input.was_action_pressed(Action::SelectCharacter(CharacterId::Biyomon)));
        assert!(!input.was_action_pressed(Action::Step));
    }

    #[test]
    fn just_pressed_tracks_non_action_keys() {
        let mut input = InputState::new();
        input.key_down(Key::F3);
        assert!(input.is_just_pressed(Key::F3));
        assert!(input.is_held(Key::F3));
        input.update();
        assert!(!input.is_just_pressed(Key::F3));
        assert!(input.is_held(Key::F3));
    }

    #[test]
    fn actions_deserialize_from_json() {
        let parsed: Vec<Action> =
            serde_json::from_str(r#"["step", "quit", {"select": "palmon"}]"#).expect("parse");
        assert_eq!(
            parsed,
            vec![
                Action::Step,
                Action::Quit,
                Action::SelectCharacter(CharacterId::Palmon)
            ]
        );
    }
}
