//! The single owner of all mutable pet state: behavior, animation cursor and
//! scroll offsets. Assets are shared read-only through the catalog `Arc` and
//! the layer tiles.

use std::sync::Arc;

use crate::animation::Sprite;
use crate::behavior::{BehaviorState, BehaviorTick, PetBehavior, DEFAULT_MAX_QUEUED_STEPS};
use crate::catalog::SpriteCatalog;
use crate::character::CharacterId;
use crate::input::{Action, InputSource};
use crate::scroll::{ScrollLayer, LAYER_COUNT};

#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    pub starting_character: CharacterId,
    pub max_queued_steps: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_character: CharacterId::default(),
            max_queued_steps: DEFAULT_MAX_QUEUED_STEPS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Continue,
    Quit,
}

/// Read-only view of the simulation for overlays and logs.
#[derive(Debug, Clone, Default)]
pub struct SimSnapshot {
    pub state: BehaviorState,
    pub character: CharacterId,
    pub queued_steps: u8,
    pub max_queued_steps: u8,
    pub frame_index: usize,
    pub layer_offsets: [f32; LAYER_COUNT],
}

pub struct PetSim {
    catalog: Arc<SpriteCatalog>,
    behavior: PetBehavior,
    layers: [ScrollLayer; LAYER_COUNT],
}

impl PetSim {
    pub fn new(
        catalog: Arc<SpriteCatalog>,
        layers: [ScrollLayer; LAYER_COUNT],
        config: SimConfig,
        now_ms: u64,
    ) -> Self {
        Self {
            catalog,
            behavior: PetBehavior::new(config.starting_character, config.max_queued_steps, now_ms),
            layers,
        }
    }

    pub fn behavior(&self) -> &PetBehavior {
        &self.behavior
    }

    /// Index 0 is the foreground layer, 2 the farthest back.
    pub fn layers(&self) -> &[ScrollLayer; LAYER_COUNT] {
        &self.layers
    }

    /// Apply one latched tick of input. Quit short-circuits everything else,
    /// and only the first character selection in slot order is honored.
    pub fn apply_input(&mut self, input: &dyn InputSource, now_ms: u64) -> InputOutcome {
        if input.is_quit_requested() || input.was_action_pressed(Action::Quit) {
            return InputOutcome::Quit;
        }

        if input.was_action_pressed(Action::Step) {
            self.behavior.request_step();
        }

        if let Some(&character) = CharacterId::ALL
            .iter()
            .find(|&&c| input.was_action_pressed(Action::SelectCharacter(c)))
        {
            self.behavior.select_character(character, now_ms);
        }

        InputOutcome::Continue
    }

    /// Advance transitions, scrolling and animation for one tick.
    pub fn update(&mut self, now_ms: u64) -> BehaviorTick {
        let tick = self.behavior.update(&self.catalog, now_ms);
        if tick.walking {
            for layer in &mut self.layers {
                layer.advance();
            }
        }
        tick
    }

    /// The sprite the pet shows right now, if the active animation has one.
    pub fn current_frame(&self) -> Option<&Sprite> {
        self.catalog
            .get(self.behavior.active_key())
            .frame(self.behavior.cursor().frame_index)
            .map(|frame| &frame.sprite)
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            state: self.behavior.state(),
            character: self.behavior.character(),
            queued_steps: self.behavior.queued_steps(),
            max_queued_steps: self.behavior.max_queued_steps(),
            frame_index: self.behavior.cursor().frame_index,
            layer_offsets: [
                self.layers[0].offset(),
                self.layers[1].offset(),
                self.layers[2].offset(),
            ],
        }
    }
}
