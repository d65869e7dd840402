pub mod animation;
pub mod assets;
pub mod behavior;
pub mod catalog;
pub mod character;
pub mod input;
pub mod scroll;
pub mod sim;
pub mod time;

pub use animation::{AdvanceResult, Animation, AnimationCursor, AnimationFrame, Sprite};
pub use assets::{AssetProvider, LayerSource};
pub use behavior::{BehaviorState, BehaviorTick, PetBehavior};
pub use catalog::{AnimationKey, CatalogBuilder, SpriteCatalog};
pub use character::CharacterId;
pub use input::{Action, InputSource, InputState, Key};
pub use scroll::{ScrollLayer, LAYER_COUNT, MAX_EFFECTIVE_WIDTH};
pub use sim::{InputOutcome, PetSim, SimConfig, SimSnapshot};
pub use time::FrameClock;
