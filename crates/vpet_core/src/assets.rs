//! The seam between the engine and wherever pixel art comes from.
//!
//! Providers hand over finished [`Animation`]s and layer tiles; the engine
//! never looks at file formats.

use crate::animation::{Animation, Sprite};
use crate::behavior::BehaviorState;
use crate::catalog::{CatalogBuilder, SpriteCatalog};
use crate::character::CharacterId;
use crate::scroll::{ScrollLayer, LAYER_COUNT};

/// One background layer as supplied by an asset provider.
#[derive(Debug, Clone)]
pub struct LayerSource {
    pub tile: Sprite,
    pub effective_width: u32,
    pub scroll_speed: f32,
}

pub trait AssetProvider {
    fn animation(
        &self,
        character: CharacterId,
        behavior: BehaviorState,
    ) -> Result<Animation, String>;

    /// `index` 0 is the foreground layer, `LAYER_COUNT - 1` the farthest back.
    fn layer(&self, index: usize) -> Result<LayerSource, String>;
}

/// Pull every character's idle and walk clips into an immutable catalog.
pub fn build_catalog(provider: &dyn AssetProvider) -> Result<SpriteCatalog, String> {
    let mut builder = CatalogBuilder::new();
    for &character in CharacterId::ALL {
        for behavior in [BehaviorState::Idle, BehaviorState::Walking] {
            let animation = provider.animation(character, behavior)?;
            builder.insert(character, behavior, animation);
        }
    }
    let catalog = builder.build();
    log::info!("Sprite catalog built: {} animations", catalog.len());
    Ok(catalog)
}

pub fn build_layers(provider: &dyn AssetProvider) -> Result<[ScrollLayer; LAYER_COUNT], String> {
    let make = |index: usize| -> Result<ScrollLayer, String> {
        let source = provider.layer(index)?;
        Ok(ScrollLayer::new(
            source.tile,
            source.effective_width,
            source.scroll_speed,
        ))
    };
    Ok([make(0)?, make(1)?, make(2)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlatAssets;

    impl AssetProvider for FlatAssets {
        fn animation(
            &self,
            character: CharacterId,
            behavior: BehaviorState,
        ) -> Result<Animation, String> {
            let sprite = Sprite::filled(4, 4, character.slot() as u16);
            Ok(Animation::new(behavior == BehaviorState::Idle).with_frame(sprite, 100))
        }

        fn layer(&self, index: usize) -> Result<LayerSource, String> {
            if index >= LAYER_COUNT {
                return Err(format!("no layer {}", index));
            }
            Ok(LayerSource {
                tile: Sprite::filled(20, 10, index as u16),
                effective_width: 30 + index as u32,
                scroll_speed: 1.0,
            })
        }
    }

    struct BrokenAssets;

    impl AssetProvider for BrokenAssets {
        fn animation(&self, character: CharacterId, _: BehaviorState) -> Result<Animation, String> {
            Err(format!("missing frames for {}", character))
        }

        fn layer(&self, _: usize) -> Result<LayerSource, String> {
            Err("missing layer".to_string())
        }
    }

    #[test]
    fn catalog_covers_every_character_and_behavior() {
        let catalog = build_catalog(&FlatAssets).expect("catalog");
        assert_eq!(catalog.len(), CharacterId::ALL.len() * 2);
    }

    #[test]
    fn layers_keep_provider_order() {
        let layers = build_layers(&FlatAssets).expect("layers");
        assert_eq!(layers[0].effective_width(), 30);
        assert_eq!(layers[2].effective_width(), 32);
        assert_eq!(layers[1].tile.pixels()[0], 1);
    }

    #[test]
    fn provider_errors_propagate() {
        let err = build_catalog(&BrokenAssets).err().expect("should fail");
        assert!(err.contains("Agumon"));
        assert!(build_layers(&BrokenAssets).is_err());
    }
}
