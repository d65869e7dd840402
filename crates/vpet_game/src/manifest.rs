//! JSON asset manifest: per-character clips and the three background layers,
//! all as PNG files decoded to RGB565 at load time.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use vpet_core::{
    Animation, AssetProvider, BehaviorState, CharacterId, LayerSource, Sprite, LAYER_COUNT,
    MAX_EFFECTIVE_WIDTH,
};
use vpet_render::rgba8_to_rgb565;

pub const MANIFEST_VERSION: &str = "0.1";

#[derive(Debug, Deserialize, Clone)]
pub struct AssetManifest {
    pub version: String,
    pub characters: HashMap<CharacterId, CharacterClips>,
    /// Front to back: index 0 is drawn over the pet.
    pub layers: Vec<LayerEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CharacterClips {
    pub idle: ClipEntry,
    pub walk: ClipEntry,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClipEntry {
    /// Defaults to `true` for idle clips and `false` for walk clips.
    #[serde(default)]
    pub looping: Option<bool>,
    pub frames: Vec<FrameEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FrameEntry {
    pub image: PathBuf,
    pub duration_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LayerEntry {
    pub image: PathBuf,
    pub effective_width: u32,
    pub scroll_speed: f32,
}

impl AssetManifest {
    fn clip(&self, character: CharacterId, behavior: BehaviorState) -> Option<&ClipEntry> {
        self.characters.get(&character).map(|clips| match behavior {
            BehaviorState::Idle => &clips.idle,
            BehaviorState::Walking => &clips.walk,
        })
    }

    fn image_paths(&self) -> impl Iterator<Item = &Path> {
        self.characters
            .values()
            .flat_map(|clips| clips.idle.frames.iter().chain(&clips.walk.frames))
            .map(|frame| frame.image.as_path())
            .chain(self.layers.iter().map(|layer| layer.image.as_path()))
    }
}

/// A validated manifest with every referenced image already decoded.
pub struct ManifestAssets {
    manifest: AssetManifest,
    sprites: HashMap<PathBuf, Sprite>,
}

impl ManifestAssets {
    /// Parse, validate and decode. Image paths resolve against the manifest's
    /// directory.
    pub fn load(path: &Path) -> Result<Self, String> {
        let manifest = load_manifest_from_path(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

        let unique: HashSet<&Path> = manifest.image_paths().collect();
        let mut sprites = HashMap::with_capacity(unique.len());
        for image in unique {
            let sprite = load_sprite_from_path(&base_dir.join(image))?;
            sprites.insert(image.to_path_buf(), sprite);
        }

        let assets = Self { manifest, sprites };
        assets.validate_layer_widths()?;
        log::info!(
            "Loaded asset manifest {} ({} images)",
            path.display(),
            assets.sprites.len()
        );
        Ok(assets)
    }

    fn sprite(&self, image: &Path) -> Result<Sprite, String> {
        self.sprites
            .get(image)
            .cloned()
            .ok_or_else(|| format!("Image {} was not decoded", image.display()))
    }

    fn validate_layer_widths(&self) -> Result<(), String> {
        for (index, layer) in self.manifest.layers.iter().enumerate() {
            let tile = self.sprite(&layer.image)?;
            if layer.effective_width < tile.width() {
                return Err(format!(
                    "Manifest validation failed: layer {} effective_width {} is narrower than its {}px tile",
                    index,
                    layer.effective_width,
                    tile.width()
                ));
            }
        }
        Ok(())
    }
}

impl AssetProvider for ManifestAssets {
    fn animation(
        &self,
        character: CharacterId,
        behavior: BehaviorState,
    ) -> Result<Animation, String> {
        let clip = self
            .manifest
            .clip(character, behavior)
            .ok_or_else(|| format!("Manifest has no clips for {}", character))?;
        let looping = clip.looping.unwrap_or(behavior == BehaviorState::Idle);
        let mut animation = Animation::new(looping);
        for frame in &clip.frames {
            animation = animation.with_frame(self.sprite(&frame.image)?, frame.duration_ms);
        }
        Ok(animation)
    }

    fn layer(&self, index: usize) -> Result<LayerSource, String> {
        let layer = self
            .manifest
            .layers
            .get(index)
            .ok_or_else(|| format!("Manifest has no layer {}", index))?;
        Ok(LayerSource {
            tile: self.sprite(&layer.image)?,
            effective_width: layer.effective_width,
            scroll_speed: layer.scroll_speed,
        })
    }
}

pub fn load_manifest_from_path(path: &Path) -> Result<AssetManifest, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read asset manifest {}: {e}", path.display()))?;
    let manifest: AssetManifest = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse asset manifest {}: {e}", path.display()))?;
    validate_manifest(&manifest)?;
    Ok(manifest)
}

fn validate_manifest(manifest: &AssetManifest) -> Result<(), String> {
    if manifest.version != MANIFEST_VERSION {
        return Err(format!(
            "Manifest validation failed: unsupported version '{}'",
            manifest.version
        ));
    }

    for &character in CharacterId::ALL {
        let clips = manifest.characters.get(&character).ok_or_else(|| {
            format!("Manifest validation failed: character '{}' is missing", character)
        })?;
        for (name, clip) in [("idle", &clips.idle), ("walk", &clips.walk)] {
            if clip.frames.is_empty() {
                return Err(format!(
                    "Manifest validation failed: {} {} clip has no frames",
                    character, name
                ));
            }
            if clip.frames.iter().any(|frame| frame.duration_ms == 0) {
                return Err(format!(
                    "Manifest validation failed: {} {} clip has a zero duration frame",
                    character, name
                ));
            }
        }
    }

    if manifest.layers.len() != LAYER_COUNT {
        return Err(format!(
            "Manifest validation failed: expected {} layers, found {}",
            LAYER_COUNT,
            manifest.layers.len()
        ));
    }
    for (index, layer) in manifest.layers.iter().enumerate() {
        if layer.effective_width == 0 {
            return Err(format!(
                "Manifest validation failed: layer {} effective_width must be > 0",
                index
            ));
        }
        if layer.effective_width > MAX_EFFECTIVE_WIDTH {
            return Err(format!(
                "Manifest validation failed: layer {} effective_width {} exceeds {}",
                index, layer.effective_width, MAX_EFFECTIVE_WIDTH
            ));
        }
        if !layer.scroll_speed.is_finite() {
            return Err(format!(
                "Manifest validation failed: layer {} scroll_speed is not finite",
                index
            ));
        }
    }

    Ok(())
}

/// Decode an image file into an RGB565 sprite. Pixels with alpha below half
/// become the transparency key.
pub fn load_sprite_from_path(path: &Path) -> Result<Sprite, String> {
    let image = image::open(path)
        .map_err(|e| format!("Failed to decode image {}: {e}", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(format!("Image {} is empty", path.display()));
    }
    let pixels = image
        .pixels()
        .map(|p| rgba8_to_rgb565(p[0], p[1], p[2], p[3]))
        .collect();
    Sprite::new(width, height, pixels)
}
