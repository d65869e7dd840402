//! Procedurally drawn stand-in art, used when no asset manifest is found.
//!
//! Frame timings and layer speeds are the stock values, so behavior is the
//! same as with real art; only the pixels differ.

use vpet_core::{Animation, AssetProvider, BehaviorState, CharacterId, LayerSource, Sprite};
use vpet_render::KEY_COLOR;

pub const PLACEHOLDER_EFFECTIVE_WIDTH: u32 = 947;
/// Front to back.
pub const PLACEHOLDER_SCROLL_SPEEDS: [f32; 3] = [3.0, 1.0, 0.5];

const PET_SIZE: u32 = 48;
const BLACK: u16 = 0x0000;
const GROUND: u16 = 0x8A22;
const GRASS: u16 = 0x2C84;
const HILLS: u16 = 0x3D8A;
const CLOUD: u16 = 0xEF7D;

/// `(idle frame ms, walk frame ms)` per character.
pub fn frame_timings(character: CharacterId) -> (u64, u64) {
    match character {
        CharacterId::Agumon => (1000, 300),
        CharacterId::Gabumon => (1100, 320),
        CharacterId::Biyomon => (960, 280),
        CharacterId::Gatomon => (1200, 340),
        CharacterId::Gomamon => (1040, 310),
        CharacterId::Palmon => (1080, 330),
        CharacterId::Tentomon => (920, 290),
        CharacterId::Patamon => (1060, 300),
    }
}

fn body_color(character: CharacterId) -> u16 {
    match character {
        CharacterId::Agumon => 0xFD20,
        CharacterId::Gabumon => 0x5D1F,
        CharacterId::Biyomon => 0xFB56,
        CharacterId::Gatomon => 0xFFDB,
        CharacterId::Gomamon => 0xE73C,
        CharacterId::Palmon => 0x87E0,
        CharacterId::Tentomon => 0xA145,
        CharacterId::Patamon => 0xFDA0,
    }
}

fn paint(width: u32, height: u32, color_at: impl Fn(i32, i32) -> u16) -> Sprite {
    Sprite::from_fn(width, height, |x, y| color_at(x as i32, y as i32))
}

/// A round body with eyes; `pose` 1 bobs down a pixel and swaps the lifted foot.
fn pet_frame(character: CharacterId, pose: u8) -> Sprite {
    let body = body_color(character);
    let bob = i32::from(pose);
    let (cx, cy, r) = (24, 22 + bob, 17);
    paint(PET_SIZE, PET_SIZE, |x, y| {
        let (dx, dy) = (x - cx, y - cy);
        let eye = (dy == -4 || dy == -5) && (dx == -6 || dx == -5 || dx == 5 || dx == 6);
        if dx * dx + dy * dy <= r * r {
            return if eye { BLACK } else { body };
        }
        let foot_row = (40 + bob..44 + bob).contains(&y);
        let foot = if pose == 0 { 13..20 } else { 28..35 };
        if foot_row && foot.contains(&x) {
            body
        } else {
            KEY_COLOR
        }
    })
}

/// Stand-in art sized for a `width` x `height` viewport.
pub struct PlaceholderAssets {
    width: u32,
    height: u32,
}

impl PlaceholderAssets {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    fn ground(&self) -> Sprite {
        let h = self.height as i32;
        let top = h - h / 6;
        paint(self.width, self.height, |x, y| {
            if y >= top {
                GROUND
            } else if y >= top - 3 && x % 11 < 2 {
                GRASS
            } else {
                KEY_COLOR
            }
        })
    }

    fn hills(&self) -> Sprite {
        let w = self.width as f32;
        let h = self.height as f32;
        paint(self.width, self.height, |x, y| {
            let phase = x as f32 / w * std::f32::consts::TAU;
            let crest = h * 0.55 + (phase.sin() * 0.08 + (phase * 2.0).cos() * 0.04) * h;
            if y as f32 >= crest {
                HILLS
            } else {
                KEY_COLOR
            }
        })
    }

    fn clouds(&self) -> Sprite {
        let w = self.width as i32;
        let h = self.height as i32;
        let puffs = [(w / 5, h / 6, 18), (w / 2, h / 9, 24), (w * 4 / 5, h / 5, 14)];
        paint(self.width, self.height, |x, y| {
            let cloud = puffs.iter().any(|&(cx, cy, r)| {
                let dx = (x - cx) / 2;
                let dy = y - cy;
                dx * dx + dy * dy <= r * r
            });
            if cloud {
                CLOUD
            } else {
                KEY_COLOR
            }
        })
    }
}

impl AssetProvider for PlaceholderAssets {
    fn animation(
        &self,
        character: CharacterId,
        behavior: BehaviorState,
    ) -> Result<Animation, String> {
        let (idle_ms, walk_ms) = frame_timings(character);
        let a = pet_frame(character, 0);
        let b = pet_frame(character, 1);
        Ok(match behavior {
            BehaviorState::Idle => Animation::new(true)
                .with_frame(a, idle_ms)
                .with_frame(b, idle_ms),
            BehaviorState::Walking => Animation::new(false)
                .with_frame(a.clone(), walk_ms)
                .with_frame(b.clone(), walk_ms)
                .with_frame(a, walk_ms)
                .with_frame(b, walk_ms),
        })
    }

    fn layer(&self, index: usize) -> Result<LayerSource, String> {
        let tile = match index {
            0 => self.ground(),
            1 => self.hills(),
            2 => self.clouds(),
            _ => return Err(format!("Placeholder assets have no layer {}", index)),
        };
        Ok(LayerSource {
            effective_width: PLACEHOLDER_EFFECTIVE_WIDTH.max(tile.width()),
            tile,
            scroll_speed: PLACEHOLDER_SCROLL_SPEEDS[index],
        })
    }
}
