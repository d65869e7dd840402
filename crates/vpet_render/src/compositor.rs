//! Draws the pet scene back to front.
//!
//! Layer tiles are blitted with explicit clipping against the viewport. The
//! pet sprite is drawn centered and relies on the display's own clipping.

use vpet_core::{PetSim, ScrollLayer, Sprite};

use crate::display::{Display, PixelBlit, Viewport};

/// Back-to-front order of the layers drawn behind the pet.
pub const BACK_LAYERS: [usize; 2] = [2, 1];
/// The layer drawn in front of the pet.
pub const FRONT_LAYER: usize = 0;

/// The visible part of a tile blitted at the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedRect {
    pub dest_x: i32,
    pub dest_y: i32,
    pub width: i32,
    pub height: i32,
    pub source_x: i32,
    pub source_y: i32,
}

/// Clip a tile placed at `(dest_x, 0)` to the viewport.
///
/// Returns `None` when nothing of the tile is visible.
pub fn clip_tile(
    dest_x: i32,
    tile_width: i32,
    tile_height: i32,
    viewport: Viewport,
) -> Option<ClippedRect> {
    if tile_width <= 0 || tile_height <= 0 {
        return None;
    }

    let mut rect = ClippedRect {
        dest_x,
        dest_y: 0,
        width: tile_width,
        height: tile_height,
        source_x: 0,
        source_y: 0,
    };

    if rect.dest_x < 0 {
        let clip = -rect.dest_x;
        if clip >= tile_width {
            return None;
        }
        rect.source_x += clip;
        rect.width -= clip;
        rect.dest_x = 0;
    }

    let overhang = rect.dest_x + rect.width - viewport.width;
    if overhang > 0 {
        if overhang >= tile_width {
            return None;
        }
        rect.width -= overhang;
    }

    let overhang = rect.height - viewport.height;
    if overhang > 0 {
        if overhang >= tile_height {
            return None;
        }
        rect.height -= overhang;
    }

    (rect.width > 0 && rect.height > 0).then_some(rect)
}

/// Blit the visible part of `tile` at `(dest_x, 0)`. Returns whether anything
/// was drawn.
pub fn blit_tile(display: &mut dyn Display, dest_x: i32, tile: &Sprite, viewport: Viewport) -> bool {
    let Some(rect) = clip_tile(dest_x, tile.width() as i32, tile.height() as i32, viewport) else {
        return false;
    };
    display.draw_pixels(&PixelBlit {
        dest_x: rect.dest_x,
        dest_y: rect.dest_y,
        width: rect.width,
        height: rect.height,
        source: tile,
        source_x: rect.source_x,
        source_y: rect.source_y,
    });
    true
}

/// Both copies of a layer's tile, one effective width apart.
pub fn draw_layer(display: &mut dyn Display, layer: &ScrollLayer, viewport: Viewport) {
    for x in layer.draw_positions() {
        blit_tile(display, x, &layer.tile, viewport);
    }
}

/// Top-left corner that centers a `width` x `height` sprite.
pub fn centered_origin(width: u32, height: u32, viewport: Viewport) -> (i32, i32) {
    (
        viewport.width / 2 - width as i32 / 2,
        viewport.height / 2 - height as i32 / 2,
    )
}

pub fn draw_sprite_centered(display: &mut dyn Display, sprite: &Sprite, viewport: Viewport) {
    let (x, y) = centered_origin(sprite.width(), sprite.height(), viewport);
    display.draw_pixels(&PixelBlit::whole(sprite, x, y));
}

/// Compose one full frame: far layers, the pet, then the foreground.
pub fn render_scene(display: &mut dyn Display, sim: &PetSim, clear_color: u16) {
    let viewport = display.viewport();
    let layers = sim.layers();

    display.clear(clear_color);
    for index in BACK_LAYERS {
        draw_layer(display, &layers[index], viewport);
    }
    if let Some(sprite) = sim.current_frame() {
        draw_sprite_centered(display, sprite, viewport);
    }
    draw_layer(display, &layers[FRONT_LAYER], viewport);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use std::sync::Arc;
    use vpet_core::{
        Action, Animation, BehaviorState, CatalogBuilder, CharacterId, InputSource, InputState,
        SimConfig,
    };

    #[derive(Debug, Clone, PartialEq)]
    struct Recorded {
        dest: (i32, i32),
        size: (i32, i32),
        source_origin: (i32, i32),
        first_pixel: u16,
    }

    struct RecordingDisplay {
        viewport: Viewport,
        clears: Vec<u16>,
        blits: Vec<Recorded>,
    }

    impl RecordingDisplay {
        fn new(width: i32, height: i32) -> Self {
            Self {
                viewport: Viewport::new(width, height),
                clears: Vec::new(),
                blits: Vec::new(),
            }
        }
    }

    impl Display for RecordingDisplay {
        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn clear(&mut self, color: u16) {
            self.clears.push(color);
        }

        fn draw_pixels(&mut self, blit: &PixelBlit<'_>) {
            self.blits.push(Recorded {
                dest: (blit.dest_x, blit.dest_y),
                size: (blit.width, blit.height),
                source_origin: (blit.source_x, blit.source_y),
                first_pixel: blit.source.pixels()[0],
            });
        }

        fn present(&mut self) -> Result<(), RenderError> {
            Ok(())
        }
    }

    #[test]
    fn left_and_right_overhang_are_both_clipped() {
        let rect = clip_tile(-5, 100, 10, Viewport::new(50, 50)).expect("visible");
        assert_eq!(
            rect,
            ClippedRect {
                dest_x: 0,
                dest_y: 0,
                width: 50,
                height: 10,
                source_x: 5,
                source_y: 0,
            }
        );
    }

    #[test]
    fn tile_entirely_off_the_left_is_skipped() {
        assert_eq!(clip_tile(-200, 100, 10, Viewport::new(50, 50)), None);
        assert_eq!(clip_tile(-100, 100, 10, Viewport::new(50, 50)), None);
        assert!(clip_tile(-99, 100, 10, Viewport::new(50, 50)).is_some());
    }

    #[test]
    fn tile_starting_at_or_past_the_right_edge_is_skipped() {
        let vp = Viewport::new(466, 466);
        assert_eq!(clip_tile(466, 466, 466, vp), None);
        assert_eq!(clip_tile(530, 466, 466, vp), None);
        let rect = clip_tile(465, 466, 466, vp).expect("one column");
        assert_eq!((rect.dest_x, rect.width), (465, 1));
    }

    #[test]
    fn tall_tiles_are_clipped_at_the_bottom() {
        let rect = clip_tile(0, 20, 80, Viewport::new(50, 50)).expect("visible");
        assert_eq!((rect.width, rect.height), (20, 50));
    }

    #[test]
    fn degenerate_viewport_draws_nothing() {
        assert_eq!(clip_tile(0, 20, 20, Viewport::new(0, 50)), None);
        assert_eq!(clip_tile(0, 20, 20, Viewport::new(50, 0)), None);
        assert_eq!(clip_tile(0, 0, 20, Viewport::new(50, 50)), None);
    }

    #[test]
    fn sprite_is_centered() {
        assert_eq!(centered_origin(64, 64, Viewport::new(466, 466)), (201, 201));
        assert_eq!(centered_origin(5, 3, Viewport::new(10, 10)), (3, 4));
    }

    fn scene() -> PetSim {
        let mut builder = CatalogBuilder::new();
        for &character in CharacterId::ALL {
            let sprite = Sprite::filled(16, 16, 0x0100);
            builder
                .insert(
                    character,
                    BehaviorState::Idle,
                    Animation::new(true).with_frame(sprite.clone(), 1000),
                )
                .insert(
                    character,
                    BehaviorState::Walking,
                    Animation::new(false).with_frame(sprite, 300),
                );
        }
        let layers = [
            ScrollLayer::new(Sprite::filled(60, 60, 0x0000), 60, 3.0),
            ScrollLayer::new(Sprite::filled(60, 60, 0x0001), 60, 1.0),
            ScrollLayer::new(Sprite::filled(60, 60, 0x0002), 60, 0.5),
        ];
        PetSim::new(Arc::new(builder.build()), layers, SimConfig::default(), 0)
    }

    #[test]
    fn scene_is_drawn_back_to_front() {
        let sim = scene();
        let mut display = RecordingDisplay::new(50, 50);
        render_scene(&mut display, &sim, 0xFFFF);

        assert_eq!(display.clears, vec![0xFFFF]);
        let order: Vec<u16> = display.blits.iter().map(|b| b.first_pixel).collect();
        // At offset 0 the second copy of each layer starts past the right edge.
        assert_eq!(order, vec![0x0002, 0x0001, 0x0100, 0x0000]);
        assert_eq!(display.blits[2].dest, (17, 17));
        assert_eq!(display.blits[3].size, (50, 50));
    }

    #[test]
    fn scrolled_layers_draw_both_copies() {
        let mut sim = scene();
        let mut display = RecordingDisplay::new(50, 50);
        let mut input = InputState::new();
        input.trigger(Action::Step);
        input.update();
        sim.apply_input(&input, 0);
        sim.update(0);

        render_scene(&mut display, &sim, 0);
        let front: Vec<&Recorded> = display
            .blits
            .iter()
            .filter(|b| b.first_pixel == 0x0000)
            .collect();
        // Foreground offset is 57: copies at -57 and 3.
        assert_eq!(front.len(), 2);
        assert_eq!(front[0].dest, (0, 0));
        assert_eq!(front[0].source_origin, (57, 0));
        assert_eq!(front[0].size, (3, 50));
        assert_eq!(front[1].dest, (3, 0));
        assert_eq!(front[1].size, (47, 50));
    }
}
