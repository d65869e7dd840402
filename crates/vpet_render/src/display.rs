//! The pixel sink the compositor draws into.
//!
//! A [`Display`] accepts RGB565 pixel blits and turns them into something
//! visible. The window backend uploads to the GPU; the headless backend just
//! keeps the pixels in memory.

use vpet_core::Sprite;

use crate::error::RenderError;

/// Drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// One rectangular copy out of a sprite.
///
/// `source_x`/`source_y` select the top-left source pixel that lands on
/// `dest_x`/`dest_y`. Row stride comes from `source.width()`.
#[derive(Debug, Clone, Copy)]
pub struct PixelBlit<'a> {
    pub dest_x: i32,
    pub dest_y: i32,
    pub width: i32,
    pub height: i32,
    pub source: &'a Sprite,
    pub source_x: i32,
    pub source_y: i32,
}

impl<'a> PixelBlit<'a> {
    /// Copy the whole sprite with its top-left corner at `(dest_x, dest_y)`.
    pub fn whole(source: &'a Sprite, dest_x: i32, dest_y: i32) -> Self {
        Self {
            dest_x,
            dest_y,
            width: source.width() as i32,
            height: source.height() as i32,
            source,
            source_x: 0,
            source_y: 0,
        }
    }
}

pub trait Display {
    fn viewport(&self) -> Viewport;

    /// Fill the whole back buffer with one color.
    fn clear(&mut self, color: u16);

    /// Copy pixels into the back buffer, skipping [`crate::KEY_COLOR`].
    ///
    /// Implementations must tolerate blits that fall partly or wholly outside
    /// the viewport or the source sprite.
    fn draw_pixels(&mut self, blit: &PixelBlit<'_>);

    /// Make the back buffer visible.
    fn present(&mut self) -> Result<(), RenderError>;

    /// Release backend resources. Presenting after this is an error.
    fn close(&mut self) {}
}
