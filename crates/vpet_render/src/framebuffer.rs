use crate::color::{rgb565_to_argb8888, KEY_COLOR};
use crate::display::{Display, PixelBlit, Viewport};
use crate::error::RenderError;

/// CPU-side ARGB8888 back buffer.
///
/// Serves as the headless display on its own and as the staging buffer the
/// window display uploads every frame.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    frames_presented: u64,
    closed: bool,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0xFF00_0000; width as usize * height as usize],
            frames_presented: 0,
            closed: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major ARGB8888 pixels.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Display for FrameBuffer {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.width as i32, self.height as i32)
    }

    fn clear(&mut self, color: u16) {
        self.pixels.fill(rgb565_to_argb8888(color));
    }

    fn draw_pixels(&mut self, blit: &PixelBlit<'_>) {
        let fb_w = self.width as i32;
        let fb_h = self.height as i32;
        let src_w = blit.source.width() as i32;
        let src_h = blit.source.height() as i32;

        let (mut dx, mut dy) = (blit.dest_x, blit.dest_y);
        let (mut sx, mut sy) = (blit.source_x, blit.source_y);
        let (mut w, mut h) = (blit.width, blit.height);

        if dx < 0 {
            w += dx;
            sx -= dx;
            dx = 0;
        }
        if dy < 0 {
            h += dy;
            sy -= dy;
            dy = 0;
        }
        w = w.min(fb_w - dx);
        h = h.min(fb_h - dy);
        if w <= 0 || h <= 0 {
            return;
        }

        for row in 0..h {
            let src_y = sy + row;
            if src_y < 0 || src_y >= src_h {
                continue;
            }
            let dest_row = ((dy + row) * fb_w) as usize;
            let src_row = (src_y * src_w) as usize;
            for col in 0..w {
                let src_x = sx + col;
                if src_x < 0 || src_x >= src_w {
                    continue;
                }
                let color = blit.source.pixels()[src_row + src_x as usize];
                if color == KEY_COLOR {
                    continue;
                }
                self.pixels[dest_row + (dx + col) as usize] = rgb565_to_argb8888(color);
            }
        }
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if self.closed {
            return Err(RenderError::Closed);
        }
        self.frames_presented += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vpet_core::Sprite;

    const RED: u16 = 0xF800;
    const BLUE: u16 = 0x001F;

    #[test]
    fn clear_fills_with_expanded_color() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.clear(RED);
        assert!(fb.pixels().iter().all(|&p| p == 0xFFFF_0000));
    }

    #[test]
    fn key_color_pixels_are_skipped() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.clear(BLUE);
        let sprite = Sprite::new(2, 1, vec![KEY_COLOR, RED]).unwrap();
        fb.draw_pixels(&PixelBlit::whole(&sprite, 0, 0));
        assert_eq!(fb.pixel(0, 0), Some(0xFF00_00FF));
        assert_eq!(fb.pixel(1, 0), Some(0xFFFF_0000));
    }

    #[test]
    fn blit_is_clipped_on_every_side() {
        let mut fb = FrameBuffer::new(4, 4);
        let sprite = Sprite::filled(3, 3, RED);
        fb.draw_pixels(&PixelBlit::whole(&sprite, -2, -2));
        fb.draw_pixels(&PixelBlit::whole(&sprite, 3, 3));
        assert_eq!(fb.pixel(0, 0), Some(0xFFFF_0000));
        assert_eq!(fb.pixel(1, 0), Some(0xFF00_0000));
        assert_eq!(fb.pixel(3, 3), Some(0xFFFF_0000));
        assert_eq!(fb.pixel(2, 3), Some(0xFF00_0000));
    }

    #[test]
    fn source_offset_selects_pixels() {
        let mut fb = FrameBuffer::new(1, 1);
        let sprite = Sprite::new(2, 2, vec![0, 0, 0, RED]).unwrap();
        fb.draw_pixels(&PixelBlit {
            dest_x: 0,
            dest_y: 0,
            width: 1,
            height: 1,
            source: &sprite,
            source_x: 1,
            source_y: 1,
        });
        assert_eq!(fb.pixel(0, 0), Some(0xFFFF_0000));
    }

    #[test]
    fn oversized_source_rect_reads_nothing_out_of_bounds() {
        let mut fb = FrameBuffer::new(8, 8);
        let sprite = Sprite::filled(2, 2, RED);
        fb.draw_pixels(&PixelBlit {
            dest_x: 0,
            dest_y: 0,
            width: 8,
            height: 8,
            source: &sprite,
            source_x: 1,
            source_y: 0,
        });
        assert_eq!(fb.pixel(0, 1), Some(0xFFFF_0000));
        assert_eq!(fb.pixel(1, 0), Some(0xFF00_0000));
    }

    #[test]
    fn present_after_close_fails() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.present().unwrap();
        assert_eq!(fb.frames_presented(), 1);
        fb.close();
        assert!(fb.is_closed());
        assert!(matches!(fb.present(), Err(RenderError::Closed)));
    }
}
