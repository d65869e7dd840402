//! RGB565 pixel helpers.
//!
//! Asset pixels are packed 5-6-5. The display side works in ARGB8888, and one
//! RGB565 value is reserved as the transparency key.

/// Magenta. Pixels with this value are never composited.
pub const KEY_COLOR: u16 = 0xF81F;

/// Alpha below this turns a source pixel into [`KEY_COLOR`] on import.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Expand a packed RGB565 color to opaque ARGB8888.
pub fn rgb565_to_argb8888(color: u16) -> u32 {
    let color = u32::from(color);
    let r = expand_channel((color & 0xF800) >> 11, 31);
    let g = expand_channel((color & 0x07E0) >> 5, 63);
    let b = expand_channel(color & 0x001F, 31);
    0xFF00_0000 | (r << 16) | (g << 8) | b
}

/// Pack an RGBA8 pixel into RGB565, mapping translucent pixels to the key.
pub fn rgba8_to_rgb565(r: u8, g: u8, b: u8, a: u8) -> u16 {
    if a < ALPHA_THRESHOLD {
        return KEY_COLOR;
    }
    (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3)
}

// round(value * 255 / max)
fn expand_channel(value: u32, max: u32) -> u32 {
    (value * 255 + max / 2) / max
}
