//! Parallax background layers with seam-free horizontal wraparound.
//!
//! Each layer scrolls over an *effective width* that may be wider than its
//! tile, leaving a deliberate gap (or overlap) between repeats. The tile is
//! drawn twice, at `-floor(offset)` and one effective width to the right of
//! that, so the viewport is always covered.

use crate::animation::Sprite;

/// Number of background layers: 0 is drawn in front of the pet, 1 and 2 behind.
pub const LAYER_COUNT: usize = 3;

/// Widest scroll period a layer may use. Past 2^24 an `f32` offset can no
/// longer represent every whole pixel and scrolling stalls.
pub const MAX_EFFECTIVE_WIDTH: u32 = 1 << 24;

#[derive(Debug, Clone)]
pub struct ScrollLayer {
    pub tile: Sprite,
    pub speed: f32,
    offset: f32,
    effective_width: u32,
}

impl ScrollLayer {
    /// `effective_width` below the tile width is raised to the tile width and
    /// anything above [`MAX_EFFECTIVE_WIDTH`] is lowered to it.
    pub fn new(tile: Sprite, effective_width: u32, speed: f32) -> Self {
        let min_width = tile.width().clamp(1, MAX_EFFECTIVE_WIDTH);
        let effective_width = if effective_width < min_width {
            log::warn!(
                "Scroll layer effective width {} is narrower than its {}px tile, using {}",
                effective_width,
                tile.width(),
                min_width
            );
            min_width
        } else if effective_width > MAX_EFFECTIVE_WIDTH {
            log::warn!(
                "Scroll layer effective width {} exceeds {}, clamping",
                effective_width,
                MAX_EFFECTIVE_WIDTH
            );
            MAX_EFFECTIVE_WIDTH
        } else {
            effective_width
        };

        Self {
            tile,
            speed,
            offset: 0.0,
            effective_width,
        }
    }

    /// Current offset, always in `[0, effective_width)`.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn effective_width(&self) -> u32 {
        self.effective_width
    }

    /// Move the layer one tick's worth of `speed` and wrap.
    pub fn advance(&mut self) {
        self.offset = wrap_offset(self.offset - self.speed, self.effective_width as f32);
    }

    /// Left edges of the two tile copies to draw this frame.
    pub fn draw_positions(&self) -> [i32; 2] {
        let first = -(self.offset.floor() as i32);
        let period = i32::try_from(self.effective_width).unwrap_or(i32::MAX);
        [first, first.saturating_add(period)]
    }
}

/// Canonical representative of `offset` in `[0, period)`.
fn wrap_offset(offset: f32, period: f32) -> f32 {
    if !offset.is_finite() {
        log::warn!("Non-finite scroll offset {}, resetting to 0", offset);
        return 0.0;
    }
    // Pre-reduce so the additive loop runs at most once even for huge excursions.
    let mut wrapped = offset % period;
    while wrapped < 0.0 {
        wrapped += period;
    }
    // A tiny negative plus `period` can round up to exactly `period`.
    wrapped % period
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(effective_width: u32, speed: f32) -> ScrollLayer {
        ScrollLayer::new(Sprite::filled(466, 10, 0), effective_width, speed)
    }

    #[test]
    fn advance_scrolls_and_wraps_from_zero() {
        let mut l = layer(947, 3.0);
        l.advance();
        assert_eq!(l.offset(), 944.0);
        l.advance();
        assert_eq!(l.offset(), 941.0);
    }

    #[test]
    fn large_negative_excursion_normalizes() {
        let mut l = layer(947, 0.0);
        l.offset = -10_000.0;
        l.advance();
        // -10000 + 11 * 947 = 417
        assert!((l.offset() - 417.0).abs() < 1e-3, "offset {}", l.offset());
    }

    #[test]
    fn offset_stays_in_range_over_many_ticks() {
        for speed in [0.5_f32, 1.0, 3.0, 7.3, -2.5] {
            let mut l = layer(947, speed);
            for _ in 0..5_000 {
                l.advance();
                assert!(l.offset() >= 0.0);
                assert!(l.offset() < 947.0);
            }
        }
    }

    #[test]
    fn fractional_speed_accumulates() {
        let mut l = layer(947, 0.5);
        l.advance();
        l.advance();
        assert_eq!(l.offset(), 946.0);
    }

    #[test]
    fn draw_positions_are_one_period_apart() {
        let mut l = layer(947, 0.0);
        l.offset = 417.6;
        assert_eq!(l.draw_positions(), [-417, 530]);
    }

    #[test]
    fn narrow_effective_width_is_raised_to_tile_width() {
        let l = layer(100, 1.0);
        assert_eq!(l.effective_width(), 466);
    }

    #[test]
    fn oversized_effective_width_is_clamped_and_still_scrolls() {
        let mut l = ScrollLayer::new(Sprite::filled(466, 1, 0), 3_000_000_000, 1.0);
        assert_eq!(l.effective_width(), MAX_EFFECTIVE_WIDTH);

        l.advance();
        assert_eq!(l.offset(), (MAX_EFFECTIVE_WIDTH - 1) as f32);
        l.advance();
        assert_eq!(l.offset(), (MAX_EFFECTIVE_WIDTH - 2) as f32);

        let [first, second] = l.draw_positions();
        assert_eq!(first, -((MAX_EFFECTIVE_WIDTH - 2) as i32));
        assert_eq!(second, 2);
    }

    #[test]
    fn non_finite_offset_resets() {
        assert_eq!(wrap_offset(f32::NAN, 947.0), 0.0);
        assert_eq!(wrap_offset(f32::NEG_INFINITY, 947.0), 0.0);
    }

    #[test]
    fn tiny_negative_never_lands_on_period() {
        let wrapped = wrap_offset(-1e-9, 947.0);
        assert!(wrapped >= 0.0 && wrapped < 947.0);
    }
}
