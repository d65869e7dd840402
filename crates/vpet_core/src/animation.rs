//! Frame-based sprite animation types and wall-clock advance logic.
//!
//! An [`Animation`] is immutable once built. Playback position lives in an
//! [`AnimationCursor`] owned by whoever plays the clip, so one animation can be
//! shared by any number of players.
//!
//! Timing uses absolute millisecond timestamps supplied by the caller rather
//! than per-tick deltas: a frame flips on the first call whose `now_ms` is at
//! or past `last_update_ms + duration_ms`, so frame length is exact to within
//! one driver tick regardless of tick jitter.

use std::sync::Arc;

/// Read-only RGB565 pixel buffer with its dimensions.
///
/// Cloning is cheap; the pixel data is shared. The pixel count always equals
/// `width * height`.
#[derive(Debug, Clone)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Arc<[u16]>,
}

impl Sprite {
    pub fn new(width: u32, height: u32, pixels: Vec<u16>) -> Result<Self, String> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(format!(
                "Sprite pixel count mismatch: {}x{} needs {} pixels, got {}",
                width,
                height,
                expected,
                pixels.len()
            ));
        }
        Ok(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    /// A sprite where every pixel has the same color.
    pub fn filled(width: u32, height: u32, color: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize].into(),
        }
    }

    /// Build a sprite by sampling `color_at(x, y)` for every pixel, row by row.
    pub fn from_fn(width: u32, height: u32, mut color_at: impl FnMut(u32, u32) -> u16) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(color_at(x, y));
            }
        }
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixels, `width` per row.
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }
}

/// A single frame in an animation.
#[derive(Debug, Clone)]
pub struct AnimationFrame {
    pub sprite: Sprite,
    pub duration_ms: u64,
}

/// An ordered sequence of frames that either loops or plays once.
#[derive(Debug, Clone, Default)]
pub struct Animation {
    pub frames: Vec<AnimationFrame>,
    pub looping: bool,
}

/// Playback position within an [`Animation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationCursor {
    pub frame_index: usize,
    pub last_update_ms: u64,
}

impl AnimationCursor {
    pub fn new(now_ms: u64) -> Self {
        Self {
            frame_index: 0,
            last_update_ms: now_ms,
        }
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.frame_index = 0;
        self.last_update_ms = now_ms;
    }
}

/// Outcome of one [`Animation::advance`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceResult {
    pub frame_index: usize,
    /// Only ever set for non-looping animations.
    pub cycle_completed: bool,
}

impl Animation {
    pub fn new(looping: bool) -> Self {
        Self {
            frames: Vec::new(),
            looping,
        }
    }

    /// Append a frame. Builder-style so clip tables read top to bottom.
    pub fn with_frame(mut self, sprite: Sprite, duration_ms: u64) -> Self {
        self.frames.push(AnimationFrame {
            sprite,
            duration_ms,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total duration of one full cycle in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| f.duration_ms).sum()
    }

    pub fn frame(&self, index: usize) -> Option<&AnimationFrame> {
        self.frames.get(index)
    }

    /// Advance `cursor` against the wall clock. At most one frame step per call.
    ///
    /// A stale cursor index (left over from a different, longer clip) is reset
    /// to 0 before anything else happens.
    pub fn advance(&self, cursor: &mut AnimationCursor, now_ms: u64) -> AdvanceResult {
        if self.frames.is_empty() {
            cursor.frame_index = 0;
            return AdvanceResult::default();
        }

        if cursor.frame_index >= self.frames.len() {
            log::debug!(
                "Animation cursor index {} out of range for {} frames, resetting",
                cursor.frame_index,
                self.frames.len()
            );
            cursor.frame_index = 0;
        }

        let mut cycle_completed = false;
        let duration = self.frames[cursor.frame_index].duration_ms;
        if now_ms >= cursor.last_update_ms.saturating_add(duration) {
            cursor.frame_index += 1;
            cursor.last_update_ms = now_ms;

            if cursor.frame_index >= self.frames.len() {
                if self.looping {
                    cursor.frame_index = 0;
                } else {
                    cursor.frame_index = self.frames.len() - 1;
                    cycle_completed = true;
                }
            }
        }

        AdvanceResult {
            frame_index: cursor.frame_index,
            cycle_completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_clip(durations_ms: &[u64], looping: bool) -> Animation {
        durations_ms
            .iter()
            .enumerate()
            .fold(Animation::new(looping), |anim, (i, &d)| {
                anim.with_frame(Sprite::filled(1, 1, i as u16), d)
            })
    }

    #[test]
    fn sprite_new_rejects_wrong_pixel_count() {
        let err = Sprite::new(2, 2, vec![0; 3]).expect_err("3 pixels cannot fill 2x2");
        assert!(err.contains("pixel count mismatch"));
        assert!(Sprite::new(2, 2, vec![0; 4]).is_ok());
    }

    #[test]
    fn from_fn_samples_row_major() {
        let sprite = Sprite::from_fn(3, 2, |x, y| (y * 10 + x) as u16);
        assert_eq!((sprite.width(), sprite.height()), (3, 2));
        assert_eq!(sprite.pixels(), &[0, 1, 2, 10, 11, 12]);
    }

    #[test]
    fn empty_animation_is_a_no_op() {
        let clip = Animation::new(true);
        let mut cursor = AnimationCursor {
            frame_index: 5,
            last_update_ms: 0,
        };
        let result = clip.advance(&mut cursor, 10_000);
        assert_eq!(result, AdvanceResult::default());
        assert_eq!(cursor.frame_index, 0);
    }

    #[test]
    fn frame_holds_until_duration_elapses() {
        let clip = make_clip(&[100, 100, 100], true);
        let mut cursor = AnimationCursor::new(0);

        assert_eq!(clip.advance(&mut cursor, 99).frame_index, 0);
        assert_eq!(clip.advance(&mut cursor, 100).frame_index, 1);
        assert_eq!(cursor.last_update_ms, 100);
        // Next frame is timed from the moment of the flip, not from t=0.
        assert_eq!(clip.advance(&mut cursor, 199).frame_index, 1);
        assert_eq!(clip.advance(&mut cursor, 200).frame_index, 2);
    }

    #[test]
    fn at_most_one_step_per_call() {
        let clip = make_clip(&[10, 10, 10, 10], true);
        let mut cursor = AnimationCursor::new(0);
        // Far past several frame boundaries, still only one step.
        assert_eq!(clip.advance(&mut cursor, 1_000).frame_index, 1);
        assert_eq!(clip.advance(&mut cursor, 1_000).frame_index, 1);
    }

    #[test]
    fn looping_alternates_and_never_completes() {
        let clip = make_clip(&[1000, 1000], true);
        let mut cursor = AnimationCursor::new(0);
        let mut seen = Vec::new();
        for t in (1000..=6000).step_by(1000) {
            let result = clip.advance(&mut cursor, t);
            assert!(!result.cycle_completed);
            seen.push(result.frame_index);
        }
        assert_eq!(seen, vec![1, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn non_looping_completes_on_fourth_advance() {
        let clip = make_clip(&[300, 300, 300, 300], false);
        let mut cursor = AnimationCursor::new(0);

        for (t, expected) in [(300, 1), (600, 2), (900, 3)] {
            let result = clip.advance(&mut cursor, t);
            assert_eq!(result.frame_index, expected);
            assert!(!result.cycle_completed);
        }

        let result = clip.advance(&mut cursor, 1200);
        assert!(result.cycle_completed);
        assert_eq!(result.frame_index, 3);
        assert_eq!(cursor.frame_index, 3);
    }

    #[test]
    fn stale_index_resets_before_advancing() {
        let clip = make_clip(&[100, 100], false);
        let mut cursor = AnimationCursor {
            frame_index: 7,
            last_update_ms: 0,
        };
        let result = clip.advance(&mut cursor, 50);
        assert_eq!(result.frame_index, 0);
        assert!(!result.cycle_completed);
    }

    #[test]
    fn clock_behind_cursor_does_not_advance() {
        let clip = make_clip(&[100], true);
        let mut cursor = AnimationCursor::new(5_000);
        assert_eq!(clip.advance(&mut cursor, 10), AdvanceResult::default());
        assert_eq!(cursor.last_update_ms, 5_000);
    }

    #[test]
    fn cursor_reset_rewinds_to_first_frame() {
        let mut cursor = AnimationCursor {
            frame_index: 3,
            last_update_ms: 10,
        };
        cursor.reset(900);
        assert_eq!(cursor, AnimationCursor::new(900));
    }

    #[test]
    fn total_duration_ms() {
        let clip = make_clip(&[100, 200, 300], true);
        assert_eq!(clip.total_duration_ms(), 600);
        assert_eq!(clip.len(), 3);
        assert!(!clip.is_empty());
    }
}
