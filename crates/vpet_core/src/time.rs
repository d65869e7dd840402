use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;
// A tick this many intervals late is reported.
const SLOW_FRAME_FACTOR: u32 = 4;

/// Wall clock and coarse rate limiter for the tick loop.
///
/// Each tick is due one `tick_interval` after the previous one began. There is
/// no catch-up; a late tick is absorbed by the next one.
pub struct FrameClock {
    pub tick_interval: Duration,
    start: Instant,
    last_instant: Instant,
    pub real_dt: f64,
    pub frame_count: u64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new(tick_interval: Duration) -> Self {
        let now = Instant::now();
        let nominal_dt = tick_interval.as_secs_f64();
        Self {
            tick_interval,
            start: now,
            last_instant: now,
            real_dt: 0.0,
            frame_count: 0,
            fps_samples: [nominal_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: if nominal_dt > 0.0 { 1.0 / nominal_dt } else { 0.0 },
            smoothed_frame_time_ms: nominal_dt * 1000.0,
        }
    }

    /// Mark the start of a tick and return its timestamp in milliseconds.
    pub fn begin_frame(&mut self) -> u64 {
        let now = Instant::now();
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.frame_count += 1;

        let slow_threshold = (self.tick_interval * SLOW_FRAME_FACTOR).as_secs_f64();
        if self.frame_count > 1 && self.real_dt > slow_threshold {
            log::warn!(
                "Tick took {:.1}ms (target {}ms)",
                self.real_dt * 1000.0,
                self.tick_interval.as_millis()
            );
        }

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        now.duration_since(self.start).as_millis() as u64
    }

    /// When the next tick is due.
    pub fn next_deadline(&self) -> Instant {
        self.last_instant + self.tick_interval
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.frame_count == 0 || now >= self.next_deadline()
    }

    /// Block until the next tick is due. Coarse: relies on `thread::sleep`.
    pub fn sleep_until_next(&self) {
        let remaining = self.next_deadline().saturating_duration_since(Instant::now());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}
