//! Wall-clock frame pacing for drivers that call
//! [`MotionEngine::update`](crate::engine::MotionEngine::update).

use web_time::{Duration, Instant};

/// Largest frame delta handed to the engine. A stalled driver (debugger,
/// suspended window) otherwise produces one huge step.
const MAX_FRAME_DELTA: f32 = 0.1;

/// Frame timing with delta measurement, FPS smoothing and optional frame
/// limiting.
#[derive(Debug)]
pub struct FrameTiming {
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            min_frame_duration,
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Time until the next frame is due (zero when already due).
    #[must_use]
    pub fn time_until_next(&self) -> Duration {
        self.min_frame_duration
            .saturating_sub(self.last_frame.elapsed())
    }

    /// Close the current frame and return its delta in seconds, clamped to
    /// a sane maximum.
    pub fn end_frame(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        frame_time.min(MAX_FRAME_DELTA)
    }

    /// Current FPS (smoothed).
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_is_always_due() {
        let timing = FrameTiming::new(0);
        assert_eq!(timing.time_until_next(), Duration::ZERO);
    }

    #[test]
    fn test_end_frame_is_clamped() {
        let mut timing = FrameTiming::new(60);
        let dt = timing.end_frame();
        assert!((0.0..=MAX_FRAME_DELTA).contains(&dt));
    }
}
