//! Frame-rate independent smoothing.

/// Frame rate the per-frame smoothing factors are tuned against.
const REFERENCE_FPS: f32 = 60.0;

/// Convert a per-frame smoothing factor (tuned at 60 fps) into the factor
/// for a frame of `dt` seconds.
#[inline]
#[must_use]
pub fn frame_factor(per_frame: f32, dt: f32) -> f32 {
    let per_frame = per_frame.clamp(0.0, 1.0);
    1.0 - (1.0 - per_frame).powf(dt.max(0.0) * REFERENCE_FPS)
}

/// Exponential approach: `current += (target - current) * factor`, with the
/// factor rescaled for `dt`.
#[inline]
#[must_use]
pub fn smooth_toward(current: f32, target: f32, per_frame: f32, dt: f32) -> f32 {
    current + (target - current) * frame_factor(per_frame, dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_factor_matches_per_frame_at_reference_rate() {
        let f = frame_factor(0.15, 1.0 / 60.0);
        assert!((f - 0.15).abs() < 1e-5, "got {f}");
    }

    #[test]
    fn test_two_half_frames_equal_one_full_frame() {
        let dt = 1.0 / 60.0;
        let once = smooth_toward(0.0, 1.0, 0.05, dt);
        let half = smooth_toward(0.0, 1.0, 0.05, dt * 0.5);
        let twice = smooth_toward(half, 1.0, 0.05, dt * 0.5);
        assert!((once - twice).abs() < 1e-5);
    }
}
