//! Easing functions for animation interpolation.
//!
//! Provides the easing curves used by cross-fades, blinks, and expression
//! blends. All functions are designed for <100ns evaluation time.

use std::f32::consts::PI;

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EasingFunction {
    /// Quadratic ease-in (slow start, fast end).
    QuadraticIn,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Sinusoidal ease-in-out: `0.5·(1 − cos(π·t))`.
    SineInOut,
}

impl EasingFunction {
    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    /// Returns the eased value, also in [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::QuadraticIn => t * t,
            EasingFunction::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            EasingFunction::SineInOut => 0.5 * (1.0 - (PI * t).cos()),
        }
    }
}

/// Linear interpolation between two scalars.
#[inline]
#[must_use]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}
