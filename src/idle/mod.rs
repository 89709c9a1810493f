//! Idle micro-motion: blinking, squinting, gaze, breathing and pointer drag.
//!
//! The [`IdleGenerator`] runs every frame regardless of state; the current
//! state only biases its gaze targets through a [`GazePattern`].

mod blink;
mod breathing;
mod drag;
mod gaze;

pub use blink::{Blink, BlinkPhase, Squint};
pub use breathing::Breathing;
pub use drag::DragFollow;
pub use gaze::Gaze;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

use crate::behavior::GazePattern;
use crate::options::IdleOptions;
use crate::physics::SpringCoefficients;
use crate::rig::{channels, PoseBuffer};

/// Uniform draw from `[lo, hi]` (bounds in either order).
pub(crate) fn uniform(rng: &mut StdRng, [a, b]: [f32; 2]) -> f32 {
    let (lo, hi) = (a.min(b), a.max(b));
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}

/// Owns every idle layer and writes them into the pose each frame.
#[derive(Debug, Clone)]
pub struct IdleGenerator {
    options: IdleOptions,
    blink: Blink,
    squint: Squint,
    gaze: Gaze,
    breathing: Breathing,
    drag: DragFollow,
    pattern: GazePattern,
    pointer: Option<Vec2>,
    rng: StdRng,
}

impl IdleGenerator {
    /// Generator with drag following on the given spring.
    #[must_use]
    pub fn new(
        options: IdleOptions,
        drag_spring: SpringCoefficients,
        mut rng: StdRng,
    ) -> Self {
        Self {
            blink: Blink::new(&options, &mut rng),
            squint: Squint::new(&options, &mut rng),
            gaze: Gaze::new(&options, &mut rng),
            breathing: Breathing::default(),
            drag: DragFollow::new(drag_spring),
            pattern: GazePattern::default(),
            pointer: None,
            options,
            rng,
        }
    }

    /// Blink timer.
    #[must_use]
    pub fn blink(&self) -> &Blink {
        &self.blink
    }

    /// Gaze state.
    #[must_use]
    pub fn gaze(&self) -> &Gaze {
        &self.gaze
    }

    /// Active gaze pattern.
    #[must_use]
    pub fn pattern(&self) -> GazePattern {
        self.pattern
    }

    /// Switch gaze pattern; targets are re-rolled on the next frame.
    pub fn set_pattern(&mut self, pattern: GazePattern) {
        if self.pattern != pattern {
            self.pattern = pattern;
            self.gaze.retarget_now();
        }
    }

    /// Last pointer position in normalized view coordinates ([-1, 1], y up).
    pub fn set_pointer(&mut self, position: Option<Vec2>) {
        self.pointer = position.filter(|p| p.is_finite());
    }

    /// Kick the head by a pointer drag delta in pixels.
    pub fn drag(&mut self, delta: Vec2) {
        self.drag.drag(delta, &self.options);
    }

    /// Advance every idle layer by `dt` and write them into `pose`.
    pub fn update(&mut self, dt: f32, pose: &mut PoseBuffer) {
        let options = &self.options;
        let rng = &mut self.rng;

        let lids = self.blink.update(dt, options, rng);
        let squint = self.squint.update(dt, options, rng);
        let _ = pose.set_parameter(channels::EYE_OPEN, lids * squint);

        self.gaze
            .update(dt, options, self.pattern, self.pointer, rng, pose);

        let breath = self.breathing.update(dt, options.breathing_frequency);
        let _ = pose.set_parameter(channels::BREATH, breath);

        self.drag.update(dt, options, pose);
    }
}
