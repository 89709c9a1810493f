//! Breathing cycle.

use std::f32::consts::TAU;

/// Pure sinusoidal breathing phase.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Breathing {
    phase: f32,
}

impl Breathing {
    /// Advance by `dt` at `frequency` breaths per second and return the
    /// inhale amount in [0, 1].
    pub fn update(&mut self, dt: f32, frequency: f32) -> f32 {
        self.phase = (self.phase + dt * frequency.max(0.0)).fract();
        self.value()
    }

    /// Inhale amount in [0, 1]: 0 at full exhale, 1 at full inhale.
    #[must_use]
    pub fn value(&self) -> f32 {
        0.5 * (1.0 - (TAU * self.phase).cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breath_cycle() {
        let mut breath = Breathing::default();
        assert_eq!(breath.value(), 0.0);
        // Quarter-hertz: full inhale after two seconds
        assert!((breath.update(2.0, 0.25) - 1.0).abs() < 1e-5);
        assert!(breath.update(2.0, 0.25) < 1e-5);
        assert!((breath.update(1.0, 0.25) - 0.5).abs() < 1e-5);
    }
}
