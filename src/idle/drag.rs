//! Pointer drag follow.

use glam::Vec2;

use crate::options::IdleOptions;
use crate::physics::{ScalarSpring, SpringCoefficients};
use crate::rig::{channels, PoseBuffer};

/// Springy head offset driven by pointer drags.
///
/// A drag never moves the head directly: each pointer delta kicks the
/// offset's velocity (clamped), and a spring pulls it back to center.
#[derive(Debug, Clone, PartialEq)]
pub struct DragFollow {
    yaw: ScalarSpring,
    pitch: ScalarSpring,
    coefficients: SpringCoefficients,
}

impl DragFollow {
    /// Centered follow using the given spring.
    #[must_use]
    pub fn new(coefficients: SpringCoefficients) -> Self {
        Self {
            yaw: ScalarSpring::default(),
            pitch: ScalarSpring::default(),
            coefficients,
        }
    }

    /// Current (yaw, pitch) offset in degrees.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.yaw.value, self.pitch.value)
    }

    /// Kick the offset by a pointer delta in screen pixels (y down).
    pub fn drag(&mut self, delta: Vec2, options: &IdleOptions) {
        if !delta.is_finite() {
            log::warn!("ignoring non-finite drag delta");
            return;
        }
        let kick = Vec2::new(delta.x, -delta.y) * options.drag_gain;
        let velocity = (Vec2::new(self.yaw.velocity, self.pitch.velocity)
            + kick)
            .clamp_length_max(options.drag_max_speed);
        self.yaw.velocity = velocity.x;
        self.pitch.velocity = velocity.y;
    }

    /// Integrate, clamp, and add the offset onto the head channels.
    pub fn update(&mut self, dt: f32, options: &IdleOptions, pose: &mut PoseBuffer) {
        let limit = options.drag_max_offset.abs();
        for spring in [&mut self.yaw, &mut self.pitch] {
            spring.step(self.coefficients, dt);
            if spring.value.abs() > limit {
                spring.value = spring.value.clamp(-limit, limit);
                spring.velocity = 0.0;
            }
        }
        let offset = self.offset();
        if offset != Vec2::ZERO {
            let _ = pose.add_offset(channels::HEAD_YAW, offset.x);
            let _ = pose.add_offset(channels::HEAD_PITCH, offset.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn follow() -> DragFollow {
        DragFollow::new(SpringCoefficients::new(60.0, 15.5))
    }

    #[test]
    fn test_drag_kicks_then_returns() {
        let options = IdleOptions::default();
        let mut drag = follow();
        let mut pose = PoseBuffer::new("mouth_open");
        drag.drag(Vec2::new(40.0, 0.0), &options);
        // No snapping: nothing moves until integrated
        assert_eq!(drag.offset(), Vec2::ZERO);

        drag.update(DT, &options, &mut pose);
        assert!(drag.offset().x > 0.0);
        assert!(pose.composed(channels::HEAD_YAW).unwrap() > 0.0);

        for _ in 0..300 {
            pose.clear_offsets();
            drag.update(DT, &options, &mut pose);
        }
        assert!(drag.offset().length() < 1e-2);
    }

    #[test]
    fn test_screen_y_down_pitches_down() {
        let options = IdleOptions::default();
        let mut drag = follow();
        let mut pose = PoseBuffer::new("mouth_open");
        drag.drag(Vec2::new(0.0, 30.0), &options);
        drag.update(DT, &options, &mut pose);
        assert!(drag.offset().y < 0.0);
    }

    #[test]
    fn test_speed_and_offset_are_clamped() {
        let options = IdleOptions::default();
        let mut drag = follow();
        let mut pose = PoseBuffer::new("mouth_open");
        for _ in 0..50 {
            drag.drag(Vec2::new(10_000.0, 0.0), &options);
            drag.update(DT, &options, &mut pose);
            assert!(drag.offset().x <= options.drag_max_offset);
        }
        drag.drag(Vec2::new(1e9, 1e9), &options);
        let speed = Vec2::new(drag.yaw.velocity, drag.pitch.velocity).length();
        assert!(speed <= options.drag_max_speed + 1e-3);
    }
}
