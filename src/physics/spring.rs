//! Damped spring primitives.
//!
//! All three integrate `accel = -k * (x - rest) - c * v` with semi-implicit
//! Euler: velocity first, then position from the new velocity.

use std::ops::{Mul, Sub};

use glam::{Quat, Vec3};

/// Stiffness and damping of one spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringCoefficients {
    /// Stiffness `k`.
    pub stiffness: f32,
    /// Damping `c`.
    pub damping: f32,
}

impl SpringCoefficients {
    /// Spring with stiffness `k` and damping `c`.
    #[must_use]
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            stiffness,
            damping,
        }
    }

    fn accel<T>(self, displacement: T, velocity: T) -> T
    where
        T: Mul<f32, Output = T> + Sub<Output = T>,
    {
        displacement * -self.stiffness - velocity * self.damping
    }
}

/// A scalar offset springing back to its rest value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScalarSpring {
    /// Current value.
    pub value: f32,
    /// Rest value.
    pub rest: f32,
    /// Rate of change.
    pub velocity: f32,
}

impl ScalarSpring {
    /// At rest at `rest`.
    #[must_use]
    pub fn at_rest(rest: f32) -> Self {
        Self {
            value: rest,
            rest,
            velocity: 0.0,
        }
    }

    /// Advance by `dt`.
    pub fn step(&mut self, k: SpringCoefficients, dt: f32) {
        self.velocity += k.accel(self.value - self.rest, self.velocity) * dt;
        self.value += self.velocity * dt;
    }

    /// Squared displacement from rest.
    #[must_use]
    pub fn displacement_sq(&self) -> f32 {
        (self.value - self.rest).powi(2)
    }

    /// Squared velocity.
    #[must_use]
    pub fn velocity_sq(&self) -> f32 {
        self.velocity * self.velocity
    }
}

/// A position springing back to its rest position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinearSpring {
    /// Current position.
    pub position: Vec3,
    /// Rest position.
    pub rest: Vec3,
    /// Linear velocity.
    pub velocity: Vec3,
}

impl LinearSpring {
    /// At rest at `rest`.
    #[must_use]
    pub fn at_rest(rest: Vec3) -> Self {
        Self {
            position: rest,
            rest,
            velocity: Vec3::ZERO,
        }
    }

    /// Advance by `dt`.
    pub fn step(&mut self, k: SpringCoefficients, dt: f32) {
        self.velocity += k.accel(self.position - self.rest, self.velocity) * dt;
        self.position += self.velocity * dt;
    }

    /// Squared displacement from rest.
    #[must_use]
    pub fn displacement_sq(&self) -> f32 {
        self.position.distance_squared(self.rest)
    }

    /// Squared speed.
    #[must_use]
    pub fn velocity_sq(&self) -> f32 {
        self.velocity.length_squared()
    }
}

/// An orientation springing back to its rest orientation.
///
/// The error is the rotation from rest to current, taken along the shortest
/// arc and expressed as a scaled axis (axis times angle in radians).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationalSpring {
    /// Current orientation.
    pub rotation: Quat,
    /// Rest orientation.
    pub rest: Quat,
    /// Angular velocity as a scaled axis, radians per second.
    pub angular_velocity: Vec3,
}

impl Default for RotationalSpring {
    fn default() -> Self {
        Self::at_rest(Quat::IDENTITY)
    }
}

impl RotationalSpring {
    /// At rest at `rest`.
    #[must_use]
    pub fn at_rest(rest: Quat) -> Self {
        Self {
            rotation: rest,
            rest,
            angular_velocity: Vec3::ZERO,
        }
    }

    /// Shortest-arc rotation error from rest to current.
    #[must_use]
    pub fn error(&self) -> Vec3 {
        let mut delta = self.rotation * self.rest.inverse();
        if delta.w < 0.0 {
            delta = -delta;
        }
        delta.to_scaled_axis()
    }

    /// Advance by `dt`.
    pub fn step(&mut self, k: SpringCoefficients, dt: f32) {
        self.angular_velocity += k.accel(self.error(), self.angular_velocity) * dt;
        let turn = Quat::from_scaled_axis(self.angular_velocity * dt);
        self.rotation = (turn * self.rotation).normalize();
    }

    /// Squared rotation error in radians².
    #[must_use]
    pub fn displacement_sq(&self) -> f32 {
        self.error().length_squared()
    }

    /// Squared angular speed.
    #[must_use]
    pub fn velocity_sq(&self) -> f32 {
        self.angular_velocity.length_squared()
    }
}
