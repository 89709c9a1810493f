//! Head aim and eye saccades.

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::Rng;

use super::uniform;
use crate::animation::weighted_index;
use crate::behavior::GazePattern;
use crate::options::IdleOptions;
use crate::rig::{channels, PoseBuffer};
use crate::util::numeric::smooth_toward;

/// Head yaw/pitch reach of a pointer at the edge of the view, in degrees.
const POINTER_REACH: Vec2 = Vec2::new(20.0, 12.0);

/// Postures the head picks between while idling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Posture {
    NearCenter,
    LookAway,
    TiltBack,
}

impl Posture {
    /// (posture, weight) menu for a gaze pattern.
    fn menu(pattern: GazePattern) -> &'static [(Self, f32)] {
        match pattern {
            GazePattern::Random | GazePattern::PointerFollow => &[
                (Self::NearCenter, 6.0),
                (Self::LookAway, 2.0),
                (Self::TiltBack, 1.0),
            ],
            GazePattern::Upward => &[(Self::TiltBack, 3.0), (Self::LookAway, 1.0)],
            GazePattern::Forward => &[(Self::NearCenter, 1.0)],
        }
    }

    /// Random (yaw, pitch, roll) in degrees for this posture.
    fn draw(self, rng: &mut StdRng) -> Vec3 {
        let side: f32 = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        match self {
            Self::NearCenter => Vec3::new(
                rng.random_range(-5.0..=5.0),
                rng.random_range(-3.0..=3.0),
                rng.random_range(-2.0..=2.0),
            ),
            Self::LookAway => Vec3::new(
                side * rng.random_range(10.0_f32..=20.0),
                rng.random_range(-5.0..=5.0),
                side * rng.random_range(0.0_f32..=4.0),
            ),
            Self::TiltBack => Vec3::new(
                rng.random_range(-6.0..=6.0),
                rng.random_range(8.0..=14.0),
                rng.random_range(-4.0..=4.0),
            ),
        }
    }
}

/// Smoothed head aim and eye direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Gaze {
    head: Vec3,
    head_target: Vec3,
    eyes: Vec2,
    eye_target: Vec2,
    head_timer: f32,
    eye_timer: f32,
}

impl Gaze {
    /// Centered gaze, first retargets drawn from the configured intervals.
    pub fn new(options: &IdleOptions, rng: &mut StdRng) -> Self {
        Self {
            head: Vec3::ZERO,
            head_target: Vec3::ZERO,
            eyes: Vec2::ZERO,
            eye_target: Vec2::ZERO,
            head_timer: uniform(rng, options.head_retarget_interval),
            eye_timer: uniform(rng, options.eye_retarget_interval),
        }
    }

    /// Smoothed head aim as (yaw, pitch, roll) degrees.
    #[must_use]
    pub fn head(&self) -> Vec3 {
        self.head
    }

    /// Smoothed eye direction in [-1, 1]².
    #[must_use]
    pub fn eyes(&self) -> Vec2 {
        self.eyes
    }

    /// Head aim being approached.
    #[must_use]
    pub fn head_target(&self) -> Vec3 {
        self.head_target
    }

    /// Re-roll both targets on the next update.
    pub fn retarget_now(&mut self) {
        self.head_timer = 0.0;
        self.eye_timer = 0.0;
    }

    fn draw_head(
        pattern: GazePattern,
        pointer: Option<Vec2>,
        rng: &mut StdRng,
    ) -> Vec3 {
        if let (GazePattern::PointerFollow, Some(p)) = (pattern, pointer) {
            let aim = p.clamp(Vec2::NEG_ONE, Vec2::ONE) * POINTER_REACH;
            return Vec3::new(aim.x, aim.y, 0.0);
        }
        let menu = Posture::menu(pattern);
        let weights: Vec<f32> = menu.iter().map(|(_, w)| *w).collect();
        let posture = weighted_index(rng, &weights)
            .map_or(Posture::NearCenter, |i| menu[i].0);
        posture.draw(rng)
    }

    fn draw_eyes(
        options: &IdleOptions,
        pattern: GazePattern,
        pointer: Option<Vec2>,
        rng: &mut StdRng,
    ) -> Vec2 {
        let range = Vec2::from(options.eye_range).abs();
        let mut jitter = || {
            Vec2::new(
                rng.random_range(-1.0..=1.0),
                rng.random_range(-1.0..=1.0),
            )
        };
        let target = match (pattern, pointer) {
            (GazePattern::PointerFollow, Some(p)) => p + jitter() * 0.05,
            (GazePattern::Forward, _) => jitter() * range * 0.3,
            (GazePattern::Upward, _) => {
                jitter() * range * Vec2::new(0.8, 0.3) + Vec2::new(0.0, 0.5)
            }
            _ => jitter() * range,
        };
        target.clamp(Vec2::NEG_ONE, Vec2::ONE)
    }

    /// Advance timers, re-roll due targets, smooth toward them and write the
    /// head and eye channels.
    pub fn update(
        &mut self,
        dt: f32,
        options: &IdleOptions,
        pattern: GazePattern,
        pointer: Option<Vec2>,
        rng: &mut StdRng,
        pose: &mut PoseBuffer,
    ) {
        self.head_timer -= dt;
        if self.head_timer <= 0.0 {
            self.head_target = Self::draw_head(pattern, pointer, rng);
            self.head_timer = uniform(rng, options.head_retarget_interval);
        }
        self.eye_timer -= dt;
        if self.eye_timer <= 0.0 {
            self.eye_target = Self::draw_eyes(options, pattern, pointer, rng);
            self.eye_timer = uniform(rng, options.eye_retarget_interval);
        }

        let head = options.head_smoothing;
        self.head = Vec3::new(
            smooth_toward(self.head.x, self.head_target.x, head, dt),
            smooth_toward(self.head.y, self.head_target.y, head, dt),
            smooth_toward(self.head.z, self.head_target.z, head, dt),
        );
        let eye = options.eye_smoothing;
        self.eyes = Vec2::new(
            smooth_toward(self.eyes.x, self.eye_target.x, eye, dt),
            smooth_toward(self.eyes.y, self.eye_target.y, eye, dt),
        );

        let _ = pose.set_parameter(channels::HEAD_YAW, self.head.x);
        let _ = pose.set_parameter(channels::HEAD_PITCH, self.head.y);
        let _ = pose.set_parameter(channels::HEAD_ROLL, self.head.z);
        let _ = pose.set_parameter(channels::EYE_X, self.eyes.x);
        let _ = pose.set_parameter(channels::EYE_Y, self.eyes.y);
    }
}
