//! Reactive secondary motion: impulses kick springs that settle back.

use glam::Vec3;

use super::spring::{LinearSpring, RotationalSpring, ScalarSpring, SpringCoefficients};
use crate::error::MotionError;
use crate::options::SpringOptions;
use crate::rig::{AvatarRig, JointClass, JointPose, PoseBuffer};

/// Translation kick per unit of impulse speed (model units are meters).
const TRANSLATION_SCALE: f32 = 0.01;
/// Scalar kick per unit of impulse speed (head channels are in degrees).
const PARAMETER_SCALE: f32 = 10.0;
/// Upper bound on integration sub-steps per frame.
const MAX_SUBSTEPS: u32 = 32;

/// What a spring moves.
#[derive(Debug, Clone, PartialEq)]
pub enum SpringBody {
    /// A skeletal joint: rotation and translation both spring.
    Joint {
        /// Rotational part.
        angular: RotationalSpring,
        /// Translational part.
        linear: LinearSpring,
    },
    /// A named scalar, written as an additive offset.
    Parameter(ScalarSpring),
}

/// One live spring.
#[derive(Debug, Clone, PartialEq)]
pub struct SpringState {
    /// Joint or parameter name.
    pub name: String,
    /// Joint class that fixed the damping.
    pub class: JointClass,
    /// Stiffness and damping.
    pub coefficients: SpringCoefficients,
    /// Spring state.
    pub body: SpringBody,
}

impl SpringState {
    fn step(&mut self, dt: f32) {
        let k = self.coefficients;
        match &mut self.body {
            SpringBody::Joint { angular, linear } => {
                angular.step(k, dt);
                linear.step(k, dt);
            }
            SpringBody::Parameter(scalar) => scalar.step(k, dt),
        }
    }

    fn energy(&self) -> (f32, f32) {
        match &self.body {
            SpringBody::Joint { angular, linear } => (
                angular.displacement_sq() + linear.displacement_sq(),
                angular.velocity_sq() + linear.velocity_sq(),
            ),
            SpringBody::Parameter(scalar) => {
                (scalar.displacement_sq(), scalar.velocity_sq())
            }
        }
    }

    fn is_finite(&self) -> bool {
        match &self.body {
            SpringBody::Joint { angular, linear } => {
                angular.rotation.is_finite()
                    && angular.angular_velocity.is_finite()
                    && linear.position.is_finite()
                    && linear.velocity.is_finite()
            }
            SpringBody::Parameter(scalar) => {
                scalar.value.is_finite() && scalar.velocity.is_finite()
            }
        }
    }

    fn kick(&mut self, direction: Vec3, speed: f32) {
        match &mut self.body {
            SpringBody::Joint { angular, linear } => {
                let mut axis = Vec3::Z.cross(direction);
                if axis.length_squared() < 1e-12 {
                    axis = direction.any_orthogonal_vector();
                }
                angular.angular_velocity = axis.normalize_or_zero() * speed;
                linear.velocity = direction * speed * TRANSLATION_SCALE;
            }
            SpringBody::Parameter(scalar) => {
                scalar.velocity = direction.x * speed * PARAMETER_SCALE;
            }
        }
    }

    fn write(&self, pose: &mut PoseBuffer) {
        match &self.body {
            SpringBody::Joint { angular, linear } => {
                let _ = pose.set_joint(
                    &self.name,
                    JointPose::new(angular.rotation, linear.position),
                );
            }
            SpringBody::Parameter(scalar) => {
                let _ = pose.add_offset(&self.name, scalar.value - scalar.rest);
            }
        }
    }

    fn release(&self, pose: &mut PoseBuffer) {
        if matches!(self.body, SpringBody::Joint { .. }) {
            pose.clear_joint(&self.name);
        }
    }
}

/// Owns every live spring and integrates them once per frame.
#[derive(Debug, Clone)]
pub struct SpringSolver {
    springs: Vec<SpringState>,
    options: SpringOptions,
}

impl SpringSolver {
    /// Solver with no live springs.
    #[must_use]
    pub fn new(options: SpringOptions) -> Self {
        Self {
            springs: Vec::new(),
            options,
        }
    }

    /// Live springs.
    #[must_use]
    pub fn springs(&self) -> &[SpringState] {
        &self.springs
    }

    /// Number of live springs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.springs.len()
    }

    /// Whether everything has settled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.springs.is_empty()
    }

    /// Damping for a joint class.
    #[must_use]
    pub fn damping(&self, class: JointClass) -> f32 {
        match class {
            JointClass::Head => self.options.head_damping,
            JointClass::Body => self.options.body_damping,
            JointClass::Hair => self.options.hair_damping,
            JointClass::Accessory => self.options.accessory_damping,
        }
    }

    /// Kick `name` along `direction`.
    ///
    /// Stiffness scales with `strength` (clamped to the configured range);
    /// the kick speed is `|direction| * strength`, capped. A joint the rig
    /// knows gets a rotational + translational spring; otherwise a
    /// parameter the rig knows gets a scalar spring driven by
    /// `direction.x`. An existing spring on the same name keeps its
    /// displacement and is re-seeded.
    pub fn apply_impulse<R: AvatarRig + ?Sized>(
        &mut self,
        rig: &R,
        name: &str,
        direction: Vec3,
        strength: f32,
    ) -> Result<(), MotionError> {
        if !direction.is_finite() || !strength.is_finite() {
            return Err(MotionError::InvalidNumber("impulse"));
        }
        let [lo, hi] = self.options.strength_range;
        let strength = strength.clamp(lo.min(hi), hi.max(lo));
        let speed =
            (direction.length() * strength).min(self.options.max_impulse_speed);
        let direction = direction.normalize_or_zero();

        let class = rig.joint_class(name);
        let coefficients = SpringCoefficients::new(
            self.options.base_stiffness * strength,
            self.damping(class),
        );

        if let Some(spring) = self.springs.iter_mut().find(|s| s.name == name) {
            spring.coefficients = coefficients;
            spring.kick(direction, speed);
            return Ok(());
        }

        let body = if let Some(rest) = rig.joint_rest(name) {
            SpringBody::Joint {
                angular: RotationalSpring::at_rest(rest.rotation),
                linear: LinearSpring::at_rest(rest.translation),
            }
        } else if rig.parameter_range(name).is_some() {
            SpringBody::Parameter(ScalarSpring::at_rest(0.0))
        } else {
            return Err(MotionError::MissingJoint(name.to_owned()));
        };
        let mut spring = SpringState {
            name: name.to_owned(),
            class,
            coefficients,
            body,
        };
        spring.kick(direction, speed);
        log::debug!(
            "spring '{name}': k={:.1} c={:.1} speed={speed:.2}",
            coefficients.stiffness,
            coefficients.damping
        );
        self.springs.push(spring);
        Ok(())
    }

    /// Integrate every spring by `dt` (sub-stepped), write the results into
    /// `pose`, and drop springs that have settled.
    pub fn update(&mut self, dt: f32, pose: &mut PoseBuffer) {
        if dt <= 0.0 || self.springs.is_empty() {
            for spring in &self.springs {
                spring.write(pose);
            }
            return;
        }
        let max_step = self.options.max_substep.max(1e-4);
        let steps = ((dt / max_step).ceil() as u32).clamp(1, MAX_SUBSTEPS);
        let h = dt / steps as f32;

        let eps_disp = self.options.displacement_epsilon;
        let eps_vel = self.options.velocity_epsilon;
        self.springs.retain_mut(|spring| {
            for _ in 0..steps {
                spring.step(h);
            }
            if !spring.is_finite() {
                log::warn!(
                    "spring '{}': {}, snapping to rest",
                    spring.name,
                    MotionError::InvalidNumber("spring state")
                );
                spring.release(pose);
                return false;
            }
            let (disp_sq, vel_sq) = spring.energy();
            if disp_sq < eps_disp && vel_sq < eps_vel {
                spring.release(pose);
                return false;
            }
            spring.write(pose);
            true
        });
    }

    /// Drop every spring, returning joints to clip-driven motion.
    pub fn clear(&mut self, pose: &mut PoseBuffer) {
        for spring in self.springs.drain(..) {
            spring.release(pose);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;
    use crate::rig::{ParameterRig, ParameterSlot, SkeletalRig};

    const DT: f32 = 1.0 / 60.0;

    fn skeletal() -> SkeletalRig {
        SkeletalRig::new("head")
            .with_joint("J_Hair_Front", JointPose::IDENTITY)
            .with_joint("spine", JointPose::new(Quat::IDENTITY, Vec3::Y))
    }

    #[test]
    fn test_impulse_on_head_uses_head_damping() {
        let mut solver = SpringSolver::new(SpringOptions::default());
        solver
            .apply_impulse(&skeletal(), "head", Vec3::X, 1.0)
            .unwrap();
        let spring = &solver.springs()[0];
        assert_eq!(spring.class, JointClass::Head);
        assert_eq!(spring.coefficients, SpringCoefficients::new(60.0, 12.0));

        solver
            .apply_impulse(&skeletal(), "J_Hair_Front", Vec3::X, 2.0)
            .unwrap();
        let hair = &solver.springs()[1];
        assert_eq!(hair.coefficients.stiffness, 120.0);
        assert_eq!(hair.coefficients.damping, 6.0);
    }

    #[test]
    fn test_joint_spring_settles_and_releases() {
        let mut solver = SpringSolver::new(SpringOptions::default());
        let mut pose = PoseBuffer::new("mouth_open");
        solver
            .apply_impulse(&skeletal(), "head", Vec3::new(1.0, 0.5, 0.0), 1.0)
            .unwrap();

        solver.update(DT, &mut pose);
        let moved = pose.joint("head").unwrap();
        assert!(moved.rotation.angle_between(Quat::IDENTITY) > 0.0);

        let mut frames = 0;
        while !solver.is_empty() && frames < 600 {
            solver.update(DT, &mut pose);
            frames += 1;
        }
        assert!(solver.is_empty(), "spring never settled");
        assert!(frames <= 120, "took {frames} frames to settle");
        assert!(pose.joint("head").is_none());
    }

    #[test]
    fn test_head_impulse_settles_within_two_seconds() {
        let rig = skeletal();
        for magnitude in [0.25, 1.0, 4.0, 10.0, 25.0] {
            let mut solver = SpringSolver::new(SpringOptions::default());
            let mut pose = PoseBuffer::new("mouth_open");
            solver
                .apply_impulse(&rig, "head", Vec3::new(0.6, 0.8, 0.0) * magnitude, 1.0)
                .unwrap();
            assert_eq!(
                solver.springs()[0].coefficients,
                SpringCoefficients::new(60.0, 12.0)
            );

            for _ in 0..120 {
                solver.update(DT, &mut pose);
            }
            match solver.springs().first() {
                Some(spring) => {
                    let (disp_sq, vel_sq) = spring.energy();
                    assert!(
                        disp_sq.sqrt() < 1e-3 && vel_sq.sqrt() < 1e-3,
                        "magnitude {magnitude} still moving"
                    );
                }
                None => assert!(pose.joint("head").is_none()),
            }
        }
    }

    #[test]
    fn test_refresh_keeps_single_spring() {
        let mut solver = SpringSolver::new(SpringOptions::default());
        let mut pose = PoseBuffer::new("mouth_open");
        let rig = skeletal();
        solver.apply_impulse(&rig, "spine", Vec3::X, 1.0).unwrap();
        solver.update(DT, &mut pose);
        solver.apply_impulse(&rig, "spine", -Vec3::X, 3.0).unwrap();
        assert_eq!(solver.len(), 1);
        assert_eq!(solver.springs()[0].coefficients.stiffness, 180.0);
    }

    #[test]
    fn test_parameter_rig_gets_scalar_offset() {
        let rig = ParameterRig::new(vec![ParameterSlot::new(
            "head_yaw", -30.0, 30.0, 0.0,
        )]);
        let mut solver = SpringSolver::new(SpringOptions::default());
        let mut pose = PoseBuffer::new("mouth_open");
        let _ = pose.set_parameter("head_yaw", 5.0);
        solver.apply_impulse(&rig, "head_yaw", Vec3::X, 1.0).unwrap();
        solver.update(DT, &mut pose);

        assert_eq!(pose.parameter("head_yaw"), Some(5.0));
        assert!(pose.composed("head_yaw").unwrap() > 5.0);
    }

    #[test]
    fn test_missing_target_and_bad_numbers_are_errors() {
        let mut solver = SpringSolver::new(SpringOptions::default());
        let rig = skeletal();
        assert!(matches!(
            solver.apply_impulse(&rig, "tail", Vec3::X, 1.0),
            Err(MotionError::MissingJoint(_))
        ));
        assert!(matches!(
            solver.apply_impulse(&rig, "head", Vec3::new(f32::NAN, 0.0, 0.0), 1.0),
            Err(MotionError::InvalidNumber(_))
        ));
        assert!(solver.is_empty());
    }

    #[test]
    fn test_large_dt_stays_stable() {
        let mut solver = SpringSolver::new(SpringOptions::default());
        let mut pose = PoseBuffer::new("mouth_open");
        solver
            .apply_impulse(&skeletal(), "J_Hair_Front", Vec3::X, 4.0)
            .unwrap();
        for _ in 0..20 {
            solver.update(0.25, &mut pose);
        }
        assert!(solver.is_empty());
    }
}
