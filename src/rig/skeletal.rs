//! Reference adapter for bone-driven 3D avatars.

use glam::{EulerRot, Quat, Vec2};
use rustc_hash::FxHashMap;

use super::pose::{ClipLayer, JointPose, PoseBuffer};
use super::{channels, AvatarRig, ClipInfo};

#[derive(Debug, Clone, Copy)]
struct JointState {
    rest: JointPose,
    current: JointPose,
}

/// In-memory skeletal rig: joints with bind poses, blend-shape style
/// expressions in [0, 1], and a look-at target for the eyes.
///
/// Expressions not written in a frame relax to 0, as joints without an
/// override return to rest.
///
/// Head aim channels are applied on top of whatever the spring solver wrote
/// for the head joint, so gaze and secondary motion compose.
#[derive(Debug, Clone)]
pub struct SkeletalRig {
    clips: FxHashMap<String, ClipInfo>,
    joints: FxHashMap<String, JointState>,
    expressions: FxHashMap<String, f32>,
    head_joint: String,
    look_at: Vec2,
    layers: Vec<ClipLayer>,
}

impl SkeletalRig {
    /// Empty rig whose head aim drives `head_joint`.
    #[must_use]
    pub fn new(head_joint: &str) -> Self {
        let mut joints = FxHashMap::default();
        let _ = joints.insert(
            head_joint.to_owned(),
            JointState {
                rest: JointPose::IDENTITY,
                current: JointPose::IDENTITY,
            },
        );
        Self {
            clips: FxHashMap::default(),
            joints,
            expressions: FxHashMap::default(),
            head_joint: head_joint.to_owned(),
            look_at: Vec2::ZERO,
            layers: Vec::new(),
        }
    }

    /// Register a clip.
    #[must_use]
    pub fn with_clip(mut self, name: &str, info: ClipInfo) -> Self {
        let _ = self.clips.insert(name.to_owned(), info);
        self
    }

    /// Register a joint with its bind pose.
    #[must_use]
    pub fn with_joint(mut self, name: &str, rest: JointPose) -> Self {
        let _ = self.joints.insert(
            name.to_owned(),
            JointState {
                rest,
                current: rest,
            },
        );
        self
    }

    /// Register an expression (blend shape group).
    #[must_use]
    pub fn with_expression(mut self, name: &str) -> Self {
        let _ = self.expressions.insert(name.to_owned(), 0.0);
        self
    }

    /// Current pose of a joint after the last apply.
    #[must_use]
    pub fn joint(&self, name: &str) -> Option<JointPose> {
        self.joints.get(name).map(|j| j.current)
    }

    /// Current weight of an expression after the last apply.
    #[must_use]
    pub fn expression(&self, name: &str) -> Option<f32> {
        self.expressions.get(name).copied()
    }

    /// Eye look-at direction after the last apply.
    #[must_use]
    pub fn look_at(&self) -> Vec2 {
        self.look_at
    }

    /// Clip layers from the last apply.
    #[must_use]
    pub fn layers(&self) -> &[ClipLayer] {
        &self.layers
    }

    fn head_aim(pose: &PoseBuffer) -> Quat {
        let deg = |name: &str| pose.composed(name).unwrap_or(0.0).to_radians();
        Quat::from_euler(
            EulerRot::YXZ,
            deg(channels::HEAD_YAW),
            deg(channels::HEAD_PITCH),
            deg(channels::HEAD_ROLL),
        )
    }
}

impl AvatarRig for SkeletalRig {
    fn clip(&self, name: &str) -> Option<ClipInfo> {
        self.clips.get(name).copied()
    }

    fn joint_rest(&self, name: &str) -> Option<JointPose> {
        self.joints.get(name).map(|j| j.rest)
    }

    fn parameter_range(&self, name: &str) -> Option<(f32, f32)> {
        self.expressions.contains_key(name).then_some((0.0, 1.0))
    }

    fn apply(&mut self, pose: &PoseBuffer) {
        self.layers.clear();
        self.layers.extend_from_slice(pose.layers());

        for (name, joint) in &mut self.joints {
            joint.current = pose.joint(name).unwrap_or(joint.rest);
        }
        let aim = Self::head_aim(pose);
        if let Some(head) = self.joints.get_mut(&self.head_joint) {
            head.current.rotation = (head.current.rotation * aim).normalize();
        }

        for slot in self.expressions.values_mut() {
            *slot = 0.0;
        }
        for (name, value) in pose.composed_parameters() {
            if let Some(slot) = self.expressions.get_mut(name) {
                *slot = value.clamp(0.0, 1.0);
            }
        }
        self.look_at = Vec2::new(
            pose.composed(channels::EYE_X).unwrap_or(0.0),
            pose.composed(channels::EYE_Y).unwrap_or(0.0),
        )
        .clamp(Vec2::NEG_ONE, Vec2::ONE);
    }
}
