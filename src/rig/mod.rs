//! Pose-target abstraction and rig adapters.
//!
//! The engine never talks to a scene graph directly. Every component writes
//! into a [`PoseBuffer`]; an [`AvatarRig`] adapter resolves names against
//! the loaded model and performs the final write. Two reference adapters
//! are provided: [`SkeletalRig`] for bone-driven 3D avatars and
//! [`ParameterRig`] for named-parameter 2D avatars.

mod audio;
mod parameter;
mod pose;
mod skeletal;

pub use audio::{AudioSource, SampleWindow};
pub use parameter::{ParameterRig, ParameterSlot};
pub use pose::{ClipLayer, JointPose, PoseBuffer};
use serde::{Deserialize, Serialize};
pub use skeletal::SkeletalRig;

/// Parameter names the engine writes regardless of rig type.
pub mod channels {
    /// Head yaw in degrees (positive turns to the avatar's left).
    pub const HEAD_YAW: &str = "head_yaw";
    /// Head pitch in degrees (positive looks up).
    pub const HEAD_PITCH: &str = "head_pitch";
    /// Head roll in degrees.
    pub const HEAD_ROLL: &str = "head_roll";
    /// Horizontal eye direction in [-1, 1].
    pub const EYE_X: &str = "eye_x";
    /// Vertical eye direction in [-1, 1].
    pub const EYE_Y: &str = "eye_y";
    /// Eye openness in [0, 1].
    pub const EYE_OPEN: &str = "eye_open";
    /// Breathing phase in [0, 1].
    pub const BREATH: &str = "breath";
}

/// Playback facts about a clip the rig can play.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipInfo {
    /// Clip length in seconds.
    pub duration: f32,
    /// Whether the clip is authored to loop.
    pub looping: bool,
}

impl ClipInfo {
    /// Looping clip of the given length.
    #[must_use]
    pub fn looping(duration: f32) -> Self {
        Self {
            duration,
            looping: true,
        }
    }

    /// One-shot clip of the given length.
    #[must_use]
    pub fn once(duration: f32) -> Self {
        Self {
            duration,
            looping: false,
        }
    }
}

/// Physical class of a joint, which fixes its spring damping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointClass {
    /// Head and neck.
    Head,
    /// Torso, limbs and anything unclassified.
    Body,
    /// Hair strands.
    Hair,
    /// Ribbons, ears, tails and other attachments.
    Accessory,
}

impl JointClass {
    /// Classify a joint from its name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.contains("hair") {
            Self::Hair
        } else if lower.contains("head") || lower.contains("neck") {
            Self::Head
        } else if ["ribbon", "ear", "tail", "accessory", "acc_"]
            .iter()
            .any(|tag| lower.contains(tag))
        {
            Self::Accessory
        } else {
            Self::Body
        }
    }
}

/// The avatar/rendering collaborator as the engine sees it.
///
/// Implementors resolve names against a loaded model. Lookups return `None`
/// for names the model does not have; the engine logs and skips those.
pub trait AvatarRig {
    /// Look up a playable clip.
    fn clip(&self, name: &str) -> Option<ClipInfo>;

    /// Bind-pose transform of a joint, if the model has it.
    fn joint_rest(&self, name: &str) -> Option<JointPose>;

    /// Authored `[min, max]` range of an expression or parameter.
    fn parameter_range(&self, name: &str) -> Option<(f32, f32)>;

    /// Physical class of a joint. Defaults to a name-based guess.
    fn joint_class(&self, name: &str) -> JointClass {
        JointClass::from_name(name)
    }

    /// Write one frame's output into the model.
    fn apply(&mut self, pose: &PoseBuffer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_class_from_name() {
        assert_eq!(JointClass::from_name("J_Sec_Hair1_L"), JointClass::Hair);
        assert_eq!(JointClass::from_name("Head"), JointClass::Head);
        assert_eq!(JointClass::from_name("neck"), JointClass::Head);
        assert_eq!(JointClass::from_name("ribbon_01"), JointClass::Accessory);
        assert_eq!(JointClass::from_name("Spine"), JointClass::Body);
    }
}
