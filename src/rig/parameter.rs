//! Reference adapter for named-parameter 2D avatars.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::pose::{ClipLayer, JointPose, PoseBuffer};
use super::{AvatarRig, ClipInfo};

/// One authored model parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSlot {
    /// Parameter id in the model.
    pub name: String,
    /// Authored minimum.
    pub min: f32,
    /// Authored maximum.
    pub max: f32,
    /// Value when nothing drives the parameter.
    pub default: f32,
    /// Value after the last apply.
    #[serde(skip)]
    pub value: f32,
}

impl ParameterSlot {
    /// Slot with the given authored range and default.
    #[must_use]
    pub fn new(name: &str, min: f32, max: f32, default: f32) -> Self {
        Self {
            name: name.to_owned(),
            min,
            max,
            default,
            value: default,
        }
    }
}

/// In-memory parameter rig.
///
/// The name → slot index table is resolved once at construction and owned
/// by the instance. Engine channel names can be aliased onto model ids
/// (e.g. `head_yaw` → `ParamAngleX`). Every written value is clamped to the
/// slot's authored range, which keeps lip-sync inside the mouth range.
#[derive(Debug, Clone)]
pub struct ParameterRig {
    clips: FxHashMap<String, ClipInfo>,
    slots: Vec<ParameterSlot>,
    index: FxHashMap<String, usize>,
    layers: Vec<ClipLayer>,
}

impl ParameterRig {
    /// Rig over the given authored parameters.
    #[must_use]
    pub fn new(slots: Vec<ParameterSlot>) -> Self {
        let index = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.name.clone(), i))
            .collect();
        Self {
            clips: FxHashMap::default(),
            slots,
            index,
            layers: Vec::new(),
        }
    }

    /// Register a clip (motion).
    #[must_use]
    pub fn with_clip(mut self, name: &str, info: ClipInfo) -> Self {
        let _ = self.clips.insert(name.to_owned(), info);
        self
    }

    /// Route an engine channel onto an existing model parameter.
    ///
    /// Ignored (with a warning) if the target parameter does not exist.
    #[must_use]
    pub fn with_alias(mut self, channel: &str, parameter: &str) -> Self {
        match self.index.get(parameter).copied() {
            Some(i) => {
                let _ = self.index.insert(channel.to_owned(), i);
            }
            None => log::warn!(
                "cannot alias '{channel}': no parameter '{parameter}'"
            ),
        }
        self
    }

    /// Value of a parameter (by model id or alias) after the last apply.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<f32> {
        self.index.get(name).map(|&i| self.slots[i].value)
    }

    /// Clip layers from the last apply.
    #[must_use]
    pub fn layers(&self) -> &[ClipLayer] {
        &self.layers
    }
}

impl AvatarRig for ParameterRig {
    fn clip(&self, name: &str) -> Option<ClipInfo> {
        self.clips.get(name).copied()
    }

    fn joint_rest(&self, _name: &str) -> Option<JointPose> {
        None
    }

    fn parameter_range(&self, name: &str) -> Option<(f32, f32)> {
        self.index.get(name).map(|&i| {
            let slot = &self.slots[i];
            (slot.min, slot.max)
        })
    }

    fn apply(&mut self, pose: &PoseBuffer) {
        self.layers.clear();
        self.layers.extend_from_slice(pose.layers());

        for slot in &mut self.slots {
            slot.value = slot.default;
        }
        for (name, value) in pose.composed_parameters() {
            if let Some(&i) = self.index.get(name) {
                let slot = &mut self.slots[i];
                slot.value = value.clamp(slot.min, slot.max);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::channels;

    fn rig() -> ParameterRig {
        ParameterRig::new(vec![
            ParameterSlot::new("ParamAngleX", -30.0, 30.0, 0.0),
            ParameterSlot::new("ParamMouthOpenY", 0.0, 0.8, 0.0),
            ParameterSlot::new("ParamEyeLOpen", 0.0, 1.0, 1.0),
        ])
        .with_alias(channels::HEAD_YAW, "ParamAngleX")
        .with_alias("mouth_open", "ParamMouthOpenY")
        .with_alias(channels::EYE_OPEN, "ParamEyeLOpen")
    }

    #[test]
    fn test_aliases_resolve_to_model_parameters() {
        let rig = rig();
        assert_eq!(rig.parameter_range(channels::HEAD_YAW), Some((-30.0, 30.0)));
        assert_eq!(rig.parameter_range("ParamAngleX"), Some((-30.0, 30.0)));
        assert!(rig.parameter_range("ParamBodyAngleZ").is_none());
        assert!(rig.joint_rest("head").is_none());
    }

    #[test]
    fn test_alias_to_missing_parameter_is_ignored() {
        let rig = rig().with_alias("head_pitch", "ParamAngleY");
        assert!(rig.value("head_pitch").is_none());
    }

    #[test]
    fn test_lip_sync_never_exceeds_authored_mouth_range() {
        let mut rig = rig();
        let mut pose = PoseBuffer::new("mouth_open");
        pose.set_lip_sync(1.0);
        rig.apply(&pose);
        assert_eq!(rig.value("ParamMouthOpenY"), Some(0.8));
    }

    #[test]
    fn test_unwritten_parameters_fall_back_to_default() {
        let mut rig = rig();
        let mut pose = PoseBuffer::new("mouth_open");
        let _ = pose.set_parameter(channels::HEAD_YAW, 45.0);
        let _ = pose.set_parameter(channels::EYE_OPEN, 0.2);
        rig.apply(&pose);
        assert_eq!(rig.value("ParamAngleX"), Some(30.0));
        assert_eq!(rig.value("ParamEyeLOpen"), Some(0.2));

        let pose = PoseBuffer::new("mouth_open");
        rig.apply(&pose);
        assert_eq!(rig.value("ParamAngleX"), Some(0.0));
        assert_eq!(rig.value("ParamEyeLOpen"), Some(1.0));
    }
}
