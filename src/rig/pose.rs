//! The pose buffer: every named target the engine writes in a frame.

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

/// Local transform written to a skeletal joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPose {
    /// Local rotation.
    pub rotation: Quat,
    /// Local translation.
    pub translation: Vec3,
}

impl JointPose {
    /// Identity rotation at the origin.
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };

    /// Pose from a rotation and translation.
    #[must_use]
    pub fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Whether every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.rotation.is_finite() && self.translation.is_finite()
    }
}

impl Default for JointPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One clip the renderer should be mixing this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipLayer {
    /// Clip name as known to the rig.
    pub clip: String,
    /// Playback position in seconds.
    pub time: f32,
    /// Mix weight in [0, 1].
    pub weight: f32,
    /// Whether the clip wraps at its end.
    pub looping: bool,
}

/// Backend-agnostic output of one engine frame.
///
/// Scalars and joint poses persist between frames: a write that carries a
/// non-finite value is dropped and the previous value stays. Clip layers
/// are rebuilt every frame.
#[derive(Debug, Clone, Default)]
pub struct PoseBuffer {
    parameters: FxHashMap<String, f32>,
    offsets: FxHashMap<String, f32>,
    joints: FxHashMap<String, JointPose>,
    layers: Vec<ClipLayer>,
    lip_sync: f32,
    mouth_parameter: String,
}

impl PoseBuffer {
    /// Empty buffer whose lip-sync value composes onto `mouth_parameter`.
    #[must_use]
    pub fn new(mouth_parameter: &str) -> Self {
        Self {
            mouth_parameter: mouth_parameter.to_owned(),
            ..Self::default()
        }
    }

    /// Write a named scalar. Returns `false` (and keeps the previous value)
    /// if `value` is not finite.
    pub fn set_parameter(&mut self, name: &str, value: f32) -> bool {
        if !value.is_finite() {
            log::warn!("dropping non-finite value for parameter '{name}'");
            return false;
        }
        if let Some(slot) = self.parameters.get_mut(name) {
            *slot = value;
        } else {
            let _ = self.parameters.insert(name.to_owned(), value);
        }
        true
    }

    /// Last written value of a named scalar.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<f32> {
        self.parameters.get(name).copied()
    }

    /// Add a per-frame offset to a named scalar. Offsets stack until
    /// [`clear_offsets`](Self::clear_offsets) and are composed at read time,
    /// so absolute writes to the same name do not erase them.
    pub fn add_offset(&mut self, name: &str, delta: f32) -> bool {
        if !delta.is_finite() {
            log::warn!("dropping non-finite offset for parameter '{name}'");
            return false;
        }
        *self.offsets.entry(name.to_owned()).or_insert(0.0) += delta;
        true
    }

    /// Drop every per-frame offset.
    pub fn clear_offsets(&mut self) {
        self.offsets.clear();
    }

    fn compose(&self, name: &str, base: f32) -> f32 {
        let value = base + self.offsets.get(name).copied().unwrap_or(0.0);
        if name == self.mouth_parameter {
            value.max(self.lip_sync)
        } else {
            value
        }
    }

    /// Final value of one named scalar: the written value plus offsets,
    /// with lip-sync composed onto the mouth parameter.
    #[must_use]
    pub fn composed(&self, name: &str) -> Option<f32> {
        let written = self.parameters.get(name).copied();
        let has_offset = self.offsets.contains_key(name);
        let is_speaking_mouth =
            name == self.mouth_parameter && self.lip_sync > 0.0;
        if written.is_none() && !has_offset && !is_speaking_mouth {
            return None;
        }
        Some(self.compose(name, written.unwrap_or(0.0)))
    }

    /// Named scalars with offsets added and the lip-sync value composed
    /// onto the mouth parameter (`max` of the emotion value and the
    /// lip-sync value).
    ///
    /// The mouth parameter is always yielded once lip-sync is non-zero,
    /// even if no emotion wrote it.
    pub fn composed_parameters(&self) -> impl Iterator<Item = (&str, f32)> {
        let written = self
            .parameters
            .iter()
            .map(move |(k, v)| (k.as_str(), self.compose(k, *v)));
        let offset_only = self
            .offsets
            .keys()
            .filter(move |k| !self.parameters.contains_key(*k))
            .map(move |k| (k.as_str(), self.compose(k, 0.0)));
        let mouth = self.mouth_parameter.as_str();
        let mouth_only = (self.lip_sync > 0.0
            && !self.parameters.contains_key(mouth)
            && !self.offsets.contains_key(mouth))
        .then_some((mouth, self.lip_sync));
        written.chain(offset_only).chain(mouth_only)
    }

    /// Write a joint's local transform. Returns `false` (and keeps the
    /// previous pose) if any component is not finite.
    pub fn set_joint(&mut self, name: &str, pose: JointPose) -> bool {
        if !pose.is_finite() {
            log::warn!("dropping non-finite pose for joint '{name}'");
            return false;
        }
        if let Some(slot) = self.joints.get_mut(name) {
            *slot = pose;
        } else {
            let _ = self.joints.insert(name.to_owned(), pose);
        }
        true
    }

    /// Last written pose of a joint.
    #[must_use]
    pub fn joint(&self, name: &str) -> Option<JointPose> {
        self.joints.get(name).copied()
    }

    /// Drop a joint override so the rig falls back to clip-driven motion.
    pub fn clear_joint(&mut self, name: &str) {
        let _ = self.joints.remove(name);
    }

    /// Clip layers for this frame.
    #[must_use]
    pub fn layers(&self) -> &[ClipLayer] {
        &self.layers
    }

    /// Replace this frame's clip layers.
    pub fn set_layers(&mut self, layers: impl IntoIterator<Item = ClipLayer>) {
        self.layers.clear();
        self.layers.extend(layers);
    }

    /// Set the lip-sync mouth openness, clamped to [0, 1].
    pub fn set_lip_sync(&mut self, value: f32) {
        if value.is_finite() {
            self.lip_sync = value.clamp(0.0, 1.0);
        }
    }
}
