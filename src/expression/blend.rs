//! Eased cross-fades between sets of expression targets.

use super::ExpressionTarget;
use crate::rig::PoseBuffer;
use crate::util::easing::{lerp, EasingFunction};

/// Difference below which two targets count as the same value.
const TARGET_EPSILON: f32 = 1e-6;

/// One expression being eased toward its target.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionEntry {
    /// Expression name.
    pub key: String,
    /// Value the current ease started from.
    pub start: f32,
    /// Value as of the last update.
    pub current: f32,
    /// Value being eased toward.
    pub target: f32,
    /// Ease progress in [0, 1].
    pub progress: f32,
}

impl ExpressionEntry {
    fn retarget(&mut self, target: f32) {
        if (self.target - target).abs() <= TARGET_EPSILON {
            return;
        }
        self.start = self.current;
        self.target = target;
        self.progress = 0.0;
    }

    fn is_spent(&self) -> bool {
        self.target == 0.0 && self.progress >= 1.0
    }
}

/// Owns the expression entry set and eases it every frame.
///
/// Two target layers feed the entry set: per-state defaults and the most
/// recent emotion. Emotion keys override default keys; a key present in
/// neither fades to zero and is then pruned.
#[derive(Debug, Clone)]
pub struct ExpressionBlender {
    entries: Vec<ExpressionEntry>,
    defaults: Vec<ExpressionTarget>,
    emotion: Vec<ExpressionTarget>,
    ease_duration: f32,
    easing: EasingFunction,
}

impl ExpressionBlender {
    /// Blender whose eases take `ease_duration` seconds.
    #[must_use]
    pub fn new(ease_duration: f32) -> Self {
        Self {
            entries: Vec::new(),
            defaults: Vec::new(),
            emotion: Vec::new(),
            ease_duration: ease_duration.max(f32::EPSILON),
            easing: EasingFunction::SineInOut,
        }
    }

    /// Live entries.
    #[must_use]
    pub fn entries(&self) -> &[ExpressionEntry] {
        &self.entries
    }

    /// Current value of an expression, if it has an entry.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.current)
    }

    /// Replace the emotion target set.
    ///
    /// Keys shared with the live set ease from their current value; keys
    /// missing from the new set fade to zero; new keys ease in from zero.
    /// Re-sending an unchanged target does not restart its ease.
    pub fn play_emotion(&mut self, targets: &[ExpressionTarget]) {
        self.emotion = sanitized(targets);
        self.retarget();
    }

    /// Replace the per-state default targets.
    pub fn set_defaults(&mut self, targets: &[ExpressionTarget]) {
        self.defaults = sanitized(targets);
        self.retarget();
    }

    fn retarget(&mut self) {
        for entry in &mut self.entries {
            let target = effective_target(&self.emotion, &self.defaults, &entry.key);
            entry.retarget(target);
        }
        for target in self.emotion.iter().chain(&self.defaults) {
            if self.entries.iter().any(|e| e.key == target.key) {
                continue;
            }
            self.entries.push(ExpressionEntry {
                key: target.key.clone(),
                start: 0.0,
                current: 0.0,
                target: effective_target(&self.emotion, &self.defaults, &target.key),
                progress: 0.0,
            });
        }
    }

    /// Advance every ease by `dt`, write values into `pose`, and prune
    /// entries that have fully faded out.
    pub fn update(&mut self, dt: f32, pose: &mut PoseBuffer) {
        let step = dt.max(0.0) / self.ease_duration;
        for entry in &mut self.entries {
            entry.progress = (entry.progress + step).min(1.0);
            let eased = self.easing.evaluate(entry.progress);
            entry.current = lerp(entry.start, entry.target, eased);
            let _ = pose.set_parameter(&entry.key, entry.current);
        }
        self.entries.retain(|e| !e.is_spent());
    }
}

/// Emotion value for `key`, else the state default, else zero.
fn effective_target(
    emotion: &[ExpressionTarget],
    defaults: &[ExpressionTarget],
    key: &str,
) -> f32 {
    emotion
        .iter()
        .chain(defaults)
        .find(|t| t.key == key)
        .map_or(0.0, |t| t.value)
}

fn sanitized(targets: &[ExpressionTarget]) -> Vec<ExpressionTarget> {
    let mut out: Vec<ExpressionTarget> = Vec::with_capacity(targets.len());
    for target in targets {
        if !target.value.is_finite() {
            log::warn!("ignoring non-finite weight for '{}'", target.key);
            continue;
        }
        // Last write wins for duplicate keys.
        if let Some(existing) = out.iter_mut().find(|t| t.key == target.key) {
            existing.value = target.value;
        } else {
            out.push(target.clone());
        }
    }
    out
}
