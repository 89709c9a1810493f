//! Audio-envelope lip-sync.

use crate::options::LipSyncOptions;
use crate::rig::{AudioSource, PoseBuffer};

/// Maps the peak amplitude of the latest audio window to mouth openness.
///
/// The mapping is a logistic curve `1 / (1 + e^(-gain * peak + offset))`;
/// results under the floor are forced to exactly zero so the mouth closes
/// fully during silence.
#[derive(Debug, Clone)]
pub struct LipSyncAnalyzer {
    options: LipSyncOptions,
    scratch: Vec<f32>,
    value: f32,
}

impl LipSyncAnalyzer {
    /// Analyzer using the given curve parameters.
    #[must_use]
    pub fn new(options: LipSyncOptions) -> Self {
        Self {
            options,
            scratch: Vec::new(),
            value: 0.0,
        }
    }

    /// Mouth openness computed by the last [`analyze`](Self::analyze).
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Logistic mapping from a peak amplitude to openness in [0, 1].
    #[must_use]
    pub fn openness(&self, peak: f32) -> f32 {
        let raw = 1.0
            / (1.0 + (-self.options.gain * peak + self.options.offset).exp());
        if !raw.is_finite() || raw < self.options.floor {
            0.0
        } else {
            raw.min(1.0)
        }
    }

    /// Read the source's current window, compute openness and write it to
    /// the pose buffer's lip-sync slot. No source means silence.
    pub fn analyze(
        &mut self,
        source: Option<&dyn AudioSource>,
        pose: &mut PoseBuffer,
    ) -> f32 {
        self.scratch.clear();
        if let Some(source) = source {
            source.read_time_domain(&mut self.scratch);
        }
        let peak = self
            .scratch
            .iter()
            .filter(|s| s.is_finite())
            .fold(0.0_f32, |acc, s| acc.max(s.abs()));
        self.value = self.openness(peak);
        pose.set_lip_sync(self.value);
        self.value
    }
}
