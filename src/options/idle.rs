use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Idle Motion", inline)]
#[serde(default)]
/// Blink, gaze, breathing and pointer-drag parameters.
pub struct IdleOptions {
    /// Total closing + opening time of one blink (seconds).
    #[schemars(title = "Blink Duration", range(min = 0.05, max = 1.0), extend("step" = 0.01))]
    pub blink_duration: f32,
    /// How long the eyes stay shut mid-blink (seconds).
    #[schemars(title = "Blink Hold", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub blink_hold: f32,
    /// Inter-blink interval bounds `[min, max]` (seconds).
    #[schemars(skip)]
    pub blink_interval: [f32; 2],
    /// Probability that a blink is followed at once by a second one.
    #[schemars(title = "Double Blink Chance", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub double_blink_chance: f32,
    /// Gap before the second blink of a double blink (seconds).
    #[schemars(skip)]
    pub double_blink_gap: f32,
    /// Head aim re-roll interval bounds `[min, max]` (seconds).
    #[schemars(skip)]
    pub head_retarget_interval: [f32; 2],
    /// Eye saccade re-roll interval bounds `[min, max]` (seconds).
    #[schemars(skip)]
    pub eye_retarget_interval: [f32; 2],
    /// Per-frame smoothing toward the head aim target (at 60 fps).
    #[schemars(title = "Head Smoothing", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub head_smoothing: f32,
    /// Per-frame smoothing toward the eye saccade target (at 60 fps).
    #[schemars(title = "Eye Smoothing", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub eye_smoothing: f32,
    /// Saccade range in normalized eye units (x, y).
    #[schemars(skip)]
    pub eye_range: [f32; 2],
    /// Squint re-roll interval bounds `[min, max]` (seconds).
    #[schemars(skip)]
    pub squint_interval: [f32; 2],
    /// Eye openness range the squint target is drawn from.
    #[schemars(skip)]
    pub squint_range: [f32; 2],
    /// Breathing frequency (Hz).
    #[schemars(title = "Breathing Rate", range(min = 0.05, max = 1.0), extend("step" = 0.01))]
    pub breathing_frequency: f32,
    /// Velocity kick per unit of pointer drag.
    #[schemars(title = "Drag Gain", range(min = 0.0, max = 5.0), extend("step" = 0.05))]
    pub drag_gain: f32,
    /// Cap on drag velocity.
    #[schemars(skip)]
    pub drag_max_speed: f32,
    /// Cap on the drag offset added to head aim (degrees).
    #[schemars(skip)]
    pub drag_max_offset: f32,
}

impl Default for IdleOptions {
    fn default() -> Self {
        Self {
            blink_duration: 0.15,
            blink_hold: 0.05,
            blink_interval: [2.0, 6.0],
            double_blink_chance: 0.1,
            double_blink_gap: 0.12,
            head_retarget_interval: [1.0, 3.5],
            eye_retarget_interval: [0.2, 1.5],
            head_smoothing: 0.05,
            eye_smoothing: 0.15,
            eye_range: [1.0, 0.6],
            squint_interval: [2.0, 5.0],
            squint_range: [0.85, 1.0],
            breathing_frequency: 0.25,
            drag_gain: 0.6,
            drag_max_speed: 120.0,
            drag_max_offset: 30.0,
        }
    }
}
