use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Scheduler", inline)]
#[serde(default)]
/// Background clip scheduling parameters.
pub struct SchedulerOptions {
    /// Extra draws taken when the weighted pick repeats the current clip.
    #[schemars(title = "Repeat Retries", range(min = 0, max = 10))]
    pub repeat_retries: u32,
    /// Fallback play time when a pool declares no bounds (seconds).
    #[schemars(skip)]
    pub fallback_play_time: f32,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            repeat_retries: 3,
            fallback_play_time: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Gesture", inline)]
#[serde(default)]
/// One-shot gesture overlay parameters.
pub struct GestureOptions {
    /// Cross-fade time into and out of a gesture (seconds).
    #[schemars(title = "Gesture Fade", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub transition_time: f32,
}

impl Default for GestureOptions {
    fn default() -> Self {
        Self {
            transition_time: 0.3,
        }
    }
}
