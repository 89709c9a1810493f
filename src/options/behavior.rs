use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Behavior", inline)]
#[serde(default)]
/// Timeouts for the behavior state machine.
pub struct BehaviorOptions {
    /// Minimum time spent thinking before returning to idle (seconds).
    #[schemars(title = "Thinking Dwell", range(min = 0.0, max = 30.0), extend("step" = 0.1))]
    pub thinking_min_dwell: f32,
    /// Quiet time after the last listening input before returning to idle
    /// (seconds).
    #[schemars(title = "Listening Timeout", range(min = 0.0, max = 30.0), extend("step" = 0.1))]
    pub listening_quiet_timeout: f32,
}

impl Default for BehaviorOptions {
    fn default() -> Self {
        Self {
            thinking_min_dwell: 2.0,
            listening_quiet_timeout: 1.5,
        }
    }
}
