use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Expression", inline)]
#[serde(default)]
/// Expression blend parameters.
pub struct ExpressionOptions {
    /// Time for one expression entry to ease from start to target
    /// (seconds).
    #[schemars(title = "Ease Duration", range(min = 0.05, max = 5.0), extend("step" = 0.05))]
    pub ease_duration: f32,
}

impl Default for ExpressionOptions {
    fn default() -> Self {
        Self { ease_duration: 1.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lip Sync", inline)]
#[serde(default)]
/// Audio envelope to mouth-openness mapping.
pub struct LipSyncOptions {
    /// Logistic gain applied to peak amplitude.
    #[schemars(title = "Gain", range(min = 1.0, max = 100.0), extend("step" = 1.0))]
    pub gain: f32,
    /// Logistic offset; larger values need louder audio to open the mouth.
    #[schemars(title = "Offset", range(min = 0.0, max = 20.0), extend("step" = 0.5))]
    pub offset: f32,
    /// Openness below this is floored to exactly zero.
    #[schemars(title = "Silence Floor", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub floor: f32,
    /// Parameter the openness is written to.
    #[schemars(skip)]
    pub mouth_parameter: String,
}

impl Default for LipSyncOptions {
    fn default() -> Self {
        Self {
            gain: 45.0,
            offset: 5.0,
            floor: 0.1,
            mouth_parameter: "mouth_open".to_owned(),
        }
    }
}
