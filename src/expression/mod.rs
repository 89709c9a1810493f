//! Facial expression blending and audio-driven lip-sync.
//!
//! - [`ExpressionBlender`]: eased multi-target expression cross-fades
//! - [`LipSyncAnalyzer`]: audio envelope to mouth openness

mod blend;
mod lipsync;

pub use blend::{ExpressionBlender, ExpressionEntry};
pub use lipsync::LipSyncAnalyzer;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One requested expression weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExpressionTarget {
    /// Expression or parameter name.
    pub key: String,
    /// Requested weight.
    pub value: f32,
}

impl ExpressionTarget {
    /// Target `key` at `value`.
    #[must_use]
    pub fn new(key: &str, value: f32) -> Self {
        Self {
            key: key.to_owned(),
            value,
        }
    }
}
