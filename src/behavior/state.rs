//! Behavior states and their static per-state configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::expression::ExpressionTarget;

/// What the avatar is doing at a high level. Exactly one is active.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CharacterState {
    /// Nothing is happening; ambient motion only.
    #[default]
    Idle,
    /// The user is talking or typing.
    Listening,
    /// A reply is being prepared.
    Thinking,
    /// The avatar is talking.
    Speaking,
}

impl CharacterState {
    /// Every state, in declaration order.
    pub const ALL: [Self; 4] =
        [Self::Idle, Self::Listening, Self::Thinking, Self::Speaking];

    /// Lowercase name for logs and diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Thinking => "thinking",
            Self::Speaking => "speaking",
        }
    }
}

impl std::fmt::Display for CharacterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the eyes and head drift while in a state.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum GazePattern {
    /// Wander over the idle posture menu.
    #[default]
    Random,
    /// Bias upward, as if recalling something.
    Upward,
    /// Hold near the viewer.
    Forward,
    /// Track the last pointer position.
    PointerFollow,
}

/// Immutable configuration of one behavior state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateConfig {
    /// Gaze behavior while in this state.
    #[serde(default)]
    pub gaze: GazePattern,
    /// Name of the animation pool bound to this state.
    pub pool: String,
    /// Cross-fade time into this state's clips (seconds).
    #[serde(default = "default_blend")]
    pub blend_in: f32,
    /// Cross-fade time out of this state's clips (seconds).
    #[serde(default = "default_blend")]
    pub blend_out: f32,
    /// Expression weights applied on entry.
    #[serde(default)]
    pub expression: Vec<ExpressionTarget>,
}

fn default_blend() -> f32 {
    0.5
}

impl StateConfig {
    /// Config bound to `pool` with default gaze, blends and no expression.
    #[must_use]
    pub fn new(pool: &str) -> Self {
        Self {
            gaze: GazePattern::default(),
            expression: Vec::new(),
            pool: pool.to_owned(),
            blend_in: default_blend(),
            blend_out: default_blend(),
        }
    }

    /// Set the gaze pattern.
    #[must_use]
    pub fn with_gaze(mut self, gaze: GazePattern) -> Self {
        self.gaze = gaze;
        self
    }

    /// Add a default expression weight.
    #[must_use]
    pub fn with_expression(mut self, key: &str, value: f32) -> Self {
        self.expression.push(ExpressionTarget::new(key, value));
        self
    }
}

/// One [`StateConfig`] per [`CharacterState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateConfigs {
    /// Configuration for [`CharacterState::Idle`].
    pub idle: StateConfig,
    /// Configuration for [`CharacterState::Listening`].
    pub listening: StateConfig,
    /// Configuration for [`CharacterState::Thinking`].
    pub thinking: StateConfig,
    /// Configuration for [`CharacterState::Speaking`].
    pub speaking: StateConfig,
}

impl StateConfigs {
    /// Config for a given state.
    #[must_use]
    pub fn get(&self, state: CharacterState) -> &StateConfig {
        match state {
            CharacterState::Idle => &self.idle,
            CharacterState::Listening => &self.listening,
            CharacterState::Thinking => &self.thinking,
            CharacterState::Speaking => &self.speaking,
        }
    }
}

impl Default for StateConfigs {
    fn default() -> Self {
        Self {
            idle: StateConfig::new("idle"),
            listening: StateConfig::new("listening")
                .with_gaze(GazePattern::Forward)
                .with_expression("relaxed", 0.3),
            thinking: StateConfig::new("thinking")
                .with_gaze(GazePattern::Upward),
            speaking: StateConfig::new("speaking")
                .with_gaze(GazePattern::Forward)
                .with_expression("happy", 0.2),
        }
    }
}
