//! Diagnostics snapshot.

use std::fmt;

use crate::behavior::CharacterState;
use crate::idle::BlinkPhase;

/// What the engine is doing right now, for overlays and logs.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugInfo {
    /// Current behavior state.
    pub state: CharacterState,
    /// Seconds in that state.
    pub time_in_state: f32,
    /// Listening input flag.
    pub is_listening: bool,
    /// Speaking flag.
    pub is_speaking: bool,
    /// Active pool.
    pub pool: Option<String>,
    /// Current background clip.
    pub clip: Option<String>,
    /// Seconds since that clip was selected.
    pub clip_elapsed: f32,
    /// Seconds until the next background selection.
    pub time_until_next: f32,
    /// Whether a background cross-fade is running.
    pub blending: bool,
    /// Gesture playing, if any.
    pub gesture: Option<String>,
    /// Gestures queued or playing (at most one).
    pub active_gestures: usize,
    /// Live springs.
    pub springs: usize,
    /// Live expression entries.
    pub expressions: usize,
    /// Blink phase.
    pub blink: BlinkPhase,
    /// Lip-sync mouth openness.
    pub mouth_openness: f32,
}

impl fmt::Display for DebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.1}s | pool {} clip {} (next {:.1}s{}) | gesture {} | springs {} | expr {} | blink {:?} | mouth {:.2}",
            self.state,
            self.time_in_state,
            self.pool.as_deref().unwrap_or("-"),
            self.clip.as_deref().unwrap_or("-"),
            self.time_until_next,
            if self.blending { ", blending" } else { "" },
            self.gesture.as_deref().unwrap_or("-"),
            self.springs,
            self.expressions,
            self.blink,
            self.mouth_openness,
        )
    }
}
