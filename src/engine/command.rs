//! The engine's complete input vocabulary.
//!
//! Every setter on [`MotionEngine`] has a matching [`EngineCommand`], so a
//! host can queue commands or forward them as JSON from a chat or socket
//! transport and apply them between frames with
//! [`MotionEngine::execute`].

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::MotionEngine;
use crate::behavior::CharacterState;
use crate::expression::ExpressionTarget;
use crate::rig::AvatarRig;

/// One input to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineCommand {
    /// Switch state directly.
    SetState {
        /// Target state.
        state: CharacterState,
        /// Re-enter even if already in `state`.
        #[serde(default)]
        force: bool,
    },
    /// Listening input started or stopped.
    SetListening {
        /// New flag value.
        active: bool,
    },
    /// Speech started or stopped.
    SetSpeaking {
        /// New flag value.
        active: bool,
    },
    /// Play a one-shot gesture clip.
    TriggerGesture {
        /// Clip name.
        name: String,
    },
    /// Replace the emotion expression set.
    PlayEmotion {
        /// Expression weights.
        targets: Vec<ExpressionTarget>,
    },
    /// Kick a joint with a spring impulse.
    ApplyImpulse {
        /// Joint or head parameter name.
        joint: String,
        /// Kick direction; its length scales the kick.
        direction: Vec3,
        /// Stiffness multiplier.
        strength: f32,
    },
    /// Pointer moved (or left the view).
    SetPointer {
        /// Normalized view position, y up.
        position: Option<Vec2>,
    },
    /// Pointer dragged.
    Drag {
        /// Delta in pixels, y down.
        delta: Vec2,
    },
}

impl EngineCommand {
    /// Apply this command to `engine`.
    pub fn execute<R: AvatarRig>(self, engine: &mut MotionEngine<R>) {
        match self {
            Self::SetState { state, force } => engine.set_state(state, force),
            Self::SetListening { active } => engine.set_listening(active),
            Self::SetSpeaking { active } => engine.set_speaking(active),
            Self::TriggerGesture { name } => engine.trigger_gesture(&name),
            Self::PlayEmotion { targets } => engine.play_emotion(&targets),
            Self::ApplyImpulse {
                joint,
                direction,
                strength,
            } => engine.apply_impulse(&joint, direction, strength),
            Self::SetPointer { position } => engine.set_pointer(position),
            Self::Drag { delta } => engine.drag(delta),
        }
    }
}

impl<R: AvatarRig> MotionEngine<R> {
    /// Apply one command.
    pub fn execute(&mut self, command: EngineCommand) {
        command.execute(self);
    }
}
