//! Read-only queries on [`MotionEngine`].

use super::{DebugInfo, MotionEngine};
use crate::animation::{GestureOverlay, PoolScheduler};
use crate::behavior::CharacterState;
use crate::expression::ExpressionBlender;
use crate::idle::IdleGenerator;
use crate::options::Options;
use crate::physics::SpringSolver;
use crate::profile::CharacterProfile;
use crate::rig::{AvatarRig, PoseBuffer};

// ── State ──

impl<R: AvatarRig> MotionEngine<R> {
    /// Current behavior state.
    #[must_use]
    pub fn current_state(&self) -> CharacterState {
        self.behavior.state()
    }

    /// Seconds since the first frame.
    #[must_use]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// The pose written by the last [`update`](Self::update).
    #[must_use]
    pub fn pose(&self) -> &PoseBuffer {
        &self.pose
    }

    /// The driven rig.
    #[must_use]
    pub fn rig(&self) -> &R {
        &self.rig
    }

    /// Mutable access to the rig, e.g. to render from it.
    pub fn rig_mut(&mut self) -> &mut R {
        &mut self.rig
    }

    /// Options the engine was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Character profile the engine was built with.
    #[must_use]
    pub fn profile(&self) -> &CharacterProfile {
        &self.profile
    }
}

// ── Components ──

impl<R: AvatarRig> MotionEngine<R> {
    /// Background clip scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &PoolScheduler {
        &self.scheduler
    }

    /// Gesture overlay.
    #[must_use]
    pub fn gesture(&self) -> &GestureOverlay {
        &self.gesture
    }

    /// Spring solver.
    #[must_use]
    pub fn springs(&self) -> &SpringSolver {
        &self.springs
    }

    /// Idle generator.
    #[must_use]
    pub fn idle(&self) -> &IdleGenerator {
        &self.idle
    }

    /// Expression blender.
    #[must_use]
    pub fn expression(&self) -> &ExpressionBlender {
        &self.expression
    }

    /// Snapshot of everything worth showing in a debug overlay.
    #[must_use]
    pub fn debug_info(&self) -> DebugInfo {
        let runtime = self.scheduler.runtime();
        DebugInfo {
            state: self.behavior.state(),
            time_in_state: self.behavior.time_in_state(),
            is_listening: self.behavior.is_listening(),
            is_speaking: self.behavior.is_speaking(),
            pool: runtime.pool.clone(),
            clip: self.scheduler.current_clip().map(str::to_owned),
            clip_elapsed: runtime.clip_elapsed,
            time_until_next: runtime.time_until_next.max(0.0),
            blending: runtime.blending,
            gesture: self.gesture.active().map(|g| g.clip.clone()),
            active_gestures: usize::from(self.gesture.is_active()),
            springs: self.springs.len(),
            expressions: self.expression.entries().len(),
            blink: self.idle.blink().phase(),
            mouth_openness: self.lip_sync.value(),
        }
    }
}
