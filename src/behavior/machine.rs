//! The behavior state machine: sole writer of [`CharacterState`].

use super::rules::{RuleContext, RuleTable};
use super::state::CharacterState;
use crate::options::BehaviorOptions;

/// A state switch produced by [`BehaviorStateMachine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    /// State that was left.
    pub from: CharacterState,
    /// State that was entered.
    pub to: CharacterState,
}

/// Evaluates the rule table once per frame and owns the current state.
#[derive(Debug, Clone)]
pub struct BehaviorStateMachine {
    state: CharacterState,
    time_in_state: f32,
    is_listening: bool,
    is_speaking: bool,
    /// Clock time listening input was last seen.
    last_listening_input: f64,
    clock: f64,
    rules: RuleTable,
    options: BehaviorOptions,
}

impl BehaviorStateMachine {
    /// Machine in [`CharacterState::Idle`] driven by `rules`.
    #[must_use]
    pub fn new(rules: RuleTable, options: BehaviorOptions) -> Self {
        Self {
            state: CharacterState::Idle,
            time_in_state: 0.0,
            is_listening: false,
            is_speaking: false,
            last_listening_input: 0.0,
            clock: 0.0,
            rules,
            options,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> CharacterState {
        self.state
    }

    /// Seconds spent in the current state.
    #[must_use]
    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    /// Whether listening input is active.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.is_listening
    }

    /// Whether the avatar is speaking.
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.is_speaking
    }

    /// The rule table in use.
    #[must_use]
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Set the listening input flag. Raising it counts as fresh input.
    pub fn set_listening(&mut self, listening: bool) {
        if listening {
            self.last_listening_input = self.clock;
        }
        self.is_listening = listening;
    }

    /// Set the speaking flag.
    pub fn set_speaking(&mut self, speaking: bool) {
        self.is_speaking = speaking;
    }

    /// Switch to `state`. A no-op when already there, unless `force`.
    ///
    /// Resets the per-state timer and returns the change so the caller can
    /// reconfigure everything bound to the state.
    pub fn set_state(
        &mut self,
        state: CharacterState,
        force: bool,
    ) -> Option<StateChange> {
        if state == self.state && !force {
            return None;
        }
        let change = StateChange {
            from: self.state,
            to: state,
        };
        log::debug!(
            "behavior: {} -> {} after {:.2}s",
            change.from,
            change.to,
            self.time_in_state
        );
        self.state = state;
        self.time_in_state = 0.0;
        Some(change)
    }

    /// Advance timers and fire at most one rule.
    pub fn update(&mut self, dt: f32) -> Option<StateChange> {
        self.clock += f64::from(dt);
        self.time_in_state += dt;
        if self.is_listening {
            self.last_listening_input = self.clock;
        }

        let ctx = RuleContext {
            is_listening: self.is_listening,
            is_speaking: self.is_speaking,
            time_in_state: self.time_in_state,
            // Quiet time counts from the later of the last input and entry
            since_listening_input: ((self.clock - self.last_listening_input)
                as f32)
                .min(self.time_in_state),
            thinking_min_dwell: self.options.thinking_min_dwell,
            listening_quiet_timeout: self.options.listening_quiet_timeout,
        };
        let target = self.rules.resolve(self.state, &ctx)?.to;
        self.set_state(target, false)
    }
}
