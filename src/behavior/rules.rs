//! The priority-ordered transition rule table.

use super::state::CharacterState;
use crate::error::MotionError;

/// Snapshot of the inputs a rule condition may read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleContext {
    /// Whether the user is currently providing input.
    pub is_listening: bool,
    /// Whether the avatar is currently talking.
    pub is_speaking: bool,
    /// Seconds spent in the current state.
    pub time_in_state: f32,
    /// Seconds since listening input was last seen.
    pub since_listening_input: f32,
    /// Minimum thinking dwell (seconds).
    pub thinking_min_dwell: f32,
    /// Quiet time before listening ends (seconds).
    pub listening_quiet_timeout: f32,
}

/// Predicate half of a [`TransitionRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// `is_speaking` is set.
    Speaking,
    /// `is_listening` is set.
    Listening,
    /// `is_speaking` is clear.
    NotSpeaking,
    /// The thinking dwell has elapsed.
    DwellElapsed,
    /// Listening input stopped and has been quiet for the timeout.
    QuietTimeout,
}

impl Condition {
    /// Whether the condition can hold with no listening or speaking input.
    #[must_use]
    pub fn fires_when_quiet(self) -> bool {
        !matches!(self, Self::Speaking | Self::Listening)
    }

    /// Whether the condition holds for `ctx`.
    #[must_use]
    pub fn holds(self, ctx: &RuleContext) -> bool {
        match self {
            Self::Speaking => ctx.is_speaking,
            Self::Listening => ctx.is_listening,
            Self::NotSpeaking => !ctx.is_speaking,
            Self::DwellElapsed => ctx.time_in_state >= ctx.thinking_min_dwell,
            Self::QuietTimeout => {
                !ctx.is_listening
                    && ctx.since_listening_input >= ctx.listening_quiet_timeout
            }
        }
    }
}

/// One row of the rule table: `from → to when condition`, at `priority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    /// Source state; `None` matches any state.
    pub from: Option<CharacterState>,
    /// Destination state.
    pub to: CharacterState,
    /// Predicate that must hold for the rule to fire.
    pub condition: Condition,
    /// Higher wins.
    pub priority: u8,
}

impl TransitionRule {
    /// Rule that applies from every state.
    #[must_use]
    pub fn from_any(to: CharacterState, condition: Condition, priority: u8) -> Self {
        Self {
            from: None,
            to,
            condition,
            priority,
        }
    }

    /// Rule that applies from one state.
    #[must_use]
    pub fn new(
        from: CharacterState,
        to: CharacterState,
        condition: Condition,
        priority: u8,
    ) -> Self {
        Self {
            from: Some(from),
            to,
            condition,
            priority,
        }
    }

    fn applies_from(&self, state: CharacterState) -> bool {
        self.from.is_none_or(|from| from == state)
    }
}

/// Fixed, priority-ordered set of transition rules.
///
/// Rules are kept sorted by descending priority; rules of equal priority
/// keep the order they were given in, which breaks ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<TransitionRule>,
}

impl RuleTable {
    /// Table from arbitrary rules.
    #[must_use]
    pub fn new(mut rules: Vec<TransitionRule>) -> Self {
        // Stable: equal priorities keep their given order.
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { rules }
    }

    /// The standard conversational table.
    #[must_use]
    pub fn standard() -> Self {
        use CharacterState::{Idle, Listening, Speaking, Thinking};

        Self::new(vec![
            TransitionRule::from_any(Speaking, Condition::Speaking, 100),
            TransitionRule::from_any(Listening, Condition::Listening, 80),
            TransitionRule::new(Speaking, Idle, Condition::NotSpeaking, 40),
            TransitionRule::new(Thinking, Idle, Condition::DwellElapsed, 40),
            TransitionRule::new(Listening, Idle, Condition::QuietTimeout, 40),
        ])
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    /// The single winning rule for `state`, if any condition holds.
    ///
    /// The winner may target `state` itself, which means "hold".
    #[must_use]
    pub fn resolve(
        &self,
        state: CharacterState,
        ctx: &RuleContext,
    ) -> Option<&TransitionRule> {
        self.rules
            .iter()
            .find(|rule| rule.applies_from(state) && rule.condition.holds(ctx))
    }

    /// Check that every state other than idle has a way out once all
    /// inputs go quiet.
    ///
    /// A table that strands a state is legal at runtime (the state is
    /// simply held) but is almost certainly a configuration mistake.
    pub fn validate(&self) -> Result<(), MotionError> {
        let stranded: Vec<&str> = CharacterState::ALL
            .into_iter()
            .filter(|&state| state != CharacterState::Idle)
            .filter(|&state| {
                !self
                    .rules
                    .iter()
                    .any(|rule| {
                        rule.applies_from(state)
                            && rule.to != state
                            && rule.condition.fires_when_quiet()
                    })
            })
            .map(CharacterState::as_str)
            .collect();
        if stranded.is_empty() {
            Ok(())
        } else {
            Err(MotionError::RuleTable(format!(
                "no exit from: {}",
                stranded.join(", ")
            )))
        }
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RuleContext {
        RuleContext {
            is_listening: false,
            is_speaking: false,
            time_in_state: 0.0,
            since_listening_input: 0.0,
            thinking_min_dwell: 2.0,
            listening_quiet_timeout: 1.5,
        }
    }

    #[test]
    fn test_speaking_outranks_listening() {
        let table = RuleTable::standard();
        let ctx = RuleContext {
            is_listening: true,
            is_speaking: true,
            ..ctx()
        };
        for state in CharacterState::ALL {
            let rule = table.resolve(state, &ctx).unwrap();
            assert_eq!(rule.to, CharacterState::Speaking, "from {state}");
        }
    }

    #[test]
    fn test_nothing_fires_from_quiet_idle() {
        let table = RuleTable::standard();
        assert!(table.resolve(CharacterState::Idle, &ctx()).is_none());
    }

    #[test]
    fn test_thinking_holds_until_dwell() {
        let table = RuleTable::standard();
        let early = RuleContext {
            time_in_state: 1.9,
            ..ctx()
        };
        assert!(table.resolve(CharacterState::Thinking, &early).is_none());

        let late = RuleContext {
            time_in_state: 2.0,
            ..ctx()
        };
        let rule = table.resolve(CharacterState::Thinking, &late).unwrap();
        assert_eq!(rule.to, CharacterState::Idle);
    }

    #[test]
    fn test_listening_needs_quiet_timeout() {
        let table = RuleTable::standard();
        let recent = RuleContext {
            since_listening_input: 1.0,
            ..ctx()
        };
        assert!(table.resolve(CharacterState::Listening, &recent).is_none());

        let quiet = RuleContext {
            since_listening_input: 1.5,
            ..ctx()
        };
        let rule = table.resolve(CharacterState::Listening, &quiet).unwrap();
        assert_eq!(rule.to, CharacterState::Idle);
    }

    #[test]
    fn test_ties_break_by_table_order() {
        use CharacterState::{Idle, Thinking};

        let table = RuleTable::new(vec![
            TransitionRule::new(Idle, Thinking, Condition::NotSpeaking, 10),
            TransitionRule::new(Idle, Idle, Condition::NotSpeaking, 10),
        ]);
        let rule = table.resolve(Idle, &ctx()).unwrap();
        assert_eq!(rule.to, Thinking);
    }

    #[test]
    fn test_rules_sorted_by_priority() {
        let table = RuleTable::standard();
        let priorities: Vec<u8> =
            table.rules().iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![100, 80, 40, 40, 40]);
    }

    #[test]
    fn test_standard_table_validates() {
        assert!(RuleTable::standard().validate().is_ok());
    }

    #[test]
    fn test_stranded_state_fails_validation() {
        use CharacterState::{Idle, Listening, Speaking};

        let table = RuleTable::new(vec![
            TransitionRule::from_any(Speaking, Condition::Speaking, 100),
            TransitionRule::new(Speaking, Idle, Condition::NotSpeaking, 40),
            TransitionRule::new(Listening, Idle, Condition::QuietTimeout, 40),
        ]);
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("thinking"), "{err}");
        assert!(!err.to_string().contains("listening"), "{err}");
    }
}
