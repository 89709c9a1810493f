//! High-level behavior: which state the avatar is in and why.
//!
//! - [`CharacterState`] / [`StateConfig`]: the states and their static
//!   configuration
//! - [`RuleTable`]: priority-ordered transition rules
//! - [`BehaviorStateMachine`]: evaluates the table once per frame

mod machine;
mod rules;
mod state;

pub use machine::{BehaviorStateMachine, StateChange};
pub use rules::{Condition, RuleContext, RuleTable, TransitionRule};
pub use state::{CharacterState, GazePattern, StateConfig, StateConfigs};
