//! Background clip scheduling and gesture overlays.
//!
//! The [`PoolScheduler`] keeps a weighted pool of background clips cycling
//! for the current state; the [`GestureOverlay`] plays one-shot clips over
//! it and tells the engine when to hand control back.

mod gesture;
mod pool;
mod scheduler;

pub use gesture::{ActiveGesture, GestureEvent, GestureOverlay, GesturePoll};
pub use pool::{weighted_index, AnimationPool, WeightedAnimation};
pub use scheduler::{PoolScheduler, SchedulerRuntimeState};
