//! Shared utilities for the motion engine.
//!
//! Helpers for frame timing, easing curves, and numeric guards.

pub mod easing;
pub mod frame_timing;
pub mod numeric;
