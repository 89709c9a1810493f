// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Procedural character behavior and animation engine for virtual
//! avatars.
//!
//! Marionette keeps a 3D or 2D avatar alive between explicit commands: it
//! tracks a behavior state (idle, listening, thinking, speaking), schedules
//! weighted background clips per state, overlays one-shot gestures, runs
//! spring-damper secondary motion, and layers blinks, gaze, breathing,
//! expressions and audio-driven lip-sync on top.
//!
//! # Key entry points
//!
//! - [`engine::MotionEngine`] - owns every component and runs the frame
//! - [`rig::AvatarRig`] - the adapter seam to a loaded model, with
//!   [`rig::SkeletalRig`] and [`rig::ParameterRig`] as references
//! - [`profile::CharacterProfile`] - per-state pools and defaults (TOML)
//! - [`options::Options`] - tuning knobs (TOML presets, JSON Schema)
//!
//! # Architecture
//!
//! The host calls [`engine::MotionEngine::update`] once per frame. Each
//! component writes into a shared [`rig::PoseBuffer`] in a fixed order
//! (behavior, background clips, gesture, springs, idle, expressions,
//! lip-sync) and the rig adapter performs the single final write. Every
//! deadline compares against the engine's accumulated clock, so playback is
//! deterministic for a given seed and frame sequence.

pub mod animation;
pub mod behavior;
pub mod engine;
pub mod error;
pub mod expression;
pub mod idle;
pub mod options;
pub mod physics;
pub mod profile;
pub mod rig;
pub mod util;
