//! The engine facade: owns every component and runs the per-frame pass.

mod accessors;
mod command;
mod debug;

pub use command::EngineCommand;
pub use debug::DebugInfo;
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::animation::{GestureOverlay, PoolScheduler};
use crate::behavior::{
    BehaviorStateMachine, CharacterState, RuleTable, StateChange,
};
use crate::error::MotionError;
use crate::expression::{ExpressionBlender, ExpressionTarget, LipSyncAnalyzer};
use crate::idle::IdleGenerator;
use crate::options::Options;
use crate::physics::{SpringCoefficients, SpringSolver};
use crate::profile::CharacterProfile;
use crate::rig::{AudioSource, AvatarRig, PoseBuffer};

/// Procedural behavior and animation driver for one avatar.
///
/// # Frame loop
///
/// Call the setters whenever input arrives, then [`update`](Self::update)
/// once per frame. Within `update` the passes always run in this order:
///
/// 1. behavior state machine
/// 2. background clip scheduler
/// 3. gesture overlay
/// 4. secondary-motion springs
/// 5. idle micro-motion
/// 6. expressions and lip-sync
/// 7. [`AvatarRig::apply`]
///
/// # Errors
///
/// Nothing here returns an error or panics across `update`. Missing clips,
/// joints, parameters and pools are logged and the operation is skipped;
/// non-finite values never reach the pose buffer.
pub struct MotionEngine<R: AvatarRig> {
    rig: R,
    profile: CharacterProfile,
    options: Options,
    behavior: BehaviorStateMachine,
    scheduler: PoolScheduler,
    gesture: GestureOverlay,
    springs: SpringSolver,
    idle: IdleGenerator,
    expression: ExpressionBlender,
    lip_sync: LipSyncAnalyzer,
    audio: Option<Box<dyn AudioSource>>,
    pose: PoseBuffer,
    clock: f64,
}

// =============================================================================
// Construction
// =============================================================================

impl<R: AvatarRig> MotionEngine<R> {
    /// Engine for `rig` with randomness seeded from the OS.
    #[must_use]
    pub fn new(rig: R, profile: CharacterProfile, options: Options) -> Self {
        Self::with_rng(rig, profile, options, StdRng::from_os_rng())
    }

    /// Engine with a fixed seed, for reproducible tests.
    #[must_use]
    pub fn with_seed(
        rig: R,
        profile: CharacterProfile,
        options: Options,
        seed: u64,
    ) -> Self {
        Self::with_rng(rig, profile, options, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        rig: R,
        profile: CharacterProfile,
        options: Options,
        mut rng: StdRng,
    ) -> Self {
        if let Err(e) = profile.validate() {
            log::warn!("character profile: {e}");
        }
        let rules = RuleTable::standard();
        if let Err(e) = rules.validate() {
            log::warn!("behavior rules: {e}");
        }

        let drag_spring = SpringCoefficients::new(
            options.spring.base_stiffness,
            options.spring.head_damping,
        );
        let mut engine = Self {
            behavior: BehaviorStateMachine::new(rules, options.behavior.clone()),
            scheduler: PoolScheduler::new(
                profile.pools.clone(),
                options.scheduler.clone(),
                StdRng::from_rng(&mut rng),
            ),
            gesture: GestureOverlay::new(options.gesture.transition_time),
            springs: SpringSolver::new(options.spring.clone()),
            idle: IdleGenerator::new(
                options.idle.clone(),
                drag_spring,
                StdRng::from_rng(&mut rng),
            ),
            expression: ExpressionBlender::new(options.expression.ease_duration),
            lip_sync: LipSyncAnalyzer::new(options.lip_sync.clone()),
            audio: None,
            pose: PoseBuffer::new(&options.lip_sync.mouth_parameter),
            clock: 0.0,
            rig,
            profile,
            options,
        };
        let initial = engine.behavior.state();
        engine.enter_state(StateChange {
            from: initial,
            to: initial,
        });
        engine
    }
}

// =============================================================================
// Behavior
// =============================================================================

impl<R: AvatarRig> MotionEngine<R> {
    /// Switch state directly. A no-op when already there, unless `force`.
    pub fn set_state(&mut self, state: CharacterState, force: bool) {
        if let Some(change) = self.behavior.set_state(state, force) {
            self.enter_state(change);
        }
    }

    /// Set whether the user is providing input.
    pub fn set_listening(&mut self, listening: bool) {
        self.behavior.set_listening(listening);
    }

    /// Set whether the avatar is talking.
    pub fn set_speaking(&mut self, speaking: bool) {
        self.behavior.set_speaking(speaking);
    }

    /// Rebind everything that depends on the state: the scheduler's pool,
    /// the gaze pattern and the default expressions.
    fn enter_state(&mut self, change: StateChange) {
        let old = self.profile.states.get(change.from);
        let new = self.profile.states.get(change.to);
        if let Err(e) = self.scheduler.switch_pool(
            &new.pool,
            new.blend_in,
            old.blend_out,
            self.clock,
            &self.rig,
        ) {
            log::warn!("entering {}: {e}", change.to);
        }
        self.idle.set_pattern(new.gaze);
        let defaults = known_targets(&self.rig, &new.expression);
        self.expression.set_defaults(&defaults);
    }
}

// =============================================================================
// Reactions
// =============================================================================

impl<R: AvatarRig> MotionEngine<R> {
    /// Play a one-shot clip over the background motion.
    pub fn trigger_gesture(&mut self, name: &str) {
        let Some(info) = self.rig.clip(name) else {
            log::warn!("gesture: {}", MotionError::MissingClip(name.to_owned()));
            return;
        };
        self.gesture.trigger(name, info, self.clock);
        self.scheduler.set_suspended(true);
    }

    /// Replace the emotion expression set. Names the rig does not have are
    /// dropped.
    pub fn play_emotion(&mut self, targets: &[ExpressionTarget]) {
        let known = known_targets(&self.rig, targets);
        self.expression.play_emotion(&known);
    }

    /// Kick a joint (or head parameter) with a spring impulse.
    pub fn apply_impulse(&mut self, joint: &str, direction: Vec3, strength: f32) {
        if let Err(e) =
            self.springs.apply_impulse(&self.rig, joint, direction, strength)
        {
            log::warn!("impulse on '{joint}': {e}");
        }
    }

    /// Drop every live spring; joints return to clip-driven motion on the
    /// next frame.
    pub fn clear_springs(&mut self) {
        self.springs.clear(&mut self.pose);
    }

    /// Last pointer position in normalized view coordinates ([-1, 1], y
    /// up), or `None` when the pointer left the view.
    pub fn set_pointer(&mut self, position: Option<Vec2>) {
        self.idle.set_pointer(position);
    }

    /// Pointer drag delta in pixels (y down).
    pub fn drag(&mut self, delta: Vec2) {
        self.idle.drag(delta);
    }

    /// Audio to drive lip-sync from; `None` silences the mouth.
    pub fn set_audio_source(&mut self, source: Option<Box<dyn AudioSource>>) {
        self.audio = source;
    }
}

// =============================================================================
// Frame
// =============================================================================

impl<R: AvatarRig> MotionEngine<R> {
    /// Advance every component by `dt` seconds and apply the result to the
    /// rig. Negative or non-finite `dt` is ignored.
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("{}", MotionError::InvalidNumber("frame delta"));
            return;
        }
        self.clock += f64::from(dt);
        self.pose.clear_offsets();

        if let Some(change) = self.behavior.update(dt) {
            self.enter_state(change);
        }

        self.scheduler.update(dt, self.clock, &self.rig);

        let fired = self.gesture.poll(self.clock);
        if fired.resume {
            self.scheduler.set_suspended(false);
            if !self.scheduler.select_now(self.clock, &self.rig, true) {
                log::debug!(
                    "gesture resume at {:.2}: no eligible clip, holding current",
                    self.clock
                );
            }
        }
        if fired.complete {
            log::debug!("gesture complete at {:.2}", self.clock);
        }
        let background = 1.0 - self.gesture.weight(self.clock);
        self.pose.set_layers(
            self.scheduler
                .layers(background)
                .chain(self.gesture.layer(self.clock)),
        );

        self.springs.update(dt, &mut self.pose);
        self.idle.update(dt, &mut self.pose);

        self.expression.update(dt, &mut self.pose);
        let _ = self
            .lip_sync
            .analyze(self.audio.as_deref(), &mut self.pose);

        self.rig.apply(&self.pose);
    }
}

/// Targets whose names the rig can resolve; the rest are logged.
fn known_targets<R: AvatarRig + ?Sized>(
    rig: &R,
    targets: &[ExpressionTarget],
) -> Vec<ExpressionTarget> {
    targets
        .iter()
        .filter(|t| {
            let known = rig.parameter_range(&t.key).is_some();
            if !known {
                log::warn!(
                    "expression: {}",
                    MotionError::MissingParameter(t.key.clone())
                );
            }
            known
        })
        .cloned()
        .collect()
}
