//! Background clip scheduling over weighted pools.

use rand::rngs::StdRng;

use super::pool::{weighted_index, AnimationPool};
use crate::error::MotionError;
use crate::options::SchedulerOptions;
use crate::rig::{AvatarRig, ClipInfo, ClipLayer};
use crate::util::easing::EasingFunction;

/// A clip the scheduler is currently mixing.
#[derive(Debug, Clone, PartialEq)]
struct PlayingClip {
    clip: String,
    info: ClipInfo,
    time: f32,
}

impl PlayingClip {
    fn advance(&mut self, dt: f32) {
        self.time += dt;
        let duration = self.info.duration;
        if duration > 0.0 {
            self.time = if self.info.looping {
                self.time.rem_euclid(duration)
            } else {
                self.time.min(duration)
            };
        }
    }

    fn layer(&self, weight: f32) -> ClipLayer {
        ClipLayer {
            clip: self.clip.clone(),
            time: self.time,
            weight,
            looping: self.info.looping,
        }
    }
}

/// Scheduler bookkeeping, reset on every pool switch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulerRuntimeState {
    /// Active pool name.
    pub pool: Option<String>,
    /// Clip selected most recently.
    pub clip: Option<String>,
    /// Seconds since that selection.
    pub clip_elapsed: f32,
    /// Seconds until the next periodic selection (may go negative while
    /// selection is suspended or nothing is eligible).
    pub time_until_next: f32,
    /// Whether a cross-fade is running.
    pub blending: bool,
    /// Seconds into the cross-fade.
    pub blend_elapsed: f32,
}

/// Picks and cross-fades background clips from the active pool.
///
/// Only `last_played` on the pools' clips and the runtime state change
/// after construction. Selection can be suspended (while a gesture plays);
/// timers keep advancing regardless.
#[derive(Debug, Clone)]
pub struct PoolScheduler {
    pools: Vec<AnimationPool>,
    active: Option<usize>,
    runtime: SchedulerRuntimeState,
    current: Option<PlayingClip>,
    previous: Option<PlayingClip>,
    fade_in: f32,
    fade_out: f32,
    suspended: bool,
    options: SchedulerOptions,
    easing: EasingFunction,
    rng: StdRng,
}

impl PoolScheduler {
    /// Scheduler over `pools` drawing from `rng`. No pool is active until
    /// [`switch_pool`](Self::switch_pool).
    #[must_use]
    pub fn new(
        pools: Vec<AnimationPool>,
        options: SchedulerOptions,
        rng: StdRng,
    ) -> Self {
        Self {
            pools,
            active: None,
            runtime: SchedulerRuntimeState::default(),
            current: None,
            previous: None,
            fade_in: 0.0,
            fade_out: 0.0,
            suspended: false,
            options,
            easing: EasingFunction::SineInOut,
            rng,
        }
    }

    /// All pools, with their clips' `last_played` stamps.
    #[must_use]
    pub fn pools(&self) -> &[AnimationPool] {
        &self.pools
    }

    /// Runtime bookkeeping for diagnostics.
    #[must_use]
    pub fn runtime(&self) -> &SchedulerRuntimeState {
        &self.runtime
    }

    /// Clip currently faded in (or fading in).
    #[must_use]
    pub fn current_clip(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.clip.as_str())
    }

    /// Whether periodic selection is suspended.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Suspend or resume periodic selection.
    pub fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    /// Make `name` the active pool and select from it immediately (unless
    /// suspended), fading the new clip in over `fade_in` and the old one out
    /// over `fade_out`.
    ///
    /// An unknown pool leaves the scheduler untouched.
    pub fn switch_pool<R: AvatarRig + ?Sized>(
        &mut self,
        name: &str,
        fade_in: f32,
        fade_out: f32,
        now: f64,
        rig: &R,
    ) -> Result<(), MotionError> {
        let index = self
            .pools
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| MotionError::UnknownPool(name.to_owned()))?;

        for clip in &self.pools[index].clips {
            if rig.clip(&clip.clip).is_none() {
                log::warn!(
                    "pool '{name}': skipping {}",
                    MotionError::MissingClip(clip.clip.clone())
                );
            }
        }

        self.active = Some(index);
        self.runtime = SchedulerRuntimeState {
            pool: Some(name.to_owned()),
            clip: self.current_clip().map(str::to_owned),
            ..SchedulerRuntimeState::default()
        };
        if !self.suspended {
            let _ = self.select(now, rig, false, fade_in, fade_out);
        }
        Ok(())
    }

    /// Select a clip from the active pool now. `forced` skips the
    /// anti-repeat retries. Returns whether a clip was selected.
    pub fn select_now<R: AvatarRig + ?Sized>(
        &mut self,
        now: f64,
        rig: &R,
        forced: bool,
    ) -> bool {
        let transition = self
            .active
            .and_then(|i| self.pools.get(i))
            .map_or(0.0, |p| p.transition_time);
        self.select(now, rig, forced, transition, transition)
    }

    fn select<R: AvatarRig + ?Sized>(
        &mut self,
        now: f64,
        rig: &R,
        forced: bool,
        fade_in: f32,
        fade_out: f32,
    ) -> bool {
        let Some(pool_index) = self.active else {
            return false;
        };
        let Some(pool) = self.pools.get(pool_index) else {
            return false;
        };

        let eligible: Vec<usize> = pool
            .clips
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_ready(now) && rig.clip(&c.clip).is_some())
            .map(|(i, _)| i)
            .collect();
        let weights: Vec<f32> = eligible
            .iter()
            .map(|&i| pool.clips[i].effective_weight())
            .collect();
        let Some(mut pick) = weighted_index(&mut self.rng, &weights) else {
            return false;
        };

        if !forced {
            let current = self.current.as_ref().map(|c| c.clip.as_str());
            let mut retries = 0;
            while retries < self.options.repeat_retries
                && current == Some(pool.clips[eligible[pick]].clip.as_str())
            {
                pick = weighted_index(&mut self.rng, &weights).unwrap_or(pick);
                retries += 1;
            }
        }

        let clip_index = eligible[pick];
        let clip = &pool.clips[clip_index];
        let Some(info) = rig.clip(&clip.clip) else {
            return false;
        };
        let mut play_time = pool.play_time(clip, &mut self.rng);
        if play_time <= 0.0 {
            play_time = if info.duration > 0.0 && !info.looping {
                info.duration
            } else {
                self.options.fallback_play_time
            };
        }
        let name = clip.clip.clone();
        log::debug!(
            "pool '{}': selected '{name}' for {play_time:.2}s",
            pool.name
        );

        self.pools[pool_index].clips[clip_index].last_played = Some(now);
        self.previous = self.current.take();
        self.current = Some(PlayingClip {
            clip: name.clone(),
            info,
            time: 0.0,
        });
        self.fade_in = fade_in.max(0.0);
        self.fade_out = fade_out.max(0.0);
        self.runtime.clip = Some(name);
        self.runtime.clip_elapsed = 0.0;
        self.runtime.time_until_next = play_time;
        self.runtime.blending = self.previous.is_some();
        self.runtime.blend_elapsed = 0.0;
        true
    }

    /// Advance clip, blend and change timers by `dt`, then select a new clip
    /// if the current one has run its course and selection is not
    /// suspended.
    pub fn update<R: AvatarRig + ?Sized>(&mut self, dt: f32, now: f64, rig: &R) {
        if let Some(clip) = &mut self.current {
            clip.advance(dt);
        }
        if let Some(clip) = &mut self.previous {
            clip.advance(dt);
        }
        if self.runtime.blending {
            self.runtime.blend_elapsed += dt;
            if self.runtime.blend_elapsed >= self.fade_in.max(self.fade_out) {
                self.runtime.blending = false;
                self.previous = None;
            }
        }
        self.runtime.clip_elapsed += dt;
        self.runtime.time_until_next -= dt;

        if self.suspended || self.active.is_none() {
            return;
        }
        if self.current.is_none() || self.runtime.time_until_next <= 0.0 {
            let _ = self.select_now(now, rig, false);
        }
    }

    fn ramp(&self, duration: f32) -> f32 {
        if duration <= 0.0 {
            1.0
        } else {
            self.easing.evaluate(self.runtime.blend_elapsed / duration)
        }
    }

    /// Clip layers for this frame, scaled by `weight` (the share left to
    /// background motion).
    pub fn layers(&self, weight: f32) -> impl Iterator<Item = ClipLayer> + '_ {
        let (w_in, w_out) = if self.runtime.blending {
            (self.ramp(self.fade_in), 1.0 - self.ramp(self.fade_out))
        } else {
            (1.0, 0.0)
        };
        let fading = self
            .previous
            .as_ref()
            .filter(|_| self.runtime.blending)
            .map(move |c| c.layer(w_out * weight));
        self.current
            .as_ref()
            .map(move |c| c.layer(w_in * weight))
            .into_iter()
            .chain(fading)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::animation::pool::WeightedAnimation;
    use crate::rig::SkeletalRig;

    const DT: f32 = 1.0 / 60.0;

    fn rig() -> SkeletalRig {
        SkeletalRig::new("head")
            .with_clip("sway", ClipInfo::looping(4.0))
            .with_clip("stretch", ClipInfo::once(2.0))
            .with_clip("nod", ClipInfo::once(1.0))
    }

    fn scheduler(pools: Vec<AnimationPool>) -> PoolScheduler {
        PoolScheduler::new(
            pools,
            SchedulerOptions::default(),
            StdRng::seed_from_u64(42),
        )
    }

    #[test]
    fn test_cooldown_excludes_recent_clip() {
        let pool = AnimationPool::new("idle")
            .with_play_time(1.0, 1.0)
            .with_clip(WeightedAnimation::new("stretch", 10.0).with_cooldown(5.0))
            .with_clip(WeightedAnimation::new("sway", 1.0));
        let rig = rig();
        let mut sched = scheduler(vec![pool]);
        sched.switch_pool("idle", 0.5, 0.5, 0.0, &rig).unwrap();

        let mut plays = Vec::new();
        let mut last = None;
        let mut now = 0.0_f64;
        for _ in 0..(60 * 60) {
            now += f64::from(DT);
            sched.update(DT, now, &rig);
            let stamp = sched.pools()[0].clips[0].last_played;
            if stamp != last {
                plays.extend(stamp);
                last = stamp;
            }
        }

        assert!(plays.len() >= 5, "stretch played {} times", plays.len());
        for pair in plays.windows(2) {
            assert!(pair[1] - pair[0] >= 5.0, "re-selected after {}s", pair[1] - pair[0]);
        }
    }

    #[test]
    fn test_all_clips_cooling_down_makes_no_change() {
        let pool = AnimationPool::new("idle")
            .with_play_time(1.0, 1.0)
            .with_clip(WeightedAnimation::new("stretch", 1.0).with_cooldown(10.0));
        let rig = rig();
        let mut sched = scheduler(vec![pool]);
        sched.switch_pool("idle", 0.0, 0.0, 0.0, &rig).unwrap();
        assert_eq!(sched.current_clip(), Some("stretch"));

        let mut now = 0.0;
        for _ in 0..120 {
            now += f64::from(DT);
            sched.update(DT, now, &rig);
        }
        // Timer expired but nothing was eligible, so the clip is held.
        assert_eq!(sched.pools()[0].clips[0].last_played, Some(0.0));
        assert!(sched.runtime().time_until_next < 0.0);
        assert_eq!(sched.current_clip(), Some("stretch"));
    }

    #[test]
    fn test_anti_repeat_avoids_current_clip() {
        let pool = AnimationPool::new("idle")
            .with_play_time(0.5, 0.5)
            .with_clip(WeightedAnimation::new("sway", 1.0))
            .with_clip(WeightedAnimation::new("nod", 1.0));
        let rig = rig();
        let options = SchedulerOptions {
            repeat_retries: 64,
            ..SchedulerOptions::default()
        };
        let mut sched =
            PoolScheduler::new(vec![pool], options, StdRng::seed_from_u64(9));
        sched.switch_pool("idle", 0.1, 0.1, 0.0, &rig).unwrap();

        let mut previous = sched.current_clip().map(str::to_owned);
        let mut now = 0.0;
        let mut changes = 0;
        for _ in 0..(60 * 20) {
            now += f64::from(DT);
            sched.update(DT, now, &rig);
            if sched.runtime().clip_elapsed == 0.0 {
                let current = sched.current_clip().map(str::to_owned);
                assert_ne!(current, previous);
                previous = current;
                changes += 1;
            }
        }
        assert!(changes > 30);
    }

    #[test]
    fn test_zero_weight_pool_selects_nothing() {
        let pool = AnimationPool::new("idle")
            .with_clip(WeightedAnimation::new("sway", 0.0));
        let rig = rig();
        let mut sched = scheduler(vec![pool]);
        sched.switch_pool("idle", 0.5, 0.5, 0.0, &rig).unwrap();
        sched.update(DT, f64::from(DT), &rig);
        assert_eq!(sched.current_clip(), None);
        assert_eq!(sched.layers(1.0).count(), 0);
    }

    #[test]
    fn test_unresolvable_clips_are_skipped() {
        let pool = AnimationPool::new("idle")
            .with_clip(WeightedAnimation::new("ghost", 100.0))
            .with_clip(WeightedAnimation::new("sway", 1.0));
        let rig = rig();
        let mut sched = scheduler(vec![pool]);
        for i in 0..20 {
            sched.switch_pool("idle", 0.0, 0.0, f64::from(i), &rig).unwrap();
            assert_eq!(sched.current_clip(), Some("sway"));
        }
    }

    #[test]
    fn test_unknown_pool_is_an_error_and_keeps_state() {
        let rig = rig();
        let mut sched = scheduler(vec![
            AnimationPool::new("idle").with_clip(WeightedAnimation::new("sway", 1.0)),
        ]);
        sched.switch_pool("idle", 0.5, 0.5, 0.0, &rig).unwrap();
        let err = sched.switch_pool("dance", 0.5, 0.5, 0.0, &rig).unwrap_err();
        assert!(matches!(err, MotionError::UnknownPool(name) if name == "dance"));
        assert_eq!(sched.runtime().pool.as_deref(), Some("idle"));
    }

    #[test]
    fn test_pool_switch_mid_blend_selects_immediately() {
        let rig = rig();
        let mut sched = scheduler(vec![
            AnimationPool::new("idle")
                .with_play_time(0.2, 0.2)
                .with_transition(1.0)
                .with_clip(WeightedAnimation::new("sway", 1.0))
                .with_clip(WeightedAnimation::new("stretch", 1.0)),
            AnimationPool::new("speaking").with_clip(WeightedAnimation::new("nod", 1.0)),
        ]);
        sched.switch_pool("idle", 0.5, 0.5, 0.0, &rig).unwrap();
        let mut now = 0.0;
        while !sched.runtime().blending {
            now += f64::from(DT);
            sched.update(DT, now, &rig);
        }

        sched.switch_pool("speaking", 0.3, 0.3, now, &rig).unwrap();
        assert_eq!(sched.current_clip(), Some("nod"));
        assert_eq!(sched.runtime().pool.as_deref(), Some("speaking"));
        assert!(sched.runtime().blending);
        assert_eq!(sched.runtime().blend_elapsed, 0.0);
    }

    #[test]
    fn test_cross_fade_weights() {
        let rig = rig();
        let mut sched = scheduler(vec![
            AnimationPool::new("idle").with_clip(WeightedAnimation::new("sway", 1.0)),
            AnimationPool::new("thinking")
                .with_play_time(5.0, 5.0)
                .with_clip(WeightedAnimation::new("nod", 1.0)),
        ]);
        sched.switch_pool("idle", 0.5, 0.5, 0.0, &rig).unwrap();
        let layers: Vec<_> = sched.layers(1.0).collect();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].weight, 1.0);

        sched.switch_pool("thinking", 1.0, 1.0, 0.0, &rig).unwrap();
        for _ in 0..30 {
            sched.update(DT, 0.0, &rig);
        }
        let layers: Vec<_> = sched.layers(1.0).collect();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].clip, "nod");
        assert!((layers[0].weight + layers[1].weight - 1.0).abs() < 1e-4);

        for _ in 0..40 {
            sched.update(DT, 0.0, &rig);
        }
        let layers: Vec<_> = sched.layers(0.5).collect();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].weight, 0.5);
    }

    #[test]
    fn test_suspended_scheduler_keeps_timers_running() {
        let rig = rig();
        let mut sched = scheduler(vec![AnimationPool::new("idle")
            .with_play_time(0.5, 0.5)
            .with_clip(WeightedAnimation::new("sway", 1.0))
            .with_clip(WeightedAnimation::new("nod", 1.0))]);
        sched.switch_pool("idle", 0.0, 0.0, 0.0, &rig).unwrap();
        let clip = sched.current_clip().map(str::to_owned);
        sched.set_suspended(true);

        for _ in 0..120 {
            sched.update(DT, 0.0, &rig);
        }
        assert_eq!(sched.current_clip().map(str::to_owned), clip);
        assert!(sched.runtime().clip_elapsed > 1.9);
        assert!(sched.runtime().time_until_next < 0.0);

        sched.set_suspended(false);
        sched.update(DT, 2.0, &rig);
        assert!(sched.runtime().clip_elapsed == 0.0);
    }
}
