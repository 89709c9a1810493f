//! Weighted animation pools.

use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A background clip with its selection weight and timing overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeightedAnimation {
    /// Clip name as known to the rig.
    pub clip: String,
    /// Relative selection weight. Non-positive weights are never drawn.
    pub weight: f32,
    /// Fixed play time that overrides the pool's random range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f32>,
    /// Seconds after a selection during which this clip is not eligible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<f32>,
    /// Engine clock at the last selection.
    #[serde(skip)]
    #[schemars(skip)]
    pub last_played: Option<f64>,
}

impl WeightedAnimation {
    /// Clip with the given weight and no overrides.
    #[must_use]
    pub fn new(clip: &str, weight: f32) -> Self {
        Self {
            clip: clip.to_owned(),
            weight,
            duration: None,
            cooldown: None,
            last_played: None,
        }
    }

    /// Play for exactly `seconds` each time this clip is selected.
    #[must_use]
    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Exclude this clip for `seconds` after each selection.
    #[must_use]
    pub fn with_cooldown(mut self, seconds: f32) -> Self {
        self.cooldown = Some(seconds);
        self
    }

    /// Whether the clip's cooldown has elapsed at clock `now`.
    #[must_use]
    pub fn is_ready(&self, now: f64) -> bool {
        match (self.cooldown, self.last_played) {
            (Some(cooldown), Some(last)) => now - last >= f64::from(cooldown),
            _ => true,
        }
    }

    /// Weight usable for drawing (zero when negative or non-finite).
    #[must_use]
    pub fn effective_weight(&self) -> f32 {
        if self.weight.is_finite() && self.weight > 0.0 {
            self.weight
        } else {
            0.0
        }
    }
}

fn default_transition() -> f32 {
    0.5
}

/// A named set of clips the scheduler draws from while a state is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnimationPool {
    /// Pool name, referenced by [`StateConfig::pool`](crate::behavior::StateConfig::pool).
    pub name: String,
    /// Cross-fade between consecutive clips, in seconds.
    #[serde(default = "default_transition")]
    pub transition_time: f32,
    /// Lower bound on how long any clip plays.
    #[serde(default)]
    pub min_play_time: f32,
    /// Upper bound of the random play time.
    #[serde(default)]
    pub max_play_time: f32,
    /// Candidate clips, in draw order.
    #[serde(default)]
    pub clips: Vec<WeightedAnimation>,
}

impl AnimationPool {
    /// Empty pool with a 0.5 s cross-fade.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            clips: Vec::new(),
            transition_time: default_transition(),
            min_play_time: 0.0,
            max_play_time: 0.0,
        }
    }

    /// Append a clip.
    #[must_use]
    pub fn with_clip(mut self, clip: WeightedAnimation) -> Self {
        self.clips.push(clip);
        self
    }

    /// Random play-time range.
    #[must_use]
    pub fn with_play_time(mut self, min: f32, max: f32) -> Self {
        self.min_play_time = min;
        self.max_play_time = max;
        self
    }

    /// Cross-fade duration.
    #[must_use]
    pub fn with_transition(mut self, seconds: f32) -> Self {
        self.transition_time = seconds;
        self
    }

    /// Draw a play time for `clip`: its fixed duration or a uniform draw
    /// from the pool's range, never less than `min_play_time`.
    pub fn play_time<R: Rng + ?Sized>(
        &self,
        clip: &WeightedAnimation,
        rng: &mut R,
    ) -> f32 {
        let drawn = clip.duration.unwrap_or_else(|| {
            let lo = self.min_play_time.min(self.max_play_time);
            let hi = self.min_play_time.max(self.max_play_time);
            if hi > lo {
                rng.random_range(lo..=hi)
            } else {
                lo
            }
        });
        drawn.max(self.min_play_time)
    }
}

/// Draw an index in proportion to `weights`.
///
/// A uniform value in `[0, sum)` is reduced by each weight in list order
/// until it falls inside one. Non-positive and non-finite weights are
/// skipped. Returns `None` when nothing has positive weight.
pub fn weighted_index<R: Rng + ?Sized>(
    rng: &mut R,
    weights: &[f32],
) -> Option<usize> {
    let usable = |w: f32| w.is_finite() && w > 0.0;
    let total: f32 = weights.iter().copied().filter(|w| usable(*w)).sum();
    if total <= 0.0 {
        return None;
    }
    let mut draw = rng.random::<f32>() * total;
    let mut last = None;
    for (i, &w) in weights.iter().enumerate() {
        if !usable(w) {
            continue;
        }
        if draw < w {
            return Some(i);
        }
        draw -= w;
        last = Some(i);
    }
    // Rounding can leave a sliver past the final weight.
    last
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_weighted_draw_is_fair() {
        let mut rng = StdRng::seed_from_u64(7);
        let weights = [70.0, 30.0];
        let mut counts = [0_u32; 2];
        for _ in 0..1000 {
            let i = weighted_index(&mut rng, &weights).unwrap();
            counts[i] += 1;
        }
        // Binomial(1000, 0.7): sigma ~= 14.5, band is mean +- 1.96 sigma
        assert!(
            (672..=728).contains(&counts[0]),
            "70-weight clip drawn {} times",
            counts[0]
        );
        assert_eq!(counts[0] + counts[1], 1000);
    }

    #[test]
    fn test_zero_and_invalid_weights_never_drawn() {
        let mut rng = StdRng::seed_from_u64(1);
        let weights = [0.0, f32::NAN, -3.0, 1.0];
        for _ in 0..200 {
            assert_eq!(weighted_index(&mut rng, &weights), Some(3));
        }
        assert_eq!(weighted_index(&mut rng, &[0.0, 0.0]), None);
        assert_eq!(weighted_index(&mut rng, &[]), None);
    }

    #[test]
    fn test_cooldown_readiness() {
        let mut clip = WeightedAnimation::new("stretch", 1.0).with_cooldown(5.0);
        assert!(clip.is_ready(0.0));
        clip.last_played = Some(10.0);
        assert!(!clip.is_ready(14.9));
        assert!(clip.is_ready(15.0));
    }

    #[test]
    fn test_play_time_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = AnimationPool::new("idle").with_play_time(4.0, 8.0);
        let clip = WeightedAnimation::new("sway", 1.0);
        for _ in 0..100 {
            let t = pool.play_time(&clip, &mut rng);
            assert!((4.0..=8.0).contains(&t));
        }
        // A forced duration shorter than the minimum is raised to it
        let short = WeightedAnimation::new("nod", 1.0).with_duration(1.0);
        assert_eq!(pool.play_time(&short, &mut rng), 4.0);
        let long = WeightedAnimation::new("nod", 1.0).with_duration(12.0);
        assert_eq!(pool.play_time(&long, &mut rng), 12.0);
    }

    #[test]
    fn test_pool_parses_from_toml() {
        let pool: AnimationPool = toml::from_str(
            r#"
name = "idle"
min_play_time = 3.0
max_play_time = 6.0

[[clips]]
clip = "breathe"
weight = 5.0

[[clips]]
clip = "stretch"
weight = 1.0
cooldown = 20.0
"#,
        )
        .unwrap();
        assert_eq!(pool.clips.len(), 2);
        assert_eq!(pool.transition_time, 0.5);
        assert_eq!(pool.clips[1].cooldown, Some(20.0));
        assert_eq!(pool.clips[1].last_played, None);
    }
}
