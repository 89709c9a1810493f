//! Blink cycle and squint.

use rand::rngs::StdRng;
use rand::Rng;

use super::uniform;
use crate::options::IdleOptions;
use crate::util::easing::EasingFunction;
use crate::util::numeric::smooth_toward;

/// Share of the blink duration spent closing; the rest is spent opening.
const CLOSING_SHARE: f32 = 0.4;
/// Bound on phase changes in one update (all-zero timings would spin).
const MAX_PHASES_PER_UPDATE: usize = 8;

/// Where the eyelids are in the blink cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlinkPhase {
    /// Eyes open, waiting for the next blink.
    #[default]
    Open,
    /// Lids coming down.
    Closing,
    /// Lids shut for the hold time.
    Closed,
    /// Lids coming back up.
    Opening,
}

/// Four-phase blink timer.
///
/// The wait before the next blink is drawn only when the cycle returns to
/// [`BlinkPhase::Open`]; occasionally it is shortened to the double-blink
/// gap (never twice in a row).
#[derive(Debug, Clone, PartialEq)]
pub struct Blink {
    phase: BlinkPhase,
    timer: f32,
    wait: f32,
    doubled: bool,
}

impl Blink {
    /// Open eyes with the first blink drawn from the configured interval.
    pub fn new(options: &IdleOptions, rng: &mut StdRng) -> Self {
        Self {
            phase: BlinkPhase::Open,
            timer: 0.0,
            wait: uniform(rng, options.blink_interval),
            doubled: false,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// Seconds until the next blink starts (while open).
    #[must_use]
    pub fn until_next(&self) -> f32 {
        if self.phase == BlinkPhase::Open {
            (self.wait - self.timer).max(0.0)
        } else {
            0.0
        }
    }

    fn phase_length(&self, options: &IdleOptions) -> f32 {
        match self.phase {
            BlinkPhase::Open => self.wait,
            BlinkPhase::Closing => options.blink_duration * CLOSING_SHARE,
            BlinkPhase::Closed => options.blink_hold,
            BlinkPhase::Opening => options.blink_duration * (1.0 - CLOSING_SHARE),
        }
    }

    fn advance_phase(&mut self, options: &IdleOptions, rng: &mut StdRng) {
        self.phase = match self.phase {
            BlinkPhase::Open => BlinkPhase::Closing,
            BlinkPhase::Closing => BlinkPhase::Closed,
            BlinkPhase::Closed => BlinkPhase::Opening,
            BlinkPhase::Opening => {
                let double = !self.doubled
                    && rng.random_bool(
                        f64::from(options.double_blink_chance.clamp(0.0, 1.0)),
                    );
                self.doubled = double;
                self.wait = if double {
                    options.double_blink_gap
                } else {
                    uniform(rng, options.blink_interval)
                };
                BlinkPhase::Open
            }
        };
    }

    /// Advance by `dt` and return eye openness in [0, 1].
    pub fn update(
        &mut self,
        dt: f32,
        options: &IdleOptions,
        rng: &mut StdRng,
    ) -> f32 {
        self.timer += dt.max(0.0);
        // Leftover time carries into the next phase.
        for _ in 0..MAX_PHASES_PER_UPDATE {
            let length = self.phase_length(options).max(0.0);
            if self.timer < length {
                break;
            }
            self.timer -= length;
            self.advance_phase(options, rng);
        }
        self.openness(options)
    }

    /// Eye openness for the current phase and timer.
    #[must_use]
    pub fn openness(&self, options: &IdleOptions) -> f32 {
        let length = self.phase_length(options);
        let t = if length > 0.0 {
            (self.timer / length).clamp(0.0, 1.0)
        } else {
            1.0
        };
        match self.phase {
            BlinkPhase::Open => 1.0,
            // Lids accelerate shut and decelerate open
            BlinkPhase::Closing => 1.0 - EasingFunction::QuadraticIn.evaluate(t),
            BlinkPhase::Closed => 0.0,
            BlinkPhase::Opening => EasingFunction::QuadraticOut.evaluate(t),
        }
    }
}

/// Slowly wandering squint applied on top of the blink.
#[derive(Debug, Clone, PartialEq)]
pub struct Squint {
    current: f32,
    target: f32,
    until_next: f32,
}

impl Squint {
    /// Fully open, first retarget drawn from the configured interval.
    pub fn new(options: &IdleOptions, rng: &mut StdRng) -> Self {
        Self {
            current: 1.0,
            target: 1.0,
            until_next: uniform(rng, options.squint_interval),
        }
    }

    /// Advance by `dt` and return the openness multiplier.
    pub fn update(
        &mut self,
        dt: f32,
        options: &IdleOptions,
        rng: &mut StdRng,
    ) -> f32 {
        self.until_next -= dt;
        if self.until_next <= 0.0 {
            self.target = uniform(rng, options.squint_range);
            self.until_next = uniform(rng, options.squint_interval);
        }
        self.current =
            smooth_toward(self.current, self.target, options.head_smoothing, dt);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    const DT: f32 = 1.0 / 1000.0;

    #[derive(Debug)]
    struct Span {
        phase: BlinkPhase,
        length: f32,
    }

    /// Run for `seconds` and collect the length of every completed phase.
    fn record(seconds: f32, options: &IdleOptions, seed: u64) -> Vec<Span> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut blink = Blink::new(options, &mut rng);
        let mut spans = Vec::new();
        let mut phase = blink.phase();
        let mut length = 0.0;
        let frames = (seconds / DT) as usize;
        for _ in 0..frames {
            let _ = blink.update(DT, options, &mut rng);
            length += DT;
            if blink.phase() != phase {
                spans.push(Span { phase, length });
                phase = blink.phase();
                length = 0.0;
            }
        }
        spans
    }

    #[test]
    fn test_blink_phase_timing() {
        let options = IdleOptions::default();
        let spans = record(120.0, &options, 5);
        assert!(spans.len() > 40);

        for span in &spans {
            let expected = match span.phase {
                BlinkPhase::Closing => Some(0.06),
                BlinkPhase::Closed => Some(0.05),
                BlinkPhase::Opening => Some(0.09),
                BlinkPhase::Open => None,
            };
            if let Some(expected) = expected {
                assert!(
                    (span.length - expected).abs() < 2.0 * DT,
                    "{:?} lasted {}",
                    span.phase,
                    span.length
                );
            }
        }
    }

    #[test]
    fn test_blink_interval_and_double_blinks() {
        let options = IdleOptions::default();
        let spans = record(600.0, &options, 11);
        let gaps: Vec<f32> = spans
            .iter()
            .filter(|s| s.phase == BlinkPhase::Open)
            .map(|s| s.length)
            .collect();

        let mut doubles = 0;
        for gap in &gaps {
            let is_double = (gap - options.double_blink_gap).abs() < 2.0 * DT;
            let is_regular = (2.0 - 2.0 * DT..=6.0 + 2.0 * DT).contains(gap);
            assert!(is_double || is_regular, "unexpected gap {gap}");
            if is_double {
                doubles += 1;
            }
        }
        // ~10% of ~150 blinks
        assert!(doubles > 3 && doubles < 40, "{doubles} double blinks");
    }

    #[test]
    fn test_never_two_double_blinks_in_a_row() {
        let options = IdleOptions {
            double_blink_chance: 1.0,
            ..IdleOptions::default()
        };
        let spans = record(60.0, &options, 3);
        let gaps: Vec<f32> = spans
            .iter()
            .filter(|s| s.phase == BlinkPhase::Open)
            .map(|s| s.length)
            .collect();
        for pair in gaps.windows(2) {
            let short = |g: f32| g < 1.0;
            assert!(!(short(pair[0]) && short(pair[1])));
        }
    }

    #[test]
    fn test_openness_follows_phase() {
        let options = IdleOptions::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut blink = Blink::new(&options, &mut rng);
        let wait = blink.until_next();
        assert_eq!(blink.update(wait * 0.5, &options, &mut rng), 1.0);

        // Halfway through closing, eased
        let open = blink.update(wait * 0.5 + 0.03, &options, &mut rng);
        assert_eq!(blink.phase(), BlinkPhase::Closing);
        assert!((open - 0.75).abs() < 0.02, "got {open}");

        let shut = blink.update(0.05, &options, &mut rng);
        assert_eq!(blink.phase(), BlinkPhase::Closed);
        assert_eq!(shut, 0.0);
    }

    #[test]
    fn test_squint_stays_in_range() {
        let options = IdleOptions::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut squint = Squint::new(&options, &mut rng);
        for _ in 0..6000 {
            let v = squint.update(1.0 / 60.0, &options, &mut rng);
            assert!((0.85..=1.0).contains(&v));
        }
    }
}
