//! One-shot gesture overlay on top of background motion.

use crate::rig::{ClipInfo, ClipLayer};
use crate::util::easing::EasingFunction;

/// What a gesture deadline does when it comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// Start fading the gesture out and re-select background motion.
    Resume,
    /// The gesture clip has finished.
    Complete,
}

/// A pending deadline against the engine clock.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Deadline {
    at: f64,
    event: GestureEvent,
}

/// The gesture currently playing.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveGesture {
    /// Clip name.
    pub clip: String,
    /// Clip length in seconds.
    pub duration: f32,
    /// Clock when the gesture started.
    pub started_at: f64,
    /// Clock of the resume deadline.
    pub resume_at: f64,
    /// Clock of the completion deadline.
    pub complete_at: f64,
    /// Whether the resume deadline has fired.
    pub resumed: bool,
}

/// Events that came due during one [`GestureOverlay::poll`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GesturePoll {
    /// The resume deadline fired.
    pub resume: bool,
    /// The completion deadline fired.
    pub complete: bool,
}

/// Plays at most one gesture clip over the background, with the fades
/// scheduled as deadlines polled every frame.
#[derive(Debug, Clone)]
pub struct GestureOverlay {
    active: Option<ActiveGesture>,
    deadlines: Vec<Deadline>,
    transition: f32,
    easing: EasingFunction,
}

impl GestureOverlay {
    /// Overlay fading in and out over `transition` seconds.
    #[must_use]
    pub fn new(transition: f32) -> Self {
        Self {
            active: None,
            deadlines: Vec::new(),
            transition: transition.max(0.0),
            easing: EasingFunction::SineInOut,
        }
    }

    /// The gesture playing, if any.
    #[must_use]
    pub fn active(&self) -> Option<&ActiveGesture> {
        self.active.as_ref()
    }

    /// Whether a gesture is playing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start `clip` from time 0 at clock `now`, cancelling any gesture in
    /// flight. Resume is due `transition` before the end of the clip (or
    /// immediately for clips shorter than that); completion at the end.
    pub fn trigger(&mut self, clip: &str, info: ClipInfo, now: f64) {
        let duration = info.duration.max(0.0);
        let resume_at = now + f64::from((duration - self.transition).max(0.0));
        let complete_at = now + f64::from(duration);

        self.deadlines.clear();
        self.deadlines.push(Deadline {
            at: resume_at,
            event: GestureEvent::Resume,
        });
        self.deadlines.push(Deadline {
            at: complete_at,
            event: GestureEvent::Complete,
        });
        self.active = Some(ActiveGesture {
            clip: clip.to_owned(),
            duration,
            started_at: now,
            resume_at,
            complete_at,
            resumed: false,
        });
        log::debug!(
            "gesture '{clip}': resume at {resume_at:.2}, complete at {complete_at:.2}"
        );
    }

    /// Fire every deadline due at `now`, in deadline order.
    pub fn poll(&mut self, now: f64) -> GesturePoll {
        let mut fired = GesturePoll::default();
        let mut i = 0;
        while i < self.deadlines.len() {
            if self.deadlines[i].at > now {
                i += 1;
                continue;
            }
            match self.deadlines.remove(i).event {
                GestureEvent::Resume => {
                    fired.resume = true;
                    if let Some(active) = &mut self.active {
                        active.resumed = true;
                    }
                }
                GestureEvent::Complete => {
                    fired.complete = true;
                    self.active = None;
                }
            }
        }
        fired
    }

    /// Gesture mix weight at `now`: eases in from the start, holds at 1,
    /// then eases out between the resume and completion deadlines.
    #[must_use]
    pub fn weight(&self, now: f64) -> f32 {
        let Some(active) = &self.active else {
            return 0.0;
        };
        let fade_in = if self.transition > 0.0 {
            ((now - active.started_at) as f32 / self.transition).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let span = (active.complete_at - active.resume_at) as f32;
        let fade_out = if !active.resumed {
            1.0
        } else if span > 0.0 {
            1.0 - ((now - active.resume_at) as f32 / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.easing.evaluate(fade_in.min(fade_out))
    }

    /// Clip layer for the gesture at `now`, if one is playing.
    #[must_use]
    pub fn layer(&self, now: f64) -> Option<ClipLayer> {
        let active = self.active.as_ref()?;
        let time = ((now - active.started_at) as f32).clamp(0.0, active.duration);
        Some(ClipLayer {
            clip: active.clip.clone(),
            time,
            weight: self.weight(now),
            looping: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadlines_fire_once_in_order() {
        let mut overlay = GestureOverlay::new(0.3);
        overlay.trigger("wave", ClipInfo::once(2.0), 10.0);

        assert_eq!(overlay.poll(11.0), GesturePoll::default());
        let fired = overlay.poll(11.75);
        assert!(fired.resume && !fired.complete);
        assert!(overlay.is_active());

        assert_eq!(overlay.poll(11.8), GesturePoll::default());
        let fired = overlay.poll(12.0);
        assert!(!fired.resume && fired.complete);
        assert!(!overlay.is_active());
        assert_eq!(overlay.poll(20.0), GesturePoll::default());
    }

    #[test]
    fn test_retrigger_cancels_pending_deadlines() {
        let mut overlay = GestureOverlay::new(0.3);
        overlay.trigger("wave", ClipInfo::once(2.0), 0.0);
        overlay.trigger("bow", ClipInfo::once(3.0), 1.0);

        // The first gesture's deadlines at 1.7 and 2.0 are gone.
        assert_eq!(overlay.poll(2.5), GesturePoll::default());
        assert_eq!(overlay.active().unwrap().clip, "bow");
        assert!(overlay.poll(3.75).resume);
        assert!(overlay.poll(4.0).complete);
    }

    #[test]
    fn test_short_gesture_resumes_immediately() {
        let mut overlay = GestureOverlay::new(0.5);
        overlay.trigger("blink", ClipInfo::once(0.2), 0.0);
        assert!(overlay.poll(0.0).resume);
        let fired = overlay.poll(0.25);
        assert!(fired.complete);
    }

    #[test]
    fn test_weight_fades_in_holds_and_fades_out() {
        let mut overlay = GestureOverlay::new(0.5);
        overlay.trigger("wave", ClipInfo::once(3.0), 0.0);

        assert_eq!(overlay.weight(0.0), 0.0);
        assert!((overlay.weight(0.25) - 0.5).abs() < 1e-4);
        assert_eq!(overlay.weight(1.5), 1.0);

        let _ = overlay.poll(2.5);
        assert!((overlay.weight(2.75) - 0.5).abs() < 1e-4);
        let _ = overlay.poll(3.0);
        assert_eq!(overlay.weight(3.0), 0.0);
        assert!(overlay.layer(3.0).is_none());
    }

    #[test]
    fn test_layer_plays_once_from_start() {
        let mut overlay = GestureOverlay::new(0.3);
        overlay.trigger("wave", ClipInfo::once(2.0), 5.0);
        let layer = overlay.layer(6.0).unwrap();
        assert_eq!(layer.clip, "wave");
        assert!((layer.time - 1.0).abs() < 1e-6);
        assert!(!layer.looping);
    }
}
