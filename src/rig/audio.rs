use std::cell::RefCell;
use std::rc::Rc;

/// A readable time-domain audio buffer.
///
/// Mirrors an analyser node: the engine asks for the most recent window of
/// samples once per frame and owns no audio history of its own.
pub trait AudioSource {
    /// Copy the latest time-domain window into `out`, replacing its
    /// contents. Samples are nominally in [-1, 1].
    fn read_time_domain(&self, out: &mut Vec<f32>);
}

/// Shared sample window written by the audio pipeline between frames.
///
/// Cloning yields another handle to the same window, so the driver keeps one
/// clone to write into and hands the other to the engine. Single-threaded:
/// writes must happen outside [`update`](crate::engine::MotionEngine::update).
#[derive(Debug, Clone, Default)]
pub struct SampleWindow {
    samples: Rc<RefCell<Vec<f32>>>,
}

impl SampleWindow {
    /// Empty window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the window with the latest samples.
    pub fn write(&self, samples: &[f32]) {
        let mut window = self.samples.borrow_mut();
        window.clear();
        window.extend_from_slice(samples);
    }

    /// Clear the window (silence).
    pub fn clear(&self) {
        self.samples.borrow_mut().clear();
    }
}

impl AudioSource for SampleWindow {
    fn read_time_domain(&self, out: &mut Vec<f32>) {
        out.clear();
        out.extend_from_slice(&self.samples.borrow());
    }
}
