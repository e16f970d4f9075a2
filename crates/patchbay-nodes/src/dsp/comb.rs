//! Feedback comb filter with a damped feedback path.
//!
//! The building block of Schroeder/Freeverb reverbs: a delay line whose output
//! is lowpassed by a one-pole filter and fed back into its input.

use super::delay::DelayLine;
use super::math::flush_denormal;

/// Highest feedback accepted; anything at or above 1.0 would never decay.
pub const MAX_FEEDBACK: f32 = 0.99;

/// Damped feedback comb.
#[derive(Debug, Clone)]
pub struct CombFilter {
    line: DelayLine,
    feedback: f32,
    damp: f32,
    store: f32,
}

impl CombFilter {
    /// Creates a comb with a delay of `samples`.
    pub fn new(samples: usize) -> Self {
        Self {
            line: DelayLine::new(samples),
            feedback: 0.5,
            damp: 0.0,
            store: 0.0,
        }
    }

    /// Sets the feedback gain, clamped to `[0, MAX_FEEDBACK]`.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, MAX_FEEDBACK);
    }

    /// Sets the one-pole damping coefficient (0 = bright, 1 = fully damped).
    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    /// Returns the delay length in samples.
    pub fn len(&self) -> usize {
        self.line.len()
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Runs one sample through the comb.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.line.front();
        self.store = flush_denormal(output + (self.store - output) * self.damp);
        self.line.push(input + self.store * self.feedback);
        output
    }
}
