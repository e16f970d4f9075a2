//! Schroeder allpass diffuser.

use super::delay::DelayLine;
use super::math::flush_denormal;

const GAIN: f32 = 0.5;

/// Allpass section used to smear comb echoes into a dense tail.
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    line: DelayLine,
}

impl AllpassFilter {
    /// Creates an allpass with a delay of `samples` and gain 0.5.
    pub fn new(samples: usize) -> Self {
        Self {
            line: DelayLine::new(samples),
        }
    }

    /// Runs one sample through the section.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.line.front();
        self.line.push(flush_denormal(input + delayed * GAIN));
        delayed - input
    }
}
