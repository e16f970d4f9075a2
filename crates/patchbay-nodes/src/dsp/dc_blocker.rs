//! First-order DC blocking highpass.
//!
//! ```text
//! H(z) = (1 - z^-1) / (1 - R z^-1)
//! ```
//!
//! The pole radius `R` sets the cutoff: `fc ≈ (1 - R) * fs / (2π)`.

use core::f32::consts::PI;

/// DC blocking filter.
#[derive(Debug, Clone)]
pub struct DcBlocker {
    r: f32,
    x_prev: f32,
    y_prev: f32,
}

impl DcBlocker {
    /// Cutoff used by [`new`](Self::new), in Hz.
    pub const DEFAULT_CUTOFF_HZ: f32 = 7.0;

    /// Creates a blocker with a ~7 Hz cutoff at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_cutoff(Self::DEFAULT_CUTOFF_HZ, sample_rate)
    }

    /// Creates a blocker with the given cutoff.
    pub fn with_cutoff(cutoff_hz: f32, sample_rate: f32) -> Self {
        let r = (1.0 - 2.0 * PI * cutoff_hz / sample_rate).clamp(0.9, 0.9999);
        Self {
            r,
            x_prev: 0.0,
            y_prev: 0.0,
        }
    }

    /// `y[n] = x[n] - x[n-1] + R * y[n-1]`
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = input - self.x_prev + self.r * self.y_prev;
        self.x_prev = input;
        self.y_prev = super::math::flush_denormal(output);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_constant_offset() {
        let mut dc = DcBlocker::new(44100.0);
        let mut out = 1.0;
        for _ in 0..44100 {
            out = dc.process(1.0);
        }
        assert!(out.abs() < 0.01, "residual DC {out}");
    }

    #[test]
    fn passes_audio_band() {
        let sr = 44100.0;
        let mut dc = DcBlocker::new(sr);
        let mut peak = 0.0f32;
        for i in 0..44100 {
            let x = libm::sinf(2.0 * PI * 1000.0 * i as f32 / sr);
            let y = dc.process(x);
            if i > 40000 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak > 0.95, "1 kHz peak was {peak}");
    }
}
