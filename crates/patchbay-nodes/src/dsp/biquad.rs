//! Second-order IIR section and Butterworth lowpass design.
//!
//! Coefficients follow the RBJ Audio EQ Cookbook. A Q of `1/sqrt(2)` gives the
//! maximally flat (Butterworth) response.

use core::f32::consts::{FRAC_1_SQRT_2, PI};
use libm::{cosf, sinf};

use super::math::flush_denormal;

/// Normalized biquad coefficients (`a0 == 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Feedforward taps.
    pub b: [f32; 3],
    /// Feedback taps `a1`, `a2`.
    pub a: [f32; 2],
}

impl Coefficients {
    /// Unity passthrough.
    pub const IDENTITY: Self = Self {
        b: [1.0, 0.0, 0.0],
        a: [0.0, 0.0],
    };

    /// Second-order lowpass at `cutoff` Hz with quality factor `q`.
    ///
    /// The cutoff is clamped to `[1 Hz, 0.49 * sample_rate]` so the design
    /// stays stable for any input signal.
    pub fn lowpass(cutoff: f32, q: f32, sample_rate: f32) -> Self {
        let cutoff = cutoff.clamp(1.0, sample_rate * 0.49);
        let omega = 2.0 * PI * cutoff / sample_rate;
        let cos_omega = cosf(omega);
        let alpha = sinf(omega) / (2.0 * q);

        let a0_inv = 1.0 / (1.0 + alpha);
        let b1 = (1.0 - cos_omega) * a0_inv;
        Self {
            b: [b1 * 0.5, b1, b1 * 0.5],
            a: [-2.0 * cos_omega * a0_inv, (1.0 - alpha) * a0_inv],
        }
    }

    /// Butterworth lowpass at `cutoff` Hz.
    pub fn butterworth_lowpass(cutoff: f32, sample_rate: f32) -> Self {
        Self::lowpass(cutoff, FRAC_1_SQRT_2, sample_rate)
    }
}

/// Direct Form I biquad:
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: Coefficients,
    x: [f32; 2],
    y: [f32; 2],
}

impl Biquad {
    /// Creates a biquad with the given coefficients and cleared state.
    pub fn new(coeffs: Coefficients) -> Self {
        Self {
            coeffs,
            x: [0.0; 2],
            y: [0.0; 2],
        }
    }

    /// Replaces the coefficients, keeping the filter state.
    pub fn set_coefficients(&mut self, coeffs: Coefficients) {
        self.coeffs = coeffs;
    }

    /// Filters one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let Coefficients { b, a } = self.coeffs;
        let output = b[0] * input + b[1] * self.x[0] + b[2] * self.x[1]
            - a[0] * self.y[0]
            - a[1] * self.y[1];
        self.x = [input, self.x[0]];
        self.y = [flush_denormal(output), self.y[0]];
        output
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new(Coefficients::IDENTITY)
    }
}
