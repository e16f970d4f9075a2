//! DSP primitives the unit generators are built from.
//!
//! - [`Biquad`] - Second-order IIR section with [`Coefficients::butterworth_lowpass`]
//! - [`DcBlocker`] - First-order DC removal
//! - [`DelayLine`] - Fixed-length circular delay
//! - [`CombFilter`] / [`AllpassFilter`] - Reverb building blocks
//! - [`poly_blep`] - Band-limited step correction for oscillators

pub mod allpass;
pub mod biquad;
pub mod comb;
pub mod dc_blocker;
pub mod delay;
pub mod math;

pub use allpass::AllpassFilter;
pub use biquad::{Biquad, Coefficients};
pub use comb::CombFilter;
pub use dc_blocker::DcBlocker;
pub use delay::DelayLine;
pub use math::{flush_denormal, poly_blep, wrap_phase};
