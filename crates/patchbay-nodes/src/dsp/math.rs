//! Small numeric helpers shared by the unit generators.

/// Flushes denormal-range values to zero.
///
/// Recursive filters decaying toward silence can otherwise spend most of
/// their time on subnormal arithmetic.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Wraps a phase into `[0, 1)`.
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    let wrapped = phase - libm::floorf(phase);
    // floorf can round a tiny negative phase up to exactly 1.0
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Two-sample polynomial band-limited step residual.
///
/// `t` is the oscillator phase in `[0, 1)` and `dt` the phase increment per
/// sample. Returns the correction to subtract from a naive sawtooth near its
/// discontinuity; zero elsewhere.
#[inline]
pub fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    if t < dt {
        let n = t / dt;
        n + n - n * n - 1.0
    } else if t > 1.0 - dt {
        let n = (t - 1.0) / dt;
        n * n + n + n + 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_denormal_zeroes_tiny_values() {
        assert_eq!(flush_denormal(1e-30), 0.0);
        assert_eq!(flush_denormal(-1e-25), 0.0);
        assert_eq!(flush_denormal(0.25), 0.25);
    }

    #[test]
    fn wrap_phase_stays_in_unit_interval() {
        for phase in [-2.75, -0.0, 0.0, 0.5, 1.0, 3.25, -1e-9] {
            let w = wrap_phase(phase);
            assert!((0.0..1.0).contains(&w), "{phase} wrapped to {w}");
        }
        assert!((wrap_phase(3.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn poly_blep_is_zero_away_from_edge() {
        let dt = 0.01;
        assert_eq!(poly_blep(0.5, dt), 0.0);
        assert!((poly_blep(0.0, dt) + 1.0).abs() < 1e-6);
        assert!(poly_blep(0.999_999, dt) > 0.99);
    }
}
