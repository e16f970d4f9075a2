//! The siren demo patch, built directly through the Rust API.
//!
//! A slow sine LFO sweeps both the pitch of a band-limited saw and the cutoff
//! of a lowpass after it. A quiet reverb send is mixed back in through a DC
//! blocker. The same graph as a script lives in `demos/siren.pb`.

use std::path::Path;

use patchbay_core::{Patch, PatchError};
use patchbay_io::{WavoutPorts, wavout};
use patchbay_nodes::{add, biscale, blsaw, butlp, dcblock, mul, revsc, scale, sine};

/// Builds the siren on an empty patch, ending in a WAV sink at `output`.
///
/// Leaves the stack empty and every buffer released.
pub fn build(patch: &mut Patch, output: &Path) -> Result<WavoutPorts, PatchError> {
    // LFO: 0.1 Hz sine mapped onto [0, 1]
    patch.push_constant(0.1)?;
    patch.push_constant(1.0)?;
    sine(patch)?;
    patch.push_constant(0.0)?;
    patch.push_constant(1.0)?;
    biscale(patch)?;
    let lfo = patch.hold_top()?;

    // Saw swept between 100 and 600 Hz
    patch.push(lfo)?;
    patch.push_constant(100.0)?;
    patch.push_constant(600.0)?;
    scale(patch)?;
    patch.push_constant(0.5)?;
    blsaw(patch)?;

    // Cutoff swept between 100 and 2000 Hz
    patch.push(lfo)?;
    patch.push_constant(100.0)?;
    patch.push_constant(2000.0)?;
    scale(patch)?;
    butlp(patch)?;

    // Reverb send: left channel only, attenuated and DC-blocked
    patch.dup()?;
    patch.dup()?;
    patch.push_constant(0.97)?;
    patch.push_constant(10000.0)?;
    revsc(patch)?;
    patch.drop()?;
    patch.push_constant(0.1)?;
    mul(patch)?;
    dcblock(patch)?;

    patch.unhold(lfo)?;
    add(patch)?;

    let ports = wavout(patch, output)?;
    patch.drop()?;
    Ok(ports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_core::PatchConfig;

    #[test]
    fn siren_leaves_a_clean_stack() {
        let dir = tempfile::tempdir().unwrap();
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        build(&mut patch, &dir.path().join("siren.wav")).unwrap();
        assert!(patch.is_empty());
        assert_eq!(patch.free_buffers(), patch.buffer_capacity());
        assert_eq!(patch.node_count(), 11);
    }
}
