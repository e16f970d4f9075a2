//! Sine oscillator.

use core::f32::consts::TAU;

use patchbay_core::{CableBus, CableId, NodeId, Patch, PatchError, TickContext, Unit};

use crate::dsp::wrap_phase;
use crate::wire;

/// Cables of a `sine` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinePorts {
    /// The node.
    pub node: NodeId,
    /// Frequency in Hz.
    pub freq: CableId,
    /// Peak amplitude.
    pub amp: CableId,
    /// Signal output.
    pub out: CableId,
}

/// Phase-accumulating sine oscillator starting at phase zero.
#[derive(Debug)]
pub struct Sine {
    ports: SinePorts,
    phase: f32,
}

impl Sine {
    /// Word in the patch language.
    pub const KIND: &'static str = "sine";

    /// Creates the node with default inputs (440 Hz, amplitude 0.5).
    pub fn build(patch: &mut Patch) -> Result<SinePorts, PatchError> {
        let mut node = patch.new_node(Self::KIND)?;
        let ports = SinePorts {
            node: node.id(),
            freq: node.input("freq", 440.0),
            amp: node.input("amp", 0.5),
            out: node.output("out"),
        };
        node.finish(Self { ports, phase: 0.0 })?;
        Ok(ports)
    }

    /// Current phase in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.phase
    }
}

impl Unit for Sine {
    fn compute(&mut self, bus: &mut CableBus<'_>, ctx: &TickContext) {
        let p = self.ports;
        bus.write(p.out, bus.read(p.amp) * libm::sinf(TAU * self.phase));
        self.phase = wrap_phase(self.phase + bus.read(p.freq) / ctx.sample_rate);
    }
}

/// `freq amp sine -- out`
pub fn sine(patch: &mut Patch) -> Result<SinePorts, PatchError> {
    let sources = patch.pop_inputs::<2>()?;
    let ports = Sine::build(patch)?;
    wire(patch, sources, [ports.freq, ports.amp])?;
    patch.push_cable(ports.out)?;
    Ok(ports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_core::PatchConfig;

    #[test]
    fn quarter_period_reaches_amplitude() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        patch.push_constant(441.0).unwrap();
        patch.push_constant(0.8).unwrap();
        let ports = sine(&mut patch).unwrap();

        // 441 Hz at 44.1 kHz is 100 samples per cycle.
        patch.run(26).unwrap();
        assert!((patch.value(ports.out).unwrap() - 0.8).abs() < 1e-4);
    }

    #[test]
    fn first_sample_is_zero() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        let ports = Sine::build(&mut patch).unwrap();
        patch.tick().unwrap();
        assert_eq!(patch.value(ports.out).unwrap(), 0.0);
        let sine = patch.unit::<Sine>(ports.node).unwrap();
        assert!(sine.phase() > 0.0);
    }
}
