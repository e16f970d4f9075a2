//! Band-limited sawtooth oscillator.

use patchbay_core::{CableBus, CableId, NodeId, Patch, PatchError, TickContext, Unit};

use crate::dsp::{poly_blep, wrap_phase};
use crate::wire;

/// Cables of a `blsaw` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlsawPorts {
    /// The node.
    pub node: NodeId,
    /// Frequency in Hz.
    pub freq: CableId,
    /// Peak amplitude.
    pub amp: CableId,
    /// Signal output.
    pub out: CableId,
}

/// Rising sawtooth with PolyBLEP correction at the wrap.
///
/// The naive ramp `2 * phase - 1` aliases badly at high frequencies; the
/// polynomial residual smooths the discontinuity over two samples.
#[derive(Debug)]
pub struct Blsaw {
    ports: BlsawPorts,
    phase: f32,
}

impl Blsaw {
    /// Word in the patch language.
    pub const KIND: &'static str = "blsaw";

    /// Creates the node with default inputs (440 Hz, amplitude 0.5).
    pub fn build(patch: &mut Patch) -> Result<BlsawPorts, PatchError> {
        let mut node = patch.new_node(Self::KIND)?;
        let ports = BlsawPorts {
            node: node.id(),
            freq: node.input("freq", 440.0),
            amp: node.input("amp", 0.5),
            out: node.output("out"),
        };
        node.finish(Self { ports, phase: 0.0 })?;
        Ok(ports)
    }
}

impl Unit for Blsaw {
    fn compute(&mut self, bus: &mut CableBus<'_>, ctx: &TickContext) {
        let p = self.ports;
        let dt = (bus.read(p.freq) / ctx.sample_rate).clamp(0.0, 0.5);
        let saw = 2.0 * self.phase - 1.0 - poly_blep(self.phase, dt);
        bus.write(p.out, bus.read(p.amp) * saw);
        self.phase = wrap_phase(self.phase + dt);
    }
}

/// `freq amp blsaw -- out`
pub fn blsaw(patch: &mut Patch) -> Result<BlsawPorts, PatchError> {
    let sources = patch.pop_inputs::<2>()?;
    let ports = Blsaw::build(patch)?;
    wire(patch, sources, [ports.freq, ports.amp])?;
    patch.push_cable(ports.out)?;
    Ok(ports)
}
