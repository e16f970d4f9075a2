//! Butterworth lowpass filter.

use patchbay_core::{CableBus, CableId, NodeId, Patch, PatchError, TickContext, Unit};

use crate::dsp::{Biquad, Coefficients};
use crate::wire;

/// Cables of a `butlp` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButlpPorts {
    /// The node.
    pub node: NodeId,
    /// Signal to filter.
    pub input: CableId,
    /// Cutoff frequency in Hz.
    pub freq: CableId,
    /// Filtered signal.
    pub out: CableId,
}

/// Second-order Butterworth lowpass with a modulatable cutoff.
///
/// Coefficients are recomputed only when the cutoff changes. A cutoff fed by
/// a constant is designed once on the first tick and never checked again.
#[derive(Debug)]
pub struct Butlp {
    ports: ButlpPorts,
    filter: Biquad,
    cutoff: f32,
    frozen: bool,
    redesigns: u64,
}

impl Butlp {
    /// Word in the patch language.
    pub const KIND: &'static str = "butlp";

    /// Creates the node with a default cutoff of 1000 Hz.
    pub fn build(patch: &mut Patch) -> Result<ButlpPorts, PatchError> {
        let mut node = patch.new_node(Self::KIND)?;
        let ports = ButlpPorts {
            node: node.id(),
            input: node.input("in", 0.0),
            freq: node.input("freq", 1000.0),
            out: node.output("out"),
        };
        node.finish(Self {
            ports,
            filter: Biquad::default(),
            cutoff: f32::NAN,
            frozen: false,
            redesigns: 0,
        })?;
        Ok(ports)
    }

    /// Number of times the coefficients were recomputed.
    pub fn redesigns(&self) -> u64 {
        self.redesigns
    }
}

impl Unit for Butlp {
    fn compute(&mut self, bus: &mut CableBus<'_>, ctx: &TickContext) {
        let p = self.ports;
        if !self.frozen {
            let cutoff = bus.read(p.freq);
            // NaN start value forces the first design.
            if cutoff != self.cutoff {
                self.filter
                    .set_coefficients(Coefficients::butterworth_lowpass(cutoff, ctx.sample_rate));
                self.cutoff = cutoff;
                self.redesigns += 1;
            }
            self.frozen = bus.is_constant(p.freq);
        }
        let y = self.filter.process(bus.read(p.input));
        bus.write(p.out, y);
    }
}

/// `in freq butlp -- out`
pub fn butlp(patch: &mut Patch) -> Result<ButlpPorts, PatchError> {
    let sources = patch.pop_inputs::<2>()?;
    let ports = Butlp::build(patch)?;
    wire(patch, sources, [ports.input, ports.freq])?;
    patch.push_cable(ports.out)?;
    Ok(ports)
}
