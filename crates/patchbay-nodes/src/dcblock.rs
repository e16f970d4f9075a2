//! DC blocking filter node.

use patchbay_core::{CableBus, CableId, NodeId, Patch, PatchError, TickContext, Unit};

use crate::dsp::DcBlocker;
use crate::wire;

/// Cables of a `dcblock` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DcblockPorts {
    /// The node.
    pub node: NodeId,
    /// Signal to filter.
    pub input: CableId,
    /// Signal with its DC offset removed.
    pub out: CableId,
}

/// Removes DC offset with a ~7 Hz first-order highpass.
#[derive(Debug)]
pub struct Dcblock {
    ports: DcblockPorts,
    filter: DcBlocker,
}

impl Dcblock {
    /// Word in the patch language.
    pub const KIND: &'static str = "dcblock";

    /// Creates the node.
    pub fn build(patch: &mut Patch) -> Result<DcblockPorts, PatchError> {
        let mut node = patch.new_node(Self::KIND)?;
        let filter = DcBlocker::new(node.sample_rate());
        let ports = DcblockPorts {
            node: node.id(),
            input: node.input("in", 0.0),
            out: node.output("out"),
        };
        node.finish(Self { ports, filter })?;
        Ok(ports)
    }
}

impl Unit for Dcblock {
    fn compute(&mut self, bus: &mut CableBus<'_>, _ctx: &TickContext) {
        let y = self.filter.process(bus.read(self.ports.input));
        bus.write(self.ports.out, y);
    }
}

/// `in dcblock -- out`
pub fn dcblock(patch: &mut Patch) -> Result<DcblockPorts, PatchError> {
    let sources = patch.pop_inputs::<1>()?;
    let ports = Dcblock::build(patch)?;
    wire(patch, sources, [ports.input])?;
    patch.push_cable(ports.out)?;
    Ok(ports)
}
