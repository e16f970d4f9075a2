//! Linear range mappers: `scale` for unipolar and `biscale` for bipolar input.

use patchbay_core::{CableBus, CableId, NodeId, Patch, PatchError, TickContext, Unit};

use crate::wire;

/// Cables of a `scale` or `biscale` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalePorts {
    /// The node.
    pub node: NodeId,
    /// Signal to map.
    pub input: CableId,
    /// Output for the bottom of the input range.
    pub min: CableId,
    /// Output for the top of the input range.
    pub max: CableId,
    /// Mapped signal.
    pub out: CableId,
}

/// Input range a [`Scale`] maps from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// `[0, 1]`
    Unipolar,
    /// `[-1, 1]`
    Bipolar,
}

/// Maps its input linearly onto `[min, max]`. Input outside the source range
/// extrapolates.
#[derive(Debug)]
pub struct Scale {
    ports: ScalePorts,
    polarity: Polarity,
}

impl Scale {
    /// Word for the unipolar mapper.
    pub const KIND: &'static str = "scale";
    /// Word for the bipolar mapper.
    pub const BIPOLAR_KIND: &'static str = "biscale";

    /// Creates the node with default range `[0, 1]`.
    pub fn build(patch: &mut Patch, polarity: Polarity) -> Result<ScalePorts, PatchError> {
        let kind = match polarity {
            Polarity::Unipolar => Self::KIND,
            Polarity::Bipolar => Self::BIPOLAR_KIND,
        };
        let mut node = patch.new_node(kind)?;
        let ports = ScalePorts {
            node: node.id(),
            input: node.input("in", 0.0),
            min: node.input("min", 0.0),
            max: node.input("max", 1.0),
            out: node.output("out"),
        };
        node.finish(Self { ports, polarity })?;
        Ok(ports)
    }

    /// Returns the input range this node maps from.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }
}

impl Unit for Scale {
    fn compute(&mut self, bus: &mut CableBus<'_>, _ctx: &TickContext) {
        let p = self.ports;
        let x = bus.read(p.input);
        let unit = match self.polarity {
            Polarity::Unipolar => x,
            Polarity::Bipolar => (x + 1.0) * 0.5,
        };
        let min = bus.read(p.min);
        bus.write(p.out, min + unit * (bus.read(p.max) - min));
    }
}

fn stack_form(patch: &mut Patch, polarity: Polarity) -> Result<ScalePorts, PatchError> {
    let sources = patch.pop_inputs::<3>()?;
    let ports = Scale::build(patch, polarity)?;
    wire(patch, sources, [ports.input, ports.min, ports.max])?;
    patch.push_cable(ports.out)?;
    Ok(ports)
}

/// `in min max scale -- out`
pub fn scale(patch: &mut Patch) -> Result<ScalePorts, PatchError> {
    stack_form(patch, Polarity::Unipolar)
}

/// `in min max biscale -- out`
pub fn biscale(patch: &mut Patch) -> Result<ScalePorts, PatchError> {
    stack_form(patch, Polarity::Bipolar)
}
