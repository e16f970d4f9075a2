//! Two-input arithmetic: `add` and `mul`.

use patchbay_core::{CableBus, CableId, NodeId, Patch, PatchError, TickContext, Unit};

use crate::wire;

/// Cables of a two-input arithmetic node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryPorts {
    /// The node.
    pub node: NodeId,
    /// First operand.
    pub in1: CableId,
    /// Second operand.
    pub in2: CableId,
    /// Result.
    pub out: CableId,
}

/// Operation performed by a [`Binary`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `in1 + in2`
    Add,
    /// `in1 * in2`
    Mul,
}

impl BinaryOp {
    /// Word in the patch language.
    pub const fn kind(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Mul => "mul",
        }
    }

    #[inline]
    fn apply(self, a: f32, b: f32) -> f32 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Mul => a * b,
        }
    }
}

/// Combines two signals sample by sample.
#[derive(Debug)]
pub struct Binary {
    ports: BinaryPorts,
    op: BinaryOp,
}

impl Binary {
    /// Creates the node with both operands at 0.
    pub fn build(patch: &mut Patch, op: BinaryOp) -> Result<BinaryPorts, PatchError> {
        let mut node = patch.new_node(op.kind())?;
        let ports = BinaryPorts {
            node: node.id(),
            in1: node.input("in1", 0.0),
            in2: node.input("in2", 0.0),
            out: node.output("out"),
        };
        node.finish(Self { ports, op })?;
        Ok(ports)
    }

    /// Returns the operation.
    pub fn op(&self) -> BinaryOp {
        self.op
    }
}

impl Unit for Binary {
    fn compute(&mut self, bus: &mut CableBus<'_>, _ctx: &TickContext) {
        let p = self.ports;
        let y = self.op.apply(bus.read(p.in1), bus.read(p.in2));
        bus.write(p.out, y);
    }
}

fn stack_form(patch: &mut Patch, op: BinaryOp) -> Result<BinaryPorts, PatchError> {
    let sources = patch.pop_inputs::<2>()?;
    let ports = Binary::build(patch, op)?;
    wire(patch, sources, [ports.in1, ports.in2])?;
    patch.push_cable(ports.out)?;
    Ok(ports)
}

/// `in1 in2 add -- out`
pub fn add(patch: &mut Patch) -> Result<BinaryPorts, PatchError> {
    stack_form(patch, BinaryOp::Add)
}

/// `in1 in2 mul -- out`
pub fn mul(patch: &mut Patch) -> Result<BinaryPorts, PatchError> {
    stack_form(patch, BinaryOp::Mul)
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_core::PatchConfig;

    #[test]
    fn add_and_mul() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        patch.push_constant(3.0).unwrap();
        patch.push_constant(4.0).unwrap();
        patch.dup().unwrap();
        patch.dup().unwrap();
        // 3 4 4 4 -> 3 4 16 -> 3 20
        let product = mul(&mut patch).unwrap();
        let sum = add(&mut patch).unwrap();
        assert_eq!(patch.depth(), 2);

        patch.tick().unwrap();
        assert_eq!(patch.value(product.out).unwrap(), 16.0);
        assert_eq!(patch.value(sum.out).unwrap(), 20.0);
    }
}
