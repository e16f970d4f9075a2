//! Passthrough sink that reports what it observed.
//!
//! A probe forwards its input unchanged and keeps statistics about every
//! compute call: how many there were, whether the sample indices were
//! contiguous, the peak magnitude, and the first `capacity` values. The value
//! store is allocated when the node is built, so recording never allocates on
//! the tick path.

use patchbay_core::{CableBus, CableId, NodeId, Patch, PatchError, TickContext, Unit};

use crate::wire;

/// Cables of a `probe` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePorts {
    /// The node.
    pub node: NodeId,
    /// Observed signal.
    pub input: CableId,
    /// Passthrough of the input.
    pub out: CableId,
}

/// Observing passthrough.
#[derive(Debug)]
pub struct Probe {
    ports: ProbePorts,
    calls: u64,
    first_sample: Option<u64>,
    last_sample: Option<u64>,
    contiguous: bool,
    peak: f32,
    values: Vec<f32>,
    capacity: usize,
}

impl Probe {
    /// Word in the patch language.
    pub const KIND: &'static str = "probe";
    /// Values recorded by the `probe` word.
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Creates a probe recording up to `capacity` values.
    pub fn build(patch: &mut Patch, capacity: usize) -> Result<ProbePorts, PatchError> {
        let mut node = patch.new_node(Self::KIND)?;
        let ports = ProbePorts {
            node: node.id(),
            input: node.input("in", 0.0),
            out: node.output("out"),
        };
        node.finish(Self {
            ports,
            calls: 0,
            first_sample: None,
            last_sample: None,
            contiguous: true,
            peak: 0.0,
            values: Vec::with_capacity(capacity),
            capacity,
        })?;
        Ok(ports)
    }

    /// Number of compute invocations.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Sample index of the first invocation.
    pub fn first_sample(&self) -> Option<u64> {
        self.first_sample
    }

    /// Sample index of the latest invocation.
    pub fn last_sample(&self) -> Option<u64> {
        self.last_sample
    }

    /// True if every invocation saw the previous sample index plus one.
    pub fn contiguous(&self) -> bool {
        self.contiguous
    }

    /// Largest absolute value seen.
    pub fn peak(&self) -> f32 {
        self.peak
    }

    /// The first recorded values, up to the configured capacity.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Forgets everything observed so far; the next tick starts a new window.
    ///
    /// Keeps the value store's allocation.
    pub fn reset(&mut self) {
        self.calls = 0;
        self.first_sample = None;
        self.last_sample = None;
        self.contiguous = true;
        self.peak = 0.0;
        self.values.clear();
    }
}

impl Unit for Probe {
    fn compute(&mut self, bus: &mut CableBus<'_>, ctx: &TickContext) {
        if let Some(last) = self.last_sample {
            self.contiguous &= ctx.sample == last + 1;
        } else {
            self.first_sample = Some(ctx.sample);
        }
        self.last_sample = Some(ctx.sample);
        self.calls += 1;

        let v = bus.read(self.ports.input);
        self.peak = self.peak.max(v.abs());
        if self.values.len() < self.capacity {
            self.values.push(v);
        }
        bus.write(self.ports.out, v);
    }
}

/// `in probe -- out`
pub fn probe(patch: &mut Patch) -> Result<ProbePorts, PatchError> {
    probe_with_capacity(patch, Probe::DEFAULT_CAPACITY)
}

/// Stack-form probe with an explicit recording capacity.
pub fn probe_with_capacity(patch: &mut Patch, capacity: usize) -> Result<ProbePorts, PatchError> {
    let sources = patch.pop_inputs::<1>()?;
    let ports = Probe::build(patch, capacity)?;
    wire(patch, sources, [ports.input])?;
    patch.push_cable(ports.out)?;
    Ok(ports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_core::PatchConfig;

    #[test]
    fn records_up_to_capacity() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        patch.push_constant(-0.25).unwrap();
        let ports = probe_with_capacity(&mut patch, 3).unwrap();
        patch.run(10).unwrap();

        let probe = patch.unit::<Probe>(ports.node).unwrap();
        assert_eq!(probe.calls(), 10);
        assert_eq!(probe.values(), &[-0.25; 3]);
        assert_eq!(probe.first_sample(), Some(0));
        assert_eq!(probe.last_sample(), Some(9));
        assert!(probe.contiguous());
        assert_eq!(probe.peak(), 0.25);
        assert_eq!(patch.value(ports.out).unwrap(), -0.25);
    }

    #[test]
    fn reset_starts_a_new_window() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        patch.push_constant(0.75).unwrap();
        let ports = probe_with_capacity(&mut patch, 4).unwrap();
        patch.run(100).unwrap();

        patch.unit_mut::<Probe>(ports.node).unwrap().reset();
        patch.run(2).unwrap();

        let probe = patch.unit::<Probe>(ports.node).unwrap();
        assert_eq!(probe.calls(), 2);
        assert_eq!(probe.first_sample(), Some(100));
        assert_eq!(probe.last_sample(), Some(101));
        assert!(probe.contiguous());
        assert_eq!(probe.values(), &[0.75; 2]);
    }
}
