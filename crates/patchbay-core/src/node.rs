//! Processing units and their registration with a patch.
//!
//! A node pairs a [`Unit`] (the type-specific state and compute step) with
//! its declared cables. Nodes are created through [`Patch::new_node`], which
//! hands out a [`NodeBuilder`]: declare the named inputs and outputs, build
//! the unit around the returned [`CableId`]s, then [`finish`](NodeBuilder::finish).
//!
//! ```rust,ignore
//! let mut node = patch.new_node("mul")?;
//! let ports = MulPorts {
//!     node: node.id(),
//!     in1: node.input("in1", 0.0),
//!     in2: node.input("in2", 0.0),
//!     out: node.output("out"),
//! };
//! node.finish(Mul { ports })?;
//! ```
//!
//! Node ids are indices into the patch's creation-ordered node list, which is
//! also the execution order of every tick.

use core::any::Any;
use core::fmt;

use crate::cable::{CableBus, CableId, CableMode, Direction, Owner};
use crate::error::{PatchError, SetupError};
use crate::patch::Patch;

/// Identifier of a node: its position in creation (and execution) order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Per-tick information passed to every compute step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickContext {
    /// Index of the sample being computed; 0 on the first tick.
    pub sample: u64,
    /// Patch sample rate in Hz.
    pub sample_rate: f32,
    /// Patch block size in samples.
    pub block_size: usize,
}

impl TickContext {
    /// Time of this sample in seconds.
    pub fn time_secs(&self) -> f64 {
        self.sample as f64 / f64::from(self.sample_rate)
    }
}

/// Information available to a unit's setup step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SetupContext {
    /// The node being set up.
    pub node: NodeId,
    /// Node kind as passed to [`Patch::new_node`].
    pub kind: &'static str,
    /// Patch sample rate in Hz.
    pub sample_rate: f32,
    /// Patch block size in samples.
    pub block_size: usize,
}

/// Downcasting support for boxed units.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Returns `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Capability contract shared by every unit generator.
///
/// A unit owns its private state and the ids of its cables. It is set up once
/// when its node is created, computed once per tick in creation order, and
/// torn down when the patch is closed.
///
/// `compute` runs on the real-time path: it must not allocate, block, or
/// fail. Anything that can go wrong belongs in `setup` or `teardown`.
pub trait Unit: AsAny + Send {
    /// Prepares the unit before it joins the patch (precompute tables, open
    /// output resources). An error aborts the build.
    fn setup(&mut self, _ctx: &SetupContext) -> Result<(), SetupError> {
        Ok(())
    }

    /// Reads inputs and writes outputs for one sample.
    fn compute(&mut self, bus: &mut CableBus<'_>, ctx: &TickContext);

    /// Releases resources (flush and close files).
    fn teardown(&mut self) -> Result<(), SetupError> {
        Ok(())
    }
}

/// Declared shape of a node: kind plus its named cables in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeInfo {
    id: NodeId,
    kind: &'static str,
    inputs: Vec<(&'static str, CableId)>,
    outputs: Vec<(&'static str, CableId)>,
}

impl NodeInfo {
    /// Returns the node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the node kind.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Returns the input cables in declaration order.
    pub fn inputs(&self) -> &[(&'static str, CableId)] {
        &self.inputs
    }

    /// Returns the output cables in declaration order.
    pub fn outputs(&self) -> &[(&'static str, CableId)] {
        &self.outputs
    }

    /// Looks up an input cable by name.
    pub fn input(&self, name: &str) -> Option<CableId> {
        find(&self.inputs, name)
    }

    /// Looks up an output cable by name.
    pub fn output(&self, name: &str) -> Option<CableId> {
        find(&self.outputs, name)
    }
}

fn find(cables: &[(&'static str, CableId)], name: &str) -> Option<CableId> {
    cables
        .iter()
        .find(|(cable_name, _)| *cable_name == name)
        .map(|(_, id)| *id)
}

pub(crate) struct NodeData {
    pub info: NodeInfo,
    pub unit: Box<dyn Unit>,
}

/// In-progress node registration.
///
/// Cables declared here are allocated immediately so their ids can be stored
/// in the unit. Dropping the builder without calling
/// [`finish`](Self::finish) releases them again and leaves the patch as it was.
pub struct NodeBuilder<'p> {
    patch: &'p mut Patch,
    id: NodeId,
    kind: &'static str,
    cable_mark: usize,
    inputs: Vec<(&'static str, CableId)>,
    outputs: Vec<(&'static str, CableId)>,
    committed: bool,
}

impl<'p> NodeBuilder<'p> {
    pub(crate) fn new(patch: &'p mut Patch, kind: &'static str) -> Self {
        let id = NodeId(patch.nodes.len() as u32);
        let cable_mark = patch.cables.len();
        Self {
            patch,
            id,
            kind,
            cable_mark,
            inputs: Vec::new(),
            outputs: Vec::new(),
            committed: false,
        }
    }

    /// Returns the id the node will have once finished.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the patch sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.patch.config().sample_rate as f32
    }

    /// Declares an input cable holding `default` until it is set or connected.
    pub fn input(&mut self, name: &'static str, default: f32) -> CableId {
        let id = self.patch.cables.alloc(
            name,
            Owner::Node(self.id),
            Direction::Input,
            CableMode::Value,
            default,
        );
        self.inputs.push((name, id));
        id
    }

    /// Declares an output cable, initially 0.0.
    pub fn output(&mut self, name: &'static str) -> CableId {
        let id = self.patch.cables.alloc(
            name,
            Owner::Node(self.id),
            Direction::Output,
            CableMode::Value,
            0.0,
        );
        self.outputs.push((name, id));
        id
    }

    /// Runs the unit's setup step and appends the node to the patch.
    ///
    /// A setup failure aborts the whole build.
    pub fn finish<U: Unit>(mut self, unit: U) -> Result<NodeId, PatchError> {
        let mut unit: Box<dyn Unit> = Box::new(unit);
        let config = self.patch.config();
        let ctx = SetupContext {
            node: self.id,
            kind: self.kind,
            sample_rate: config.sample_rate as f32,
            block_size: config.block_size,
        };
        if let Err(err) = unit.setup(&ctx) {
            return Err(self.patch.abort(PatchError::SinkSetupFailure {
                kind: self.kind,
                message: err.render(),
            }));
        }

        self.committed = true;
        let info = NodeInfo {
            id: self.id,
            kind: self.kind,
            inputs: core::mem::take(&mut self.inputs),
            outputs: core::mem::take(&mut self.outputs),
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            node = %self.id,
            kind = self.kind,
            inputs = info.inputs.len(),
            outputs = info.outputs.len(),
            "node created"
        );
        self.patch.nodes.push(NodeData { info, unit });
        Ok(self.id)
    }
}

impl Drop for NodeBuilder<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.patch.cables.truncate(self.cable_mark);
        }
    }
}
