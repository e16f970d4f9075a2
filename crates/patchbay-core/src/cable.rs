//! Scalar signal slots ("cables") and the per-patch cable bank.
//!
//! A cable either holds a literal or reads another cable. Every cable of a
//! patch lives in one [`CableBank`]; nodes refer to their cables by
//! [`CableId`]. Connections are recorded as direct source links during the
//! build phase and flattened to root producers when the patch starts running,
//! so a run-phase read is a single indexed load no matter how long the chain.
//!
//! # Ordering
//!
//! A connection is accepted only if the producer's node precedes the
//! consumer's node in creation order (literal cables precede every node).
//! Each link therefore points to a strictly earlier node, which rules out
//! cycles and guarantees the producer has already run when the consumer reads
//! it during a tick.

use core::fmt;

use crate::error::PatchError;
use crate::node::NodeId;

/// Identifier of a cable within one patch.
///
/// Cable ids are assigned sequentially and stay valid for the patch's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CableId(pub(crate) u32);

impl CableId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cable#{}", self.0)
    }
}

/// Who allocated a cable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    /// A cable declared by a node.
    Node(NodeId),
    /// A free-standing literal pushed onto the construction stack.
    Literal,
}

impl Owner {
    /// Returns true if a cable owned by `self` may feed a cable owned by `consumer`.
    fn precedes(self, consumer: Owner) -> bool {
        match (self, consumer) {
            (Owner::Literal, _) => true,
            (Owner::Node(producer), Owner::Node(consumer)) => producer.0 < consumer.0,
            (Owner::Node(_), Owner::Literal) => false,
        }
    }
}

/// Role of a cable on its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Read by the owning node; may be connected to a source.
    Input,
    /// Written by the owning node during its compute step.
    Output,
    /// A literal with no owning node.
    Literal,
}

/// How a cable obtains its value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CableMode {
    /// A literal that may be changed between ticks.
    Value,
    /// A literal fixed for the patch's lifetime.
    Constant,
    /// Reads the given cable every tick.
    Connected(CableId),
}

#[derive(Debug, Clone)]
struct Cable {
    name: &'static str,
    owner: Owner,
    direction: Direction,
    mode: CableMode,
}

/// Storage for every cable of a patch.
///
/// `values` holds literals and node outputs; connected cables never hold
/// authoritative data. `routes` maps each cable to the slot its reads come
/// from and is only meaningful once [`resolve`](Self::resolve) has run.
#[derive(Debug, Default)]
pub(crate) struct CableBank {
    cables: Vec<Cable>,
    values: Vec<f32>,
    routes: Vec<u32>,
}

impl CableBank {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.cables.len()
    }

    pub(crate) fn alloc(
        &mut self,
        name: &'static str,
        owner: Owner,
        direction: Direction,
        mode: CableMode,
        value: f32,
    ) -> CableId {
        let id = CableId(self.cables.len() as u32);
        self.cables.push(Cable {
            name,
            owner,
            direction,
            mode,
        });
        self.values.push(value);
        id
    }

    /// Drops every cable allocated at or after `len` (node builder rollback).
    pub(crate) fn truncate(&mut self, len: usize) {
        self.cables.truncate(len);
        self.values.truncate(len);
    }

    fn cable(&self, id: CableId) -> Result<&Cable, PatchError> {
        self.cables
            .get(id.slot())
            .ok_or(PatchError::UnknownCable(id))
    }

    pub(crate) fn check(&self, id: CableId) -> Result<(), PatchError> {
        self.cable(id).map(|_| ())
    }

    pub(crate) fn name(&self, id: CableId) -> Option<&'static str> {
        self.cables.get(id.slot()).map(|c| c.name)
    }

    pub(crate) fn mode(&self, id: CableId) -> Result<CableMode, PatchError> {
        self.cable(id).map(|c| c.mode)
    }

    pub(crate) fn owner(&self, id: CableId) -> Result<Owner, PatchError> {
        self.cable(id).map(|c| c.owner)
    }

    pub(crate) fn direction(&self, id: CableId) -> Result<Direction, PatchError> {
        self.cable(id).map(|c| c.direction)
    }

    /// Makes `dest` read `source` from now on.
    pub(crate) fn connect(&mut self, source: CableId, dest: CableId) -> Result<(), PatchError> {
        let producer = self.cable(source)?.owner;
        let consumer = self.cable(dest)?;
        if consumer.direction != Direction::Input {
            return Err(PatchError::NotAnInput(dest));
        }
        if !producer.precedes(consumer.owner) {
            return Err(PatchError::OrderingViolation {
                from: source,
                to: dest,
            });
        }
        self.cables[dest.slot()].mode = CableMode::Connected(source);
        Ok(())
    }

    /// Stores a literal on an input cable, replacing any connection.
    ///
    /// Outputs belong to their node's compute step, and pushed literals may
    /// already be shared by consumers that rely on them staying constant, so
    /// both are rejected.
    pub(crate) fn set_literal(
        &mut self,
        id: CableId,
        value: f32,
        mode: CableMode,
    ) -> Result<(), PatchError> {
        if self.cable(id)?.direction != Direction::Input {
            return Err(PatchError::NotAnInput(id));
        }
        self.cables[id.slot()].mode = mode;
        self.values[id.slot()] = value;
        Ok(())
    }

    /// Follows connection links to the cable that owns the data.
    fn root(&self, id: CableId) -> CableId {
        let mut current = id;
        // Links always point to a strictly earlier node, so the chain is
        // bounded by the number of cables.
        for _ in 0..self.cables.len() {
            match self.cables[current.slot()].mode {
                CableMode::Connected(next) => current = next,
                CableMode::Value | CableMode::Constant => break,
            }
        }
        current
    }

    /// Build-phase read: walks the connection chain.
    pub(crate) fn value(&self, id: CableId) -> Result<f32, PatchError> {
        self.check(id)?;
        Ok(self.values[self.root(id).slot()])
    }

    /// Flattens every connection to its root producer.
    pub(crate) fn resolve(&mut self) {
        self.routes = (0..self.cables.len() as u32)
            .map(|i| self.root(CableId(i)).0)
            .collect();
    }

    #[inline]
    fn read_resolved(&self, id: CableId) -> f32 {
        self.values[self.routes[id.slot()] as usize]
    }

    #[inline]
    fn is_constant_resolved(&self, id: CableId) -> bool {
        let root = self.routes[id.slot()] as usize;
        self.cables[root].mode == CableMode::Constant
    }

    #[inline]
    fn owned_output(&self, id: CableId, node: NodeId) -> bool {
        let cable = &self.cables[id.slot()];
        cable.direction == Direction::Output && cable.owner == Owner::Node(node)
    }

    /// Builds the connection view handed to one node's compute step.
    pub(crate) fn bus(&mut self, node: NodeId) -> CableBus<'_> {
        CableBus { bank: self, node }
    }
}

/// Run-phase view of the cable bank for a single node.
///
/// Reads see the latest value of the producer at the root of the cable's
/// connection chain, including values written earlier in the same tick.
/// Writes are only permitted on the node's own output cables.
pub struct CableBus<'a> {
    bank: &'a mut CableBank,
    node: NodeId,
}

impl CableBus<'_> {
    /// Returns the node this bus belongs to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Reads the current value of a cable.
    #[inline]
    pub fn read(&self, id: CableId) -> f32 {
        self.bank.read_resolved(id)
    }

    /// Writes one of this node's output cables.
    #[inline]
    pub fn write(&mut self, id: CableId, value: f32) {
        debug_assert!(
            self.bank.owned_output(id, self.node),
            "{} writes {id}, which is not one of its outputs",
            self.node
        );
        self.bank.values[id.slot()] = value;
    }

    /// Returns true if the cable's value is a fixed literal for the patch's
    /// lifetime, so derived coefficients never need recomputing.
    #[inline]
    pub fn is_constant(&self, id: CableId) -> bool {
        self.bank.is_constant_resolved(id)
    }
}
