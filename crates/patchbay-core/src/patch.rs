//! Patch lifecycle: build-phase stack machine and run-phase tick engine.
//!
//! A [`Patch`] owns everything a signal graph needs: the creation-ordered node
//! list, the cable bank, the buffer pool, and the construction stack. It moves
//! through three states:
//!
//! - **Building**: stack operations, node construction, and wiring are allowed.
//! - **Running**: entered explicitly with [`Patch::start`] or implicitly by the
//!   first tick. Connections are flattened and the graph is frozen.
//! - **Aborted**: any failing build operation lands here. Every further build
//!   operation and every tick returns [`PatchError::BuildAborted`]; the caller
//!   is expected to drop the patch.
//!
//! # Stack protocol
//!
//! Node constructors follow a postfix protocol: arguments are pushed left to
//! right, the constructor pops its upstream inputs with
//! [`pop_inputs`](Patch::pop_inputs) (deepest entry = first input), connects
//! them, and pushes its primary outputs with [`push_cable`](Patch::push_cable).
//!
//! | Operation | Depth | Holds |
//! |-----------|-------|-------|
//! | `push(buf)` | +1 | +1 on `buf` |
//! | `push_cable(c)` | +1 | new buffer bound to `c`, count 1 |
//! | `pop()` | −1 | unchanged; the stack's hold moves to the caller |
//! | `dup()` | +1 | +1 on the top |
//! | `drop()` | −1 | −1 on the dropped buffer |
//! | `hold()` | 0 | new unbound buffer, count 1 |
//! | `unhold(buf)` | 0 | −1 |
//!
//! # Execution order
//!
//! Every tick computes each node exactly once, in creation order. Producers
//! must therefore be created before their consumers; [`Patch::connect`]
//! enforces this and reports [`PatchError::OrderingViolation`] otherwise.

use crate::buffer::{BufferId, BufferPool};
use crate::cable::{CableBank, CableId, CableMode, Direction, Owner};
use crate::config::PatchConfig;
use crate::error::{PatchError, Resource};
use crate::node::{NodeBuilder, NodeData, NodeId, NodeInfo, TickContext, Unit};
use crate::stack::Stack;

/// Lifecycle state of a patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchState {
    /// Graph construction is in progress.
    Building,
    /// The graph is frozen and ticking.
    Running,
    /// A build operation failed; the patch must be discarded.
    Aborted,
}

/// A complete signal graph with its construction stack and run parameters.
pub struct Patch {
    config: PatchConfig,
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) cables: CableBank,
    pool: BufferPool,
    stack: Stack,
    state: PatchState,
    sample: u64,
    closed: bool,
}

impl Patch {
    /// Creates an empty patch in the building state.
    pub fn new(config: PatchConfig) -> Result<Self, PatchError> {
        config.validate()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = config.sample_rate,
            block_size = config.block_size,
            buffers = config.buffer_count,
            stack_depth = config.stack_depth,
            nodes = config.node_capacity,
            "patch created"
        );
        Ok(Self {
            config,
            nodes: Vec::with_capacity(config.node_capacity),
            cables: CableBank::new(),
            pool: BufferPool::new(config.buffer_count),
            stack: Stack::new(config.stack_depth),
            state: PatchState::Building,
            sample: 0,
            closed: false,
        })
    }

    /// Returns the configuration the patch was created with.
    pub fn config(&self) -> PatchConfig {
        self.config
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Returns the block size in samples.
    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> PatchState {
        self.state
    }

    /// Returns the number of ticks computed so far.
    pub fn sample(&self) -> u64 {
        self.sample
    }

    /// Returns the elapsed signal time in seconds.
    pub fn time_secs(&self) -> f64 {
        self.sample as f64 / f64::from(self.config.sample_rate)
    }

    // --- Internal state guards ---

    /// Records a build failure and hands the error back.
    pub(crate) fn abort(&mut self, err: PatchError) -> PatchError {
        if self.state == PatchState::Building {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %err, "patch build aborted");
            self.state = PatchState::Aborted;
        }
        err
    }

    fn ensure_building(&self) -> Result<(), PatchError> {
        match self.state {
            PatchState::Building => Ok(()),
            PatchState::Running => Err(PatchError::NotBuilding),
            PatchState::Aborted => Err(PatchError::BuildAborted),
        }
    }

    /// Runs one build operation; a failure aborts the build.
    fn build<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, PatchError>,
    ) -> Result<T, PatchError> {
        self.ensure_building()?;
        let result = op(self);
        result.map_err(|err| self.abort(err))
    }

    // --- Nodes ---

    /// Starts registering a node of the given kind.
    ///
    /// Fails with [`PatchError::AllocationExhausted`] once `node_capacity`
    /// nodes exist.
    pub fn new_node(&mut self, kind: &'static str) -> Result<NodeBuilder<'_>, PatchError> {
        self.ensure_building()?;
        if self.nodes.len() >= self.config.node_capacity {
            return Err(self.abort(PatchError::AllocationExhausted {
                resource: Resource::Nodes,
                capacity: self.config.node_capacity,
            }));
        }
        Ok(NodeBuilder::new(self, kind))
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the declared shape of a node.
    pub fn node(&self, id: NodeId) -> Option<&NodeInfo> {
        self.nodes.get(id.0 as usize).map(|n| &n.info)
    }

    /// Iterates over all nodes in creation (execution) order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeInfo> {
        self.nodes.iter().map(|n| &n.info)
    }

    /// Returns a node's unit if it is of type `U`.
    pub fn unit<U: Unit>(&self, id: NodeId) -> Option<&U> {
        self.nodes
            .get(id.0 as usize)?
            .unit
            .as_ref()
            .as_any()
            .downcast_ref::<U>()
    }

    /// Returns a node's unit mutably if it is of type `U`.
    pub fn unit_mut<U: Unit>(&mut self, id: NodeId) -> Option<&mut U> {
        self.nodes
            .get_mut(id.0 as usize)?
            .unit
            .as_mut()
            .as_any_mut()
            .downcast_mut::<U>()
    }

    // --- Cables ---

    /// Makes `dest` read `source` on every tick.
    ///
    /// `dest` must be an input cable and `source`'s node must have been
    /// created before `dest`'s node.
    pub fn connect(&mut self, source: CableId, dest: CableId) -> Result<(), PatchError> {
        self.build(|p| p.cables.connect(source, dest))
    }

    /// Assigns a literal that may still change between ticks.
    ///
    /// While running, this is the one mutation still allowed, and only on
    /// cables that are already in value mode.
    pub fn set_value(&mut self, cable: CableId, value: f32) -> Result<(), PatchError> {
        if self.state == PatchState::Running {
            if self.cables.mode(cable)? != CableMode::Value
                || self.cables.direction(cable)? != Direction::Input
            {
                return Err(PatchError::NotAValue(cable));
            }
            return self.cables.set_literal(cable, value, CableMode::Value);
        }
        self.build(|p| p.cables.set_literal(cable, value, CableMode::Value))
    }

    /// Assigns a literal fixed for the patch's lifetime.
    ///
    /// Like [`set_value`](Self::set_value), only input cables accept
    /// literals; anything else fails with [`PatchError::NotAnInput`].
    pub fn set_constant(&mut self, cable: CableId, value: f32) -> Result<(), PatchError> {
        self.build(|p| p.cables.set_literal(cable, value, CableMode::Constant))
    }

    /// Reads a cable's current value, following its connection.
    pub fn value(&self, cable: CableId) -> Result<f32, PatchError> {
        self.cables.value(cable)
    }

    /// Returns how a cable obtains its value.
    pub fn cable_mode(&self, cable: CableId) -> Result<CableMode, PatchError> {
        self.cables.mode(cable)
    }

    /// Returns who allocated a cable.
    pub fn cable_owner(&self, cable: CableId) -> Result<Owner, PatchError> {
        self.cables.owner(cable)
    }

    /// Returns a cable's declared name (`"literal"` for pushed constants).
    pub fn cable_name(&self, cable: CableId) -> Option<&'static str> {
        self.cables.name(cable)
    }

    // --- Stack machine ---

    /// Returns the number of stack entries.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Returns true if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.stack.depth() == 0
    }

    /// Returns the configured stack depth.
    pub fn stack_capacity(&self) -> usize {
        self.stack.capacity()
    }

    /// Returns the top stack entry without popping it.
    pub fn top(&self) -> Option<BufferId> {
        self.stack.top()
    }

    /// Returns the stack entries, bottom first.
    pub fn stack_entries(&self) -> &[BufferId] {
        self.stack.entries()
    }

    /// Pushes an existing buffer, adding one hold.
    pub fn push(&mut self, buf: BufferId) -> Result<(), PatchError> {
        self.build(|p| {
            p.pool.check(buf)?;
            p.stack.ensure_room(1)?;
            p.pool.retain(buf)?;
            p.stack.push(buf)
        })
    }

    /// Pushes a fresh buffer mirroring `cable`. Node constructors use this
    /// for their primary outputs.
    pub fn push_cable(&mut self, cable: CableId) -> Result<BufferId, PatchError> {
        self.build(|p| {
            p.cables.check(cable)?;
            p.push_fresh(cable)
        })
    }

    /// Pushes a literal value as a fresh constant cable.
    pub fn push_constant(&mut self, value: f32) -> Result<BufferId, PatchError> {
        self.build(|p| {
            let cable = p.cables.alloc(
                "literal",
                Owner::Literal,
                Direction::Literal,
                CableMode::Constant,
                value,
            );
            p.push_fresh(cable)
        })
    }

    fn push_fresh(&mut self, cable: CableId) -> Result<BufferId, PatchError> {
        self.stack.ensure_room(1)?;
        let buf = self.pool.alloc()?;
        self.pool.bind(buf, cable)?;
        self.pool.retain(buf)?;
        self.stack.push(buf)?;
        Ok(buf)
    }

    /// Removes the top entry and hands its hold to the caller, who releases
    /// it with [`unhold`](Self::unhold) once done.
    pub fn pop(&mut self) -> Result<BufferId, PatchError> {
        self.build(|p| p.stack.pop())
    }

    /// Pushes the top entry again, adding one hold.
    pub fn dup(&mut self) -> Result<(), PatchError> {
        self.build(|p| {
            let top = p.stack.top().ok_or(PatchError::StackUnderflow {
                needed: 1,
                depth: 0,
            })?;
            p.stack.ensure_room(1)?;
            p.pool.retain(top)?;
            p.stack.push(top)
        })
    }

    /// Pops and discards the top entry, releasing its hold.
    pub fn drop(&mut self) -> Result<(), PatchError> {
        self.build(|p| {
            let top = p.stack.pop()?;
            p.release(top)
        })
    }

    /// Allocates an unbound buffer with one hold owned by the caller.
    pub fn hold(&mut self) -> Result<BufferId, PatchError> {
        self.build(|p| {
            let buf = p.pool.alloc()?;
            p.pool.retain(buf)?;
            #[cfg(feature = "tracing")]
            tracing::debug!(buffer = %buf, "buffer held");
            Ok(buf)
        })
    }

    /// Moves the top signal into a freshly held buffer and drops the entry.
    ///
    /// The result outlives any amount of later stack traffic; push it again
    /// with [`push`](Self::push) and release it with [`unhold`](Self::unhold).
    pub fn hold_top(&mut self) -> Result<BufferId, PatchError> {
        self.build(|p| {
            let top = p.stack.top().ok_or(PatchError::StackUnderflow {
                needed: 1,
                depth: 0,
            })?;
            let source = p.pool.source(top)?;
            let held = p.pool.alloc()?;
            p.pool.bind(held, source)?;
            p.pool.retain(held)?;
            p.stack.pop()?;
            p.release(top)?;
            #[cfg(feature = "tracing")]
            tracing::debug!(buffer = %held, source = %source, "top of stack held");
            Ok(held)
        })
    }

    /// Points a held buffer at a producer cable.
    pub fn bind(&mut self, buf: BufferId, cable: CableId) -> Result<(), PatchError> {
        self.build(|p| {
            p.cables.check(cable)?;
            p.pool.bind(buf, cable)
        })
    }

    /// Releases one hold on a buffer.
    pub fn unhold(&mut self, buf: BufferId) -> Result<(), PatchError> {
        self.build(|p| p.release(buf))
    }

    fn release(&mut self, buf: BufferId) -> Result<(), PatchError> {
        if self.pool.release(buf)? {
            #[cfg(feature = "tracing")]
            tracing::debug!(buffer = %buf, "buffer returned to pool");
        }
        Ok(())
    }

    /// Returns the producer cable a held buffer mirrors, without consuming it.
    pub fn get(&mut self, buf: BufferId) -> Result<CableId, PatchError> {
        self.build(|p| p.pool.source(buf))
    }

    /// Pops `N` entries and resolves them to their producer cables.
    ///
    /// The deepest popped entry becomes element 0, so arguments pushed left to
    /// right come back in declaration order. Each popped hold is released.
    /// On failure the stack is left untouched.
    pub fn pop_inputs<const N: usize>(&mut self) -> Result<[CableId; N], PatchError> {
        self.build(|p| {
            p.stack.ensure_depth(N)?;
            let base = p.stack.depth() - N;
            let mut cables = [CableId(0); N];
            for (cable, buf) in cables.iter_mut().zip(&p.stack.entries()[base..]) {
                *cable = p.pool.source(*buf)?;
            }
            for _ in 0..N {
                let buf = p.stack.pop()?;
                p.release(buf)?;
            }
            Ok(cables)
        })
    }

    /// Returns the number of holds on a live buffer.
    pub fn buffer_holds(&self, buf: BufferId) -> Result<u32, PatchError> {
        self.pool.holds(buf)
    }

    /// Reads the current value of the signal a buffer mirrors.
    pub fn buffer_value(&self, buf: BufferId) -> Result<f32, PatchError> {
        self.cables.value(self.pool.source(buf)?)
    }

    /// Returns the number of free buffer slots.
    pub fn free_buffers(&self) -> usize {
        self.pool.free_count()
    }

    /// Returns the buffer pool capacity.
    pub fn buffer_capacity(&self) -> usize {
        self.pool.capacity()
    }

    // --- Tick engine ---

    /// Freezes the graph and enters the running state.
    ///
    /// Called implicitly by the first tick. Calling it on a running patch is
    /// a no-op.
    pub fn start(&mut self) -> Result<(), PatchError> {
        match self.state {
            PatchState::Running => return Ok(()),
            PatchState::Aborted => return Err(PatchError::BuildAborted),
            PatchState::Building => {}
        }
        self.cables.resolve();
        self.state = PatchState::Running;
        #[cfg(feature = "tracing")]
        {
            tracing::info!(
                nodes = self.nodes.len(),
                cables = self.cables.len(),
                buffers_in_use = self.pool.capacity() - self.pool.free_count(),
                stack_depth = self.stack.depth(),
                sample_rate = self.config.sample_rate,
                "patch running"
            );
            for node in &self.nodes {
                tracing::debug!(node = %node.info.id(), kind = node.info.kind(), "execution order");
            }
        }
        Ok(())
    }

    /// Advances the graph by one sample.
    ///
    /// Every node computes once, in creation order, with the current sample
    /// index; then the sample counter increments. Fails only if the build was
    /// aborted.
    #[inline]
    pub fn tick(&mut self) -> Result<(), PatchError> {
        if self.state != PatchState::Running {
            self.start()?;
        }
        self.step();
        Ok(())
    }

    /// Advances the graph by one block (`block_size` samples).
    pub fn tick_block(&mut self) -> Result<(), PatchError> {
        self.run(self.config.block_size as u64)
    }

    /// Advances the graph by `ticks` samples.
    pub fn run(&mut self, ticks: u64) -> Result<(), PatchError> {
        if self.state != PatchState::Running {
            self.start()?;
        }
        for _ in 0..ticks {
            self.step();
        }
        Ok(())
    }

    #[inline]
    fn step(&mut self) {
        let ctx = TickContext {
            sample: self.sample,
            sample_rate: self.config.sample_rate as f32,
            block_size: self.config.block_size,
        };
        for node in &mut self.nodes {
            let mut bus = self.cables.bus(node.info.id());
            node.unit.compute(&mut bus, &ctx);
        }
        self.sample += 1;
    }

    // --- Teardown ---

    /// Tears the patch down, running every unit's teardown in creation order.
    ///
    /// All teardowns run even if one fails; the first failure is returned.
    pub fn close(mut self) -> Result<(), PatchError> {
        self.teardown_all()
    }

    fn teardown_all(&mut self) -> Result<(), PatchError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut first = None;
        for node in &mut self.nodes {
            if let Err(err) = node.unit.teardown() {
                let err = PatchError::TeardownFailure {
                    kind: node.info.kind(),
                    message: err.render(),
                };
                #[cfg(feature = "tracing")]
                tracing::warn!(node = %node.info.id(), error = %err, "teardown failed");
                first.get_or_insert(err);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(nodes = self.nodes.len(), samples = self.sample, "patch closed");
        first.map_or(Ok(()), Err)
    }
}

impl Drop for Patch {
    fn drop(&mut self) {
        if let Err(_err) = self.teardown_all() {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, "patch dropped with a failing teardown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cable::CableBus;

    /// Writes `gain * in` to its output.
    struct Gain {
        input: CableId,
        gain: CableId,
        out: CableId,
    }

    impl Unit for Gain {
        fn compute(&mut self, bus: &mut CableBus<'_>, _ctx: &TickContext) {
            let v = bus.read(self.input) * bus.read(self.gain);
            bus.write(self.out, v);
        }
    }

    fn gain(patch: &mut Patch) -> (NodeId, CableId, CableId, CableId) {
        let mut node = patch.new_node("gain").unwrap();
        let input = node.input("in", 0.0);
        let g = node.input("gain", 1.0);
        let out = node.output("out");
        let id = node.finish(Gain { input, gain: g, out }).unwrap();
        (id, input, g, out)
    }

    #[test]
    fn new_patch_is_building_and_empty() {
        let patch = Patch::new(PatchConfig::default()).unwrap();
        assert_eq!(patch.state(), PatchState::Building);
        assert!(patch.is_empty());
        assert_eq!(patch.free_buffers(), 8);
        assert_eq!(patch.stack_capacity(), 10);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PatchConfig {
            buffer_count: 0,
            ..PatchConfig::default()
        };
        assert!(matches!(
            Patch::new(config),
            Err(PatchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn tick_reads_upstream_value_in_same_tick() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        let (_, in1, g1, out1) = gain(&mut patch);
        let (_, in2, g2, out2) = gain(&mut patch);
        patch.set_value(in1, 0.5).unwrap();
        patch.set_constant(g1, 4.0).unwrap();
        patch.connect(out1, in2).unwrap();
        patch.set_value(g2, 3.0).unwrap();

        patch.tick().unwrap();
        assert_eq!(patch.value(out1).unwrap(), 2.0);
        assert_eq!(patch.value(out2).unwrap(), 6.0);
        assert_eq!(patch.sample(), 1);
        assert_eq!(patch.state(), PatchState::Running);
    }

    #[test]
    fn running_patch_rejects_graph_changes() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        let (_, input, g, out) = gain(&mut patch);
        patch.start().unwrap();

        assert_eq!(patch.push_constant(1.0), Err(PatchError::NotBuilding));
        assert!(matches!(patch.new_node("gain"), Err(PatchError::NotBuilding)));
        assert_eq!(patch.connect(out, input), Err(PatchError::NotBuilding));
        assert_eq!(patch.set_constant(g, 1.0), Err(PatchError::NotBuilding));
        // A running patch stays usable after a rejected mutation.
        assert_eq!(patch.state(), PatchState::Running);
        patch.tick().unwrap();
    }

    #[test]
    fn set_value_while_running_only_on_value_inputs() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        let (_, input, g, out) = gain(&mut patch);
        patch.set_constant(g, 2.0).unwrap();
        patch.start().unwrap();

        patch.set_value(input, 1.5).unwrap();
        patch.tick().unwrap();
        assert_eq!(patch.value(out).unwrap(), 3.0);

        assert_eq!(patch.set_value(g, 1.0), Err(PatchError::NotAValue(g)));
        assert_eq!(patch.set_value(out, 1.0), Err(PatchError::NotAValue(out)));
    }

    #[test]
    fn build_error_aborts_patch() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        assert!(matches!(
            patch.pop(),
            Err(PatchError::StackUnderflow { .. })
        ));
        assert_eq!(patch.state(), PatchState::Aborted);
        assert_eq!(patch.push_constant(1.0), Err(PatchError::BuildAborted));
        assert_eq!(patch.tick(), Err(PatchError::BuildAborted));
    }

    #[test]
    fn node_capacity_is_enforced() {
        let config = PatchConfig {
            node_capacity: 1,
            ..PatchConfig::default()
        };
        let mut patch = Patch::new(config).unwrap();
        gain(&mut patch);
        assert!(matches!(
            patch.new_node("gain"),
            Err(PatchError::AllocationExhausted {
                resource: Resource::Nodes,
                capacity: 1
            })
        ));
    }

    #[test]
    fn abandoned_builder_rolls_back_cables() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        {
            let mut node = patch.new_node("gain").unwrap();
            node.input("in", 0.0);
            node.output("out");
        }
        assert_eq!(patch.node_count(), 0);
        let (id, input, _, _) = gain(&mut patch);
        assert_eq!(id.index(), 0);
        assert_eq!(input.index(), 0);
    }

    #[test]
    fn node_info_lists_named_cables() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        let (id, input, g, out) = gain(&mut patch);
        let info = patch.node(id).unwrap();
        assert_eq!(info.kind(), "gain");
        assert_eq!(info.inputs(), &[("in", input), ("gain", g)]);
        assert_eq!(info.output("out"), Some(out));
        assert_eq!(info.input("missing"), None);
        assert!(patch.unit::<Gain>(id).is_some());
    }

    #[test]
    fn pop_inputs_returns_declaration_order() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        patch.push_constant(1.0).unwrap();
        patch.push_constant(2.0).unwrap();
        let [first, second] = patch.pop_inputs::<2>().unwrap();
        assert_eq!(patch.value(first).unwrap(), 1.0);
        assert_eq!(patch.value(second).unwrap(), 2.0);
        assert!(patch.is_empty());
        assert_eq!(patch.free_buffers(), 8);
    }

    #[test]
    fn pop_inputs_underflow_leaves_stack_untouched() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        let only = patch.push_constant(1.0).unwrap();
        assert_eq!(
            patch.pop_inputs::<2>(),
            Err(PatchError::StackUnderflow {
                needed: 2,
                depth: 1
            })
        );
        assert_eq!(patch.stack_entries(), &[only]);
    }

    #[test]
    fn hold_top_survives_stack_traffic() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        patch.push_constant(0.75).unwrap();
        let held = patch.hold_top().unwrap();
        assert!(patch.is_empty());
        assert_eq!(patch.buffer_holds(held).unwrap(), 1);

        patch.push(held).unwrap();
        patch.push(held).unwrap();
        patch.drop().unwrap();
        patch.drop().unwrap();
        assert_eq!(patch.buffer_value(held).unwrap(), 0.75);
        patch.unhold(held).unwrap();
        assert_eq!(patch.free_buffers(), 8);
    }

    #[test]
    fn run_advances_counter() {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        gain(&mut patch);
        patch.tick_block().unwrap();
        patch.run(36).unwrap();
        assert_eq!(patch.sample(), 100);
        assert!((patch.time_secs() - 100.0 / 44100.0).abs() < 1e-12);
    }
}
