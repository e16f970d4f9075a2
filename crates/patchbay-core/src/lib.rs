//! Patchbay Core - stack-machine patch builder and tick engine
//!
//! This crate provides the runtime for scalar, sample-at-a-time DSP graphs:
//! a patch is assembled by a small stack machine, then ticked one sample at a
//! time with every node computed once per tick in creation order.
//!
//! # Core Abstractions
//!
//! ## Signals
//!
//! - [`CableId`] - A scalar signal slot: a literal, or a read of another cable
//! - [`CableMode`] - Value (tweakable), constant (fixed), or connected
//! - [`CableBus`] - The per-node view a compute step reads and writes through
//!
//! ## Construction
//!
//! - [`Patch`] - Owns nodes, cables, the buffer pool, and the construction stack
//! - [`BufferId`] - Generational, hold-counted reference to a signal on the stack
//! - [`NodeBuilder`] - Declares a node's named cables and registers its unit
//!
//! ## Processing
//!
//! - [`Unit`] - Object-safe trait every unit generator implements
//! - [`TickContext`] - Sample index and rate handed to each compute step
//!
//! # Example
//!
//! ```rust,ignore
//! use patchbay_core::{Patch, PatchConfig};
//!
//! let mut patch = Patch::new(PatchConfig::default())?;
//!
//! // Postfix: arguments first, then the node constructor.
//! patch.push_constant(440.0)?;
//! patch.push_constant(0.5)?;
//! sine(&mut patch)?;          // pops freq and amp, pushes out
//! let out = patch.hold_top()?;
//!
//! for _ in 0..44100 {
//!     patch.tick()?;
//!     let sample = patch.buffer_value(out)?;
//! }
//! patch.unhold(out)?;
//! patch.close()?;
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: ticks never allocate, lock, or fail
//! - **Ordered by construction**: producers must exist before their consumers
//! - **Fail fast**: the first build error aborts the patch
//!
//! # Features
//!
//! - `tracing`: structured build and lifecycle events via the `tracing` crate
//! - `serde`: (de)serialize [`PatchConfig`]

pub mod buffer;
pub mod cable;
pub mod config;
pub mod error;
pub mod node;
pub mod patch;
mod stack;

// Re-export main types at crate root
pub use buffer::BufferId;
pub use cable::{CableBus, CableId, CableMode, Direction, Owner};
pub use config::PatchConfig;
pub use error::{PatchError, Resource, SetupError};
pub use node::{AsAny, NodeBuilder, NodeId, NodeInfo, SetupContext, TickContext, Unit};
pub use patch::{Patch, PatchState};
