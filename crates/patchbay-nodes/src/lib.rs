//! Patchbay Nodes - unit generators for patchbay patches
//!
//! Every node comes in two forms:
//!
//! - `<Unit>::build(&mut Patch)` creates the node with default inputs and no
//!   stack traffic, returning a `Ports` struct with its cable ids.
//! - A stack-form word (`sine`, `butlp`, ...) pops the node's upstream inputs
//!   in postfix order (deepest entry = first input), connects them, and pushes
//!   the node's outputs.
//!
//! # Nodes
//!
//! | Word | Stack effect | Unit |
//! |------|--------------|------|
//! | `sine` | `( freq amp -- out )` | [`Sine`] |
//! | `blsaw` | `( freq amp -- out )` | [`Blsaw`] |
//! | `biscale` | `( in min max -- out )` | [`Scale`] |
//! | `scale` | `( in min max -- out )` | [`Scale`] |
//! | `butlp` | `( in freq -- out )` | [`Butlp`] |
//! | `revsc` | `( in1 in2 feedback lpfreq -- out1 out2 )` | [`Revsc`] |
//! | `mul` | `( in1 in2 -- out )` | [`Binary`] |
//! | `add` | `( in1 in2 -- out )` | [`Binary`] |
//! | `dcblock` | `( in -- out )` | [`Dcblock`] |
//! | `probe` | `( in -- out )` | [`Probe`] |
//!
//! [`NodeRegistry`] maps the words to their stack forms for interpreters.
//!
//! # Example
//!
//! ```rust,ignore
//! use patchbay_core::{Patch, PatchConfig};
//! use patchbay_nodes::{sine, butlp};
//!
//! let mut patch = Patch::new(PatchConfig::default())?;
//! // 220 0.5 sine 800 butlp
//! patch.push_constant(220.0)?;
//! patch.push_constant(0.5)?;
//! sine(&mut patch)?;
//! patch.push_constant(800.0)?;
//! let lp = butlp(&mut patch)?;
//! patch.drop()?;
//! patch.run(44100)?;
//! ```

pub mod arith;
pub mod blsaw;
pub mod butlp;
pub mod dcblock;
pub mod dsp;
pub mod probe;
pub mod registry;
pub mod revsc;
pub mod scale;
pub mod sine;

pub use arith::{Binary, BinaryOp, BinaryPorts, add, mul};
pub use blsaw::{Blsaw, BlsawPorts, blsaw};
pub use butlp::{Butlp, ButlpPorts, butlp};
pub use dcblock::{Dcblock, DcblockPorts, dcblock};
pub use probe::{Probe, ProbePorts, probe, probe_with_capacity};
pub use registry::{NodeCategory, NodeDescriptor, NodeFactory, NodeRegistry};
pub use revsc::{Revsc, RevscPorts, revsc};
pub use scale::{Polarity, Scale, ScalePorts, biscale, scale};
pub use sine::{Sine, SinePorts, sine};

use patchbay_core::{CableId, Patch, PatchError};

/// Connects popped sources to node inputs, pairwise.
pub(crate) fn wire<const N: usize>(
    patch: &mut Patch,
    sources: [CableId; N],
    inputs: [CableId; N],
) -> Result<(), PatchError> {
    for (source, input) in sources.into_iter().zip(inputs) {
        patch.connect(source, input)?;
    }
    Ok(())
}
