//! Name-indexed catalogue of stack-form node constructors.
//!
//! The registry is what turns a word of the patch language into a node: it
//! maps each word to a descriptor (for listings and help text) and a factory
//! that runs the word's stack form against a patch.
//!
//! ```rust,ignore
//! use patchbay_nodes::NodeRegistry;
//!
//! let registry = NodeRegistry::new();
//! patch.push_constant(440.0)?;
//! patch.push_constant(0.5)?;
//! registry.build("sine", &mut patch).expect("registered")?;
//! ```

use patchbay_core::{NodeId, Patch, PatchError};

use crate::{add, biscale, blsaw, butlp, dcblock, mul, probe, revsc, scale, sine};

/// Broad role of a node, for grouping listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Oscillators.
    Source,
    /// Range mapping and arithmetic.
    Utility,
    /// Filters.
    Filter,
    /// Time-based processing.
    Reverb,
    /// Observers and writers.
    Sink,
}

impl NodeCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            NodeCategory::Source => "Source",
            NodeCategory::Utility => "Utility",
            NodeCategory::Filter => "Filter",
            NodeCategory::Reverb => "Reverb",
            NodeCategory::Sink => "Sink",
        }
    }
}

/// Describes a word in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    /// Word in the patch language.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Category for grouping.
    pub category: NodeCategory,
    /// Inputs popped from the stack, in postfix order.
    pub inputs: &'static [&'static str],
    /// Outputs pushed onto the stack, bottom first.
    pub outputs: &'static [&'static str],
}

impl NodeDescriptor {
    /// Stack effect in Forth notation, e.g. `( freq amp -- out )`.
    pub fn stack_effect(&self) -> String {
        format!("( {} -- {} )", self.inputs.join(" "), self.outputs.join(" "))
    }
}

/// Stack-form constructor: pops inputs, creates the node, pushes outputs.
pub type NodeFactory = fn(&mut Patch) -> Result<NodeId, PatchError>;

struct RegistryEntry {
    descriptor: NodeDescriptor,
    factory: NodeFactory,
}

/// Registry of stack-form node constructors.
pub struct NodeRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    /// Creates a registry with every built-in node registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(10),
        };
        registry.register_builtin_nodes();
        registry
    }

    fn register_builtin_nodes(&mut self) {
        self.register(
            NodeDescriptor {
                name: "sine",
                description: "Sine oscillator",
                category: NodeCategory::Source,
                inputs: &["freq", "amp"],
                outputs: &["out"],
            },
            |p| sine(p).map(|ports| ports.node),
        );
        self.register(
            NodeDescriptor {
                name: "blsaw",
                description: "Band-limited sawtooth oscillator",
                category: NodeCategory::Source,
                inputs: &["freq", "amp"],
                outputs: &["out"],
            },
            |p| blsaw(p).map(|ports| ports.node),
        );
        self.register(
            NodeDescriptor {
                name: "biscale",
                description: "Map a bipolar signal onto [min, max]",
                category: NodeCategory::Utility,
                inputs: &["in", "min", "max"],
                outputs: &["out"],
            },
            |p| biscale(p).map(|ports| ports.node),
        );
        self.register(
            NodeDescriptor {
                name: "scale",
                description: "Map a unipolar signal onto [min, max]",
                category: NodeCategory::Utility,
                inputs: &["in", "min", "max"],
                outputs: &["out"],
            },
            |p| scale(p).map(|ports| ports.node),
        );
        self.register(
            NodeDescriptor {
                name: "butlp",
                description: "Butterworth lowpass filter",
                category: NodeCategory::Filter,
                inputs: &["in", "freq"],
                outputs: &["out"],
            },
            |p| butlp(p).map(|ports| ports.node),
        );
        self.register(
            NodeDescriptor {
                name: "revsc",
                description: "Stereo comb/allpass feedback reverb",
                category: NodeCategory::Reverb,
                inputs: &["in1", "in2", "feedback", "lpfreq"],
                outputs: &["out1", "out2"],
            },
            |p| revsc(p).map(|ports| ports.node),
        );
        self.register(
            NodeDescriptor {
                name: "mul",
                description: "Product of two signals",
                category: NodeCategory::Utility,
                inputs: &["in1", "in2"],
                outputs: &["out"],
            },
            |p| mul(p).map(|ports| ports.node),
        );
        self.register(
            NodeDescriptor {
                name: "add",
                description: "Sum of two signals",
                category: NodeCategory::Utility,
                inputs: &["in1", "in2"],
                outputs: &["out"],
            },
            |p| add(p).map(|ports| ports.node),
        );
        self.register(
            NodeDescriptor {
                name: "dcblock",
                description: "DC blocking highpass",
                category: NodeCategory::Filter,
                inputs: &["in"],
                outputs: &["out"],
            },
            |p| dcblock(p).map(|ports| ports.node),
        );
        self.register(
            NodeDescriptor {
                name: "probe",
                description: "Passthrough that records what it sees",
                category: NodeCategory::Sink,
                inputs: &["in"],
                outputs: &["out"],
            },
            |p| probe(p).map(|ports| ports.node),
        );
    }

    /// Adds a word. A later registration under the same name shadows the
    /// earlier one.
    pub fn register(&mut self, descriptor: NodeDescriptor, factory: NodeFactory) {
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
    }

    fn entry(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().rev().find(|e| e.descriptor.name == name)
    }

    /// Returns descriptors for every registered word, in registration order.
    pub fn all(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.entries.iter().map(|e| &e.descriptor)
    }

    /// Returns descriptors in a category.
    pub fn in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodeDescriptor> {
        self.all().filter(move |d| d.category == category)
    }

    /// Looks up a word.
    pub fn get(&self, name: &str) -> Option<&NodeDescriptor> {
        self.entry(name).map(|e| &e.descriptor)
    }

    /// Runs a word's stack form against `patch`.
    ///
    /// Returns `None` if the word is not registered.
    pub fn build(&self, name: &str, patch: &mut Patch) -> Option<Result<NodeId, PatchError>> {
        self.entry(name).map(|e| (e.factory)(patch))
    }

    /// Returns the number of registered words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
