//! Error types for patch construction and teardown.
//!
//! Every build-phase operation returns [`PatchError`] synchronously. A failing
//! build operation also moves the patch into its aborted state, so the caller
//! cannot keep wiring (or ticking) a half-built graph by accident.

use core::fmt;

use crate::buffer::BufferId;
use crate::cable::CableId;

/// Capacity-bounded resource owned by a patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Node slots (`PatchConfig::node_capacity`).
    Nodes,
    /// Buffer pool slots (`PatchConfig::buffer_count`).
    Buffers,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nodes => f.write_str("node pool"),
            Self::Buffers => f.write_str("buffer pool"),
        }
    }
}

/// Errors raised while building, starting, or tearing down a patch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatchError {
    /// An operation needed more stack entries than were present.
    #[error("stack underflow: needed {needed} entries, stack holds {depth}")]
    StackUnderflow {
        /// Entries the operation needed.
        needed: usize,
        /// Entries on the stack when it failed.
        depth: usize,
    },

    /// A push would exceed the configured stack depth.
    #[error("stack overflow: capacity is {capacity}")]
    StackOverflow {
        /// Configured stack depth.
        capacity: usize,
    },

    /// A fixed-capacity pool has no free slot left.
    #[error("{resource} exhausted (capacity {capacity})")]
    AllocationExhausted {
        /// Which pool ran out.
        resource: Resource,
        /// Its configured capacity.
        capacity: usize,
    },

    /// A buffer reference was used after its last hold was released.
    #[error("buffer {0} used after release")]
    BufferUseAfterRelease(BufferId),

    /// A held buffer was read before any cable was bound to it.
    #[error("buffer {0} has no source cable")]
    UnboundBuffer(BufferId),

    /// A connection would make a node read a producer created after it.
    #[error("cable {to} cannot read cable {from}: its producer is not created before the consumer")]
    OrderingViolation {
        /// Producer side of the rejected connection.
        from: CableId,
        /// Consumer side of the rejected connection.
        to: CableId,
    },

    /// Only input cables can be connected or assigned literals.
    #[error("cable {0} is not an input")]
    NotAnInput(CableId),

    /// The cable id does not belong to this patch.
    #[error("cable {0} does not exist")]
    UnknownCable(CableId),

    /// While running, only cables in value mode accept new literals.
    #[error("cable {0} is not a value cable")]
    NotAValue(CableId),

    /// A node's setup step failed (typically a sink opening its output).
    #[error("{kind} setup failed: {message}")]
    SinkSetupFailure {
        /// Node kind, e.g. `"wavout"`.
        kind: &'static str,
        /// Rendered error chain.
        message: String,
    },

    /// A node failed to release its resources during teardown.
    #[error("{kind} teardown failed: {message}")]
    TeardownFailure {
        /// Node kind.
        kind: &'static str,
        /// Rendered error chain.
        message: String,
    },

    /// The patch is running; the graph is frozen.
    #[error("patch is running; the graph can no longer be modified")]
    NotBuilding,

    /// An earlier build error aborted this patch.
    #[error("patch build was aborted by an earlier error")]
    BuildAborted,

    /// The patch configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Error returned by a unit's setup or teardown step.
///
/// Units wrap whatever went wrong (file creation, resource limits) with a
/// short message; the patch renders the whole chain into
/// [`PatchError::SinkSetupFailure`] or [`PatchError::TeardownFailure`].
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SetupError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SetupError {
    /// Creates an error with a message and no underlying cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Renders the message followed by every cause, separated by `": "`.
    pub fn render(&self) -> String {
        let mut rendered = self.message.clone();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            rendered.push_str(": ");
            rendered.push_str(&err.to_string());
            cause = err.source();
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_error_renders_cause_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
        let err = SetupError::with_source("cannot create out.wav", io);
        assert_eq!(err.render(), "cannot create out.wav: no such directory");
    }

    #[test]
    fn resource_display() {
        let err = PatchError::AllocationExhausted {
            resource: Resource::Buffers,
            capacity: 8,
        };
        assert_eq!(err.to_string(), "buffer pool exhausted (capacity 8)");
    }
}
