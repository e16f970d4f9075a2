//! Patch configuration.
//!
//! All capacities are fixed when the patch is created. With the `serde`
//! feature the configuration can be loaded from a file; missing fields fall
//! back to [`PatchConfig::default`].
//!
//! ```toml
//! sample_rate = 48000
//! block_size = 128
//! buffer_count = 16
//! ```

use crate::error::PatchError;

/// Run parameters and capacities of a patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PatchConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Samples per block for [`Patch::tick_block`](crate::Patch::tick_block).
    pub block_size: usize,
    /// Number of buffer pool slots.
    pub buffer_count: usize,
    /// Maximum construction stack depth.
    pub stack_depth: usize,
    /// Maximum number of nodes.
    pub node_capacity: usize,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            block_size: 64,
            buffer_count: 8,
            stack_depth: 10,
            node_capacity: 64,
        }
    }
}

impl PatchConfig {
    /// Rejects configurations a patch cannot run with.
    pub fn validate(&self) -> Result<(), PatchError> {
        let fields = [
            ("sample_rate", self.sample_rate as usize),
            ("block_size", self.block_size),
            ("buffer_count", self.buffer_count),
            ("stack_depth", self.stack_depth),
            ("node_capacity", self.node_capacity),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(PatchError::InvalidConfig(format!("{name} must be non-zero")));
            }
        }
        if self.node_capacity > u32::MAX as usize || self.buffer_count > u32::MAX as usize {
            return Err(PatchError::InvalidConfig(
                "capacities must fit in 32 bits".to_string(),
            ));
        }
        Ok(())
    }
}
