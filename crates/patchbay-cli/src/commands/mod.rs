//! CLI command implementations.

pub mod common;
pub mod nodes;
pub mod render;
pub mod siren;
