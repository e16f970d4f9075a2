//! Render a patch script.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use patchbay_core::{Patch, PatchConfig};
use patchbay_nodes::NodeRegistry;

use super::common::{load_config, render, seconds_to_samples};
use crate::script;

#[derive(Args)]
pub struct RenderArgs {
    /// Patch script (`.pb`)
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Duration in seconds
    #[arg(long, default_value = "5.0")]
    seconds: f64,

    /// TOML file with patch configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Sample rate (overrides the config file)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Block size (overrides the config file)
    #[arg(long)]
    block_size: Option<usize>,

    /// Hide the progress bar
    #[arg(long, short)]
    quiet: bool,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PatchConfig::default(),
    };
    if let Some(sr) = args.sample_rate {
        config.sample_rate = sr;
    }
    if let Some(bs) = args.block_size {
        config.block_size = bs;
    }

    let source = std::fs::read_to_string(&args.script)
        .with_context(|| format!("cannot read script {}", args.script.display()))?;

    let mut patch = Patch::new(config)?;
    let registry = NodeRegistry::new();
    let summary = script::load(&source, &mut patch, &registry).map_err(|err| {
        let at = err.position();
        anyhow::Error::new(err).context(format!(
            "error in {} at line {}",
            args.script.display(),
            at.line
        ))
    })?;

    if summary.sinks == 0 {
        tracing::warn!("script has no wavout; nothing will be written");
    }
    tracing::info!(
        script = %args.script.display(),
        words = summary.statements,
        nodes = patch.node_count(),
        sinks = summary.sinks,
        dropped_entries = summary.leftover_entries,
        released_holds = summary.leftover_holds.len(),
        "script loaded"
    );

    let samples = seconds_to_samples(args.seconds, config.sample_rate)?;
    render(patch, samples, !args.quiet)?;

    println!(
        "Rendered {} samples ({:.2}s at {} Hz)",
        samples, args.seconds, config.sample_rate
    );
    Ok(())
}
