//! Render the built-in siren demo.

use std::path::PathBuf;

use clap::Args;
use patchbay_core::{Patch, PatchConfig};

use super::common::{render, seconds_to_samples};

#[derive(Args)]
pub struct SirenArgs {
    /// Output WAV file
    #[arg(long, short, default_value = "siren.wav")]
    output: PathBuf,

    /// Duration in seconds
    #[arg(long, default_value = "10.0")]
    seconds: f64,

    /// Sample rate
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Hide the progress bar
    #[arg(long, short)]
    quiet: bool,
}

pub fn run(args: SirenArgs) -> anyhow::Result<()> {
    let config = PatchConfig {
        sample_rate: args.sample_rate,
        ..PatchConfig::default()
    };
    let mut patch = Patch::new(config)?;
    crate::siren::build(&mut patch, &args.output)?;

    let samples = seconds_to_samples(args.seconds, config.sample_rate)?;
    render(patch, samples, !args.quiet)?;

    println!("Wrote {} ({:.2}s)", args.output.display(), args.seconds);
    Ok(())
}
