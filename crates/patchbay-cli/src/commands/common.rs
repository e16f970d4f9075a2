//! Helpers shared by the rendering commands.

use std::path::Path;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use patchbay_core::{Patch, PatchConfig};

/// Loads a patch configuration from TOML. Missing fields keep their defaults.
pub fn load_config(path: &Path) -> anyhow::Result<PatchConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let config: PatchConfig = toml::from_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

/// Converts a duration to a sample count at `sample_rate`.
pub fn seconds_to_samples(seconds: f64, sample_rate: u32) -> anyhow::Result<u64> {
    if !seconds.is_finite() || seconds < 0.0 {
        anyhow::bail!("duration must be a non-negative number of seconds, got {seconds}");
    }
    Ok((seconds * f64::from(sample_rate)).round() as u64)
}

/// Ticks `patch` for `samples` samples, block by block, then closes it.
pub fn render(mut patch: Patch, samples: u64, show_progress: bool) -> anyhow::Result<()> {
    patch.start()?;

    let pb = if show_progress {
        let pb = ProgressBar::new(samples);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("##-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let block = patch.block_size() as u64;
    let mut remaining = samples;
    while remaining > 0 {
        let n = remaining.min(block);
        patch.run(n)?;
        remaining -= n;
        pb.inc(n);
    }
    pb.finish_and_clear();

    tracing::info!(
        samples,
        seconds = patch.time_secs(),
        nodes = patch.node_count(),
        "render finished"
    );
    patch.close().context("closing patch")?;
    Ok(())
}
