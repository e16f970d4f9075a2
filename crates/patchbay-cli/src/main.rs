//! Patchbay CLI - render postfix patch scripts to WAV files.

mod commands;
mod script;
mod siren;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "patchbay")]
#[command(author, version, about = "Patchbay DSP patch renderer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a patch from a script and render it
    Render(commands::render::RenderArgs),

    /// Render the built-in siren demo
    Siren(commands::siren::SirenArgs),

    /// List available nodes and words
    Nodes(commands::nodes::NodesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Siren(args) => commands::siren::run(args),
        Commands::Nodes(args) => commands::nodes::run(args),
    }
}
