//! Node listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings

use clap::Args;
use patchbay_nodes::{NodeCategory, NodeRegistry};

const CATEGORIES: [NodeCategory; 5] = [
    NodeCategory::Source,
    NodeCategory::Utility,
    NodeCategory::Filter,
    NodeCategory::Reverb,
    NodeCategory::Sink,
];

/// Words handled by the script interpreter itself.
const BUILTIN_WORDS: [(&str, &str, &str); 6] = [
    ("dup", "( a -- a a )", "Duplicate the top entry"),
    ("drop", "( a -- )", "Discard the top entry"),
    ("hold:NAME", "( a -- )", "Keep the top signal under NAME"),
    ("get:NAME", "( -- a )", "Push the signal held under NAME"),
    ("unhold:NAME", "( -- )", "Release the signal held under NAME"),
    ("wavout:PATH", "( in -- out )", "Write to a 32-bit float WAV file"),
];

#[derive(Args)]
pub struct NodesArgs {
    /// Show details for a single word
    #[arg(value_name = "WORD")]
    word: Option<String>,
}

pub fn run(args: NodesArgs) -> anyhow::Result<()> {
    let registry = NodeRegistry::new();

    if let Some(word) = &args.word {
        let desc = registry
            .get(word)
            .ok_or_else(|| anyhow::anyhow!("Unknown node: {}", word))?;
        println!("{}", desc.name);
        println!("{}", "=".repeat(desc.name.len()));
        println!();
        println!("{}", desc.description);
        println!();
        println!("Category:     {}", desc.category.name());
        println!("Stack effect: {}", desc.stack_effect());
        return Ok(());
    }

    println!("Available Nodes");
    println!("===============");

    for category in CATEGORIES {
        let mut descs = registry.in_category(category).peekable();
        if descs.peek().is_none() {
            continue;
        }
        println!();
        println!("{}:", category.name());
        for desc in descs {
            println!(
                "  {:10}  {:40}  {}",
                desc.name,
                desc.stack_effect(),
                desc.description
            );
        }
    }

    println!();
    println!("{}:", "Words");
    for (name, effect, description) in BUILTIN_WORDS {
        println!("  {:10}  {:40}  {}", name, effect, description);
    }

    println!();
    println!("Numbers push constants. A word starting with '#' starts a comment.");
    Ok(())
}
