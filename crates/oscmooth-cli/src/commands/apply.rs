//! Compile a setup into a host graph document.

use super::common::{CompileProgress, load_graph, load_setup, output_path, save_graph};
use clap::Args;
use oscmooth_core::{Names, available_capacity, compile};
use std::path::PathBuf;

#[derive(Args)]
pub struct ApplyArgs {
    /// Setup file (TOML) or built-in template name
    #[arg(short, long)]
    setup: PathBuf,

    /// Host graph document (JSON)
    #[arg(short, long)]
    graph: PathBuf,

    /// Synced capacity override (default: setup value, else what the graph has left)
    #[arg(long)]
    capacity: Option<u32>,

    /// Write the result here instead of rewriting the graph in place
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ApplyArgs) -> anyhow::Result<()> {
    let setup = load_setup(&args.setup)?;
    let mut graph = load_graph(&args.graph)?;

    let names = Names::new(setup.namespace.as_str());
    let available = available_capacity(&graph, &setup.parameters, &names);
    let mut options = setup.compile_options(available);
    if let Some(capacity) = args.capacity {
        options = options.with_capacity(capacity);
    }

    println!(
        "Compiling '{}' ({} parameters) into '{}'...",
        setup.name,
        setup.len(),
        args.graph.display()
    );

    let mut progress = CompileProgress::new()?;
    let report = compile(&mut graph, &setup.parameters, &options, &mut progress)?;

    let output = output_path(&args.graph, args.output);
    save_graph(&graph, &output)?;

    println!("\nLayer:      {}", report.layer);
    println!("Nodes:      {}", report.node_count);
    println!("Clips:      {}", report.clip_count);
    println!(
        "Channels:   {} created, {} reused",
        report.created_channels.len(),
        report.reused_channels.len()
    );
    println!("Rewritten:  {} references", report.rewritten_references);
    if !report.unsynced_channels.is_empty() {
        println!("Unsynced:   {}", report.unsynced_channels.join(", "));
    }
    println!(
        "Budget:     {}/{} ({} remaining)",
        report.budget.used,
        report.budget.capacity,
        report.budget.remaining()
    );
    if report.replaced_layer {
        println!("Replaced the previously generated layer.");
    }
    println!("Wrote {}", output.display());

    Ok(())
}
