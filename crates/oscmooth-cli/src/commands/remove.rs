//! Remove generated artifacts from a host graph document.

use super::common::{load_graph, output_path, save_graph};
use clap::Args;
use oscmooth_core::{DEFAULT_NAMESPACE, remove_all};
use std::path::PathBuf;

#[derive(Args)]
pub struct RemoveArgs {
    /// Host graph document (JSON)
    #[arg(short, long)]
    graph: PathBuf,

    /// Synthesis tag the artifacts were generated under
    #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
    tag: String,

    /// Write the result here instead of rewriting the graph in place
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: RemoveArgs) -> anyhow::Result<()> {
    if args.tag.is_empty() {
        anyhow::bail!("Tag must not be empty (it would match every name)");
    }

    let mut graph = load_graph(&args.graph)?;
    let report = remove_all(&mut graph, &args.tag);

    let output = output_path(&args.graph, args.output);
    save_graph(&graph, &output)?;

    if report.is_clean() {
        println!("Nothing tagged '{}' found; graph already clean.", args.tag);
        return Ok(());
    }

    println!("Removed {} layer(s)", report.removed_layers);
    println!("Pruned {} node(s)", report.pruned_nodes);
    println!("Removed {} channel(s)", report.removed_channels.len());
    for name in &report.removed_channels {
        println!("  {name}");
    }
    println!("Removed {} clip(s)", report.removed_clips);
    println!("Reverted {} reference(s)", report.reverted_references);
    println!("Restored {} sync flag(s)", report.restored_sync_flags);
    println!("Wrote {}", output.display());

    Ok(())
}
