//! List the contents of a host graph document.

use super::common::load_graph;
use clap::Args;
use oscmooth_core::{DEFAULT_NAMESPACE, HostGraph, Names, RefSite, obfuscate::deobfuscate};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct InspectArgs {
    /// Host graph document (JSON)
    #[arg(short, long)]
    graph: PathBuf,

    /// Synthesis tag used to recognize obfuscated channels
    #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
    tag: String,

    /// Print a machine-readable summary instead of a listing
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary {
    id: String,
    synced_cost: u32,
    channels: Vec<ChannelSummary>,
    layers: Vec<LayerSummary>,
    clips: usize,
}

#[derive(Serialize)]
struct ChannelSummary {
    name: String,
    kind: &'static str,
    default: f32,
    synced: bool,
}

#[derive(Serialize)]
struct LayerSummary {
    name: String,
    states: usize,
    references: Vec<String>,
}

fn site_label(site: RefSite) -> &'static str {
    match site {
        RefSite::BlendChannel => "blend",
        RefSite::DirectWeight => "weight",
        RefSite::StateTime => "time",
        RefSite::StateSpeed => "speed",
        RefSite::StateCycleOffset => "cycle",
        RefSite::StateMirror => "mirror",
    }
}

fn summarize(graph: &HostGraph) -> Summary {
    let references = graph.references();
    Summary {
        id: graph.id().to_string(),
        synced_cost: graph.synced_cost(|_| false),
        channels: graph
            .channels()
            .iter()
            .map(|c| ChannelSummary {
                name: c.name.clone(),
                kind: c.kind.label(),
                default: c.default,
                synced: c.synced,
            })
            .collect(),
        layers: graph
            .layers()
            .iter()
            .map(|layer| LayerSummary {
                name: layer.name.clone(),
                states: layer.states.len(),
                references: references
                    .iter()
                    .filter(|r| r.layer == layer.name)
                    .map(|r| format!("{}:{}:{}", r.state, site_label(r.site), r.channel))
                    .collect(),
            })
            .collect(),
        clips: graph.clips().count(),
    }
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let graph = load_graph(&args.graph)?;
    let summary = summarize(&graph);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Graph:       {}", summary.id);
    println!("Synced cost: {}", summary.synced_cost);
    println!("Clips:       {}", summary.clips);

    let names = Names::new(args.tag.as_str());
    println!("\nChannels ({}):", summary.channels.len());
    for channel in &summary.channels {
        let synced = if channel.synced { "synced" } else { "" };
        let recovered = deobfuscate(&channel.name);
        let alias = if names.is_tagged(&recovered) && !names.is_tagged(&channel.name) {
            format!("  ({recovered})")
        } else {
            String::new()
        };
        println!(
            "  {:<32} {:<5} {:>6.3}  {:<6}{}",
            channel.name, channel.kind, channel.default, synced, alias
        );
    }

    println!("\nLayers ({}):", summary.layers.len());
    for layer in &summary.layers {
        println!("  {} ({} states)", layer.name, layer.states);
        for reference in &layer.references {
            println!("    {reference}");
        }
    }

    Ok(())
}
