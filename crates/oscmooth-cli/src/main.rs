//! OSCmooth CLI - compile parameter setups into blend graphs.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oscmooth")]
#[command(author, version, about = "OSCmooth blend-graph compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a setup into a host graph
    Apply(commands::apply::ApplyArgs),

    /// Remove everything a previous apply generated
    Remove(commands::remove::RemoveArgs),

    /// Show the synced cost of a setup
    Cost(commands::cost::CostArgs),

    /// List the channels, layers and references of a host graph
    Inspect(commands::inspect::InspectArgs),

    /// Step a compiled parameter frame by frame
    Simulate(commands::simulate::SimulateArgs),

    /// Write a starting setup file
    Init(commands::init::InitArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Apply(args) => commands::apply::run(args),
        Commands::Remove(args) => commands::remove::run(args),
        Commands::Cost(args) => commands::cost::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Init(args) => commands::init::run(args),
    }
}
