//! Show the synced cost of a setup.

use super::common::{load_graph, load_setup};
use clap::Args;
use oscmooth_core::{
    CONTINUOUS_COST, MAX_SYNCED_COST, Names, available_capacity, check_budget, total_cost,
};
use std::path::PathBuf;

#[derive(Args)]
pub struct CostArgs {
    /// Setup file (TOML) or built-in template name
    #[arg(short, long)]
    setup: PathBuf,

    /// Host graph document; reports the capacity it has left
    #[arg(short, long)]
    graph: Option<PathBuf>,
}

pub fn run(args: CostArgs) -> anyhow::Result<()> {
    let setup = load_setup(&args.setup)?;

    println!("{:<28} {:>6}  {:>6}  Representation", "Parameter", "Cost", "Saved");
    println!("{}", "-".repeat(64));
    for spec in &setup.parameters {
        let representation = if spec.is_quantized() {
            let sign = if spec.use_sign_bit { " + sign" } else { "" };
            format!("{} bits{sign}", spec.quantization_bits)
        } else {
            "float".to_string()
        };
        let saved = i64::from(CONTINUOUS_COST) - i64::from(spec.cost());
        println!(
            "{:<28} {:>6}  {:>6}  {}",
            spec.name,
            spec.cost(),
            saved,
            representation
        );
    }
    println!("{}", "-".repeat(64));
    println!("{:<28} {:>6}", "Total", total_cost(&setup.parameters));

    let capacity = if let Some(capacity) = setup.capacity {
        println!("\nCapacity (fixed by setup): {capacity}");
        capacity
    } else if let Some(path) = &args.graph {
        let graph = load_graph(path)?;
        let names = Names::new(setup.namespace.as_str());
        let capacity = available_capacity(&graph, &setup.parameters, &names);
        println!(
            "\nCapacity left in '{}': {capacity} of {MAX_SYNCED_COST}",
            path.display()
        );
        capacity
    } else {
        println!("\nCapacity (empty host): {MAX_SYNCED_COST}");
        MAX_SYNCED_COST
    };

    let budget = check_budget(&setup.parameters, capacity)?;
    println!("Fits: {} remaining", budget.remaining());
    Ok(())
}
