//! Setup demo: templates, TOML round trip, validation, and compilation.
//!
//! Run with: cargo run -p oscmooth-config --example setup_demo

use oscmooth_config::{Setup, TEMPLATE_NAMES, get_template, validate_setup};
use oscmooth_core::{HostGraph, NoProgress, ParameterSpec, compile, total_cost};

fn main() {
    println!("=== Templates ===\n");
    for name in TEMPLATE_NAMES {
        if let Some(setup) = get_template(name) {
            println!(
                "{:<12} {:>2} parameters, cost {:>3}  {}",
                name,
                setup.len(),
                total_cost(&setup.parameters),
                setup.description.as_deref().unwrap_or("")
            );
        }
    }

    println!("\n=== TOML ===\n");
    let setup = Setup::new("Demo")
        .with_parameter(ParameterSpec::new("Smile").with_smoothness(0.8, 0.5))
        .with_parameter(ParameterSpec::new("Jump").with_quantization(3, true));
    match setup.to_toml() {
        Ok(text) => println!("{text}"),
        Err(e) => println!("serialize failed: {e}"),
    }

    println!("=== Validation ===\n");
    let broken = Setup::new("Broken")
        .with_parameter(ParameterSpec::new("Smile").with_smoothness(1.5, 0.5))
        .with_parameter(ParameterSpec::new("Smile").with_quantization(9, false));
    match validate_setup(&broken) {
        Ok(()) => println!("unexpectedly valid"),
        Err(e) => println!("{e}"),
    }

    println!("\n=== Compile ===\n");
    let mut host = HostGraph::new("demo");
    let options = setup.compile_options(oscmooth_core::MAX_SYNCED_COST);
    match compile(&mut host, &setup.parameters, &options, &mut NoProgress) {
        Ok(report) => {
            println!("layer:    {}", report.layer);
            println!("nodes:    {}", report.node_count);
            println!("clips:    {}", report.clip_count);
            println!("channels: {}", report.created_channels.join(", "));
            println!("budget:   {}/{}", report.budget.used, report.budget.capacity);
        }
        Err(e) => println!("compile failed: {e}"),
    }
}
