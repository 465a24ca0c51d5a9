//! Step a compiled parameter with the reference evaluator.

use super::common::{load_graph, load_setup};
use clap::Args;
use oscmooth_core::{
    Evaluator, HostGraph, IS_LOCAL_CHANNEL, NoProgress, Names, available_capacity, compile,
    obfuscate::obfuscate,
};
use std::path::PathBuf;

#[derive(Args)]
pub struct SimulateArgs {
    /// Setup file (TOML) or built-in template name
    #[arg(short, long)]
    setup: PathBuf,

    /// Parameter to drive
    #[arg(short, long)]
    parameter: String,

    /// Host graph to compile into (default: an empty graph)
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// Evaluate as a remote observer
    #[arg(long)]
    remote: bool,

    /// Number of frames to evaluate
    #[arg(short, long, default_value = "10")]
    frames: usize,

    /// Raw input value (smoothing-only parameters)
    #[arg(short, long, allow_hyphen_values = true, conflicts_with = "bits")]
    input: Option<f32>,

    /// Bit pattern, least significant bit first in value order (quantized parameters)
    #[arg(short, long)]
    bits: Option<u32>,

    /// Set the sign bit (quantized parameters)
    #[arg(short, long, requires = "bits")]
    negative: bool,
}

pub fn run(args: SimulateArgs) -> anyhow::Result<()> {
    let setup = load_setup(&args.setup)?;
    let spec = setup.parameter(&args.parameter)?.clone();

    let mut graph = match &args.graph {
        Some(path) => load_graph(path)?,
        None => HostGraph::new("simulate"),
    };
    let names = Names::new(setup.namespace.as_str());
    let options = setup.compile_options(available_capacity(&graph, &setup.parameters, &names));
    compile(&mut graph, &setup.parameters, &options, &mut NoProgress)?;

    let mut eval = Evaluator::new(&graph);
    eval.set(IS_LOCAL_CHANNEL, if args.remote { 0.0 } else { 1.0 });

    if spec.is_quantized() {
        let Some(pattern) = args.bits else {
            anyhow::bail!("'{}' is quantized; drive it with --bits", spec.name);
        };
        let max = (1u32 << spec.quantization_bits) - 1;
        if pattern > max {
            anyhow::bail!("--bits {pattern} does not fit in {} bits", spec.quantization_bits);
        }
        let channel_name = |name: String| if setup.obfuscate_bits { obfuscate(&name) } else { name };
        for bit in 0..spec.quantization_bits {
            let value = if pattern & (1 << bit) != 0 { 1.0 } else { 0.0 };
            eval.set(&channel_name(names.binary_bit(&spec.name, bit)), value);
        }
        if spec.use_sign_bit {
            let value = if args.negative { 1.0 } else { 0.0 };
            eval.set(&channel_name(names.binary_negative(&spec.name)), value);
        } else if args.negative {
            anyhow::bail!("'{}' has no sign bit", spec.name);
        }
    } else {
        let Some(input) = args.input else {
            anyhow::bail!("'{}' is not quantized; drive it with --input", spec.name);
        };
        eval.set(&spec.name, input);
    }

    let context = if args.remote { "remote" } else { "local" };
    println!(
        "Simulating '{}' as {context} observer (smoothness {:.3})",
        spec.name,
        if args.remote { spec.remote_smoothness } else { spec.local_smoothness }
    );
    println!("{:>5}  {:>10}  {:>10}", "frame", "raw", "smoothed");

    let proxy = names.proxy(&spec.name);
    for frame in 1..=args.frames {
        eval.step();
        println!(
            "{frame:>5}  {:>10.6}  {:>10.6}",
            eval.get(&spec.name),
            eval.get(&proxy)
        );
    }

    Ok(())
}
