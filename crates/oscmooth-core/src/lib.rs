//! OSCmooth Core - blend-graph synthesis for parameter smoothing and quantization
//!
//! This crate compiles a list of scalar parameter descriptors into static
//! blend graphs that a host animation engine evaluates every frame:
//!
//! - a **smoothing network** per parameter: a feedback Interp1D pair that the
//!   engine turns into a first-order low-pass filter, tuned independently for
//!   the local and the remote observer
//! - a **binary decoder** per quantized parameter, rebuilding a continuous
//!   value from a few cheap discrete channels under a synced-capacity budget
//!
//! # Core Abstractions
//!
//! ## Compilation
//!
//! - [`compile`] - Validate, synthesize and commit in one call
//! - [`CompileOptions`] / [`CompileReport`] - Settings and outcome
//! - [`remove_all`] - Undo everything a compilation produced
//!
//! ## Cost & Budget
//!
//! - [`cost`](cost::cost) - Unit cost per channel kind
//! - [`total_cost`] / [`check_budget`] - Budget accountant, run before any mutation
//!
//! ## Graph
//!
//! - [`GraphNode`] - Leaf, Interp1D and DirectSum nodes
//! - [`HostGraph`] - Channels, layers, states and clip library of the host
//! - [`Evaluator`] - Frame evaluator with the host engine's blend semantics
//!
//! ## Naming
//!
//! - [`Names`] - Deterministic channel and node names under a namespace root
//! - [`ChannelNamespace`] - Per-compilation channel registry with reuse
//! - [`obfuscate`](obfuscate::obfuscate) - Reversible name shift for synced bit channels
//!
//! # Example
//!
//! ```rust
//! use oscmooth_core::{CompileOptions, Evaluator, HostGraph, NoProgress, ParameterSpec, compile};
//!
//! let mut host = HostGraph::new("avatar");
//! let specs = [ParameterSpec::new("Smile").with_smoothness(0.8, 0.5)];
//! let report = compile(&mut host, &specs, &CompileOptions::new(), &mut NoProgress).unwrap();
//! assert_eq!(report.budget.used, 8);
//!
//! let mut eval = Evaluator::new(&host);
//! eval.set("IsLocal", 1.0);
//! eval.set("Smile", 1.0);
//! eval.step();
//! assert!((eval.get("OSCm/Proxy/Smile") - 0.2).abs() < 1e-6);
//! eval.step();
//! assert!((eval.get("OSCm/Proxy/Smile") - 0.36).abs() < 1e-6);
//! ```
//!
//! # Features
//!
//! - `tracing`: emit `tracing` events for compilation, commit and removal

pub mod budget;
pub mod cleanup;
pub mod compiler;
pub mod cost;
pub mod error;
pub mod graph;
pub mod namespace;
pub mod naming;
pub mod obfuscate;
pub mod param;
pub mod quantize;
pub mod smoothing;
pub mod synthesis;

// Re-export main types at crate root
pub use budget::{Budget, check_budget, total_cost};
pub use cleanup::{
    RemovalReport, remove_all, remove_generated_artifacts, restore_sync_flags, revert_references,
};
pub use compiler::{
    CompileOptions, CompileReport, NoProgress, Progress, available_capacity, compile, validate,
};
pub use cost::{CONTINUOUS_COST, ChannelKind, DISCRETE_COST, MAX_QUANTIZATION_BITS, MAX_SYNCED_COST};
pub use error::{BudgetExceeded, CompileError, CurveError};
pub use graph::{
    Channel, ChannelRef, Clip, ClipRef, Curve, Evaluator, GraphNode, HostGraph, Keyframe, Layer,
    RefSite, State,
};
pub use namespace::{ChannelNamespace, ChannelOptions};
pub use naming::{DEFAULT_NAMESPACE, IS_LOCAL_CHANNEL, Names};
pub use param::{Context, ParameterSpec};
pub use quantize::{bit_weight, bit_weights};
pub use synthesis::{CommitSummary, Synthesis};
