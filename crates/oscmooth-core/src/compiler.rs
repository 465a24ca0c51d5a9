//! Graph assembler: validates a parameter list and compiles it into the host.
//!
//! [`compile`] is the single entry point. It runs in two phases:
//!
//! 1. **Validate**: namespace, names, smoothness ranges, quantization widths
//!    and the budget. Nothing has been touched yet, so a rejection is free.
//! 2. **Synthesize and commit**: every channel, clip and node is built into a
//!    [`Synthesis`] and applied to the host in one [`Synthesis::commit`].
//!
//! The generated layer holds one state whose motion is:
//!
//! ```text
//! DirectSum  <ns>_Root
//! ├── BlendSet: DirectSum <ns>_Binary_Root      (only with quantized parameters)
//! │   └── BlendSet: decoder per quantized parameter
//! └── BlendSet: Interp1D <ns>_Smoother_Root (IsLocal)
//!     ├── 0: DirectSum <ns>_Remote  (one filter per parameter)
//!     └── 1: DirectSum <ns>_Local   (one filter per parameter)
//! ```

use std::collections::HashSet;

use crate::budget::{check_budget, Budget};
use crate::cost::{ChannelKind, MAX_SYNCED_COST};
use crate::error::CompileError;
use crate::graph::{ChannelRef, GraphNode, HostGraph, Layer, State};
use crate::namespace::ChannelOptions;
use crate::naming::{Names, GENERATED_STATE_NAME};
use crate::param::ParameterSpec;
use crate::synthesis::Synthesis;
use crate::{quantize, smoothing};

/// Advisory progress sink.
///
/// Calls are informational only; implementations must not influence the
/// compilation.
pub trait Progress {
    /// Compilation of `total` parameters is starting.
    fn start(&mut self, _total: usize) {}
    /// Parameter `name` is being built.
    fn parameter(&mut self, _name: &str) {}
    /// The result has been committed.
    fn finish(&mut self) {}
}

/// Progress sink that ignores every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// Compilation settings shared by every parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Namespace root and synthesis tag.
    pub names: Names,
    /// Obfuscate the names of synced bit channels.
    pub obfuscate_bits: bool,
    /// Synced capacity the parameter list is checked against.
    pub capacity: u32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            names: Names::default(),
            obfuscate_bits: false,
            capacity: MAX_SYNCED_COST,
        }
    }
}

impl CompileOptions {
    /// Default options: `OSCm` namespace, plain names, full capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace root.
    pub fn with_namespace(mut self, root: impl Into<String>) -> Self {
        self.names = Names::new(root);
        self
    }

    /// Sets bit channel obfuscation.
    pub fn with_obfuscation(mut self, enabled: bool) -> Self {
        self.obfuscate_bits = enabled;
        self
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Outcome of a successful compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileReport {
    /// Budget the parameter list was admitted under.
    pub budget: Budget,
    /// Name of the generated layer.
    pub layer: String,
    /// Channels added to the host.
    pub created_channels: Vec<String>,
    /// Existing channels that were reused.
    pub reused_channels: Vec<String>,
    /// Bit channels of an earlier compilation that this one no longer
    /// requests; they stay in the host but stop being synced.
    pub unsynced_channels: Vec<String>,
    /// Host references rewritten to proxy channels.
    pub rewritten_references: usize,
    /// Nodes in the generated motion tree.
    pub node_count: usize,
    /// Clip assets the generated tree plays.
    pub clip_count: usize,
    /// Whether a previous generated layer was replaced.
    pub replaced_layer: bool,
}

/// Checks every precondition of a compilation without touching anything.
///
/// Parameter names must not contain the namespace tag: removal would treat
/// their channels as generated.
pub fn validate(specs: &[ParameterSpec], options: &CompileOptions) -> Result<Budget, CompileError> {
    let names = &options.names;
    if names.root().trim().is_empty() {
        return Err(CompileError::EmptyNamespace);
    }
    let mut seen = HashSet::with_capacity(specs.len());
    for spec in specs {
        spec.validate()?;
        if names.is_tagged(&spec.name) {
            return Err(CompileError::ReservedName {
                parameter: spec.name.clone(),
                tag: names.root().to_string(),
            });
        }
        if !seen.insert(spec.name.as_str()) {
            return Err(CompileError::DuplicateParameter(spec.name.clone()));
        }
    }
    Ok(check_budget(specs, options.capacity)?)
}

/// Synced capacity left in `host` for `specs`.
///
/// Counts every synced host channel except generated ones (tagged, plain or
/// obfuscated) and the raw channels of the parameters being compiled, so a
/// recompilation is not charged twice.
pub fn available_capacity(host: &HostGraph, specs: &[ParameterSpec], names: &Names) -> u32 {
    let compiled: HashSet<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    let used = host.synced_cost(|channel| {
        names.is_generated_channel(&channel.name) || compiled.contains(channel.name.as_str())
    });
    MAX_SYNCED_COST.saturating_sub(used)
}

/// Compiles `specs` into `host`.
///
/// On error the host is unchanged. Compiling the same list again replaces the
/// generated layer and reuses every channel the first run created.
pub fn compile(
    host: &mut HostGraph,
    specs: &[ParameterSpec],
    options: &CompileOptions,
    progress: &mut dyn Progress,
) -> Result<CompileReport, CompileError> {
    let budget = validate(specs, options)?;

    #[cfg(feature = "tracing")]
    tracing::info!(
        "compile: {} parameters, {}/{} synced units",
        specs.len(),
        budget.used,
        budget.capacity
    );

    progress.start(specs.len());
    let names = options.names.clone();
    let mut syn = Synthesis::begin(host, names.clone());
    let blend_set = syn.channel(
        &names.blend_set(),
        ChannelKind::Continuous,
        ChannelOptions::new().default_value(1.0),
    )?;

    let mut filters = Vec::with_capacity(specs.len());
    let mut decoders = Vec::new();
    for spec in specs {
        progress.parameter(&spec.name);
        let channels = smoothing::register_channels(&mut syn, spec)?;
        if spec.is_quantized() {
            let bits = quantize::register_channels(&mut syn, spec, options.obfuscate_bits)?;
            decoders.push(quantize::build_decoder(&mut syn, spec, &channels.raw, &bits, &blend_set)?);
        }
        if spec.use_proxy_rename {
            syn.rename(&spec.name, &channels.proxy);
        }
        filters.push((spec.name.clone(), channels));
    }

    let unsynced_channels: Vec<String> = host
        .channels()
        .iter()
        .filter(|c| c.synced && names.is_binary_channel(&c.name))
        .filter(|c| !syn.namespace().is_requested(&c.name))
        .map(|c| c.name.clone())
        .collect();
    for name in &unsynced_channels {
        syn.set_synced(&ChannelRef::new(name.as_str()), false);
    }

    let mut root = GraphNode::direct_sum(names.root_node());
    if !decoders.is_empty() {
        let binary = decoders
            .into_iter()
            .fold(GraphNode::direct_sum(names.binary_root()), |sum, decoder| {
                sum.with_weighted_child(blend_set.clone(), decoder)
            });
        root = root.with_weighted_child(blend_set.clone(), binary);
    }
    let smoother = smoothing::build_smoother(&mut syn, &filters, &blend_set)?;
    root = root.with_weighted_child(blend_set, smoother);

    let node_count = root.node_count();
    let clip_count = syn.clips().count();
    let layer = Layer::new(names.layer())
        .with_state(State::new(GENERATED_STATE_NAME).with_motion(root));
    let layer_name = layer.name.clone();
    let summary = syn.commit(host, layer);
    progress.finish();

    #[cfg(feature = "tracing")]
    tracing::info!(
        "compile: layer '{}' with {} nodes, {} channels created, {} reused",
        layer_name,
        node_count,
        summary.created_channels.len(),
        summary.reused_channels.len()
    );

    Ok(CompileReport {
        budget,
        layer: layer_name,
        created_channels: summary.created_channels,
        reused_channels: summary.reused_channels,
        unsynced_channels,
        rewritten_references: summary.rewritten_references,
        node_count,
        clip_count,
        replaced_layer: summary.replaced_layer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Channel;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Progress for Recorder {
        fn parameter(&mut self, name: &str) {
            self.0.push(name.to_string());
        }
    }

    #[test]
    fn duplicate_parameters_are_rejected() {
        let specs = [ParameterSpec::new("A"), ParameterSpec::new("A")];
        assert_eq!(
            validate(&specs, &CompileOptions::new()),
            Err(CompileError::DuplicateParameter("A".to_string()))
        );
    }

    #[test]
    fn progress_sees_every_parameter() {
        let mut host = HostGraph::new("t");
        let specs = [ParameterSpec::new("A"), ParameterSpec::new("B").with_quantization(2, false)];
        let mut recorder = Recorder::default();
        compile(&mut host, &specs, &CompileOptions::new(), &mut recorder).unwrap();
        assert_eq!(recorder.0, vec!["A", "B"]);
    }

    #[test]
    fn binary_root_only_with_quantized_parameters() {
        let mut host = HostGraph::new("t");
        compile(&mut host, &[ParameterSpec::new("A")], &CompileOptions::new(), &mut NoProgress)
            .unwrap();
        let mut names = Vec::new();
        for layer in host.layers() {
            for state in &layer.states {
                if let Some(motion) = &state.motion {
                    motion.walk(&mut |n| names.push(n.name().to_string()));
                }
            }
        }
        assert!(names.contains(&"OSCm_Smoother_Root".to_string()));
        assert!(!names.contains(&"OSCm_Binary_Root".to_string()));
    }

    #[test]
    fn available_capacity_ignores_generated_and_compiled() {
        let mut host = HostGraph::new("t");
        host.add_channel(Channel::new("Other", ChannelKind::Continuous).with_synced(true));
        host.add_channel(Channel::new("Smile", ChannelKind::Continuous).with_synced(true));
        host.add_channel(Channel::new("OSCm/Binary/X1", ChannelKind::Discrete).with_synced(true));
        host.add_channel(
            Channel::new(crate::obfuscate::obfuscate("OSCm/Binary/X2"), ChannelKind::Discrete)
                .with_synced(true),
        );
        let specs = [ParameterSpec::new("Smile")];
        assert_eq!(available_capacity(&host, &specs, &Names::default()), 248);
    }

    #[test]
    fn custom_namespace_is_used_throughout() {
        let mut host = HostGraph::new("t");
        let options = CompileOptions::new().with_namespace("Gen");
        let report = compile(&mut host, &[ParameterSpec::new("A")], &options, &mut NoProgress).unwrap();
        assert_eq!(report.layer, "_Gen_Gen");
        assert!(host.has_channel("Gen/Proxy/A"));
        assert!(host.has_channel("Gen/BlendSet"));
    }

    #[test]
    fn empty_namespace_is_rejected() {
        let mut host = HostGraph::new("t");
        let before = host.clone();
        let options = CompileOptions::new().with_namespace("");
        assert_eq!(
            compile(&mut host, &[ParameterSpec::new("A")], &options, &mut NoProgress),
            Err(CompileError::EmptyNamespace)
        );
        assert_eq!(host, before);
    }

    #[test]
    fn tagged_parameter_names_are_reserved() {
        let mut host = HostGraph::new("t");
        host.add_channel(Channel::new("OSCmFace", ChannelKind::Continuous).with_synced(true));
        let before = host.clone();
        let result = compile(
            &mut host,
            &[ParameterSpec::new("OSCmFace")],
            &CompileOptions::new(),
            &mut NoProgress,
        );
        assert!(matches!(result, Err(CompileError::ReservedName { ref parameter, .. }) if parameter == "OSCmFace"));
        assert_eq!(host, before);
    }

    #[test]
    fn narrowing_a_parameter_unsyncs_dropped_bits() {
        let mut host = HostGraph::new("t");
        let wide = [ParameterSpec::new("Jump").with_quantization(3, true)];
        compile(&mut host, &wide, &CompileOptions::new(), &mut NoProgress).unwrap();

        let narrow = [ParameterSpec::new("Jump").with_quantization(2, false)];
        let report = compile(&mut host, &narrow, &CompileOptions::new(), &mut NoProgress).unwrap();
        assert_eq!(
            report.unsynced_channels,
            vec!["OSCm/Binary/Jump4".to_string(), "OSCm/Binary/JumpNegative".to_string()]
        );
        assert!(!host.channel("OSCm/Binary/Jump4").unwrap().synced);
        assert!(host.channel("OSCm/Binary/Jump2").unwrap().synced);
        assert_eq!(host.synced_cost(|_| false), 2);
        assert!(host.sync_overrides("OSCm").is_none());
    }
}
