//! Smoothing graph builder.
//!
//! One filter per parameter and context, evaluated every frame by the host:
//!
//! ```text
//! Interp1D(coefficient)
//! ├── 0: Interp1D(raw)    ── -1: proxy = -1 │ +1: proxy = +1
//! └── 1: Interp1D(proxy)  ── -1: proxy = -1 │ +1: proxy = +1
//! ```
//!
//! Both branches write the proxy channel and the driver branch reads last
//! frame's proxy, so repeated evaluation yields the first-order IIR low-pass
//!
//! ```text
//! proxy[n] = (1 - c) * raw[n] + c * proxy[n - 1]
//! ```
//!
//! The contexts are combined under an `IsLocal` selector (remote at 0, local
//! at 1), each context being a direct sum over every parameter's filter.

use crate::cost::ChannelKind;
use crate::error::CompileError;
use crate::graph::{ChannelRef, GraphNode};
use crate::namespace::ChannelOptions;
use crate::naming::{smoother_clip_name, IS_LOCAL_CHANNEL};
use crate::param::{Context, ParameterSpec};
use crate::synthesis::Synthesis;

/// Lower and upper driver bound of every filter.
pub const DRIVER_BOUNDS: [f32; 2] = [-1.0, 1.0];

/// Channels read and written by the filters of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChannels {
    /// Raw input, written by the host or by a decoder.
    pub raw: ChannelRef,
    /// Smoothed output; also the previous-frame feedback.
    pub proxy: ChannelRef,
    /// Smoothing coefficient of the remote filter.
    pub remote: ChannelRef,
    /// Smoothing coefficient of the local filter.
    pub local: ChannelRef,
}

impl FilterChannels {
    /// Coefficient channel of `context`.
    pub fn coefficient(&self, context: Context) -> &ChannelRef {
        match context {
            Context::Local => &self.local,
            Context::Remote => &self.remote,
        }
    }
}

/// Registers the channels a parameter's filters need.
///
/// Coefficient channels default to the configured smoothness. An existing
/// coefficient channel keeps its value. The raw channel is synced unless the
/// parameter is quantized, in which case its value is decoded locally.
pub fn register_channels(
    syn: &mut Synthesis,
    spec: &ParameterSpec,
) -> Result<FilterChannels, CompileError> {
    let names = syn.names().clone();
    let raw = syn.channel(
        &spec.name,
        ChannelKind::Continuous,
        ChannelOptions::new().synced(!spec.is_quantized()),
    )?;
    syn.set_synced(&raw, !spec.is_quantized());

    let proxy = syn.channel(
        &names.proxy(&spec.name),
        ChannelKind::Continuous,
        ChannelOptions::new(),
    )?;

    let mut coefficient = |context: Context| {
        syn.channel(
            &names.coefficient(context, &spec.name),
            ChannelKind::Continuous,
            ChannelOptions::new().default_value(spec.smoothness(context)),
        )
    };
    let local = coefficient(Context::Local)?;
    let remote = coefficient(Context::Remote)?;

    Ok(FilterChannels {
        raw,
        proxy,
        remote,
        local,
    })
}

/// Builds the filter of one parameter for one context.
pub fn build_filter(
    syn: &mut Synthesis,
    param: &str,
    context: Context,
    channels: &FilterChannels,
) -> Result<GraphNode, CompileError> {
    let names = syn.names().clone();
    let id = syn.context_id().to_string();

    let [low, high] = DRIVER_BOUNDS;
    let low_leaf = syn.clip(smoother_clip_name(param, low, &id), &channels.proxy, low)?;
    let high_leaf = syn.clip(smoother_clip_name(param, high, &id), &channels.proxy, high)?;

    let input = GraphNode::interp_1d(names.filter_input(param), channels.raw.clone())
        .with_threshold_child(low, low_leaf.clone())
        .with_threshold_child(high, high_leaf.clone());
    let driver = GraphNode::interp_1d(names.filter_driver(param), channels.proxy.clone())
        .with_threshold_child(low, low_leaf)
        .with_threshold_child(high, high_leaf);

    Ok(
        GraphNode::interp_1d(names.filter_root(param), channels.coefficient(context).clone())
            .with_threshold_child(0.0, input)
            .with_threshold_child(1.0, driver),
    )
}

/// Builds the smoothing root for every parameter.
///
/// `filters` pairs each parameter name with its channels, in compilation
/// order. `blend_set` is the constant-one weight of the direct sums.
pub fn build_smoother(
    syn: &mut Synthesis,
    filters: &[(String, FilterChannels)],
    blend_set: &ChannelRef,
) -> Result<GraphNode, CompileError> {
    let names = syn.names().clone();
    let is_local = syn.channel(IS_LOCAL_CHANNEL, ChannelKind::Discrete, ChannelOptions::new())?;

    let mut selector = GraphNode::interp_1d(names.smoother_root(), is_local);
    for context in Context::ALL {
        let mut sum = GraphNode::direct_sum(names.context_root(context));
        for (param, channels) in filters {
            let filter = build_filter(syn, param, context, channels)?;
            sum = sum.with_weighted_child(blend_set.clone(), filter);
        }
        selector = selector.with_threshold_child(context.selector_threshold(), sum);
    }
    Ok(selector)
}
