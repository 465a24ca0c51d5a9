//! Binary decode graph builder.
//!
//! A parameter quantized to `k` bits travels as `k` discrete channels. The
//! decoder rebuilds the value as
//!
//! ```text
//! value = Σ bit_i * 2^i / (2^k - 1)      i in [0, k)
//! ```
//!
//! so all bits set is full scale and the step is `1 / (2^k - 1)`. With a
//! sign bit the positive sum and its mirror hang under an `Interp1D` keyed
//! on the sign channel. Encoding is the sender's job; only the decoder lives
//! here.

use crate::cost::{ChannelKind, MAX_QUANTIZATION_BITS};
use crate::error::CompileError;
use crate::graph::{ChannelRef, GraphNode};
use crate::namespace::ChannelOptions;
use crate::naming::binary_clip_name;
use crate::param::ParameterSpec;
use crate::synthesis::Synthesis;

/// Weight of bit `bit` in a `bits`-wide decoder.
///
/// `None` unless `bits` is in `1..=MAX_QUANTIZATION_BITS` and `bit < bits`.
#[inline]
pub fn bit_weight(bit: u8, bits: u8) -> Option<f32> {
    if bits == 0 || bits > MAX_QUANTIZATION_BITS || bit >= bits {
        return None;
    }
    let full_scale = (1u32 << bits) - 1;
    Some((1u32 << bit) as f32 / full_scale as f32)
}

/// Weights of every bit of a `bits`-wide decoder, least significant first.
pub fn bit_weights(bits: u8) -> Option<Vec<f32>> {
    (0..bits.max(1)).map(|bit| bit_weight(bit, bits)).collect()
}

/// Largest reconstruction error of a `bits`-wide decoder, as a fraction of
/// full scale.
pub fn max_error(bits: u8) -> Option<f32> {
    bit_weight(0, bits)
}

/// Channels a decoder reads.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderChannels {
    /// One discrete channel per bit, least significant first.
    pub bits: Vec<ChannelRef>,
    /// Sign channel, if the parameter has one.
    pub negative: Option<ChannelRef>,
}

fn check_width(spec: &ParameterSpec) -> Result<u8, CompileError> {
    let bits = spec.quantization_bits;
    if bits == 0 || bits > MAX_QUANTIZATION_BITS {
        return Err(CompileError::InvalidQuantizationWidth {
            parameter: spec.name.clone(),
            bits,
        });
    }
    Ok(bits)
}

/// Registers the synced bit channels of a quantized parameter.
pub fn register_channels(
    syn: &mut Synthesis,
    spec: &ParameterSpec,
    obfuscate: bool,
) -> Result<DecoderChannels, CompileError> {
    let bits = check_width(spec)?;
    let names = syn.names().clone();
    let options = ChannelOptions::new().obfuscate(obfuscate).synced(true);

    let mut bit_channels = Vec::with_capacity(usize::from(bits));
    for bit in 0..bits {
        let channel = syn.channel(&names.binary_bit(&spec.name, bit), ChannelKind::Discrete, options)?;
        syn.set_synced(&channel, true);
        bit_channels.push(channel);
    }

    let negative = if spec.use_sign_bit {
        let channel =
            syn.channel(&names.binary_negative(&spec.name), ChannelKind::Discrete, options)?;
        syn.set_synced(&channel, true);
        Some(channel)
    } else {
        None
    };

    Ok(DecoderChannels {
        bits: bit_channels,
        negative,
    })
}

fn build_sum(
    syn: &mut Synthesis,
    spec: &ParameterSpec,
    target: &ChannelRef,
    channels: &DecoderChannels,
    blend_set: &ChannelRef,
    negative: bool,
) -> Result<GraphNode, CompileError> {
    let names = syn.names().clone();
    let id = syn.context_id().to_string();
    let bits = check_width(spec)?;
    let sign = if negative { -1.0 } else { 1.0 };

    let weights = bit_weights(bits).ok_or_else(|| CompileError::InvalidQuantizationWidth {
        parameter: spec.name.clone(),
        bits,
    })?;

    let mut sum = GraphNode::direct_sum(names.decoder_sum(&spec.name, negative));
    for ((bit, channel), weight) in (0..bits).zip(&channels.bits).zip(weights) {
        let weight = sign * weight;
        let off = syn.clip(binary_clip_name(&spec.name, false, bit, 0.0, &id), target, 0.0)?;
        let on = syn.clip(binary_clip_name(&spec.name, true, bit, weight, &id), target, weight)?;
        let selector = GraphNode::interp_1d(names.decoder_bit(&spec.name, bit, negative), channel.clone())
            .with_threshold_child(0.0, off)
            .with_threshold_child(1.0, on);
        sum = sum.with_weighted_child(blend_set.clone(), selector);
    }
    Ok(sum)
}

/// Builds the decoder of one parameter, writing the decoded value to `target`.
///
/// Rejects widths outside `1..=7` instead of truncating.
pub fn build_decoder(
    syn: &mut Synthesis,
    spec: &ParameterSpec,
    target: &ChannelRef,
    channels: &DecoderChannels,
    blend_set: &ChannelRef,
) -> Result<GraphNode, CompileError> {
    let positive = build_sum(syn, spec, target, channels, blend_set, false)?;
    let Some(sign) = &channels.negative else {
        return Ok(positive);
    };
    let negative = build_sum(syn, spec, target, channels, blend_set, true)?;
    Ok(
        GraphNode::interp_1d(syn.names().decoder_root(&spec.name), sign.clone())
            .with_threshold_child(0.0, positive)
            .with_threshold_child(1.0, negative),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Channel, Evaluator, HostGraph, Layer, State};
    use crate::naming::Names;

    fn decoder_host(spec: &ParameterSpec) -> (HostGraph, DecoderChannels) {
        let mut host = HostGraph::new("t");
        host.add_channel(Channel::new("OSCm/BlendSet", ChannelKind::Continuous).with_default(1.0));
        let mut syn = Synthesis::begin(&host, Names::default());
        let channels = register_channels(&mut syn, spec, false).unwrap();
        let decoder = build_decoder(
            &mut syn,
            spec,
            &ChannelRef::new(spec.name.as_str()),
            &channels,
            &ChannelRef::new("OSCm/BlendSet"),
        )
        .unwrap();
        syn.commit(&mut host, Layer::new("L").with_state(State::new("S").with_motion(decoder)));
        (host, channels)
    }

    #[test]
    fn three_bit_weights() {
        let weights = bit_weights(3).unwrap();
        assert_eq!(weights, vec![1.0 / 7.0, 2.0 / 7.0, 4.0 / 7.0]);
        assert_eq!(max_error(3), Some(1.0 / 7.0));
    }

    #[test]
    fn weights_outside_supported_widths_are_none() {
        assert_eq!(bit_weight(0, 0), None);
        assert_eq!(bit_weight(0, 8), None);
        assert_eq!(bit_weight(3, 3), None);
        assert_eq!(bit_weight(0, 40), None);
        assert_eq!(bit_weights(0), None);
        assert_eq!(bit_weights(32), None);
        assert_eq!(max_error(255), None);
        assert_eq!(bit_weights(7).map(|w| w.len()), Some(7));
    }

    #[test]
    fn decodes_signed_value() {
        let spec = ParameterSpec::new("Jump").with_quantization(3, true);
        let (host, channels) = decoder_host(&spec);
        let mut eval = Evaluator::new(&host);
        eval.set(channels.bits[0].as_str(), 1.0);
        eval.set(channels.bits[2].as_str(), 1.0);
        eval.set("OSCm/Binary/JumpNegative", 1.0);
        eval.step();
        assert!((eval.get("Jump") + 5.0 / 7.0).abs() < 1e-6);
    }

    #[test]
    fn unsigned_decoder_spans_zero_to_full_scale() {
        let spec = ParameterSpec::new("Dial").with_quantization(4, false);
        let (host, channels) = decoder_host(&spec);
        assert!(channels.negative.is_none());

        let mut eval = Evaluator::new(&host);
        eval.step();
        assert_eq!(eval.get("Dial"), 0.0);
        for bit in &channels.bits {
            eval.set(bit.as_str(), 1.0);
        }
        eval.step();
        assert!((eval.get("Dial") - 1.0).abs() < 1e-6);
    }

    #[test]
    fn bit_channels_are_synced_discrete() {
        let spec = ParameterSpec::new("Jump").with_quantization(2, true);
        let (host, _) = decoder_host(&spec);
        for name in ["OSCm/Binary/Jump1", "OSCm/Binary/Jump2", "OSCm/Binary/JumpNegative"] {
            let channel = host.channel(name).unwrap();
            assert!(channel.synced, "{name}");
            assert_eq!(channel.kind, ChannelKind::Discrete);
        }
    }

    #[test]
    fn refuses_eight_bits() {
        let host = HostGraph::new("t");
        let mut syn = Synthesis::begin(&host, Names::default());
        let spec = ParameterSpec::new("Wide").with_quantization(8, false);
        assert!(matches!(
            register_channels(&mut syn, &spec, false),
            Err(CompileError::InvalidQuantizationWidth { bits: 8, .. })
        ));
    }
}
