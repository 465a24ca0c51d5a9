//! Parameter descriptors handed to the compiler.
//!
//! A [`ParameterSpec`] names one scalar host channel and describes how it
//! should be smoothed and, optionally, quantized for transport. Specs are
//! read-only inputs for the duration of one compilation.

use serde::{Deserialize, Serialize};

use crate::cost::{self, ChannelKind, MAX_QUANTIZATION_BITS};
use crate::error::CompileError;

/// Evaluation context a smoothing filter is built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Context {
    /// The observer that owns the parameter (inputs arrive without transport jitter).
    Local,
    /// Every other observer (inputs arrive stepwise over the network).
    Remote,
}

impl Context {
    /// Both contexts, in the order their subgraphs appear under the root selector.
    pub const ALL: [Context; 2] = [Context::Remote, Context::Local];

    /// Threshold of this context's branch under the `IsLocal` selector.
    pub fn selector_threshold(self) -> f32 {
        match self {
            Self::Remote => 0.0,
            Self::Local => 1.0,
        }
    }

    /// Path segment used in channel names (`Local`, `Remote`).
    pub fn segment(self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Remote => "Remote",
        }
    }
}

/// Compilation descriptor for one parameter.
///
/// # TOML Format
///
/// ```toml
/// [[parameters]]
/// name = "Smile"
/// local_smoothness = 0.8
/// remote_smoothness = 0.5
/// quantization_bits = 0
/// use_sign_bit = false
/// use_proxy_rename = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Host channel name; unique within one compilation.
    pub name: String,

    /// Smoothing coefficient for the local context, in `[0, 1]`.
    #[serde(default = "default_local_smoothness")]
    pub local_smoothness: f32,

    /// Smoothing coefficient for the remote context, in `[0, 1]`.
    #[serde(default = "default_remote_smoothness")]
    pub remote_smoothness: f32,

    /// Number of transport bits, `0` disables quantization.
    #[serde(default)]
    pub quantization_bits: u8,

    /// Adds a dedicated sign channel to the quantized representation.
    #[serde(default)]
    pub use_sign_bit: bool,

    /// Rewrites existing consumers of the raw channel to read the smoothed proxy.
    #[serde(default = "default_proxy_rename")]
    pub use_proxy_rename: bool,
}

fn default_local_smoothness() -> f32 {
    0.5
}

fn default_remote_smoothness() -> f32 {
    0.7
}

fn default_proxy_rename() -> bool {
    true
}

impl ParameterSpec {
    /// Creates a smoothing-only spec with default coefficients.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_smoothness: default_local_smoothness(),
            remote_smoothness: default_remote_smoothness(),
            quantization_bits: 0,
            use_sign_bit: false,
            use_proxy_rename: default_proxy_rename(),
        }
    }

    /// Sets both smoothing coefficients.
    pub fn with_smoothness(mut self, local: f32, remote: f32) -> Self {
        self.local_smoothness = local;
        self.remote_smoothness = remote;
        self
    }

    /// Enables quantization with `bits` transport bits.
    pub fn with_quantization(mut self, bits: u8, use_sign_bit: bool) -> Self {
        self.quantization_bits = bits;
        self.use_sign_bit = use_sign_bit;
        self
    }

    /// Sets whether existing references are rewritten to the proxy channel.
    pub fn with_proxy_rename(mut self, enabled: bool) -> Self {
        self.use_proxy_rename = enabled;
        self
    }

    /// Returns true if the parameter travels as bits instead of one float.
    #[inline]
    pub fn is_quantized(&self) -> bool {
        self.quantization_bits > 0
    }

    /// Smoothing coefficient for the given context.
    pub fn smoothness(&self, context: Context) -> f32 {
        match context {
            Context::Local => self.local_smoothness,
            Context::Remote => self.remote_smoothness,
        }
    }

    /// Transport cost of this parameter alone.
    pub fn cost(&self) -> u32 {
        if self.is_quantized() {
            let sign = u32::from(self.use_sign_bit);
            (u32::from(self.quantization_bits) + sign) * cost::cost(ChannelKind::Discrete)
        } else {
            cost::cost(ChannelKind::Continuous)
        }
    }

    /// Checks the value ranges of this spec in isolation.
    pub fn validate(&self) -> Result<(), CompileError> {
        if self.name.trim().is_empty() {
            return Err(CompileError::EmptyName);
        }
        for context in Context::ALL {
            let value = self.smoothness(context);
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(CompileError::SmoothnessOutOfRange {
                    parameter: self.name.clone(),
                    value,
                });
            }
        }
        if self.quantization_bits > MAX_QUANTIZATION_BITS {
            return Err(CompileError::InvalidQuantizationWidth {
                parameter: self.name.clone(),
                bits: self.quantization_bits,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothing_only_costs_one_float() {
        assert_eq!(ParameterSpec::new("Smile").cost(), 8);
    }

    #[test]
    fn quantized_cost_counts_sign_bit() {
        assert_eq!(ParameterSpec::new("Jump").with_quantization(3, true).cost(), 4);
        assert_eq!(ParameterSpec::new("Jump").with_quantization(3, false).cost(), 3);
    }

    #[test]
    fn sign_bit_ignored_without_quantization() {
        let spec = ParameterSpec::new("Smile").with_quantization(0, true);
        assert_eq!(spec.cost(), 8);
    }

    #[test]
    fn validate_rejects_wide_quantization() {
        let spec = ParameterSpec::new("Wide").with_quantization(8, false);
        assert!(matches!(
            spec.validate(),
            Err(CompileError::InvalidQuantizationWidth { bits: 8, .. })
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_smoothness() {
        let spec = ParameterSpec::new("Smile").with_smoothness(1.2, 0.5);
        assert!(matches!(
            spec.validate(),
            Err(CompileError::SmoothnessOutOfRange { .. })
        ));
        let spec = ParameterSpec::new("Smile").with_smoothness(0.5, f32::NAN);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_name() {
        assert!(matches!(
            ParameterSpec::new("  ").validate(),
            Err(CompileError::EmptyName)
        ));
    }

    #[test]
    fn context_thresholds() {
        assert_eq!(Context::Remote.selector_threshold(), 0.0);
        assert_eq!(Context::Local.selector_threshold(), 1.0);
        assert_eq!(ParameterSpec::new("A").with_smoothness(0.1, 0.9).smoothness(Context::Remote), 0.9);
    }
}
