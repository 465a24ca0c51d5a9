//! Channel cost model.
//!
//! Every synced channel consumes part of a fixed bandwidth budget. A
//! continuous (float) channel costs [`CONTINUOUS_COST`] units, a discrete
//! (boolean) channel costs [`DISCRETE_COST`]. Quantizing a parameter into `k`
//! bits therefore only pays off while `k * DISCRETE_COST < CONTINUOUS_COST`,
//! which is why [`MAX_QUANTIZATION_BITS`] is 7.

use serde::{Deserialize, Serialize};

/// Cost of one continuous channel.
pub const CONTINUOUS_COST: u32 = 8;

/// Cost of one discrete (boolean) channel.
pub const DISCRETE_COST: u32 = 1;

/// Total synced capacity of a host before any channel is allocated.
pub const MAX_SYNCED_COST: u32 = 256;

/// Widest quantization a parameter may request.
pub const MAX_QUANTIZATION_BITS: u8 = 7;

/// The value kind carried by a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Scalar float channel.
    Continuous,
    /// Boolean channel (evaluated as 0.0 or 1.0).
    Discrete,
}

impl ChannelKind {
    /// Returns a short lowercase label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Continuous => "float",
            Self::Discrete => "bool",
        }
    }
}

impl core::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns the fixed cost of a channel of the given kind.
#[inline]
pub const fn cost(kind: ChannelKind) -> u32 {
    match kind {
        ChannelKind::Continuous => CONTINUOUS_COST,
        ChannelKind::Discrete => DISCRETE_COST,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_is_cheaper_than_continuous() {
        assert!(cost(ChannelKind::Discrete) < cost(ChannelKind::Continuous));
    }

    #[test]
    fn widest_quantization_still_saves() {
        let bits = u32::from(MAX_QUANTIZATION_BITS);
        assert!(bits * DISCRETE_COST < CONTINUOUS_COST);
        assert!((bits + 1) * DISCRETE_COST >= CONTINUOUS_COST);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(ChannelKind::Continuous.to_string(), "float");
        assert_eq!(ChannelKind::Discrete.to_string(), "bool");
    }
}
