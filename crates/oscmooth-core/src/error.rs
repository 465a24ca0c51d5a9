//! Error types for graph synthesis.

use thiserror::Error;

/// The parameter list needs more synced capacity than the host has left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("parameters use {used} units of synced capacity but only {capacity} are available")]
pub struct BudgetExceeded {
    /// Total cost of the rejected parameter list.
    pub used: u32,
    /// Capacity the list was checked against.
    pub capacity: u32,
}

/// An animation curve failed its shape invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// A curve needs at least one key.
    #[error("curve has no keyframes")]
    Empty,
    /// Key times or values must be finite.
    #[error("keyframe {index} is not finite")]
    NonFinite {
        /// Position of the offending key.
        index: usize,
    },
    /// Key times must be strictly increasing.
    #[error("keyframe {index} does not advance in time")]
    NotMonotonic {
        /// Position of the offending key.
        index: usize,
    },
}

/// Errors raised while validating or synthesizing a compilation.
///
/// All variants are produced before the host graph is touched: a failed
/// compilation leaves the host exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// Budget check failed.
    #[error(transparent)]
    BudgetExceeded(#[from] BudgetExceeded),

    /// A parameter requested more bits than the decoder supports.
    #[error("parameter '{parameter}' requests {bits} quantization bits (maximum is 7)")]
    InvalidQuantizationWidth {
        /// Offending parameter.
        parameter: String,
        /// Requested width.
        bits: u8,
    },

    /// A smoothing coefficient lies outside `[0, 1]` or is not finite.
    #[error("parameter '{parameter}' has smoothness {value} outside [0, 1]")]
    SmoothnessOutOfRange {
        /// Offending parameter.
        parameter: String,
        /// The rejected coefficient.
        value: f32,
    },

    /// A parameter name is empty or whitespace.
    #[error("parameter name must not be empty")]
    EmptyName,

    /// The namespace root is empty, so it would tag every name.
    #[error("namespace must not be empty")]
    EmptyNamespace,

    /// A parameter name contains the namespace tag, so removal would treat
    /// its channels as generated.
    #[error("parameter '{parameter}' contains the reserved tag '{tag}'")]
    ReservedName {
        /// Offending parameter.
        parameter: String,
        /// Namespace tag it contains.
        tag: String,
    },

    /// The same parameter appears twice in one compilation.
    #[error("parameter '{0}' is listed more than once")]
    DuplicateParameter(String),

    /// A fresh channel was requested under a name that is already taken.
    #[error("channel '{0}' already exists")]
    DuplicateChannel(String),

    /// A generated curve violated its invariants.
    #[error("invalid curve for '{clip}': {source}")]
    Curve {
        /// Clip the curve belongs to.
        clip: String,
        /// Underlying shape error.
        #[source]
        source: CurveError,
    },
}
