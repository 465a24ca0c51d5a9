//! Blend-graph primitives and the host graph model.
//!
//! The compiler emits [`GraphNode`] trees into a [`HostGraph`]. Nodes own
//! their children; channels are shared only by name through [`ChannelRef`].
//!
//! # Modules
//!
//! - [`node`]: node variants, clip and curve types
//! - [`host`]: channels, layers, states and the clip library
//! - [`visit`]: exhaustive channel-reference visitors used by rename/revert
//! - [`eval`]: frame evaluator with the consuming engine's blend semantics
//!
//! # Example
//!
//! ```rust
//! use oscmooth_core::graph::{ChannelRef, ClipRef, GraphNode};
//!
//! let node = GraphNode::interp_1d("Blend", ChannelRef::new("Smile"))
//!     .with_threshold_child(0.0, GraphNode::leaf(ClipRef::new("neutral.anim")))
//!     .with_threshold_child(1.0, GraphNode::leaf(ClipRef::new("smile.anim")));
//! assert_eq!(node.node_count(), 3);
//! ```

pub mod eval;
pub mod host;
pub mod node;
pub mod visit;

pub use eval::Evaluator;
pub use host::{Channel, HostGraph, Layer, Reference, State};
pub use node::{ChannelRef, Clip, ClipRef, Curve, DirectChild, GraphNode, Interp1DChild, Keyframe};
pub use visit::RefSite;
