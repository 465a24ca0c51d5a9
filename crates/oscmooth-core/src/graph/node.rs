//! Blend-graph node types.
//!
//! A blend graph is a tree of [`GraphNode`]s evaluated once per frame by the
//! host engine:
//!
//! - [`GraphNode::Leaf`] references a [`Clip`] that writes a constant curve
//!   value to one channel.
//! - [`GraphNode::Interp1D`] reads one channel and linearly interpolates
//!   between the two children whose thresholds bracket its value.
//! - [`GraphNode::DirectSum`] weights every child by its own channel and sums.
//!
//! Nodes own their children exclusively. Channels are never owned by nodes;
//! they are named relations ([`ChannelRef`]) resolved by the host.

use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// Stable name of a scalar channel in the host graph.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelRef(String);

impl ChannelRef {
    /// Wraps a channel name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the channel name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Replaces the referenced name in place.
    pub(crate) fn set(&mut self, name: &str) {
        name.clone_into(&mut self.0);
    }
}

impl core::fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for ChannelRef {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ChannelRef {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Name of a clip asset in the host's clip library.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipRef(String);

impl ClipRef {
    /// Wraps a clip asset name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the asset name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ClipRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One `(time, value)` point of a curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Key time in seconds.
    pub time: f32,
    /// Key value.
    pub value: f32,
}

impl Keyframe {
    /// Creates a keyframe.
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// A finite, strictly time-ordered sequence of keyframes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct Curve {
    keys: Vec<Keyframe>,
}

impl Curve {
    /// Builds a curve, checking that it is non-empty, finite and monotonic.
    pub fn new(keys: Vec<Keyframe>) -> Result<Self, CurveError> {
        if keys.is_empty() {
            return Err(CurveError::Empty);
        }
        for (index, key) in keys.iter().enumerate() {
            if !key.time.is_finite() || !key.value.is_finite() {
                return Err(CurveError::NonFinite { index });
            }
            if index > 0 && key.time <= keys[index - 1].time {
                return Err(CurveError::NotMonotonic { index });
            }
        }
        Ok(Self { keys })
    }

    /// Single-key curve holding `value` at time zero.
    pub fn constant(value: f32) -> Result<Self, CurveError> {
        Self::new(vec![Keyframe::new(0.0, value)])
    }

    /// Returns the keyframes.
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Samples the curve, holding the end values outside its range.
    pub fn sample(&self, time: f32) -> f32 {
        let first = self.keys[0];
        if time <= first.time {
            return first.value;
        }
        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if time <= b.time {
                let t = (time - a.time) / (b.time - a.time);
                return a.value + (b.value - a.value) * t;
            }
        }
        self.keys[self.keys.len() - 1].value
    }
}

impl TryFrom<Vec<Keyframe>> for Curve {
    type Error = CurveError;

    fn try_from(keys: Vec<Keyframe>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}

impl From<Curve> for Vec<Keyframe> {
    fn from(curve: Curve) -> Self {
        curve.keys
    }
}

/// A clip asset: drives `target` with `curve`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Asset name, unique within the host's clip library.
    pub name: String,
    /// Channel written by this clip.
    pub target: ChannelRef,
    /// Value curve sampled at time zero by the blend engine.
    pub curve: Curve,
}

/// Child of an [`GraphNode::Interp1D`] node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interp1DChild {
    /// Key value at which this child has full weight.
    pub threshold: f32,
    /// The child subtree.
    pub node: GraphNode,
}

/// Child of a [`GraphNode::DirectSum`] node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectChild {
    /// Channel supplying this child's weight.
    pub weight: ChannelRef,
    /// The child subtree.
    pub node: GraphNode,
}

/// A node of a blend graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphNode {
    /// Plays one clip.
    Leaf {
        /// Clip asset played by this leaf.
        clip: ClipRef,
    },
    /// One-dimensional interpolation keyed on a channel.
    #[serde(rename = "interp_1d")]
    Interp1D {
        /// Node name (carries the synthesis tag when generated).
        name: String,
        /// Key channel.
        channel: ChannelRef,
        /// Children ordered by ascending threshold.
        children: Vec<Interp1DChild>,
    },
    /// Weighted sum of children.
    DirectSum {
        /// Node name (carries the synthesis tag when generated).
        name: String,
        /// Children with their weight channels.
        children: Vec<DirectChild>,
    },
}

impl GraphNode {
    /// Creates a leaf playing `clip`.
    pub fn leaf(clip: ClipRef) -> Self {
        Self::Leaf { clip }
    }

    /// Creates an empty 1D interpolation node.
    pub fn interp_1d(name: impl Into<String>, channel: ChannelRef) -> Self {
        Self::Interp1D {
            name: name.into(),
            channel,
            children: Vec::new(),
        }
    }

    /// Creates an empty direct-sum node.
    pub fn direct_sum(name: impl Into<String>) -> Self {
        Self::DirectSum {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Adds a child to an `Interp1D`, keeping children sorted by threshold.
    ///
    /// Ignored on other node kinds.
    pub fn with_threshold_child(mut self, threshold: f32, node: GraphNode) -> Self {
        if let Self::Interp1D { children, .. } = &mut self {
            let at = children.partition_point(|c| c.threshold <= threshold);
            children.insert(at, Interp1DChild { threshold, node });
        }
        self
    }

    /// Adds a weighted child to a `DirectSum`.
    ///
    /// Ignored on other node kinds.
    pub fn with_weighted_child(mut self, weight: ChannelRef, node: GraphNode) -> Self {
        if let Self::DirectSum { children, .. } = &mut self {
            children.push(DirectChild { weight, node });
        }
        self
    }

    /// Node name; leaves are named after their clip.
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf { clip } => clip.as_str(),
            Self::Interp1D { name, .. } | Self::DirectSum { name, .. } => name,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Interp1D { children, .. } => {
                1 + children.iter().map(|c| c.node.node_count()).sum::<usize>()
            }
            Self::DirectSum { children, .. } => {
                1 + children.iter().map(|c| c.node.node_count()).sum::<usize>()
            }
        }
    }

    /// Visits every node of this subtree in pre-order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a GraphNode)) {
        f(self);
        match self {
            Self::Leaf { .. } => {}
            Self::Interp1D { children, .. } => {
                for child in children {
                    child.node.walk(f);
                }
            }
            Self::DirectSum { children, .. } => {
                for child in children {
                    child.node.walk(f);
                }
            }
        }
    }

    /// Removes every descendant for which `remove` returns true.
    ///
    /// `self` is never removed; callers decide what to do with a matching
    /// root. Returns the number of subtrees pruned.
    pub fn prune(&mut self, remove: &impl Fn(&GraphNode) -> bool) -> usize {
        let mut pruned = 0;
        match self {
            Self::Leaf { .. } => {}
            Self::Interp1D { children, .. } => {
                let before = children.len();
                children.retain(|c| !remove(&c.node));
                pruned += before - children.len();
                for child in children.iter_mut() {
                    pruned += child.node.prune(remove);
                }
            }
            Self::DirectSum { children, .. } => {
                let before = children.len();
                children.retain(|c| !remove(&c.node));
                pruned += before - children.len();
                for child in children.iter_mut() {
                    pruned += child.node.prune(remove);
                }
            }
        }
        pruned
    }
}
