//! Reference frame evaluator.
//!
//! Executes a [`HostGraph`] with the blend semantics of the engine that
//! consumes it, one frame at a time:
//!
//! 1. Every layer plays its first state at full weight.
//! 2. `Interp1D` splits its weight between the two children bracketing the
//!    key value (clamped to the outermost children).
//! 3. `DirectSum` scales each child by its weight channel.
//! 4. A leaf adds `weight * curve(0)` to its clip's target.
//! 5. After the frame, every written channel is overwritten with its sum.
//!
//! Channels are read with last frame's values, so a subgraph that writes a
//! channel it also reads sees its own previous output. That is the feedback
//! path smoothing filters rely on.

use std::collections::BTreeMap;

use super::host::HostGraph;
use super::node::GraphNode;

/// Steps a host graph frame by frame.
pub struct Evaluator<'a> {
    host: &'a HostGraph,
    values: BTreeMap<String, f32>,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator with every channel at its default value.
    pub fn new(host: &'a HostGraph) -> Self {
        let values = host
            .channels()
            .iter()
            .map(|c| (c.name.clone(), c.default))
            .collect();
        Self { host, values }
    }

    /// Sets a channel value, as an external input would.
    pub fn set(&mut self, channel: &str, value: f32) {
        self.values.insert(channel.to_string(), value);
    }

    /// Current value of a channel; unknown channels read as zero.
    pub fn get(&self, channel: &str) -> f32 {
        self.values.get(channel).copied().unwrap_or(0.0)
    }

    /// Evaluates one frame and returns the channels it wrote.
    pub fn step(&mut self) -> BTreeMap<String, f32> {
        let mut writes = BTreeMap::new();
        for layer in self.host.layers() {
            if let Some(motion) = layer.states.first().and_then(|s| s.motion.as_ref()) {
                self.accumulate(motion, 1.0, &mut writes);
            }
        }
        for (channel, value) in &writes {
            self.values.insert(channel.clone(), *value);
        }
        writes
    }

    /// Runs `frames` frames and returns the trace of `channel` after each one.
    pub fn trace(&mut self, channel: &str, frames: usize) -> Vec<f32> {
        (0..frames)
            .map(|_| {
                self.step();
                self.get(channel)
            })
            .collect()
    }

    fn accumulate(&self, node: &GraphNode, weight: f32, out: &mut BTreeMap<String, f32>) {
        if weight == 0.0 {
            return;
        }
        match node {
            GraphNode::Leaf { clip } => {
                if let Some(clip) = self.host.resolve(clip) {
                    *out.entry(clip.target.as_str().to_string()).or_insert(0.0) +=
                        weight * clip.curve.sample(0.0);
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("eval: leaf references missing clip '{clip}'");
                }
            }
            GraphNode::Interp1D {
                channel, children, ..
            } => {
                let (Some(first), Some(last)) = (children.first(), children.last()) else {
                    return;
                };
                let x = self.get(channel.as_str());
                if x <= first.threshold {
                    self.accumulate(&first.node, weight, out);
                } else if x >= last.threshold {
                    self.accumulate(&last.node, weight, out);
                } else {
                    let upper = children.partition_point(|c| c.threshold <= x);
                    let (a, b) = (&children[upper - 1], &children[upper]);
                    let t = (x - a.threshold) / (b.threshold - a.threshold);
                    self.accumulate(&a.node, weight * (1.0 - t), out);
                    self.accumulate(&b.node, weight * t, out);
                }
            }
            GraphNode::DirectSum { children, .. } => {
                for child in children {
                    self.accumulate(&child.node, weight * self.get(child.weight.as_str()), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::ChannelKind;
    use crate::graph::host::{Channel, Layer, State};
    use crate::graph::node::{ChannelRef, Clip, ClipRef, Curve};

    fn clip(host: &mut HostGraph, name: &str, target: &str, value: f32) -> GraphNode {
        host.upsert_clip(Clip {
            name: name.to_string(),
            target: ChannelRef::new(target),
            curve: Curve::constant(value).unwrap(),
        });
        GraphNode::leaf(ClipRef::new(name))
    }

    #[test]
    fn interp_blends_adjacent_children() {
        let mut host = HostGraph::new("t");
        host.add_channel(Channel::new("x", ChannelKind::Continuous));
        let lo = clip(&mut host, "lo", "out", -1.0);
        let hi = clip(&mut host, "hi", "out", 1.0);
        let tree = GraphNode::interp_1d("n", ChannelRef::new("x"))
            .with_threshold_child(-1.0, lo)
            .with_threshold_child(1.0, hi);
        host.add_layer(Layer::new("L").with_state(State::new("S").with_motion(tree)));

        let mut eval = Evaluator::new(&host);
        for x in [-2.0, -1.0, -0.5, 0.0, 0.25, 1.0, 3.0] {
            eval.set("x", x);
            eval.step();
            let expected = f32::clamp(x, -1.0, 1.0);
            assert!((eval.get("out") - expected).abs() < 1e-6, "x={x}");
        }
    }

    #[test]
    fn direct_sum_weights_children() {
        let mut host = HostGraph::new("t");
        host.add_channel(Channel::new("w", ChannelKind::Continuous).with_default(0.5));
        let a = clip(&mut host, "a", "out", 2.0);
        let b = clip(&mut host, "b", "out", 4.0);
        let tree = GraphNode::direct_sum("d")
            .with_weighted_child(ChannelRef::new("w"), a)
            .with_weighted_child(ChannelRef::new("w"), b);
        host.add_layer(Layer::new("L").with_state(State::new("S").with_motion(tree)));

        let mut eval = Evaluator::new(&host);
        let writes = eval.step();
        assert_eq!(writes.get("out"), Some(&3.0));
    }

    #[test]
    fn unwritten_channels_keep_their_value() {
        let mut host = HostGraph::new("t");
        host.add_channel(Channel::new("x", ChannelKind::Continuous).with_default(0.25));
        let mut eval = Evaluator::new(&host);
        assert!(eval.step().is_empty());
        assert_eq!(eval.get("x"), 0.25);
        assert_eq!(eval.get("missing"), 0.0);
    }
}
