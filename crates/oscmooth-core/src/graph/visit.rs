//! Exhaustive channel-reference visitors.
//!
//! Every field that *reads* a channel is reachable through these visitors.
//! Rename and revert go through them, so a node kind that gains a channel
//! field must be added here or the match stops compiling.
//!
//! Clip targets are writes, not reads, and are intentionally not visited.

use super::host::State;
use super::node::{ChannelRef, GraphNode};

/// Where a channel reference lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefSite {
    /// Key channel of an `Interp1D`.
    BlendChannel,
    /// Weight channel of a `DirectSum` child.
    DirectWeight,
    /// Normalized-time channel of a state.
    StateTime,
    /// Playback-speed channel of a state.
    StateSpeed,
    /// Cycle-offset channel of a state.
    StateCycleOffset,
    /// Mirror channel of a state.
    StateMirror,
}

impl GraphNode {
    /// Calls `f` for every channel reference in this subtree.
    pub fn for_each_channel_ref<'a>(&'a self, f: &mut impl FnMut(RefSite, &'a ChannelRef)) {
        match self {
            Self::Leaf { .. } => {}
            Self::Interp1D {
                channel, children, ..
            } => {
                f(RefSite::BlendChannel, channel);
                for child in children {
                    child.node.for_each_channel_ref(f);
                }
            }
            Self::DirectSum { children, .. } => {
                for child in children {
                    f(RefSite::DirectWeight, &child.weight);
                    child.node.for_each_channel_ref(f);
                }
            }
        }
    }

    /// Calls `f` for every channel reference in this subtree, mutably.
    pub fn for_each_channel_ref_mut(&mut self, f: &mut impl FnMut(RefSite, &mut ChannelRef)) {
        match self {
            Self::Leaf { .. } => {}
            Self::Interp1D {
                channel, children, ..
            } => {
                f(RefSite::BlendChannel, channel);
                for child in children {
                    child.node.for_each_channel_ref_mut(f);
                }
            }
            Self::DirectSum { children, .. } => {
                for child in children {
                    f(RefSite::DirectWeight, &mut child.weight);
                    child.node.for_each_channel_ref_mut(f);
                }
            }
        }
    }
}

impl State {
    /// Calls `f` for every channel reference held by the state and its motion.
    pub fn for_each_channel_ref<'a>(&'a self, f: &mut impl FnMut(RefSite, &'a ChannelRef)) {
        let fields = [
            (RefSite::StateTime, &self.time_channel),
            (RefSite::StateSpeed, &self.speed_channel),
            (RefSite::StateCycleOffset, &self.cycle_offset_channel),
            (RefSite::StateMirror, &self.mirror_channel),
        ];
        for (site, field) in fields {
            if let Some(channel) = field {
                f(site, channel);
            }
        }
        if let Some(motion) = &self.motion {
            motion.for_each_channel_ref(f);
        }
    }

    /// Calls `f` for every channel reference held by the state and its motion, mutably.
    pub fn for_each_channel_ref_mut(&mut self, f: &mut impl FnMut(RefSite, &mut ChannelRef)) {
        let fields = [
            (RefSite::StateTime, &mut self.time_channel),
            (RefSite::StateSpeed, &mut self.speed_channel),
            (RefSite::StateCycleOffset, &mut self.cycle_offset_channel),
            (RefSite::StateMirror, &mut self.mirror_channel),
        ];
        for (site, field) in fields {
            if let Some(channel) = field {
                f(site, channel);
            }
        }
        if let Some(motion) = &mut self.motion {
            motion.for_each_channel_ref_mut(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::ClipRef;

    fn sample_tree() -> GraphNode {
        GraphNode::direct_sum("root")
            .with_weighted_child(
                ChannelRef::new("w"),
                GraphNode::interp_1d("a", ChannelRef::new("x"))
                    .with_threshold_child(0.0, GraphNode::leaf(ClipRef::new("c"))),
            )
            .with_weighted_child(ChannelRef::new("w"), GraphNode::leaf(ClipRef::new("d")))
    }

    #[test]
    fn visits_every_read_site() {
        let mut seen = Vec::new();
        sample_tree().for_each_channel_ref(&mut |site, channel| {
            seen.push((site, channel.as_str().to_string()));
        });
        assert_eq!(
            seen,
            vec![
                (RefSite::DirectWeight, "w".to_string()),
                (RefSite::BlendChannel, "x".to_string()),
                (RefSite::DirectWeight, "w".to_string()),
            ]
        );
    }

    #[test]
    fn state_fields_are_visited() {
        let mut state = State::new("s");
        state.speed_channel = Some(ChannelRef::new("speed"));
        state.mirror_channel = Some(ChannelRef::new("mirror"));
        state.motion = Some(sample_tree());

        let mut sites = Vec::new();
        state.for_each_channel_ref(&mut |site, _| sites.push(site));
        assert_eq!(sites.len(), 5);
        assert_eq!(sites[0], RefSite::StateSpeed);
        assert_eq!(sites[1], RefSite::StateMirror);

        state.for_each_channel_ref_mut(&mut |_, channel| channel.set("z"));
        state.for_each_channel_ref(&mut |_, channel| assert_eq!(channel, "z"));
    }
}
