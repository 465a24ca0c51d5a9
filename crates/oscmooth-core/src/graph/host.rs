//! In-memory model of the host graph.
//!
//! The host graph is the externally owned document the compiler reads
//! existing channel references from and writes generated layers into. It is
//! a plain value: persistence belongs to the caller, which can (de)serialize
//! it with serde.
//!
//! # Structure
//!
//! - **Channels**: ordered list of named scalar slots ([`Channel`]).
//! - **Layers**: named [`Layer`]s, each holding [`State`]s. A state plays an
//!   optional motion tree and may read up to four channels itself.
//! - **Clips**: the asset library leaves resolve their [`ClipRef`] against.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::node::{ChannelRef, Clip, ClipRef, GraphNode};
use super::visit::RefSite;
use crate::cost::{self, ChannelKind};

/// A named scalar slot in the host graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel name, unique within the host.
    pub name: String,
    /// Value kind.
    pub kind: ChannelKind,
    /// Value the channel holds before anything writes it.
    #[serde(default)]
    pub default: f32,
    /// Whether the channel is transmitted to remote observers.
    #[serde(default)]
    pub synced: bool,
}

impl Channel {
    /// Creates an unsynced channel with a zero default.
    pub fn new(name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: 0.0,
            synced: false,
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: f32) -> Self {
        self.default = default;
        self
    }

    /// Sets the synced flag.
    pub fn with_synced(mut self, synced: bool) -> Self {
        self.synced = synced;
        self
    }

    /// Transport cost if synced, zero otherwise.
    pub fn synced_cost(&self) -> u32 {
        if self.synced { cost::cost(self.kind) } else { 0 }
    }
}

/// A state inside a layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// State name.
    pub name: String,
    /// Blend tree or leaf played by the state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<GraphNode>,
    /// Channel driving normalized playback time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_channel: Option<ChannelRef>,
    /// Channel scaling playback speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_channel: Option<ChannelRef>,
    /// Channel offsetting the playback cycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_offset_channel: Option<ChannelRef>,
    /// Channel toggling mirrored playback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_channel: Option<ChannelRef>,
}

impl State {
    /// Creates an empty state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the motion played by the state.
    pub fn with_motion(mut self, motion: GraphNode) -> Self {
        self.motion = Some(motion);
        self
    }
}

/// A named layer of states. The first state is the one the engine plays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name.
    pub name: String,
    /// States of the layer.
    #[serde(default)]
    pub states: Vec<State>,
}

impl Layer {
    /// Creates an empty layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
        }
    }

    /// Appends a state.
    pub fn with_state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }
}

/// One channel reference found in the host graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    /// Layer holding the reference.
    pub layer: String,
    /// State holding the reference.
    pub state: String,
    /// Field kind holding the reference.
    pub site: RefSite,
    /// Referenced channel.
    pub channel: ChannelRef,
}

/// The host graph document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HostGraph {
    /// Context identifier embedded in generated asset names.
    #[serde(default)]
    id: String,
    #[serde(default)]
    channels: Vec<Channel>,
    #[serde(default)]
    layers: Vec<Layer>,
    #[serde(default)]
    clips: BTreeMap<String, Clip>,
    /// Original synced flags of user channels a compilation overwrote, by tag.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    sync_overrides: BTreeMap<String, BTreeMap<String, bool>>,
}

impl HostGraph {
    /// Creates an empty host graph with the given context identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Context identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    // --- Channels ---

    /// All channels, in insertion order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Looks up a channel by name.
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Looks up a channel by name, mutably.
    pub fn channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.iter_mut().find(|c| c.name == name)
    }

    /// Returns true if a channel with this name exists.
    pub fn has_channel(&self, name: &str) -> bool {
        self.channel(name).is_some()
    }

    /// Appends a channel. Name uniqueness is the caller's responsibility.
    pub fn add_channel(&mut self, channel: Channel) {
        self.channels.push(channel);
    }

    /// Removes every channel matching `remove`; returns the removed channels.
    pub fn remove_channels_where(&mut self, mut remove: impl FnMut(&Channel) -> bool) -> Vec<Channel> {
        let (removed, kept): (Vec<Channel>, Vec<Channel>) = std::mem::take(&mut self.channels)
            .into_iter()
            .partition(|c| remove(c));
        self.channels = kept;
        removed
    }

    /// Records that a compilation under `tag` changed the synced flag of
    /// `channel`, whose flag was `original`. The first record per channel
    /// wins, so recompiling keeps the flag from before the first compile.
    pub fn record_sync_override(&mut self, tag: &str, channel: &str, original: bool) {
        self.sync_overrides
            .entry(tag.to_string())
            .or_default()
            .entry(channel.to_string())
            .or_insert(original);
    }

    /// Original synced flags recorded under `tag`.
    pub fn sync_overrides(&self, tag: &str) -> Option<&BTreeMap<String, bool>> {
        self.sync_overrides.get(tag)
    }

    /// Removes and returns the flags recorded under `tag`.
    pub fn take_sync_overrides(&mut self, tag: &str) -> BTreeMap<String, bool> {
        self.sync_overrides.remove(tag).unwrap_or_default()
    }

    /// Sum of the transport cost of synced channels not excluded by `skip`.
    pub fn synced_cost(&self, skip: impl Fn(&Channel) -> bool) -> u32 {
        self.channels
            .iter()
            .filter(|c| !skip(c))
            .map(Channel::synced_cost)
            .sum()
    }

    // --- Layers ---

    /// All layers, in evaluation order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Looks up a layer by name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Appends a layer.
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Removes every layer matching `remove`; returns how many were removed.
    pub fn remove_layers_where(&mut self, remove: impl Fn(&Layer) -> bool) -> usize {
        let before = self.layers.len();
        self.layers.retain(|l| !remove(l));
        before - self.layers.len()
    }

    /// Total number of motion nodes across all states.
    pub fn node_count(&self) -> usize {
        self.states()
            .filter_map(|s| s.motion.as_ref())
            .map(GraphNode::node_count)
            .sum()
    }

    /// Removes every motion node matching `remove`, at any depth.
    ///
    /// A matching root motion leaves its state without a motion. Returns the
    /// number of subtrees removed.
    pub fn prune_nodes(&mut self, remove: impl Fn(&GraphNode) -> bool) -> usize {
        let mut pruned = 0;
        for state in self.layers.iter_mut().flat_map(|l| l.states.iter_mut()) {
            if state.motion.as_ref().is_some_and(&remove) {
                state.motion = None;
                pruned += 1;
            } else if let Some(motion) = &mut state.motion {
                pruned += motion.prune(&remove);
            }
        }
        pruned
    }

    fn states(&self) -> impl Iterator<Item = &State> {
        self.layers.iter().flat_map(|l| l.states.iter())
    }

    // --- References ---

    /// Every channel reference in the graph, in layer/state/pre-order.
    pub fn references(&self) -> Vec<Reference> {
        let mut out = Vec::new();
        for layer in &self.layers {
            for state in &layer.states {
                state.for_each_channel_ref(&mut |site, channel| {
                    out.push(Reference {
                        layer: layer.name.clone(),
                        state: state.name.clone(),
                        site,
                        channel: channel.clone(),
                    });
                });
            }
        }
        out
    }

    /// Set of referenced channel names.
    pub fn referenced_channels(&self) -> BTreeSet<ChannelRef> {
        self.references().into_iter().map(|r| r.channel).collect()
    }

    /// Rewrites references in place.
    ///
    /// `rewrite` returns the replacement name for a reference, or `None` to
    /// leave it alone. Returns the number of references changed.
    pub fn rewrite_references(&mut self, mut rewrite: impl FnMut(&str) -> Option<String>) -> usize {
        let mut changed = 0;
        for state in self.layers.iter_mut().flat_map(|l| l.states.iter_mut()) {
            state.for_each_channel_ref_mut(&mut |_, channel| {
                if let Some(new_name) = rewrite(channel.as_str()) {
                    channel.set(&new_name);
                    changed += 1;
                }
            });
        }
        changed
    }

    /// Rewrites every reference to `old` into `new`; returns how many changed.
    ///
    /// No matching reference is a legitimate outcome and returns zero.
    pub fn rename_references(&mut self, old: &str, new: &str) -> usize {
        self.rewrite_references(|name| (name == old).then(|| new.to_string()))
    }

    // --- Clips ---

    /// Clip library.
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.clips.values()
    }

    /// Looks up a clip by asset name.
    pub fn clip(&self, name: &str) -> Option<&Clip> {
        self.clips.get(name)
    }

    /// Resolves a leaf's clip reference.
    pub fn resolve(&self, clip: &ClipRef) -> Option<&Clip> {
        self.clips.get(clip.as_str())
    }

    /// Stores a clip, replacing the curve of an existing clip with the same
    /// name. Returns true if an existing asset was reused.
    pub fn upsert_clip(&mut self, clip: Clip) -> bool {
        self.clips.insert(clip.name.clone(), clip).is_some()
    }

    /// Names of every clip referenced by a leaf.
    pub fn referenced_clips(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for motion in self.states().filter_map(|s| s.motion.as_ref()) {
            motion.walk(&mut |node| {
                if let GraphNode::Leaf { clip } = node {
                    out.insert(clip.as_str().to_string());
                }
            });
        }
        out
    }

    /// Removes clips matching `remove`; returns how many were removed.
    pub fn remove_clips_where(&mut self, remove: impl Fn(&Clip) -> bool) -> usize {
        let before = self.clips.len();
        self.clips.retain(|_, clip| !remove(clip));
        before - self.clips.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::Curve;

    fn host_with_consumer() -> HostGraph {
        let mut host = HostGraph::new("ctx");
        host.add_channel(Channel::new("Smile", ChannelKind::Continuous).with_synced(true));
        let mut state = State::new("Face").with_motion(
            GraphNode::interp_1d("FaceBlend", ChannelRef::new("Smile"))
                .with_threshold_child(0.0, GraphNode::leaf(ClipRef::new("neutral")))
                .with_threshold_child(1.0, GraphNode::leaf(ClipRef::new("smile"))),
        );
        state.time_channel = Some(ChannelRef::new("Smile"));
        host.add_layer(Layer::new("FX").with_state(state));
        host
    }

    #[test]
    fn rename_rewrites_motion_and_state_fields() {
        let mut host = host_with_consumer();
        assert_eq!(host.rename_references("Smile", "OSCm/Proxy/Smile"), 2);
        let refs = host.referenced_channels();
        assert!(refs.contains(&ChannelRef::new("OSCm/Proxy/Smile")));
        assert!(!refs.contains(&ChannelRef::new("Smile")));
    }

    #[test]
    fn rename_missing_is_noop() {
        let mut host = host_with_consumer();
        let before = host.clone();
        assert_eq!(host.rename_references("Frown", "x"), 0);
        assert_eq!(host, before);
    }

    #[test]
    fn references_report_location() {
        let host = host_with_consumer();
        let refs = host.references();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].layer, "FX");
        assert_eq!(refs[0].state, "Face");
        assert_eq!(refs[0].site, RefSite::StateTime);
        assert_eq!(refs[1].site, RefSite::BlendChannel);
    }

    #[test]
    fn prune_root_clears_motion() {
        let mut host = host_with_consumer();
        assert_eq!(host.prune_nodes(|n| n.name() == "FaceBlend"), 1);
        assert_eq!(host.node_count(), 0);
    }

    #[test]
    fn synced_cost_skips_excluded() {
        let mut host = host_with_consumer();
        host.add_channel(Channel::new("Bit", ChannelKind::Discrete).with_synced(true));
        host.add_channel(Channel::new("Local", ChannelKind::Continuous));
        assert_eq!(host.synced_cost(|_| false), 9);
        assert_eq!(host.synced_cost(|c| c.name == "Smile"), 1);
    }

    #[test]
    fn upsert_reports_reuse() {
        let mut host = HostGraph::new("ctx");
        let clip = Clip {
            name: "a.anim".to_string(),
            target: ChannelRef::new("x"),
            curve: Curve::constant(1.0).unwrap(),
        };
        assert!(!host.upsert_clip(clip.clone()));
        assert!(host.upsert_clip(clip));
        assert_eq!(host.clips().count(), 1);
    }

    #[test]
    fn json_round_trip() {
        let host = host_with_consumer();
        let json = serde_json::to_string_pretty(&host).unwrap();
        let back: HostGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, host);
    }

    #[test]
    fn first_sync_override_wins_and_persists() {
        let mut host = host_with_consumer();
        let plain = serde_json::to_string(&host).unwrap();
        assert!(!plain.contains("sync_overrides"));

        host.record_sync_override("OSCm", "Smile", true);
        host.record_sync_override("OSCm", "Smile", false);
        let back: HostGraph = serde_json::from_str(&serde_json::to_string(&host).unwrap()).unwrap();
        assert_eq!(back.sync_overrides("OSCm").unwrap().get("Smile"), Some(&true));

        host.take_sync_overrides("OSCm");
        assert!(host.sync_overrides("OSCm").is_none());
    }
}
