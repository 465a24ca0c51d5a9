//! Explicit edit session for one compilation.
//!
//! A [`Synthesis`] collects everything a compilation wants to change in the
//! host graph (channel requests, clip assets, reference renames) without
//! touching it. [`Synthesis::commit`] then applies the whole batch in a fixed
//! order, so a failure while building never leaves the host half-edited.

use std::collections::BTreeMap;

use crate::cost::ChannelKind;
use crate::error::CompileError;
use crate::graph::{ChannelRef, Clip, ClipRef, Curve, GraphNode, HostGraph, Layer};
use crate::namespace::{ChannelNamespace, ChannelOptions};
use crate::naming::Names;

/// Batch of pending host graph edits.
#[derive(Debug)]
pub struct Synthesis {
    names: Names,
    context_id: String,
    namespace: ChannelNamespace,
    clips: BTreeMap<String, Clip>,
    renames: Vec<(String, String)>,
}

/// What a commit changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Channels added to the host.
    pub created_channels: Vec<String>,
    /// Existing host channels the compilation reused.
    pub reused_channels: Vec<String>,
    /// Channel references rewritten by queued renames.
    pub rewritten_references: usize,
    /// Clips that replaced an existing asset of the same name.
    pub reused_clips: usize,
    /// Whether a previous generated layer was replaced.
    pub replaced_layer: bool,
}

impl Synthesis {
    /// Opens a session over a read-only view of `host`.
    pub fn begin(host: &HostGraph, names: Names) -> Self {
        Self {
            names,
            context_id: host.id().to_string(),
            namespace: ChannelNamespace::from_host(host),
            clips: BTreeMap::new(),
            renames: Vec::new(),
        }
    }

    /// Name factory of this session.
    pub fn names(&self) -> &Names {
        &self.names
    }

    /// Host context identifier used in clip asset names.
    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// Channel registry of this session.
    pub fn namespace(&self) -> &ChannelNamespace {
        &self.namespace
    }

    /// Requests a channel; see [`ChannelNamespace::create_channel`].
    pub fn channel(
        &mut self,
        name: &str,
        kind: ChannelKind,
        options: ChannelOptions,
    ) -> Result<ChannelRef, CompileError> {
        self.namespace.create_channel(name, kind, options)
    }

    /// Forces the synced flag of a channel on commit.
    pub fn set_synced(&mut self, channel: &ChannelRef, synced: bool) {
        self.namespace.set_synced(channel.as_str(), synced);
    }

    /// Queues a constant clip writing `value` to `target` and returns a leaf
    /// playing it.
    ///
    /// Clip names are deterministic, so a second request for the same name
    /// only refreshes the queued asset.
    pub fn clip(
        &mut self,
        name: String,
        target: &ChannelRef,
        value: f32,
    ) -> Result<GraphNode, CompileError> {
        let curve = Curve::constant(value).map_err(|source| CompileError::Curve {
            clip: name.clone(),
            source,
        })?;
        let leaf = GraphNode::leaf(ClipRef::new(name.as_str()));
        self.clips.insert(
            name.clone(),
            Clip {
                name,
                target: target.clone(),
                curve,
            },
        );
        Ok(leaf)
    }

    /// Queued clips, by asset name.
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.clips.values()
    }

    /// Queues a rewrite of every reference to `old` into `new`.
    pub fn rename(&mut self, old: &str, new: &ChannelRef) {
        self.renames.push((old.to_string(), new.as_str().to_string()));
    }

    /// Applies the batch to `host`.
    ///
    /// Order: drop the previous layer named like `layer`, rewrite references
    /// of what remains, add channels, store clips, append `layer`. Renames
    /// therefore never touch generated nodes.
    pub fn commit(self, host: &mut HostGraph, layer: Layer) -> CommitSummary {
        let replaced_layer = host.remove_layers_where(|l| l.name == layer.name) > 0;

        let rewritten_references = self
            .renames
            .iter()
            .map(|(old, new)| host.rename_references(old, new))
            .sum();

        let created_channels = self.namespace.created().iter().map(|c| c.name.clone()).collect();
        let reused_channels = self.namespace.reused().map(str::to_string).collect();
        self.namespace.apply(host, &self.names);

        let reused_clips = self
            .clips
            .into_values()
            .map(|clip| host.upsert_clip(clip))
            .filter(|&reused| reused)
            .count();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "synthesis: commit layer '{}' ({} nodes, {} renames rewrote {} refs)",
            layer.name,
            layer.states.iter().filter_map(|s| s.motion.as_ref()).map(GraphNode::node_count).sum::<usize>(),
            self.renames.len(),
            rewritten_references
        );

        host.add_layer(layer);

        CommitSummary {
            created_channels,
            reused_channels,
            rewritten_references,
            reused_clips,
            replaced_layer,
        }
    }
}
