//! Removal of generated artifacts.
//!
//! The inverse of [`compile`](crate::compiler::compile): drops generated
//! nodes, layers, channels and clips and points renamed references back at
//! their raw channels. Synced flags the compilation changed on user channels
//! are restored. Anything already gone counts as clean; nothing here fails.
//! An empty tag matches nothing.

use crate::graph::HostGraph;
use crate::naming::{is_generated_clip, Names};

/// What a removal changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    /// Generated subtrees pruned from host states.
    pub pruned_nodes: usize,
    /// Generated layers removed.
    pub removed_layers: usize,
    /// References pointed back at their raw channel.
    pub reverted_references: usize,
    /// Generated channels removed.
    pub removed_channels: Vec<String>,
    /// Orphaned generated clips removed.
    pub removed_clips: usize,
    /// User channels whose synced flag was restored.
    pub restored_sync_flags: usize,
}

impl RemovalReport {
    /// Returns true if nothing needed removing.
    pub fn is_clean(&self) -> bool {
        self.pruned_nodes == 0
            && self.removed_layers == 0
            && self.reverted_references == 0
            && self.removed_channels.is_empty()
            && self.removed_clips == 0
            && self.restored_sync_flags == 0
    }
}

/// Deletes every node, layer and channel whose name carries the tag.
///
/// Obfuscated channels are matched on their recovered name.
pub fn remove_generated_artifacts(host: &mut HostGraph, names: &Names) -> RemovalReport {
    let removed_layers = host.remove_layers_where(|layer| names.is_tagged(&layer.name));
    let pruned_nodes = host.prune_nodes(|node| names.is_tagged(node.name()));
    let removed_channels = host
        .remove_channels_where(|channel| names.is_generated_channel(&channel.name))
        .into_iter()
        .map(|channel| channel.name)
        .collect();

    RemovalReport {
        pruned_nodes,
        removed_layers,
        removed_channels,
        ..RemovalReport::default()
    }
}

/// Strips the synthesis prefixes from every reference that still has one.
///
/// Returns the number of references reverted.
pub fn revert_references(host: &mut HostGraph, names: &Names) -> usize {
    let prefixes = names.extension_prefixes();
    host.rewrite_references(|name| {
        prefixes
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix.as_str()))
            .map(str::to_string)
    })
}

/// Puts back the synced flags a compilation under this tag overwrote.
///
/// Returns the number of channels restored. Channels deleted since are
/// skipped.
pub fn restore_sync_flags(host: &mut HostGraph, names: &Names) -> usize {
    let mut restored = 0;
    for (name, synced) in host.take_sync_overrides(names.root()) {
        if let Some(channel) = host.channel_mut(&name) {
            channel.synced = synced;
            restored += 1;
        }
    }
    restored
}

/// Removes generated clips no leaf references anymore.
pub fn prune_orphan_clips(host: &mut HostGraph) -> usize {
    let referenced = host.referenced_clips();
    let id = host.id().to_string();
    host.remove_clips_where(|clip| !referenced.contains(&clip.name) && is_generated_clip(&clip.name, &id))
}

/// Tears down everything a compilation under `tag` produced.
pub fn remove_all(host: &mut HostGraph, tag: &str) -> RemovalReport {
    if tag.is_empty() {
        return RemovalReport::default();
    }
    let names = Names::new(tag);
    let mut report = remove_generated_artifacts(host, &names);
    report.reverted_references = revert_references(host, &names);
    report.restored_sync_flags = restore_sync_flags(host, &names);
    report.removed_clips = prune_orphan_clips(host);

    #[cfg(feature = "tracing")]
    tracing::info!(
        "remove '{}': {} layers, {} nodes, {} channels, {} clips removed; {} references reverted, {} sync flags restored",
        tag,
        report.removed_layers,
        report.pruned_nodes,
        report.removed_channels.len(),
        report.removed_clips,
        report.reverted_references,
        report.restored_sync_flags
    );

    report
}
