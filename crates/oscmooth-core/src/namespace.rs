//! Per-compilation channel registry.
//!
//! [`ChannelNamespace`] tracks which channel names are taken for the
//! duration of one compilation. It starts from a snapshot of the host's
//! channels, batches every new channel, and writes them all at once in
//! [`apply`](ChannelNamespace::apply). Nothing touches the host before that.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::cost::ChannelKind;
use crate::error::CompileError;
use crate::graph::{Channel, ChannelRef, HostGraph};
use crate::naming::Names;
use crate::obfuscate::obfuscate;

/// How a channel request is resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelOptions {
    /// Reuse an existing channel of the same name instead of failing.
    pub check_existing: bool,
    /// Obfuscate the name before registering it.
    pub obfuscate: bool,
    /// Default value of a newly created channel.
    pub default: f32,
    /// Whether a newly created channel is synced to remote observers.
    pub synced: bool,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            check_existing: true,
            obfuscate: false,
            default: 0.0,
            synced: false,
        }
    }
}

impl ChannelOptions {
    /// Reuse-if-present, unsynced, zero default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether existing channels are reused.
    pub fn check_existing(mut self, check: bool) -> Self {
        self.check_existing = check;
        self
    }

    /// Sets whether the name is obfuscated.
    pub fn obfuscate(mut self, obfuscate: bool) -> Self {
        self.obfuscate = obfuscate;
        self
    }

    /// Sets the default value.
    pub fn default_value(mut self, default: f32) -> Self {
        self.default = default;
        self
    }

    /// Sets the synced flag.
    pub fn synced(mut self, synced: bool) -> Self {
        self.synced = synced;
        self
    }
}

/// Channel registry scoped to one compilation.
#[derive(Debug, Default)]
pub struct ChannelNamespace {
    taken: HashSet<String>,
    created: Vec<Channel>,
    reused: BTreeSet<String>,
    sync_updates: BTreeMap<String, bool>,
}

impl ChannelNamespace {
    /// Snapshots the channel names of `host`.
    pub fn from_host(host: &HostGraph) -> Self {
        Self {
            taken: host.channels().iter().map(|c| c.name.clone()).collect(),
            ..Self::default()
        }
    }

    /// Returns true if `name` is taken in the host or by a pending channel.
    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Requests a channel.
    ///
    /// With `check_existing`, a taken name resolves to the existing channel,
    /// so repeated compilations never duplicate channels. Without it, a taken
    /// name is a [`CompileError::DuplicateChannel`]. The obfuscated name is
    /// the one registered and returned when `obfuscate` is set.
    pub fn create_channel(
        &mut self,
        name: &str,
        kind: ChannelKind,
        options: ChannelOptions,
    ) -> Result<ChannelRef, CompileError> {
        let name = if options.obfuscate {
            obfuscate(name)
        } else {
            name.to_string()
        };

        if self.taken.contains(&name) {
            if !options.check_existing {
                return Err(CompileError::DuplicateChannel(name));
            }
            if !self.created.iter().any(|c| c.name == name) {
                self.reused.insert(name.clone());
            }
            return Ok(ChannelRef::new(name));
        }

        self.taken.insert(name.clone());
        self.created.push(
            Channel::new(name.clone(), kind)
                .with_default(options.default)
                .with_synced(options.synced),
        );
        Ok(ChannelRef::new(name))
    }

    /// Forces the synced flag of a channel, pending or existing.
    pub fn set_synced(&mut self, name: &str, synced: bool) {
        if let Some(channel) = self.created.iter_mut().find(|c| c.name == name) {
            channel.synced = synced;
        } else {
            self.sync_updates.insert(name.to_string(), synced);
        }
    }

    /// Returns true if this compilation requested `name`, new or reused.
    pub fn is_requested(&self, name: &str) -> bool {
        self.reused.contains(name) || self.created.iter().any(|c| c.name == name)
    }

    /// Channels that will be created on apply.
    pub fn created(&self) -> &[Channel] {
        &self.created
    }

    /// Existing host channels that were requested and reused.
    pub fn reused(&self) -> impl Iterator<Item = &str> {
        self.reused.iter().map(String::as_str)
    }

    /// Writes pending channels and sync updates into `host`.
    ///
    /// A sync update that flips the flag of a user channel records the
    /// original flag under the tag of `names`, so removal can restore it.
    pub fn apply(self, host: &mut HostGraph, names: &Names) {
        for (name, synced) in self.sync_updates {
            let Some(current) = host.channel(&name).map(|c| c.synced) else {
                continue;
            };
            if current == synced {
                continue;
            }
            if !names.is_generated_channel(&name) {
                host.record_sync_override(names.root(), &name, current);
            }
            if let Some(channel) = host.channel_mut(&name) {
                channel.synced = synced;
            }
        }
        for channel in self.created {
            #[cfg(feature = "tracing")]
            tracing::debug!("namespace: create {} channel '{}'", channel.kind, channel.name);
            host.add_channel(channel);
        }
    }
}
