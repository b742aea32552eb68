//! Capability index used for discovery.

use crate::registry::domain::{AgentId, AgentStatus, CapabilityInfo, CapabilityVerb, Manifest};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Maps each verb to the agents that provide it.
///
/// Verbs iterate in lexicographic order and providers in agent id order.
/// A verb with no providers is removed, so every key maps to a non-empty
/// list.
#[derive(Debug, Clone, Default)]
pub struct CapabilityIndex {
    entries: BTreeMap<CapabilityVerb, Vec<IndexedCapability>>,
}

#[derive(Debug, Clone)]
struct IndexedCapability {
    info: CapabilityInfo,
    manifest: Arc<Manifest>,
}

impl CapabilityIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one entry per capability declared by the agent.
    ///
    /// Re-indexing an agent replaces its previous entry for each verb.
    pub fn index(&mut self, status: &AgentStatus) {
        let manifest = status.shared_manifest();
        for capability in manifest.capabilities() {
            let providers = self.entries.entry(capability.verb().clone()).or_default();
            let entry = IndexedCapability {
                info: CapabilityInfo::from_capability(&manifest, capability),
                manifest: Arc::clone(&manifest),
            };
            let position =
                providers.partition_point(|existing| existing.info.agent_id < *status.agent_id());
            let replaces = providers
                .get(position)
                .is_some_and(|existing| existing.info.agent_id == *status.agent_id());
            if replaces {
                if let Some(slot) = providers.get_mut(position) {
                    *slot = entry;
                }
            } else {
                providers.insert(position, entry);
            }
        }
    }

    /// Removes every entry contributed by `agent_id`.
    ///
    /// Returns the number of entries removed.
    pub fn deindex(&mut self, agent_id: &AgentId) -> usize {
        let mut removed = 0_usize;
        self.entries.retain(|_, providers| {
            let before = providers.len();
            providers.retain(|entry| entry.info.agent_id != *agent_id);
            removed = removed.saturating_add(before.saturating_sub(providers.len()));
            !providers.is_empty()
        });
        removed
    }

    /// Returns the providers of `verb`, optionally restricted to agents that
    /// declare `data_scope`.
    #[must_use]
    pub fn find(&self, verb: &str, data_scope: Option<&str>) -> Vec<CapabilityInfo> {
        self.entries
            .get(verb)
            .map(|providers| {
                providers
                    .iter()
                    .filter(|entry| {
                        data_scope.is_none_or(|scope| entry.manifest.covers_scope(scope))
                    })
                    .map(|entry| entry.info.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns a copy of the whole index.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<CapabilityVerb, Vec<CapabilityInfo>> {
        self.entries
            .iter()
            .map(|(verb, providers)| {
                let infos = providers.iter().map(|entry| entry.info.clone()).collect();
                (verb.clone(), infos)
            })
            .collect()
    }

    /// Returns `true` when `verb` has at least one provider.
    #[must_use]
    pub fn contains(&self, verb: &str) -> bool {
        self.entries.contains_key(verb)
    }

    /// Returns the total number of agent and capability entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns `true` when nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
