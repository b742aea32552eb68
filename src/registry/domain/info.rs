//! Discovery view of a capability.

use super::{AgentId, Capability, CapabilitySla, CapabilityVerb, Manifest, SafetyAnnotation};
use serde::Serialize;
use std::collections::BTreeSet;

/// One provider of one verb, as returned by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityInfo {
    /// Capability verb.
    pub verb: CapabilityVerb,
    /// Providing agent.
    pub agent_id: AgentId,
    /// Display name of the providing agent, or its id.
    pub agent_name: String,
    /// Capability description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared safety annotations.
    pub safety_annotations: BTreeSet<SafetyAnnotation>,
    /// Declared SLA.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla: Option<CapabilitySla>,
}

impl CapabilityInfo {
    /// Derives the discovery entry for `capability` declared in `manifest`.
    #[must_use]
    pub fn from_capability(manifest: &Manifest, capability: &Capability) -> Self {
        Self {
            verb: capability.verb().clone(),
            agent_id: manifest.agent_id().clone(),
            agent_name: manifest.agent_name().to_owned(),
            description: capability.description().map(ToOwned::to_owned),
            safety_annotations: capability.safety_annotations().clone(),
            sla: capability.sla().copied(),
        }
    }
}
