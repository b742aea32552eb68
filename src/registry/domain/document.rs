//! Raw manifest documents as submitted by agents.
//!
//! These types mirror the JSON wire shape and carry no validation. Convert
//! them with [`super::Manifest::from_document`].

use super::health_check::{
    DEFAULT_HEALTH_CHECK_ENDPOINT, DEFAULT_HEALTH_CHECK_INTERVAL_SECS,
    DEFAULT_HEALTH_CHECK_TIMEOUT_SECS,
};
use super::CapabilitySla;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unvalidated manifest as decoded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDocument {
    /// Requested agent identifier.
    pub agent_id: String,
    /// Version string, expected as `X.Y.Z`.
    pub version: String,
    /// Optional human-readable name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Declared capabilities, in manifest order.
    #[serde(default)]
    pub capabilities: Vec<CapabilityDocument>,
    /// Data scope tags.
    #[serde(default)]
    pub data_scopes: Vec<String>,
    /// Tools the agent may use.
    #[serde(default)]
    pub tool_access: Vec<String>,
    /// External destinations the agent may contact.
    #[serde(default)]
    pub egress_domains: Vec<String>,
    /// Optional health check settings.
    #[serde(default)]
    pub health_check: Option<HealthCheckDocument>,
    /// Opaque metadata.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Unvalidated capability declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDocument {
    /// Capability verb, expected as `namespace.action`.
    pub verb: String,
    /// Opaque input schema.
    #[serde(default = "empty_schema")]
    pub input_schema: Value,
    /// Opaque output schema.
    #[serde(default = "empty_schema")]
    pub output_schema: Value,
    /// Safety annotation names.
    #[serde(default = "default_safety_annotations")]
    pub safety_annotations: Vec<String>,
    /// Optional declared SLA.
    #[serde(default)]
    pub sla: Option<CapabilitySla>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Example invocations.
    #[serde(default)]
    pub examples: Vec<Value>,
}

/// Unvalidated health check settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckDocument {
    /// Path polled on the agent.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Polling interval in seconds.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn empty_schema() -> Value {
    Value::Object(Map::new())
}

fn default_safety_annotations() -> Vec<String> {
    vec!["read-only".to_owned()]
}

fn default_endpoint() -> String {
    DEFAULT_HEALTH_CHECK_ENDPOINT.to_owned()
}

const fn default_interval() -> u64 {
    DEFAULT_HEALTH_CHECK_INTERVAL_SECS
}

const fn default_timeout() -> u64 {
    DEFAULT_HEALTH_CHECK_TIMEOUT_SECS
}
