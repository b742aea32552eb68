//! Shared test helpers for in-memory registry integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};
use switchboard::config::RegistryConfig;
use switchboard::registry::{
    adapters::{AllowlistEgressPolicy, ScriptedHealthProbe},
    services::AgentRegistry,
};

/// Registry type driven by a scripted probe.
pub type TestRegistry = AgentRegistry<AllowlistEgressPolicy, ScriptedHealthProbe, DefaultClock>;

/// Base URL of the mail agent.
pub const MAIL_BASE: &str = "http://127.0.0.1:8101";
/// Base URL of the calendar agent.
pub const CALENDAR_BASE: &str = "http://127.0.0.1:8102";

/// Provides a fresh scripted probe for each test.
#[fixture]
pub fn probe() -> Arc<ScriptedHealthProbe> {
    Arc::new(ScriptedHealthProbe::new())
}

/// Builds a started registry around `probe`.
pub async fn started_registry(config: RegistryConfig, probe: &Arc<ScriptedHealthProbe>) -> TestRegistry {
    let registry = AgentRegistry::new(
        config,
        Arc::new(AllowlistEgressPolicy::local_default()),
        Arc::clone(probe),
        Arc::new(DefaultClock),
    );
    registry.start().await;
    registry
}

/// Returns the manifest document the mail agent ships with.
#[must_use]
pub fn mail_manifest_json() -> String {
    json!({
        "agent_id": "mail-agent",
        "display_name": "Mail Agent",
        "version": "1.2.0",
        "description": "Searches and drafts mail",
        "capabilities": [
            {
                "verb": "messages.search",
                "description": "Search the inbox",
                "input_schema": {"type": "object", "properties": {"query": {"type": "string"}}},
                "output_schema": {"type": "array"},
                "safety_annotations": ["read-only"],
                "sla": {"latency_ms": 500}
            },
            {
                "verb": "messages.draft",
                "safety_annotations": ["write-requires-approval", "pii-sensitive"]
            }
        ],
        "data_scopes": ["mail:inbox", "mail:drafts"],
        "egress_domains": ["localhost"],
        "health_check": {"interval_seconds": 30, "timeout_seconds": 5}
    })
    .to_string()
}

/// Returns the manifest document the calendar agent ships with.
#[must_use]
pub fn calendar_manifest_json() -> String {
    json!({
        "agent_id": "calendar-agent",
        "version": "0.3.1",
        "capabilities": [
            {"verb": "events.list"},
            {"verb": "messages.search"}
        ],
        "data_scopes": ["calendar:events"]
    })
    .to_string()
}

/// Builds a health report body.
#[must_use]
pub fn health_body(status: &str) -> Value {
    json!({"status": status, "timestamp": "2026-01-01T00:00:00Z"})
}

/// Joins a base URL and path.
#[must_use]
pub fn url(base: &str, path: &str) -> String {
    format!("{base}{path}")
}
