//! Live status of a registered agent.

use super::{AgentId, Manifest, Registration};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;

/// Registry-side view of one agent.
///
/// Created at registration and afterwards written only by the agent's own
/// health monitor. Every update replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentStatus {
    agent_id: AgentId,
    manifest: Arc<Manifest>,
    health_endpoint: String,
    is_healthy: bool,
    last_health_check: Option<DateTime<Utc>>,
    last_seen: DateTime<Utc>,
    error_count: u32,
    last_error: Option<String>,
    registered_at: DateTime<Utc>,
}

impl AgentStatus {
    /// Creates the initial, not-yet-healthy status for a registration.
    #[must_use]
    pub fn new(registration: Registration, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let (manifest, health_endpoint) = registration.into_parts();
        Self {
            agent_id: manifest.agent_id().clone(),
            manifest: Arc::new(manifest),
            health_endpoint,
            is_healthy: false,
            last_health_check: None,
            last_seen: timestamp,
            error_count: 0,
            last_error: None,
            registered_at: timestamp,
        }
    }

    /// Records a successfully decoded health report.
    pub fn record_health_report(&mut self, healthy: bool, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.is_healthy = healthy;
        self.last_health_check = Some(timestamp);
        self.error_count = 0;
        self.last_error = None;
        self.last_seen = timestamp;
    }

    /// Records a failed health check.
    pub fn record_check_failure(&mut self, message: impl Into<String>, clock: &impl Clock) {
        self.is_healthy = false;
        self.error_count = self.error_count.saturating_add(1);
        self.last_error = Some(message.into());
        self.last_seen = clock.utc();
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    /// Returns the accepted manifest.
    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Returns a shared handle to the accepted manifest.
    #[must_use]
    pub fn shared_manifest(&self) -> Arc<Manifest> {
        Arc::clone(&self.manifest)
    }

    /// Returns the agent base URL.
    #[must_use]
    pub fn health_endpoint(&self) -> &str {
        &self.health_endpoint
    }

    /// Returns the URL polled by the health monitor.
    #[must_use]
    pub fn health_url(&self) -> String {
        self.endpoint_url(self.manifest.health_check().endpoint())
    }

    /// Joins `path` onto the agent base URL.
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.health_endpoint)
    }

    /// Returns whether the last check reported the agent healthy.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.is_healthy
    }

    /// Returns when the last health report was decoded.
    #[must_use]
    pub const fn last_health_check(&self) -> Option<DateTime<Utc>> {
        self.last_health_check
    }

    /// Returns when the monitor last touched this agent.
    #[must_use]
    pub const fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    /// Returns consecutive failures since the last successful report.
    #[must_use]
    pub const fn error_count(&self) -> u32 {
        self.error_count
    }

    /// Returns the most recent failure message.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns when the agent registered.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}
