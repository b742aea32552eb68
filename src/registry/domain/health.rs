//! Health reports and fleet-wide summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned by an agent's basic health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Self-reported status, e.g. `healthy`.
    pub status: String,
    /// Agent-side timestamp, kept verbatim.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Free-form details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl HealthReport {
    /// Returns `true` when the status reads `healthy` in any case.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Overall fleet condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FleetStatus {
    /// Every registered agent is healthy.
    Healthy,
    /// At least one agent is unhealthy or flagged.
    Degraded,
}

impl FleetStatus {
    /// Returns the lowercase wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
        }
    }
}

/// Snapshot health counters for the whole registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemHealth {
    /// `degraded` iff `healthy_agents < total_agents`.
    pub status: FleetStatus,
    /// Registered agents.
    pub total_agents: usize,
    /// Agents whose last check succeeded with a healthy report.
    pub healthy_agents: usize,
    /// Remaining agents.
    pub unhealthy_agents: usize,
    /// Agent and capability pairs across the registry.
    pub total_capabilities: usize,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
}
