//! Enhanced fleet dashboard and the performance payloads it is built from.

use super::{AgentId, FleetStatus, HealthReport, SystemHealth};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body returned by an agent's extended performance endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Self-reported performance summary.
    pub performance_summary: PerformanceSummary,
}

/// Self-reported performance summary. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Current request metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_metrics: Option<CurrentMetrics>,
    /// SLA compliance flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla_compliance: Option<SlaCompliance>,
    /// Trend analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_analysis: Option<TrendAnalysis>,
}

impl PerformanceSummary {
    /// Returns `true` when the agent reports itself out of SLA.
    #[must_use]
    pub fn violates_sla(&self) -> bool {
        self.sla_compliance
            .as_ref()
            .is_some_and(|compliance| compliance.overall_compliant == Some(false))
    }

    /// Returns `true` when the agent reports a degrading trend.
    #[must_use]
    pub fn is_degrading(&self) -> bool {
        self.trend_analysis
            .as_ref()
            .and_then(|analysis| analysis.trend.as_deref())
            .is_some_and(|trend| trend.eq_ignore_ascii_case("degrading"))
    }
}

/// Current request metrics reported by an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentMetrics {
    /// Mean response time in milliseconds.
    #[serde(default)]
    pub response_time_ms: Option<f64>,
    /// Success rate as a percentage.
    #[serde(default)]
    pub success_rate_percent: Option<f64>,
    /// Errors counted by the agent.
    #[serde(default)]
    pub error_count: Option<u64>,
}

/// SLA compliance flags reported by an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaCompliance {
    /// `false` when any declared SLA is being missed.
    #[serde(default)]
    pub overall_compliant: Option<bool>,
}

/// Trend analysis reported by an agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    /// Trend label, e.g. `stable` or `degrading`.
    #[serde(default)]
    pub trend: Option<String>,
}

/// Per-agent dashboard entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AgentDashboardEntry {
    /// The agent served its extended performance endpoint.
    Performance {
        /// Registry view of the agent's health.
        is_healthy: bool,
        /// Self-reported performance summary.
        performance_summary: PerformanceSummary,
    },
    /// The agent has no extended endpoint; its basic report is shown instead.
    Basic {
        /// Registry view of the agent's health.
        is_healthy: bool,
        /// Basic health report.
        health: HealthReport,
    },
    /// The agent could not be reached.
    Unavailable {
        /// Failure message.
        error: String,
    },
}

impl AgentDashboardEntry {
    /// Returns the failure message for unreachable agents.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Unavailable { error } => Some(error),
            Self::Performance { .. } | Self::Basic { .. } => None,
        }
    }

    /// Returns the performance summary when one was reported.
    #[must_use]
    pub const fn performance_summary(&self) -> Option<&PerformanceSummary> {
        match self {
            Self::Performance {
                performance_summary,
                ..
            } => Some(performance_summary),
            Self::Basic { .. } | Self::Unavailable { .. } => None,
        }
    }
}

/// Fleet-wide averages over agents that reported metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FleetPerformance {
    /// Mean of reported response times.
    pub average_response_time_ms: Option<f64>,
    /// Mean of reported success rates.
    pub average_success_rate_percent: Option<f64>,
    /// Sum of reported error counts.
    pub total_error_count: u64,
    /// Agents that reported current metrics.
    pub reporting_agents: usize,
}

/// Enhanced health dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// `degraded` when any agent is flagged, else the system health status.
    pub status: FleetStatus,
    /// When the dashboard was assembled.
    pub timestamp: DateTime<Utc>,
    /// Snapshot counters.
    pub system: SystemHealth,
    /// Aggregated performance.
    pub fleet: FleetPerformance,
    /// Agents reporting an SLA violation.
    pub sla_violations: Vec<AgentId>,
    /// Agents reporting a degrading trend.
    pub degrading_agents: Vec<AgentId>,
    /// Agents the registry currently considers unhealthy.
    pub unhealthy_agents: Vec<AgentId>,
    /// Agents whose endpoints could not be reached.
    pub unreachable_agents: Vec<AgentId>,
    /// Per-agent entries.
    pub agents: BTreeMap<AgentId, AgentDashboardEntry>,
    /// Advisory messages.
    pub recommendations: Vec<String>,
}
