//! Fleet-wide health aggregation.
//!
//! SLA and trend flags are taken verbatim from each agent's self-report;
//! the registry does not verify them.

use crate::registry::{
    domain::{
        AgentDashboardEntry, AgentId, AgentStatus, Dashboard, FleetPerformance, FleetStatus,
        HealthReport, PerformanceReport, SystemHealth,
    },
    ports::{HealthProbe, HealthProbeError},
};
use futures::future::join_all;
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Fleet success rate below which a recommendation is raised.
pub const SUCCESS_RATE_TARGET_PERCENT: f64 = 95.0;

/// Builds system health summaries and the enhanced dashboard.
#[derive(Debug)]
pub struct HealthAggregator<P, C>
where
    P: HealthProbe,
    C: Clock + Send + Sync,
{
    probe: Arc<P>,
    clock: Arc<C>,
    performance_path: String,
}

impl<P, C> HealthAggregator<P, C>
where
    P: HealthProbe,
    C: Clock + Send + Sync,
{
    /// Creates an aggregator that reads extended metrics from
    /// `performance_path` on each agent.
    #[must_use]
    pub fn new(probe: Arc<P>, clock: Arc<C>, performance_path: impl Into<String>) -> Self {
        Self {
            probe,
            clock,
            performance_path: performance_path.into(),
        }
    }

    /// Summarises a registry snapshot.
    #[must_use]
    pub fn system_health(&self, agents: &[AgentStatus]) -> SystemHealth {
        let total_agents = agents.len();
        let healthy_agents = agents.iter().filter(|agent| agent.is_healthy()).count();
        let total_capabilities = agents
            .iter()
            .map(|agent| agent.manifest().capabilities().len())
            .sum();

        SystemHealth {
            status: if healthy_agents < total_agents {
                FleetStatus::Degraded
            } else {
                FleetStatus::Healthy
            },
            total_agents,
            healthy_agents,
            unhealthy_agents: total_agents.saturating_sub(healthy_agents),
            total_capabilities,
            timestamp: self.clock.utc(),
        }
    }

    /// Queries every agent concurrently and assembles the dashboard.
    ///
    /// A failing agent is recorded as [`AgentDashboardEntry::Unavailable`]
    /// and never affects the entries of other agents.
    pub async fn enhanced_dashboard(&self, agents: &[AgentStatus]) -> Dashboard {
        let system = self.system_health(agents);
        let fetched = join_all(agents.iter().map(|agent| async move {
            (agent.agent_id().clone(), self.fetch_entry(agent).await)
        }))
        .await;
        let entries: BTreeMap<AgentId, AgentDashboardEntry> = fetched.into_iter().collect();

        let flagged = |predicate: fn(&AgentDashboardEntry) -> bool| -> Vec<AgentId> {
            entries
                .iter()
                .filter(|(_, entry)| predicate(entry))
                .map(|(agent_id, _)| agent_id.clone())
                .collect()
        };
        let sla_violations = flagged(|entry| {
            entry
                .performance_summary()
                .is_some_and(|summary| summary.violates_sla())
        });
        let degrading_agents = flagged(|entry| {
            entry
                .performance_summary()
                .is_some_and(|summary| summary.is_degrading())
        });
        let unreachable_agents = flagged(|entry| entry.error().is_some());
        let unhealthy_agents = agents
            .iter()
            .filter(|agent| !agent.is_healthy())
            .map(|agent| agent.agent_id().clone())
            .collect();

        let status = if sla_violations.is_empty() && degrading_agents.is_empty() {
            system.status
        } else {
            FleetStatus::Degraded
        };

        let mut dashboard = Dashboard {
            status,
            timestamp: self.clock.utc(),
            system,
            fleet: fleet_performance(entries.values()),
            sla_violations,
            degrading_agents,
            unhealthy_agents,
            unreachable_agents,
            agents: entries,
            recommendations: Vec::new(),
        };
        dashboard.recommendations = recommendations(&dashboard);
        dashboard
    }

    async fn fetch_entry(&self, agent: &AgentStatus) -> AgentDashboardEntry {
        let timeout = agent.manifest().health_check().timeout();
        let url = agent.endpoint_url(&self.performance_path);
        match self.probe.fetch_json(&url, timeout).await {
            Ok(body) => match serde_json::from_value::<PerformanceReport>(body) {
                Ok(report) => AgentDashboardEntry::Performance {
                    is_healthy: agent.is_healthy(),
                    performance_summary: report.performance_summary,
                },
                Err(err) => unavailable(agent, &HealthProbeError::MalformedBody(err.to_string())),
            },
            Err(err) if err.is_not_found() => self.basic_entry(agent, timeout).await,
            Err(err) => unavailable(agent, &err),
        }
    }

    async fn basic_entry(&self, agent: &AgentStatus, timeout: Duration) -> AgentDashboardEntry {
        let fetched = self
            .probe
            .fetch_json(&agent.health_url(), timeout)
            .await
            .and_then(|body| {
                serde_json::from_value::<HealthReport>(body)
                    .map_err(|err| HealthProbeError::MalformedBody(err.to_string()))
            });
        match fetched {
            Ok(health) => AgentDashboardEntry::Basic {
                is_healthy: agent.is_healthy(),
                health,
            },
            Err(err) => unavailable(agent, &err),
        }
    }
}

fn unavailable(agent: &AgentStatus, err: &HealthProbeError) -> AgentDashboardEntry {
    debug!(agent_id = %agent.agent_id(), error = %err, "dashboard enrichment failed");
    AgentDashboardEntry::Unavailable {
        error: err.to_string(),
    }
}

fn fleet_performance<'a>(
    entries: impl Iterator<Item = &'a AgentDashboardEntry>,
) -> FleetPerformance {
    let mut response_times = Vec::new();
    let mut success_rates = Vec::new();
    let mut total_error_count = 0_u64;
    let mut reporting_agents = 0_usize;

    for metrics in entries
        .filter_map(AgentDashboardEntry::performance_summary)
        .filter_map(|summary| summary.current_metrics)
    {
        reporting_agents = reporting_agents.saturating_add(1);
        response_times.extend(metrics.response_time_ms);
        success_rates.extend(metrics.success_rate_percent);
        total_error_count = total_error_count.saturating_add(metrics.error_count.unwrap_or(0));
    }

    FleetPerformance {
        average_response_time_ms: mean(&response_times),
        average_success_rate_percent: mean(&success_rates),
        total_error_count,
        reporting_agents,
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "fleet averages are means over self-reported floating-point metrics"
)]
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let count = u32::try_from(values.len()).ok().map(f64::from)?;
    Some(values.iter().sum::<f64>() / count)
}

/// Derives ordered advisory messages from a dashboard.
///
/// Order: SLA violations, degrading trends, unhealthy agents, unreachable
/// agents, low fleet success rate. A single all-clear message is returned
/// when nothing applies.
#[must_use]
pub fn recommendations(dashboard: &Dashboard) -> Vec<String> {
    let mut advice = Vec::new();

    if !dashboard.sla_violations.is_empty() {
        advice.push(format!(
            "{} agent(s) violating SLA targets: {}; review capacity and latency budgets",
            dashboard.sla_violations.len(),
            join_ids(&dashboard.sla_violations)
        ));
    }
    if !dashboard.degrading_agents.is_empty() {
        advice.push(format!(
            "{} agent(s) reporting degrading performance trends: {}; investigate before SLAs are breached",
            dashboard.degrading_agents.len(),
            join_ids(&dashboard.degrading_agents)
        ));
    }
    if !dashboard.unhealthy_agents.is_empty() {
        advice.push(format!(
            "{} agent(s) failing health checks: {}; check agent logs and restart if needed",
            dashboard.unhealthy_agents.len(),
            join_ids(&dashboard.unhealthy_agents)
        ));
    }
    if !dashboard.unreachable_agents.is_empty() {
        advice.push(format!(
            "{} agent(s) unreachable for performance reporting: {}",
            dashboard.unreachable_agents.len(),
            join_ids(&dashboard.unreachable_agents)
        ));
    }
    if let Some(rate) = dashboard.fleet.average_success_rate_percent
        && rate < SUCCESS_RATE_TARGET_PERCENT
    {
        advice.push(format!(
            "fleet success rate {rate:.1}% is below the {SUCCESS_RATE_TARGET_PERCENT:.0}% target"
        ));
    }

    if advice.is_empty() {
        advice.push("all agents healthy and within SLA targets".to_owned());
    }
    advice
}

fn join_ids(agent_ids: &[AgentId]) -> String {
    agent_ids
        .iter()
        .map(AgentId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
