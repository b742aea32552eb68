//! Public entry point of the agent registry.

use super::{
    HealthAggregator, HealthScheduler, ManifestValidator, RegistrationStore, RegistryResult,
};
use crate::config::RegistryConfig;
use crate::registry::{
    adapters::{AllowlistEgressPolicy, HttpHealthProbe},
    domain::{
        AgentStatus, CapabilityInfo, CapabilityVerb, Dashboard, Manifest, Registration,
        SystemHealth,
    },
    ports::{EgressPolicy, HealthProbe, HealthProbeResult},
};
use mockable::{Clock, DefaultClock};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Registry wired with the local allowlist, `reqwest`, and the system clock.
pub type LocalAgentRegistry = AgentRegistry<AllowlistEgressPolicy, HttpHealthProbe, DefaultClock>;

/// Agent registration, discovery, and fleet health.
///
/// A registry is constructed stopped. Call [`Self::start`] before
/// registering agents and [`Self::stop`] to cancel every health monitor.
/// Share it by reference or [`Arc`]; there is no global instance.
pub struct AgentRegistry<E, P, C>
where
    E: EgressPolicy,
    P: HealthProbe + 'static,
    C: Clock + Send + Sync + 'static,
{
    config: RegistryConfig,
    store: RegistrationStore<E, P, C>,
    aggregator: HealthAggregator<P, C>,
}

impl<E, P, C> AgentRegistry<E, P, C>
where
    E: EgressPolicy,
    P: HealthProbe + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a stopped registry.
    #[must_use]
    pub fn new(config: RegistryConfig, policy: Arc<E>, probe: Arc<P>, clock: Arc<C>) -> Self {
        let scheduler =
            HealthScheduler::new(Arc::clone(&probe), Arc::clone(&clock), config.error_backoff());
        let aggregator =
            HealthAggregator::new(probe, Arc::clone(&clock), config.performance_path.clone());
        let store =
            RegistrationStore::new(ManifestValidator::new(policy), scheduler, clock).closed();
        Self {
            config,
            store,
            aggregator,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Starts accepting registrations.
    pub async fn start(&self) {
        self.store.open().await;
        info!("agent registry started");
    }

    /// Stops accepting registrations and cancels every health monitor,
    /// waiting at most the configured shutdown grace for each.
    ///
    /// Returns the number of agents removed.
    pub async fn stop(&self) -> usize {
        let removed = self.store.shutdown(self.config.shutdown_grace()).await;
        info!(agents = removed, "agent registry stopped");
        removed
    }

    /// Returns `true` between [`Self::start`] and [`Self::stop`].
    pub async fn is_running(&self) -> bool {
        self.store.is_accepting().await
    }

    /// Registers an agent and starts monitoring it.
    ///
    /// # Errors
    ///
    /// Returns [`super::RegistryError::AlreadyRegistered`],
    /// [`super::RegistryError::PolicyViolation`], or
    /// [`super::RegistryError::NotRunning`].
    pub async fn register_agent(&self, registration: Registration) -> RegistryResult<AgentStatus> {
        self.store.register(registration).await
    }

    /// Decodes a JSON manifest and registers it in one call.
    ///
    /// # Errors
    ///
    /// Returns [`super::RegistryError::SchemaValidation`] when the manifest
    /// or base URL is invalid, or any error from [`Self::register_agent`].
    pub async fn register_manifest_json(
        &self,
        manifest_json: &str,
        health_endpoint: &str,
    ) -> RegistryResult<AgentStatus> {
        let manifest = Manifest::from_json(manifest_json)?;
        let registration = Registration::new(manifest, health_endpoint)?;
        self.register_agent(registration).await
    }

    /// Removes an agent after its monitor has stopped.
    ///
    /// Returns `false` when the agent is unknown.
    pub async fn unregister_agent(&self, agent_id: &str) -> bool {
        self.store.unregister(agent_id).await
    }

    /// Returns one agent's current status.
    pub async fn get_agent(&self, agent_id: &str) -> Option<AgentStatus> {
        self.store.get(agent_id).await
    }

    /// Returns every agent ordered by identifier.
    pub async fn list_agents(&self) -> Vec<AgentStatus> {
        self.store.list().await
    }

    /// Returns the capability index keyed by verb.
    pub async fn get_capabilities(&self) -> BTreeMap<CapabilityVerb, Vec<CapabilityInfo>> {
        self.store.capabilities().await
    }

    /// Returns the providers of `verb`, optionally filtered by data scope.
    pub async fn find_agents_for_capability(
        &self,
        verb: &str,
        data_scope: Option<&str>,
    ) -> Vec<CapabilityInfo> {
        self.store.find(verb, data_scope).await
    }

    /// Returns the providers of `verb` that are currently healthy.
    pub async fn find_healthy_agents_for_capability(
        &self,
        verb: &str,
        data_scope: Option<&str>,
    ) -> Vec<CapabilityInfo> {
        self.store.find_healthy(verb, data_scope).await
    }

    /// Returns a change-notification receiver for one agent's status.
    pub async fn watch_agent(&self, agent_id: &str) -> Option<watch::Receiver<AgentStatus>> {
        self.store.watch(agent_id).await
    }

    /// Summarises current fleet health.
    pub async fn get_system_health(&self) -> SystemHealth {
        let agents = self.store.list().await;
        self.aggregator.system_health(&agents)
    }

    /// Builds the enhanced dashboard. Agents are queried after the snapshot
    /// is taken, outside the registry lock.
    pub async fn get_enhanced_health_dashboard(&self) -> Dashboard {
        let agents = self.store.list().await;
        self.aggregator.enhanced_dashboard(&agents).await
    }
}

impl LocalAgentRegistry {
    /// Creates a stopped registry using the local egress allowlist, an HTTP
    /// probe, and the system clock.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the HTTP client cannot be built.
    pub fn local(config: RegistryConfig) -> HealthProbeResult<Self> {
        let probe = HttpHealthProbe::new(&config.user_agent)?;
        Ok(Self::new(
            config,
            Arc::new(AllowlistEgressPolicy::local_default()),
            Arc::new(probe),
            Arc::new(DefaultClock),
        ))
    }
}
