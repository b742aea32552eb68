//! Authoritative registration map.

use super::{CapabilityIndex, HealthScheduler, ManifestValidator, MonitorHandle};
use crate::registry::{
    domain::{
        AgentId, AgentStatus, CapabilityInfo, CapabilityVerb, ManifestError, PolicyViolation,
        Registration,
    },
    ports::{EgressPolicy, HealthProbe},
};
use futures::future::join_all;
use mockable::Clock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{RwLock, watch};
use tracing::{info, warn};

/// Errors returned by registration operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// An agent with the same identifier is already registered.
    #[error("agent '{0}' is already registered")]
    AlreadyRegistered(AgentId),

    /// The manifest declares an egress domain outside the allowlist.
    #[error(transparent)]
    PolicyViolation(#[from] PolicyViolation),

    /// The manifest failed structural validation.
    #[error("manifest validation failed: {0}")]
    SchemaValidation(#[from] ManifestError),

    /// The registry is stopped and refuses new registrations.
    #[error("agent registry is not running")]
    NotRunning,
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

struct AgentEntry {
    status: watch::Receiver<AgentStatus>,
    monitor: MonitorHandle,
}

struct StoreState {
    accepting: bool,
    agents: HashMap<AgentId, AgentEntry>,
    index: CapabilityIndex,
}

/// Registration map, capability index, and monitor ownership behind one
/// reader-writer lock.
///
/// The lock is never held across network I/O. Monitors write only to
/// their own status channel, so unregistering may await a monitor while
/// holding the write lock.
pub struct RegistrationStore<E, P, C>
where
    E: EgressPolicy,
    P: HealthProbe + 'static,
    C: Clock + Send + Sync + 'static,
{
    state: RwLock<StoreState>,
    validator: ManifestValidator<E>,
    scheduler: HealthScheduler<P, C>,
    clock: Arc<C>,
}

impl<E, P, C> RegistrationStore<E, P, C>
where
    E: EgressPolicy,
    P: HealthProbe + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates an empty store. New stores accept registrations.
    #[must_use]
    pub fn new(
        validator: ManifestValidator<E>,
        scheduler: HealthScheduler<P, C>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            state: RwLock::new(StoreState {
                accepting: true,
                agents: HashMap::new(),
                index: CapabilityIndex::new(),
            }),
            validator,
            scheduler,
            clock,
        }
    }

    /// Returns the store in the stopped state, refusing registrations until
    /// [`Self::open`] is called.
    #[must_use]
    pub fn closed(mut self) -> Self {
        self.state.get_mut().accepting = false;
        self
    }

    /// Registers an agent, indexes its capabilities, and starts its monitor.
    ///
    /// Nothing is mutated when an error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRunning`] while the store is closed,
    /// [`RegistryError::AlreadyRegistered`] for a duplicate identifier, or
    /// [`RegistryError::PolicyViolation`] when an egress domain is rejected.
    pub async fn register(&self, registration: Registration) -> RegistryResult<AgentStatus> {
        let mut state = self.state.write().await;
        if !state.accepting {
            return Err(RegistryError::NotRunning);
        }

        let agent_id = registration.manifest().agent_id().clone();
        if state.agents.contains_key(&agent_id) {
            return Err(RegistryError::AlreadyRegistered(agent_id));
        }
        self.validator.validate(&registration)?;

        let status = AgentStatus::new(registration, &*self.clock);
        let (status_tx, status_rx) = watch::channel(status.clone());
        state.index.index(&status);
        let monitor = self.scheduler.spawn(status_tx);
        state.agents.insert(
            agent_id.clone(),
            AgentEntry {
                status: status_rx,
                monitor,
            },
        );

        info!(
            agent_id = %agent_id,
            version = %status.manifest().version(),
            capabilities = status.manifest().capabilities().len(),
            health_endpoint = status.health_endpoint(),
            "agent registered"
        );
        Ok(status)
    }

    /// Stops the agent's monitor, waits for it to exit, and removes the
    /// agent and its index entries.
    ///
    /// Returns `false` when the agent is unknown.
    pub async fn unregister(&self, agent_id: &str) -> bool {
        let mut state = self.state.write().await;
        let Some(entry) = state.agents.remove(agent_id) else {
            return false;
        };
        let AgentEntry { monitor, .. } = entry;
        let id = monitor.agent_id().clone();
        monitor.cancel().await;
        let removed = state.index.deindex(&id);

        info!(agent_id = %id, capabilities = removed, "agent unregistered");
        true
    }

    /// Returns the current status of one agent.
    pub async fn get(&self, agent_id: &str) -> Option<AgentStatus> {
        let state = self.state.read().await;
        state
            .agents
            .get(agent_id)
            .map(|entry| entry.status.borrow().clone())
    }

    /// Returns every agent's status ordered by identifier.
    pub async fn list(&self) -> Vec<AgentStatus> {
        let state = self.state.read().await;
        let mut statuses: Vec<AgentStatus> = state
            .agents
            .values()
            .map(|entry| entry.status.borrow().clone())
            .collect();
        statuses.sort_by(|left, right| left.agent_id().cmp(right.agent_id()));
        statuses
    }

    /// Returns a change-notification receiver for one agent's status.
    pub async fn watch(&self, agent_id: &str) -> Option<watch::Receiver<AgentStatus>> {
        let state = self.state.read().await;
        state.agents.get(agent_id).map(|entry| entry.status.clone())
    }

    /// Returns the whole capability index.
    pub async fn capabilities(&self) -> BTreeMap<CapabilityVerb, Vec<CapabilityInfo>> {
        self.state.read().await.index.snapshot()
    }

    /// Returns the providers of `verb`, optionally filtered by data scope.
    pub async fn find(&self, verb: &str, data_scope: Option<&str>) -> Vec<CapabilityInfo> {
        self.state.read().await.index.find(verb, data_scope)
    }

    /// Returns the providers of `verb` whose last check was healthy.
    pub async fn find_healthy(&self, verb: &str, data_scope: Option<&str>) -> Vec<CapabilityInfo> {
        let state = self.state.read().await;
        state
            .index
            .find(verb, data_scope)
            .into_iter()
            .filter(|info| {
                state
                    .agents
                    .get(&info.agent_id)
                    .is_some_and(|entry| entry.status.borrow().is_healthy())
            })
            .collect()
    }

    /// Returns `true` while registrations are accepted.
    pub async fn is_accepting(&self) -> bool {
        self.state.read().await.accepting
    }

    /// Starts accepting registrations.
    pub async fn open(&self) {
        self.state.write().await.accepting = true;
    }

    /// Stops accepting registrations, cancels every monitor concurrently,
    /// and clears the store.
    ///
    /// Monitors that have not exited within `grace` are aborted. Returns the
    /// number of agents removed.
    pub async fn shutdown(&self, grace: Duration) -> usize {
        let mut state = self.state.write().await;
        state.accepting = false;
        state.index.clear();
        let monitors: Vec<MonitorHandle> = state
            .agents
            .drain()
            .map(|(_, entry)| entry.monitor)
            .collect();
        let removed = monitors.len();

        let stopped = join_all(
            monitors
                .into_iter()
                .map(|monitor| monitor.cancel_within(grace)),
        )
        .await;
        let aborted = stopped.iter().filter(|clean| !**clean).count();
        if aborted > 0 {
            warn!(aborted, "aborted health monitors that missed the shutdown grace period");
        }
        removed
    }
}
