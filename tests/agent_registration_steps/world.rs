//! Shared world state for agent registration BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use serde_json::json;
use switchboard::config::RegistryConfig;
use switchboard::registry::{
    adapters::{AllowlistEgressPolicy, ScriptedHealthProbe},
    domain::{
        AgentId, AgentStatus, Capability, CapabilityVerb, DataScope, Manifest, ManifestVersion,
        Registration,
    },
    services::{AgentRegistry, RegistryResult},
};

/// Registry type used by the BDD world.
pub type TestRegistry = AgentRegistry<AllowlistEgressPolicy, ScriptedHealthProbe, DefaultClock>;

/// Base URL every scenario agent is registered under.
pub const AGENT_BASE: &str = "http://127.0.0.1:8101";

/// Scenario world for agent registration behaviour tests.
pub struct RegistrationWorld {
    /// The registry under test.
    pub registry: TestRegistry,
    /// Scripted probe shared with the registry.
    pub probe: Arc<ScriptedHealthProbe>,
    /// Result of the last registration attempt.
    pub last_register_result: Option<RegistryResult<AgentStatus>>,
}

impl RegistrationWorld {
    /// Creates a world around a stopped registry with the local egress policy.
    #[must_use]
    pub fn new() -> Self {
        let probe = Arc::new(ScriptedHealthProbe::new());
        let registry = AgentRegistry::new(
            RegistryConfig::default(),
            Arc::new(AllowlistEgressPolicy::local_default()),
            Arc::clone(&probe),
            Arc::new(DefaultClock),
        );
        Self {
            registry,
            probe,
            last_register_result: None,
        }
    }
}

impl Default for RegistrationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RegistrationWorld {
    RegistrationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds a single-capability manifest for `agent_id`.
pub fn build_manifest(agent_id: &str, verb: &str) -> Result<Manifest, eyre::Report> {
    let capability = Capability::new(
        CapabilityVerb::new(verb)?,
        json!({"type": "object"}),
        json!({"type": "object"}),
    );
    Ok(Manifest::new(
        AgentId::new(agent_id)?,
        ManifestVersion::new(1, 0, 0),
        vec![capability],
    )?)
}

/// Builds a registration whose manifest covers `scope`.
pub fn build_registration(
    agent_id: &str,
    verb: &str,
    scope: &str,
) -> Result<Registration, eyre::Report> {
    let manifest = build_manifest(agent_id, verb)?.with_data_scopes([DataScope::new(scope)?]);
    Ok(Registration::new(manifest, AGENT_BASE)?)
}
