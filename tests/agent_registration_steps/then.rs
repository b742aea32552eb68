//! Then steps for agent registration BDD scenarios.

use super::world::{RegistrationWorld, run_async};
use rstest_bdd_macros::then;
use switchboard::registry::{domain::AgentStatus, services::RegistryError};

fn last_result(world: &RegistrationWorld) -> Result<&Result<AgentStatus, RegistryError>, eyre::Report> {
    world
        .last_register_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing registration result in scenario world"))
}

#[then("registration succeeds")]
fn registration_succeeds(world: &RegistrationWorld) -> Result<(), eyre::Report> {
    match last_result(world)? {
        Ok(_) => Ok(()),
        Err(err) => Err(eyre::eyre!("expected registration to succeed, got: {err}")),
    }
}

#[then("registration fails because the agent is already registered")]
fn registration_fails_as_duplicate(world: &RegistrationWorld) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    if !matches!(result, Err(RegistryError::AlreadyRegistered(_))) {
        return Err(eyre::eyre!("expected duplicate agent error, got: {result:?}"));
    }
    Ok(())
}

#[then(r#"registration fails with a policy violation for "{domain}""#)]
fn registration_fails_with_policy_violation(
    world: &RegistrationWorld,
    domain: String,
) -> Result<(), eyre::Report> {
    match last_result(world)? {
        Err(RegistryError::PolicyViolation(violation)) if violation.domain() == domain => Ok(()),
        other => Err(eyre::eyre!(
            "expected policy violation for '{domain}', got: {other:?}"
        )),
    }
}

#[then("registration fails because the registry is not running")]
fn registration_fails_when_stopped(world: &RegistrationWorld) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    if !matches!(result, Err(RegistryError::NotRunning)) {
        return Err(eyre::eyre!("expected not-running error, got: {result:?}"));
    }
    Ok(())
}

#[then(r#"the agent "{agent}" is listed as unhealthy"#)]
fn agent_listed_as_unhealthy(world: &RegistrationWorld, agent: String) -> Result<(), eyre::Report> {
    let status = run_async(world.registry.get_agent(&agent))
        .ok_or_else(|| eyre::eyre!("expected '{agent}' to be registered"))?;
    if status.is_healthy() {
        return Err(eyre::eyre!("'{agent}' should start unhealthy"));
    }
    if world.probe.total_calls() != 0 {
        return Err(eyre::eyre!("no health check should run before the first interval"));
    }
    Ok(())
}

#[then(r#"capability "{verb}" is provided by {count:usize} agents"#)]
fn capability_provided_by_count(
    world: &RegistrationWorld,
    verb: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let providers = run_async(world.registry.find_agents_for_capability(&verb, None));
    if providers.len() != count {
        return Err(eyre::eyre!(
            "expected {count} providers of '{verb}', found {}",
            providers.len()
        ));
    }
    Ok(())
}

#[then(r#"capability "{verb}" in scope "{scope}" is provided by "{agent}""#)]
fn capability_in_scope_provided_by(
    world: &RegistrationWorld,
    verb: String,
    scope: String,
    agent: String,
) -> Result<(), eyre::Report> {
    let providers = run_async(
        world
            .registry
            .find_agents_for_capability(&verb, Some(&scope)),
    );
    let ids: Vec<&str> = providers.iter().map(|info| info.agent_id.as_str()).collect();
    if ids != [agent.as_str()] {
        return Err(eyre::eyre!("expected only '{agent}' for '{verb}' in '{scope}', found {ids:?}"));
    }
    Ok(())
}

#[then(r#"capability "{verb}" is no longer advertised"#)]
fn capability_no_longer_advertised(
    world: &RegistrationWorld,
    verb: String,
) -> Result<(), eyre::Report> {
    let capabilities = run_async(world.registry.get_capabilities());
    if capabilities.contains_key(verb.as_str()) {
        return Err(eyre::eyre!("'{verb}' should have been removed from the index"));
    }
    Ok(())
}

#[then("the registry lists {count:usize} agents")]
fn registry_lists_count(world: &RegistrationWorld, count: usize) -> Result<(), eyre::Report> {
    let agents = run_async(world.registry.list_agents());
    if agents.len() != count {
        return Err(eyre::eyre!("expected {count} agents, found {}", agents.len()));
    }
    Ok(())
}
