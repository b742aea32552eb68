//! When steps for agent registration BDD scenarios.

use super::world::{AGENT_BASE, RegistrationWorld, build_manifest, build_registration, run_async};
use rstest_bdd_macros::when;
use switchboard::registry::domain::Registration;

#[when(r#"the agent "{agent}" registers capability "{verb}" for scope "{scope}""#)]
fn agent_registers_capability(
    world: &mut RegistrationWorld,
    agent: String,
    verb: String,
    scope: String,
) -> Result<(), eyre::Report> {
    let registration = build_registration(&agent, &verb, &scope)?;
    world.last_register_result = Some(run_async(world.registry.register_agent(registration)));
    Ok(())
}

#[when(r#"the agent "{agent}" registers with egress domain "{domain}""#)]
fn agent_registers_with_egress(
    world: &mut RegistrationWorld,
    agent: String,
    domain: String,
) -> Result<(), eyre::Report> {
    let manifest = build_manifest(&agent, "messages.search")?.with_egress_domains([domain]);
    let registration = Registration::new(manifest, AGENT_BASE)?;
    world.last_register_result = Some(run_async(world.registry.register_agent(registration)));
    Ok(())
}

#[when(r#"the agent "{agent}" is unregistered"#)]
fn agent_is_unregistered(world: &mut RegistrationWorld, agent: String) -> Result<(), eyre::Report> {
    if !run_async(world.registry.unregister_agent(&agent)) {
        return Err(eyre::eyre!("expected '{agent}' to be registered"));
    }
    Ok(())
}
