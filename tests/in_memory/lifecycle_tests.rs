//! Registry lifecycle: monitoring cadence, recovery, restart, and removal.

use std::sync::Arc;
use std::time::Duration;

use super::helpers::{
    CALENDAR_BASE, MAIL_BASE, calendar_manifest_json, health_body, mail_manifest_json, probe,
    started_registry, url,
};
use rstest::rstest;
use switchboard::config::RegistryConfig;
use switchboard::registry::{
    adapters::ScriptedHealthProbe, domain::FleetStatus, ports::HealthProbeError,
    services::RegistryError,
};
use tokio::time::Instant;

#[rstest]
#[tokio::test(start_paused = true)]
async fn manifest_interval_sets_the_polling_cadence(probe: Arc<ScriptedHealthProbe>) {
    let health = url(MAIL_BASE, "/health");
    probe.set_response(&health, Ok(health_body("healthy")));
    let registry = started_registry(RegistryConfig::default(), &probe).await;
    let started = Instant::now();
    registry
        .register_manifest_json(&mail_manifest_json(), MAIL_BASE)
        .await
        .expect("mail registration should succeed");
    let mut watcher = registry.watch_agent("mail-agent").await.expect("registered");

    watcher.changed().await.expect("monitor running");
    assert_eq!(started.elapsed(), Duration::from_secs(30));
    watcher.changed().await.expect("monitor running");
    assert_eq!(started.elapsed(), Duration::from_secs(60));

    assert_eq!(probe.call_count(&health), 2);
    registry.stop().await;
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn failing_agent_recovers_and_resets_its_error_count(probe: Arc<ScriptedHealthProbe>) {
    let health = url(MAIL_BASE, "/health");
    probe.push_response(&health, Err(HealthProbeError::UnexpectedStatus(503)));
    probe.push_response(&health, Err(HealthProbeError::UnexpectedStatus(503)));
    probe.set_response(&health, Ok(health_body("healthy")));
    let registry = started_registry(RegistryConfig::default(), &probe).await;
    registry
        .register_manifest_json(&mail_manifest_json(), MAIL_BASE)
        .await
        .expect("mail registration should succeed");
    let mut watcher = registry.watch_agent("mail-agent").await.expect("registered");

    let mut observed = Vec::new();
    for _ in 0..3 {
        watcher.changed().await.expect("monitor running");
        let status = watcher.borrow_and_update().clone();
        observed.push((status.is_healthy(), status.error_count()));
    }

    assert_eq!(observed, [(false, 1), (false, 2), (true, 0)]);
    let current = registry.get_agent("mail-agent").await.expect("registered");
    assert!(current.last_error().is_none());
    registry.stop().await;
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn restarted_registry_accepts_agents_again(probe: Arc<ScriptedHealthProbe>) {
    let registry = started_registry(RegistryConfig::default(), &probe).await;
    registry
        .register_manifest_json(&mail_manifest_json(), MAIL_BASE)
        .await
        .expect("mail registration should succeed");

    assert_eq!(registry.stop().await, 1);
    assert_eq!(
        registry
            .register_manifest_json(&mail_manifest_json(), MAIL_BASE)
            .await
            .map(|status| status.agent_id().to_string()),
        Err(RegistryError::NotRunning)
    );

    registry.start().await;
    let again = registry
        .register_manifest_json(&mail_manifest_json(), MAIL_BASE)
        .await
        .expect("registration after restart should succeed");
    assert_eq!(again.agent_id().as_str(), "mail-agent");
    assert_eq!(registry.list_agents().await.len(), 1);
    registry.stop().await;
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn stop_honours_a_configured_grace_period(probe: Arc<ScriptedHealthProbe>) {
    let config = RegistryConfig::from_json(r#"{"shutdown_grace_secs": 1}"#)
        .expect("valid configuration");
    let registry = started_registry(config, &probe).await;
    registry
        .register_manifest_json(&mail_manifest_json(), MAIL_BASE)
        .await
        .expect("mail registration should succeed");
    registry
        .register_manifest_json(&calendar_manifest_json(), CALENDAR_BASE)
        .await
        .expect("calendar registration should succeed");
    let stopping = Instant::now();

    assert_eq!(registry.stop().await, 2);

    assert!(stopping.elapsed() <= Duration::from_secs(1));
    assert!(!registry.is_running().await);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn unregistering_the_unhealthy_agent_restores_fleet_health(
    probe: Arc<ScriptedHealthProbe>,
) {
    probe.set_response(&url(MAIL_BASE, "/health"), Ok(health_body("healthy")));
    probe.set_response(&url(CALENDAR_BASE, "/health"), Ok(health_body("degraded")));
    let registry = started_registry(RegistryConfig::default(), &probe).await;
    registry
        .register_manifest_json(&mail_manifest_json(), MAIL_BASE)
        .await
        .expect("mail registration should succeed");
    registry
        .register_manifest_json(&calendar_manifest_json(), CALENDAR_BASE)
        .await
        .expect("calendar registration should succeed");
    tokio::time::sleep(Duration::from_secs(61)).await;

    let before = registry.get_system_health().await;
    assert_eq!(before.status, FleetStatus::Degraded);
    assert_eq!(before.unhealthy_agents, 1);

    assert!(registry.unregister_agent("calendar-agent").await);

    let after = registry.get_system_health().await;
    assert_eq!(after.status, FleetStatus::Healthy);
    assert_eq!(after.total_agents, 1);
    assert_eq!(after.total_capabilities, 2);
    registry.stop().await;
}
