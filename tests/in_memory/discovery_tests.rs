//! Manifest decoding, capability discovery, and the enhanced dashboard.

use std::sync::Arc;

use super::helpers::{
    CALENDAR_BASE, MAIL_BASE, calendar_manifest_json, health_body, mail_manifest_json, probe,
    started_registry, url,
};
use rstest::rstest;
use serde_json::json;
use switchboard::config::RegistryConfig;
use switchboard::registry::{
    adapters::ScriptedHealthProbe,
    domain::{AgentDashboardEntry, FleetStatus, PolicyViolation, SafetyAnnotation},
    ports::HealthProbeError,
    services::RegistryError,
};

#[rstest]
#[tokio::test(start_paused = true)]
async fn manifest_document_details_reach_discovery(probe: Arc<ScriptedHealthProbe>) {
    let registry = started_registry(RegistryConfig::default(), &probe).await;
    registry
        .register_manifest_json(&mail_manifest_json(), MAIL_BASE)
        .await
        .expect("mail registration should succeed");

    let drafts = registry
        .find_agents_for_capability("messages.draft", Some("mail:drafts"))
        .await;
    let search = registry
        .find_agents_for_capability("messages.search", None)
        .await;

    let draft = drafts.first().expect("one draft provider");
    assert_eq!(draft.agent_name, "Mail Agent");
    assert!(
        draft
            .safety_annotations
            .contains(&SafetyAnnotation::WriteRequiresApproval)
    );
    let searcher = search.first().expect("one search provider");
    assert_eq!(searcher.description.as_deref(), Some("Search the inbox"));
    assert_eq!(searcher.sla.as_ref().and_then(|sla| sla.latency_ms), Some(500));
    registry.stop().await;
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn shared_verbs_list_every_provider(probe: Arc<ScriptedHealthProbe>) {
    let registry = started_registry(RegistryConfig::default(), &probe).await;
    registry
        .register_manifest_json(&mail_manifest_json(), MAIL_BASE)
        .await
        .expect("mail registration should succeed");
    registry
        .register_manifest_json(&calendar_manifest_json(), CALENDAR_BASE)
        .await
        .expect("calendar registration should succeed");

    let capabilities = registry.get_capabilities().await;
    let verbs: Vec<&str> = capabilities.keys().map(|verb| verb.as_str()).collect();
    let providers: Vec<String> = capabilities
        .get("messages.search")
        .map(|infos| infos.iter().map(|info| info.agent_id.to_string()).collect())
        .unwrap_or_default();

    assert_eq!(verbs, ["events.list", "messages.draft", "messages.search"]);
    assert_eq!(providers, ["calendar-agent", "mail-agent"]);
    assert!(
        registry
            .find_agents_for_capability("messages.search", Some("calendar:events"))
            .await
            .iter()
            .all(|info| info.agent_id.as_str() == "calendar-agent")
    );
    registry.stop().await;
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn manifest_with_remote_egress_is_rejected(probe: Arc<ScriptedHealthProbe>) {
    let registry = started_registry(RegistryConfig::default(), &probe).await;
    let manifest = json!({
        "agent_id": "web-agent",
        "version": "1.0.0",
        "capabilities": [{"verb": "pages.fetch"}],
        "egress_domains": ["nas.local", "api.example.com"]
    })
    .to_string();

    let rejected = registry
        .register_manifest_json(&manifest, "http://127.0.0.1:8103")
        .await;

    assert_eq!(
        rejected.map(|status| status.agent_id().to_string()),
        Err(RegistryError::PolicyViolation(PolicyViolation::new(
            "api.example.com"
        )))
    );
    assert!(registry.find_agents_for_capability("pages.fetch", None).await.is_empty());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn dashboard_uses_the_configured_performance_path(probe: Arc<ScriptedHealthProbe>) {
    let config = RegistryConfig::from_json(r#"{"performance_path": "/metrics"}"#)
        .expect("valid configuration");
    probe.set_response(
        &url(MAIL_BASE, "/metrics"),
        Ok(json!({
            "performance_summary": {
                "current_metrics": {
                    "response_time_ms": 42.0,
                    "success_rate_percent": 99.0,
                    "error_count": 0
                },
                "sla_compliance": {"overall_compliant": true},
                "trend_analysis": {"trend": "stable"}
            }
        })),
    );
    probe.set_response(
        &url(CALENDAR_BASE, "/metrics"),
        Err(HealthProbeError::UnexpectedStatus(404)),
    );
    probe.set_response(&url(CALENDAR_BASE, "/health"), Ok(health_body("healthy")));
    probe.set_response(&url(MAIL_BASE, "/health"), Ok(health_body("healthy")));
    let registry = started_registry(config, &probe).await;
    registry
        .register_manifest_json(&mail_manifest_json(), MAIL_BASE)
        .await
        .expect("mail registration should succeed");
    registry
        .register_manifest_json(&calendar_manifest_json(), CALENDAR_BASE)
        .await
        .expect("calendar registration should succeed");

    let dashboard = registry.get_enhanced_health_dashboard().await;

    assert!(matches!(
        dashboard.agents.get("mail-agent"),
        Some(AgentDashboardEntry::Performance { .. })
    ));
    assert!(matches!(
        dashboard.agents.get("calendar-agent"),
        Some(AgentDashboardEntry::Basic { .. })
    ));
    assert_eq!(dashboard.fleet.reporting_agents, 1);
    assert_eq!(dashboard.fleet.average_response_time_ms, Some(42.0));
    assert_eq!(dashboard.system.total_agents, 2);
    assert_eq!(dashboard.system.status, FleetStatus::Degraded);
    assert_eq!(dashboard.unhealthy_agents.len(), 2);
    registry.stop().await;
}
