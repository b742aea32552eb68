//! Shared builders for registry unit tests.

use crate::registry::domain::{
    AgentId, AgentStatus, Capability, CapabilityVerb, DataScope, Manifest, ManifestVersion,
    Registration,
};
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicI64, Ordering};

pub(super) const MAIL_BASE: &str = "http://127.0.0.1:8101";
pub(super) const CALENDAR_BASE: &str = "http://127.0.0.1:8102";

pub(super) fn capability(verb: &str) -> Capability {
    Capability::new(
        CapabilityVerb::new(verb).expect("valid verb"),
        json!({"type": "object"}),
        json!({"type": "object"}),
    )
}

pub(super) fn manifest(agent_id: &str, verbs: &[&str], scopes: &[&str]) -> Manifest {
    Manifest::new(
        AgentId::new(agent_id).expect("valid agent id"),
        ManifestVersion::new(1, 0, 0),
        verbs.iter().map(|verb| capability(verb)).collect(),
    )
    .expect("valid manifest")
    .with_data_scopes(
        scopes
            .iter()
            .map(|scope| DataScope::new(*scope).expect("valid scope")),
    )
}

pub(super) fn registration(agent_id: &str, verbs: &[&str], scopes: &[&str], base: &str) -> Registration {
    Registration::new(manifest(agent_id, verbs, scopes), base).expect("valid registration")
}

pub(super) fn mail_registration() -> Registration {
    registration("mail-agent", &["messages.search"], &["mail:inbox"], MAIL_BASE)
}

pub(super) fn calendar_registration() -> Registration {
    registration(
        "calendar-agent",
        &["events.list", "messages.search"],
        &["calendar:events"],
        CALENDAR_BASE,
    )
}

pub(super) fn status_for(registration: Registration, healthy: bool) -> AgentStatus {
    let clock = DefaultClock;
    let mut status = AgentStatus::new(registration, &clock);
    if healthy {
        status.record_health_report(true, &clock);
    }
    status
}

pub(super) fn healthy_body() -> Value {
    json!({"status": "healthy", "timestamp": "2026-01-01T00:00:00Z"})
}

pub(super) fn unhealthy_body() -> Value {
    json!({"status": "unhealthy", "timestamp": "2026-01-01T00:00:00Z"})
}

pub(super) fn health_url(base: &str) -> String {
    format!("{base}/health")
}

/// Clock that moves one second forward every time it is read.
pub(super) struct SteppingClock {
    ticks: AtomicI64,
}

impl SteppingClock {
    pub(super) const fn new() -> Self {
        Self {
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        DateTime::UNIX_EPOCH + TimeDelta::seconds(tick)
    }
}
