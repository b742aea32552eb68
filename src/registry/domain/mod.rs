//! Domain model for the agent registry.
//!
//! Value types validate on construction so that an accepted [`Manifest`]
//! always satisfies its field constraints.

mod capability;
mod dashboard;
mod document;
mod error;
mod health;
mod health_check;
mod ids;
mod info;
mod manifest;
mod registration;
mod scope;
mod status;
mod version;

pub use capability::{Capability, CapabilitySla, CapabilityVerb, SafetyAnnotation};
pub use dashboard::{
    AgentDashboardEntry, CurrentMetrics, Dashboard, FleetPerformance, PerformanceReport,
    PerformanceSummary, SlaCompliance, TrendAnalysis,
};
pub use document::{CapabilityDocument, HealthCheckDocument, ManifestDocument};
pub use error::{ManifestError, PolicyViolation};
pub use health::{FleetStatus, HealthReport, SystemHealth};
pub use health_check::{
    DEFAULT_HEALTH_CHECK_ENDPOINT, DEFAULT_HEALTH_CHECK_INTERVAL_SECS,
    DEFAULT_HEALTH_CHECK_TIMEOUT_SECS, HealthCheckConfig, MAX_HEALTH_CHECK_TIMEOUT_SECS,
    MIN_HEALTH_CHECK_INTERVAL_SECS, MIN_HEALTH_CHECK_TIMEOUT_SECS,
};
pub use ids::AgentId;
pub use info::CapabilityInfo;
pub use manifest::Manifest;
pub use registration::Registration;
pub use scope::DataScope;
pub use status::AgentStatus;
pub use version::ManifestVersion;
