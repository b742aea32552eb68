//! Registry runtime configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default pause after a monitor iteration panics.
pub const DEFAULT_ERROR_BACKOFF_SECS: u64 = 30;
/// Default time allowed for monitors to stop during shutdown.
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;
/// Default extended performance path queried by the dashboard.
pub const DEFAULT_PERFORMANCE_PATH: &str = "/health/enhanced";

/// Tunables for an [`crate::registry::services::AgentRegistry`].
///
/// Missing keys in a JSON document fall back to the defaults.
///
/// # Examples
///
/// ```
/// use switchboard::config::RegistryConfig;
///
/// let config = RegistryConfig::default();
/// assert_eq!(config.error_backoff_secs, 30);
///
/// let tuned = RegistryConfig::from_json(r#"{"shutdown_grace_secs": 2}"#)
///     .expect("valid configuration");
/// assert_eq!(tuned.shutdown_grace_secs, 2);
/// assert_eq!(tuned.performance_path, "/health/enhanced");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Seconds a monitor pauses after an iteration panics.
    pub error_backoff_secs: u64,
    /// Seconds allowed for monitors to stop when the registry stops.
    pub shutdown_grace_secs: u64,
    /// Path appended to an agent's base URL for extended metrics.
    pub performance_path: String,
    /// `User-Agent` header sent with health probes.
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            error_backoff_secs: DEFAULT_ERROR_BACKOFF_SECS,
            shutdown_grace_secs: DEFAULT_SHUTDOWN_GRACE_SECS,
            performance_path: DEFAULT_PERFORMANCE_PATH.to_owned(),
            user_agent: concat!("switchboard/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl RegistryConfig {
    /// Decodes a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns the decoding error when the document is not valid JSON or a
    /// field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns the monitor error backoff.
    #[must_use]
    pub const fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }

    /// Returns the shutdown grace period.
    #[must_use]
    pub const fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}
