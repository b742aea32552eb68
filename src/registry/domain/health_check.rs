//! Per-agent health check settings.

use super::ManifestError;
use serde::Serialize;
use std::time::Duration;

/// Default path polled on the agent.
pub const DEFAULT_HEALTH_CHECK_ENDPOINT: &str = "/health";
/// Default polling interval.
pub const DEFAULT_HEALTH_CHECK_INTERVAL_SECS: u64 = 60;
/// Smallest accepted polling interval.
pub const MIN_HEALTH_CHECK_INTERVAL_SECS: u64 = 30;
/// Default per-request timeout.
pub const DEFAULT_HEALTH_CHECK_TIMEOUT_SECS: u64 = 10;
/// Smallest accepted per-request timeout.
pub const MIN_HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;
/// Largest accepted per-request timeout.
pub const MAX_HEALTH_CHECK_TIMEOUT_SECS: u64 = 60;

/// How the registry polls an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckConfig {
    endpoint: String,
    interval_seconds: u64,
    timeout_seconds: u64,
}

impl HealthCheckConfig {
    /// Creates validated health check settings.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::InvalidHealthCheckPath`] when the endpoint
    /// does not start with `/`, [`ManifestError::HealthIntervalTooShort`]
    /// when the interval is below 30 seconds, or
    /// [`ManifestError::HealthTimeoutOutOfRange`] when the timeout falls
    /// outside 5 to 60 seconds.
    pub fn new(
        endpoint: impl Into<String>,
        interval_seconds: u64,
        timeout_seconds: u64,
    ) -> Result<Self, ManifestError> {
        let raw_endpoint = endpoint.into();
        let normalized = raw_endpoint.trim();
        if !normalized.starts_with('/') {
            return Err(ManifestError::InvalidHealthCheckPath(raw_endpoint));
        }
        if interval_seconds < MIN_HEALTH_CHECK_INTERVAL_SECS {
            return Err(ManifestError::HealthIntervalTooShort(interval_seconds));
        }
        if !(MIN_HEALTH_CHECK_TIMEOUT_SECS..=MAX_HEALTH_CHECK_TIMEOUT_SECS)
            .contains(&timeout_seconds)
        {
            return Err(ManifestError::HealthTimeoutOutOfRange(timeout_seconds));
        }

        Ok(Self {
            endpoint: normalized.to_owned(),
            interval_seconds,
            timeout_seconds,
        })
    }

    /// Returns the path polled on the agent, e.g. `/health`.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the polling interval in seconds.
    #[must_use]
    pub const fn interval_seconds(&self) -> u64 {
        self.interval_seconds
    }

    /// Returns the per-request timeout in seconds.
    #[must_use]
    pub const fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    /// Returns the polling interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_HEALTH_CHECK_ENDPOINT.to_owned(),
            interval_seconds: DEFAULT_HEALTH_CHECK_INTERVAL_SECS,
            timeout_seconds: DEFAULT_HEALTH_CHECK_TIMEOUT_SECS,
        }
    }
}
