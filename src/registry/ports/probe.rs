//! Health probe port used for polling agents.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Result type for health probe operations.
pub type HealthProbeResult<T> = Result<T, HealthProbeError>;

/// Issues `GET` requests against agent endpoints.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Fetches `url` and decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`HealthProbeError::UnexpectedStatus`] for any status other
    /// than `200`, [`HealthProbeError::MalformedBody`] when the body is not
    /// JSON, and [`HealthProbeError::Transport`] for connection failures.
    async fn get_json(&self, url: &str, timeout: Duration) -> HealthProbeResult<Value>;

    /// Fetches `url` and fails with [`HealthProbeError::Timeout`] once
    /// `timeout` elapses, whatever the implementation does internally.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Self::get_json`], or a timeout.
    async fn fetch_json(&self, url: &str, timeout: Duration) -> HealthProbeResult<Value> {
        tokio::time::timeout(timeout, self.get_json(url, timeout))
            .await
            .map_err(|_| HealthProbeError::Timeout(timeout))?
    }
}

/// Errors returned by health probe implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HealthProbeError {
    /// The endpoint answered with a non-200 status.
    #[error("HTTP {0}")]
    UnexpectedStatus(u16),

    /// No answer arrived within the configured timeout.
    #[error("health check timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The request could not be sent or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The body could not be decoded.
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

impl HealthProbeError {
    /// Returns `true` for a `404 Not Found` answer.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UnexpectedStatus(404))
    }
}
