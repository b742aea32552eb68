//! `reqwest`-backed health probe.

use crate::registry::ports::{HealthProbe, HealthProbeError, HealthProbeResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Health probe issuing real HTTP requests.
///
/// The underlying client is shared across agents; each request carries the
/// agent's own timeout.
#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    client: Client,
}

impl HttpHealthProbe {
    /// Builds a probe whose requests announce `user_agent`.
    ///
    /// # Errors
    ///
    /// Returns [`HealthProbeError::Transport`] when the client cannot be
    /// built, e.g. because the TLS backend failed to initialise.
    pub fn new(user_agent: &str) -> HealthProbeResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|err| {
                HealthProbeError::Transport(format!("failed to build HTTP client: {err}"))
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn get_json(&self, url: &str, timeout: Duration) -> HealthProbeResult<Value> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| classify(&err, timeout))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(HealthProbeError::UnexpectedStatus(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| classify(&err, timeout))
    }
}

fn classify(err: &reqwest::Error, timeout: Duration) -> HealthProbeError {
    if err.is_timeout() {
        HealthProbeError::Timeout(timeout)
    } else if err.is_decode() {
        HealthProbeError::MalformedBody(err.to_string())
    } else {
        HealthProbeError::Transport(err.to_string())
    }
}
