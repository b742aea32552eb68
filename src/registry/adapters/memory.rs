//! In-memory health probe with scripted responses.

use crate::registry::ports::{HealthProbe, HealthProbeError, HealthProbeResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Health probe that answers from per-URL scripts.
///
/// Queued responses are consumed first, in order. Once a URL's queue is
/// empty its sticky response, if any, is returned on every call. URLs with
/// neither answer with a transport error, as an unreachable host would.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHealthProbe {
    state: Arc<Mutex<ScriptState>>,
}

#[derive(Debug, Default)]
struct ScriptState {
    queued: HashMap<String, VecDeque<HealthProbeResult<Value>>>,
    sticky: HashMap<String, HealthProbeResult<Value>>,
    delays: HashMap<String, Duration>,
    calls: HashMap<String, usize>,
}

impl ScriptedHealthProbe {
    /// Creates a probe with no scripts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a one-shot response for `url`.
    pub fn push_response(&self, url: &str, response: HealthProbeResult<Value>) {
        self.lock()
            .queued
            .entry(url.to_owned())
            .or_default()
            .push_back(response);
    }

    /// Sets the response returned for `url` once its queue is drained.
    pub fn set_response(&self, url: &str, response: HealthProbeResult<Value>) {
        self.lock().sticky.insert(url.to_owned(), response);
    }

    /// Delays every answer for `url` by `delay`.
    pub fn set_delay(&self, url: &str, delay: Duration) {
        self.lock().delays.insert(url.to_owned(), delay);
    }

    /// Returns how many requests `url` has received.
    #[must_use]
    pub fn call_count(&self, url: &str) -> usize {
        self.lock().calls.get(url).copied().unwrap_or_default()
    }

    /// Returns how many requests were received across all URLs.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_response(&self, url: &str) -> (Option<Duration>, HealthProbeResult<Value>) {
        let mut state = self.lock();
        let count = state.calls.entry(url.to_owned()).or_default();
        *count = count.saturating_add(1);

        let delay = state.delays.get(url).copied();
        let queued = state.queued.get_mut(url).and_then(VecDeque::pop_front);
        let response = queued
            .or_else(|| state.sticky.get(url).cloned())
            .unwrap_or_else(|| {
                Err(HealthProbeError::Transport(format!(
                    "connection refused: {url}"
                )))
            });
        (delay, response)
    }
}

#[async_trait]
impl HealthProbe for ScriptedHealthProbe {
    async fn get_json(&self, url: &str, _timeout: Duration) -> HealthProbeResult<Value> {
        let (delay, response) = self.next_response(url);
        if let Some(pause) = delay {
            tokio::time::sleep(pause).await;
        }
        response
    }
}
