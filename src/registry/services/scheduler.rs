//! Per-agent background health monitors.
//!
//! Every registered agent gets one monitor task. A monitor owns the only
//! [`watch::Sender`] for its agent's [`AgentStatus`] and publishes each
//! update by replacing the value, so readers never see a partial write.
//! Monitors never touch the registry lock.

use crate::registry::{
    domain::{AgentId, AgentStatus, HealthReport},
    ports::{HealthProbe, HealthProbeError, HealthProbeResult},
};
use futures::FutureExt;
use mockable::Clock;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Spawns health monitors sharing one probe and clock.
#[derive(Debug)]
pub struct HealthScheduler<P, C>
where
    P: HealthProbe + 'static,
    C: Clock + Send + Sync + 'static,
{
    probe: Arc<P>,
    clock: Arc<C>,
    error_backoff: Duration,
}

impl<P, C> HealthScheduler<P, C>
where
    P: HealthProbe + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a scheduler. `error_backoff` is the pause taken after a
    /// monitor iteration panics.
    #[must_use]
    pub const fn new(probe: Arc<P>, clock: Arc<C>, error_backoff: Duration) -> Self {
        Self {
            probe,
            clock,
            error_backoff,
        }
    }

    /// Starts a monitor publishing into `status`.
    ///
    /// The first check happens one interval after the call. Must be called
    /// from within a Tokio runtime.
    #[must_use]
    pub fn spawn(&self, status: watch::Sender<AgentStatus>) -> MonitorHandle {
        let (agent_id, url, interval, timeout) = {
            let current = status.borrow();
            let health_check = current.manifest().health_check();
            (
                current.agent_id().clone(),
                current.health_url(),
                health_check.interval(),
                health_check.timeout(),
            )
        };
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let monitor = AgentMonitor {
            agent_id: agent_id.clone(),
            url,
            interval,
            timeout,
            error_backoff: self.error_backoff,
            probe: Arc::clone(&self.probe),
            clock: Arc::clone(&self.clock),
            status,
        };
        let task = tokio::spawn(monitor.run(cancel_rx));
        MonitorHandle {
            agent_id,
            cancel: cancel_tx,
            task,
        }
    }
}

/// Owner handle for a running monitor.
///
/// Dropping the handle without cancelling also stops the monitor at its
/// next suspension point, but only [`Self::cancel`] waits for it.
#[derive(Debug)]
pub struct MonitorHandle {
    agent_id: AgentId,
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Returns the monitored agent.
    #[must_use]
    pub const fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    /// Returns `true` once the monitor task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signals cancellation and waits for the monitor to exit.
    pub async fn cancel(self) {
        let Self {
            agent_id,
            cancel,
            task,
        } = self;
        cancel.send_replace(true);
        if let Err(err) = task.await {
            warn!(agent_id = %agent_id, error = %err, "health monitor ended abnormally");
        }
    }

    /// Signals cancellation and waits up to `grace` for the monitor to exit,
    /// aborting it otherwise.
    ///
    /// Returns `true` when the monitor stopped on its own.
    pub async fn cancel_within(self, grace: Duration) -> bool {
        let Self {
            agent_id,
            cancel,
            mut task,
        } = self;
        cancel.send_replace(true);
        match tokio::time::timeout(grace, &mut task).await {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                warn!(agent_id = %agent_id, error = %err, "health monitor ended abnormally");
                true
            }
            Err(_) => {
                warn!(
                    agent_id = %agent_id,
                    grace_ms = grace.as_millis(),
                    "health monitor did not stop within grace period; aborting"
                );
                task.abort();
                false
            }
        }
    }
}

struct AgentMonitor<P, C> {
    agent_id: AgentId,
    url: String,
    interval: Duration,
    timeout: Duration,
    error_backoff: Duration,
    probe: Arc<P>,
    clock: Arc<C>,
    status: watch::Sender<AgentStatus>,
}

impl<P, C> AgentMonitor<P, C>
where
    P: HealthProbe,
    C: Clock + Send + Sync,
{
    async fn run(self, mut cancel: watch::Receiver<bool>) {
        debug!(agent_id = %self.agent_id, url = %self.url, "health monitor started");
        loop {
            if !pause(&mut cancel, self.interval).await || self.status.is_closed() {
                break;
            }

            let check = AssertUnwindSafe(self.check_once()).catch_unwind();
            let outcome = tokio::select! {
                biased;
                () = cancellation(&mut cancel) => break,
                outcome = check => outcome,
            };

            match outcome {
                Ok(result) => self.publish(result),
                Err(payload) => {
                    error!(
                        agent_id = %self.agent_id,
                        panic = panic_message(payload.as_ref()),
                        "health monitor iteration panicked"
                    );
                    if !pause(&mut cancel, self.error_backoff).await {
                        break;
                    }
                }
            }
        }
        debug!(agent_id = %self.agent_id, "health monitor stopped");
    }

    async fn check_once(&self) -> HealthProbeResult<HealthReport> {
        let body = self.probe.fetch_json(&self.url, self.timeout).await?;
        serde_json::from_value(body).map_err(|err| HealthProbeError::MalformedBody(err.to_string()))
    }

    fn publish(&self, result: HealthProbeResult<HealthReport>) {
        let was_healthy = self.status.borrow().is_healthy();
        let clock = &*self.clock;
        match result {
            Ok(report) => {
                let healthy = report.is_healthy();
                self.status
                    .send_modify(|status| status.record_health_report(healthy, clock));
                debug!(
                    agent_id = %self.agent_id,
                    status = %report.status,
                    healthy,
                    "health check completed"
                );
                if was_healthy && !healthy {
                    warn!(
                        agent_id = %self.agent_id,
                        status = %report.status,
                        "agent reported itself unhealthy"
                    );
                }
            }
            Err(err) => {
                let message = err.to_string();
                self.status
                    .send_modify(|status| status.record_check_failure(message.as_str(), clock));
                debug!(agent_id = %self.agent_id, url = %self.url, error = %err, "health check failed");
                if was_healthy {
                    warn!(agent_id = %self.agent_id, error = %err, "agent became unhealthy");
                }
            }
        }
    }
}

/// Sleeps for `duration` unless cancelled first. Returns `false` on
/// cancellation.
async fn pause(cancel: &mut watch::Receiver<bool>, duration: Duration) -> bool {
    tokio::select! {
        biased;
        () = cancellation(cancel) => false,
        () = tokio::time::sleep(duration) => true,
    }
}

/// Resolves once cancellation is requested or the handle is dropped.
async fn cancellation(cancel: &mut watch::Receiver<bool>) {
    if cancel.wait_for(|stop| *stop).await.is_err() {
        debug!("monitor handle dropped");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
