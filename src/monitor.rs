// Health polling and transition alerting

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Grace period for the polling task to wind down on stop()
const STOP_GRACE: Duration = Duration::from_secs(3);

/// Observed health of the monitored target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    /// No sample observed yet; never produces a notification
    Unknown,
    Healthy,
    Unhealthy,
}

impl HealthState {
    fn from_observation(healthy: bool) -> Self {
        if healthy {
            HealthState::Healthy
        } else {
            HealthState::Unhealthy
        }
    }
}

/// A single probe observation
#[derive(Debug, Clone)]
pub struct Sample {
    pub healthy: bool,
    pub reason: String,
    pub timestamp: DateTime<Local>,
}

/// Liveness check for the monitored target.
///
/// Err means the probe itself could not run; "probe ran, target is down"
/// is expressed as Ok((false, reason)).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> Result<(bool, String)>;
}

/// Best-effort alert delivery to a single fixed recipient.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> bool;
}

/// Shared mutable cell read by the polling task and the toggle command
struct MonitorState {
    enabled: AtomicBool,
    last: Mutex<HealthState>,
}

struct TaskSlot {
    handle: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
}

/// Background health monitor for a single target.
///
/// Samples the probe on a fixed interval and notifies exactly once per
/// healthy/unhealthy transition, never per sample.
pub struct Monitor {
    probe: Arc<dyn HealthProbe>,
    notifier: Arc<dyn Notifier>,
    target: String,
    interval: Duration,
    state: Arc<MonitorState>,
    task: Mutex<TaskSlot>,
}

impl Monitor {
    pub fn new(
        probe: Arc<dyn HealthProbe>,
        notifier: Arc<dyn Notifier>,
        target: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            probe,
            notifier,
            target: target.into(),
            interval,
            state: Arc::new(MonitorState {
                enabled: AtomicBool::new(true),
                last: Mutex::new(HealthState::Unknown),
            }),
            task: Mutex::new(TaskSlot {
                handle: None,
                shutdown: None,
            }),
        }
    }

    /// Spawn the polling task. Idempotent: a second call while the task is
    /// alive does nothing.
    pub fn start(&self) {
        let mut slot = self.task.lock().unwrap();
        if slot.handle.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        // A fresh cycle starts over from an unknown baseline
        *self.state.last.lock().unwrap() = HealthState::Unknown;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let probe = self.probe.clone();
        let notifier = self.notifier.clone();
        let state = self.state.clone();
        let target = self.target.clone();
        let interval = self.interval;

        tracing::info!("starting health monitor for '{}'", target);
        slot.handle = Some(tokio::spawn(poll_loop(
            probe,
            notifier,
            state,
            target,
            interval,
            shutdown_rx,
        )));
        slot.shutdown = Some(shutdown_tx);
    }

    /// Signal the polling task to stop and wait a bounded grace period for
    /// it to exit. Safe to call when not running.
    pub async fn stop(&self) {
        let (handle, shutdown) = {
            let mut slot = self.task.lock().unwrap();
            (slot.handle.take(), slot.shutdown.take())
        };

        if let Some(tx) = shutdown {
            tx.send(()).ok();
        }
        if let Some(handle) = handle {
            if tokio::time::timeout(STOP_GRACE, handle).await.is_err() {
                tracing::warn!("health monitor did not stop within {:?}", STOP_GRACE);
            }
        }
    }

    /// Flip the monitoring flag; returns the new enabled state. While
    /// disabled the task keeps ticking but skips sampling, so re-enabling
    /// resumes transition detection against the last observed health.
    pub fn toggle_enabled(&self) -> bool {
        let was = self.state.enabled.fetch_xor(true, Ordering::SeqCst);
        let now = !was;
        tracing::info!(
            "monitoring {}",
            if now { "enabled" } else { "disabled" }
        );
        now
    }

    pub fn enabled(&self) -> bool {
        self.state.enabled.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap()
            .handle
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Current observed health, for status reporting
    pub fn last_observed(&self) -> HealthState {
        *self.state.last.lock().unwrap()
    }
}

async fn poll_loop(
    probe: Arc<dyn HealthProbe>,
    notifier: Arc<dyn Notifier>,
    state: Arc<MonitorState>,
    target: String,
    interval: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown_rx => {
                tracing::info!("health monitor for '{}' shutting down", target);
                break;
            }
        }

        // Shutdown may have been signaled while the tick was pending; check
        // again before sampling. A dropped sender also ends the loop.
        if !matches!(
            shutdown_rx.try_recv(),
            Err(oneshot::error::TryRecvError::Empty)
        ) {
            tracing::info!("health monitor for '{}' shutting down", target);
            break;
        }

        if !state.enabled.load(Ordering::SeqCst) {
            continue;
        }

        let sample = take_sample(probe.as_ref()).await;
        if let Some(alert) = observe(&state, &target, &sample) {
            // The transition is recorded before delivery is attempted;
            // a failed send is logged, not replayed.
            if !notifier.notify(&alert).await {
                tracing::warn!("failed to deliver alert for '{}'", target);
            }
        }
    }
}

/// Run the probe, downgrading a probe failure to an unhealthy sample so
/// the loop never unwinds.
async fn take_sample(probe: &dyn HealthProbe) -> Sample {
    let (healthy, reason) = match probe.check().await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("health probe failed: {}", e);
            (false, format!("probe failure: {}", e))
        }
    };
    Sample {
        healthy,
        reason,
        timestamp: Local::now(),
    }
}

/// Record the sample against the previous observation and return the alert
/// to send, if this sample is a transition. The very first sample only
/// establishes the baseline.
fn observe(state: &MonitorState, target: &str, sample: &Sample) -> Option<String> {
    let mut last = state.last.lock().unwrap();
    let previous = *last;
    let current = HealthState::from_observation(sample.healthy);
    *last = current;
    drop(last);

    match (previous, current) {
        (HealthState::Healthy, HealthState::Unhealthy) => {
            tracing::warn!("'{}' went down: {}", target, sample.reason);
            Some(render_down_alert(target, sample))
        }
        (HealthState::Unhealthy, HealthState::Healthy) => {
            tracing::info!("'{}' recovered: {}", target, sample.reason);
            Some(render_recovery_alert(target, sample))
        }
        _ => None,
    }
}

fn render_down_alert(target: &str, sample: &Sample) -> String {
    format!(
        "🚨 *ALERT: {} is down!*\n\n\
         ⏰ *Time*: {}\n\
         ❌ *Status*: {}\n\
         🔧 Check the container and restart it if needed",
        target,
        sample.timestamp.format("%H:%M:%S"),
        sample.reason
    )
}

fn render_recovery_alert(target: &str, sample: &Sample) -> String {
    format!(
        "✅ *RECOVERY: {} is back!*\n\n\
         ⏰ *Time*: {}\n\
         ✅ *Status*: {}\n\
         🎉 The server has recovered",
        target,
        sample.timestamp.format("%H:%M:%S"),
        sample.reason
    )
}
