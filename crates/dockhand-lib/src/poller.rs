//! Metrics polling scheduler
//!
//! One timer per poller instance with explicit states:
//! Idle -> Armed -> (Collecting <-> Paused) -> Idle. `start` is idempotent
//! (an existing timer is fully stopped first), `pause` keeps the timer
//! running so `resume` is immediate, and a failed tick logs and leaves every
//! series untouched. Missed ticks are skipped, never queued, so a degraded
//! host cannot build an unbounded backlog.

use crate::error::DispatchError;
use crate::models::SystemUsage;
use crate::telemetry::Telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub use async_trait::async_trait;

/// Where usage samples come from. The production implementation is the
/// remote Docker surface; tests script their own.
#[async_trait]
pub trait UsageSource: Send + Sync {
    async fn sample_usage(&self, session_id: &str) -> Result<SystemUsage, DispatchError>;
}

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Armed,
    Paused,
}

struct PollTask {
    session_id: String,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

pub struct MetricsPoller {
    source: Arc<dyn UsageSource>,
    telemetry: Arc<Telemetry>,
    interval: Duration,
    paused: Arc<AtomicBool>,
    task: tokio::sync::Mutex<Option<PollTask>>,
}

impl MetricsPoller {
    pub fn new(source: Arc<dyn UsageSource>, telemetry: Arc<Telemetry>, interval: Duration) -> Self {
        Self {
            source,
            telemetry,
            interval,
            paused: Arc::new(AtomicBool::new(false)),
            task: tokio::sync::Mutex::new(None),
        }
    }

    /// Arm the poller for a session: one immediate collection, then a fixed
    /// cadence. Any previously running timer is stopped first, so repeated
    /// calls never produce two live timers.
    pub async fn start(&self, session_id: &str) {
        let mut task = self.task.lock().await;
        if let Some(old) = task.take() {
            info!(session_id = %old.session_id, "Restarting poller, cancelling existing timer");
            Self::cancel(old);
        }
        self.paused.store(false, Ordering::Release);

        collect_once(&self.source, &self.telemetry, session_id).await;

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let source = Arc::clone(&self.source);
        let telemetry = Arc::clone(&self.telemetry);
        let paused = Arc::clone(&self.paused);
        let id = session_id.to_string();
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a tokio interval fires immediately; the
            // immediate collection already happened, so consume it.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if paused.load(Ordering::Acquire) {
                            debug!(session_id = %id, "Tick skipped while paused");
                            continue;
                        }
                        collect_once(&source, &telemetry, &id).await;
                    }
                    _ = shutdown_rx.changed() => {
                        debug!(session_id = %id, "Poll timer cancelled");
                        break;
                    }
                }
            }
        });

        *task = Some(PollTask {
            session_id: session_id.to_string(),
            shutdown: shutdown_tx,
            handle,
        });
        info!(session_id = %session_id, interval_secs = self.interval.as_secs_f64(), "Poller armed");
    }

    /// Skip collection on future ticks but keep the timer running.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
        info!("Poller paused");
    }

    /// Collect normally again from the next tick.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        info!("Poller resumed");
    }

    /// Cancel the timer. A subsequent `start` begins fresh.
    pub async fn stop(&self) {
        let mut task = self.task.lock().await;
        if let Some(old) = task.take() {
            info!(session_id = %old.session_id, "Poller stopped");
            Self::cancel(old);
        }
        self.paused.store(false, Ordering::Release);
    }

    fn cancel(task: PollTask) {
        let _ = task.shutdown.send(true);
        // A tick in flight holds no locks across await points; aborting here
        // cancels the collection rather than letting it land after stop.
        task.handle.abort();
    }

    pub async fn state(&self) -> PollerState {
        let task = self.task.lock().await;
        match task.as_ref() {
            None => PollerState::Idle,
            Some(_) if self.paused.load(Ordering::Acquire) => PollerState::Paused,
            Some(_) => PollerState::Armed,
        }
    }

    /// Session the poller is currently armed for, if any.
    pub async fn session_id(&self) -> Option<String> {
        let task = self.task.lock().await;
        task.as_ref().map(|t| t.session_id.clone())
    }
}

/// One tick: sample, then append to every channel and persist. A failure is
/// logged and the series stay exactly as they were.
async fn collect_once(source: &Arc<dyn UsageSource>, telemetry: &Telemetry, session_id: &str) {
    match source.sample_usage(session_id).await {
        Ok(usage) => telemetry.record(&usage),
        Err(e) => {
            warn!(session_id = %session_id, error = %e, "Metrics collection failed, series unchanged");
        }
    }
}
