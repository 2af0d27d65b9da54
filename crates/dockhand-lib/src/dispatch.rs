//! Per-session command dispatch
//!
//! The remote transport is not safe for concurrent multiplexed use, so every
//! session gets one worker task and a strictly ordered queue. Commands for
//! the same session complete in submission order; commands for different
//! sessions run independently. A queued command whose session is torn down
//! before its turn fails with [`DispatchError::SessionClosed`] instead of
//! running.

use crate::error::DispatchError;
use crate::executor::RemoteExecutor;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

struct Job {
    command: String,
    reply: oneshot::Sender<Result<String, DispatchError>>,
}

struct Lane {
    tx: mpsc::UnboundedSender<Job>,
    closed: Arc<AtomicBool>,
    activity: Arc<AtomicI64>,
}

/// Serialization gate between callers and the remote executor.
pub struct Dispatcher {
    executor: Arc<dyn RemoteExecutor>,
    lanes: DashMap<String, Lane>,
    command_timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(executor: Arc<dyn RemoteExecutor>, command_timeout: Option<Duration>) -> Self {
        Self {
            executor,
            lanes: DashMap::new(),
            command_timeout,
        }
    }

    /// Register a session and spawn its worker. `activity` is shared with the
    /// registry so idle cleanup sees command traffic.
    pub(crate) fn open_lane(&self, session_id: &str, token: String, activity: Arc<AtomicI64>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let closed = Arc::new(AtomicBool::new(false));
        let lane = Lane {
            tx,
            closed: Arc::clone(&closed),
            activity,
        };

        let executor = Arc::clone(&self.executor);
        let timeout = self.command_timeout;
        let id = session_id.to_string();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                if closed.load(Ordering::Acquire) {
                    let _ = job.reply.send(Err(DispatchError::SessionClosed));
                    continue;
                }
                let result = match timeout {
                    Some(limit) => {
                        match tokio::time::timeout(limit, executor.exec(&token, &job.command)).await
                        {
                            Ok(result) => result,
                            Err(_) => Err(DispatchError::Timeout(limit)),
                        }
                    }
                    None => executor.exec(&token, &job.command).await,
                };
                // The caller may have given up; a dropped receiver is fine.
                let _ = job.reply.send(result);
            }
            if let Err(e) = executor.close_channel(&token).await {
                warn!(session_id = %id, error = %e, "channel close failed during teardown");
            }
            debug!(session_id = %id, "dispatch lane drained");
        });

        self.lanes.insert(session_id.to_string(), lane);
    }

    /// Tear down a session's lane. Commands already queued fail with
    /// `SessionClosed`; a command in flight at the executor completes on its
    /// own. Returns false if no such lane existed.
    pub(crate) fn close_lane(&self, session_id: &str) -> bool {
        // Flag first so drained jobs observe the closure, then drop the
        // sender by removing the lane.
        if let Some(lane) = self.lanes.get(session_id) {
            lane.closed.store(true, Ordering::Release);
        }
        self.lanes.remove(session_id).is_some()
    }

    pub fn has_lane(&self, session_id: &str) -> bool {
        self.lanes.contains_key(session_id)
    }

    /// Queue a command for the session and wait for its result. Suspends the
    /// caller until all previously submitted commands for the same session
    /// have completed.
    pub async fn submit(&self, session_id: &str, command: &str) -> Result<String, DispatchError> {
        let reply_rx = {
            let lane = self
                .lanes
                .get(session_id)
                .ok_or(DispatchError::SessionClosed)?;
            lane.activity.store(Utc::now().timestamp(), Ordering::Release);
            let (reply_tx, reply_rx) = oneshot::channel();
            lane.tx
                .send(Job {
                    command: command.to_string(),
                    reply: reply_tx,
                })
                .map_err(|_| DispatchError::SessionClosed)?;
            reply_rx
        };
        reply_rx.await.map_err(|_| DispatchError::SessionClosed)?
    }
}
