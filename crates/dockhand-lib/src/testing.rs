//! Scripted in-memory executor shared by unit tests

use crate::error::{ConnectError, DispatchError};
use crate::executor::{async_trait, RemoteExecutor};
use crate::models::ConnectionProfile;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Executor whose behavior is driven by the submitted command text:
/// commands starting with `fail:` exit non-zero, everything else echoes
/// `ok:<command>`. Hosts named `unreachable` refuse connections and the
/// secret `wrong-secret` fails authentication.
pub struct ScriptedExecutor {
    delay: Duration,
    counter: AtomicU64,
    executed: Mutex<Vec<String>>,
    closed: Mutex<Vec<String>>,
    responses: Mutex<HashMap<String, String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            counter: AtomicU64::new(0),
            executed: Mutex::new(Vec::new()),
            closed: Mutex::new(Vec::new()),
            responses: Mutex::new(HashMap::new()),
        }
    }

    /// Script a canned stdout for an exact command string.
    pub fn respond(&self, command: &str, stdout: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(command.to_string(), stdout.to_string());
    }

    /// Commands that reached the transport, in execution order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn closed_tokens(&self) -> Vec<String> {
        self.closed.lock().unwrap().clone()
    }

    pub fn open_count(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteExecutor for ScriptedExecutor {
    async fn open_channel(
        &self,
        profile: &ConnectionProfile,
        secret: &str,
    ) -> Result<String, ConnectError> {
        if profile.host == "unreachable" {
            return Err(ConnectError::Unreachable(format!(
                "{}:{}: connection refused",
                profile.host, profile.port
            )));
        }
        if secret == "wrong-secret" {
            return Err(ConnectError::Authentication("invalid credentials".into()));
        }
        Ok(format!("tok-{}", self.counter.fetch_add(1, Ordering::SeqCst)))
    }

    async fn close_channel(&self, token: &str) -> Result<(), DispatchError> {
        self.closed.lock().unwrap().push(token.to_string());
        Ok(())
    }

    async fn exec(&self, _token: &str, command: &str) -> Result<String, DispatchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.executed.lock().unwrap().push(command.to_string());
        if let Some(stdout) = self.responses.lock().unwrap().get(command) {
            return Ok(stdout.clone());
        }
        if let Some(rest) = command.strip_prefix("fail:") {
            return Err(DispatchError::Command {
                status: 1,
                output: rest.to_string(),
            });
        }
        Ok(format!("ok:{}", command))
    }
}
