//! SSH-backed executor
//!
//! Thin wrapper around `ssh2`. The library is blocking, so every round trip
//! runs inside `spawn_blocking`; serialization of concurrent commands is the
//! dispatcher's job, not ours, but each channel still carries its own mutex
//! because libssh2 sessions are not safe for concurrent use.

use super::{async_trait, RemoteExecutor};
use crate::error::{ConnectError, DispatchError};
use crate::models::ConnectionProfile;
use dashmap::DashMap;
use std::io::Read;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

struct SshChannel {
    session: Mutex<ssh2::Session>,
    // Held so the socket outlives the session handshake.
    _stream: TcpStream,
}

/// Executor that runs commands over password-authenticated SSH.
pub struct SshExecutor {
    channels: DashMap<String, Arc<SshChannel>>,
    counter: AtomicU64,
    connect_timeout: Duration,
}

impl SshExecutor {
    pub fn new() -> Self {
        Self::with_connect_timeout(DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_connect_timeout(connect_timeout: Duration) -> Self {
        Self {
            channels: DashMap::new(),
            counter: AtomicU64::new(0),
            connect_timeout,
        }
    }

    fn mint_token(&self) -> String {
        format!("ssh-chan-{}", self.counter.fetch_add(1, Ordering::SeqCst))
    }

    fn establish(
        host: &str,
        port: u16,
        username: &str,
        secret: &str,
        timeout: Duration,
    ) -> Result<(ssh2::Session, TcpStream), ConnectError> {
        let addr = format!("{}:{}", host, port)
            .to_socket_addrs()
            .map_err(|e| ConnectError::Unreachable(format!("{}:{}: {}", host, port, e)))?
            .next()
            .ok_or_else(|| {
                ConnectError::Unreachable(format!("{}:{}: no resolved address", host, port))
            })?;

        let stream = TcpStream::connect_timeout(&addr, timeout).map_err(|e| {
            if e.kind() == std::io::ErrorKind::TimedOut {
                ConnectError::Timeout(timeout)
            } else {
                ConnectError::Unreachable(format!("{}: {}", addr, e))
            }
        })?;

        let mut session = ssh2::Session::new()
            .map_err(|e| ConnectError::Unreachable(format!("session init failed: {}", e)))?;
        session.set_tcp_stream(stream.try_clone().map_err(|e| {
            ConnectError::Unreachable(format!("failed to clone tcp stream: {}", e))
        })?);
        session
            .handshake()
            .map_err(|e| ConnectError::Unreachable(format!("handshake failed: {}", e)))?;

        session
            .userauth_password(username, secret)
            .map_err(|e| ConnectError::Authentication(e.to_string()))?;
        if !session.authenticated() {
            return Err(ConnectError::Authentication("invalid credentials".into()));
        }

        Ok((session, stream))
    }
}

impl Default for SshExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn open_channel(
        &self,
        profile: &ConnectionProfile,
        secret: &str,
    ) -> Result<String, ConnectError> {
        let host = profile.host.clone();
        let port = profile.port;
        let username = profile.username.clone();
        let secret = secret.to_string();
        let connect_timeout = self.connect_timeout;

        let established = tokio::time::timeout(
            connect_timeout,
            tokio::task::spawn_blocking(move || {
                Self::establish(&host, port, &username, &secret, connect_timeout)
            }),
        )
        .await
        .map_err(|_| ConnectError::Timeout(connect_timeout))?
        .map_err(|e| ConnectError::Unreachable(format!("executor task failed: {}", e)))?;

        let (session, stream) = established?;
        let token = self.mint_token();
        self.channels.insert(
            token.clone(),
            Arc::new(SshChannel {
                session: Mutex::new(session),
                _stream: stream,
            }),
        );
        debug!(token = %token, host = %profile.host, "ssh channel opened");
        Ok(token)
    }

    async fn close_channel(&self, token: &str) -> Result<(), DispatchError> {
        let Some((_, channel)) = self.channels.remove(token) else {
            return Ok(());
        };
        let result = tokio::task::spawn_blocking(move || {
            let session = channel
                .session
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            session.disconnect(None, "disconnect requested", None)
        })
        .await;
        if let Ok(Err(e)) = result {
            warn!(token = %token, error = %e, "ssh disconnect reported an error");
        }
        Ok(())
    }

    async fn exec(&self, token: &str, command: &str) -> Result<String, DispatchError> {
        let channel = self
            .channels
            .get(token)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(DispatchError::SessionClosed)?;
        let command = command.to_string();

        tokio::task::spawn_blocking(move || {
            let session = channel
                .session
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            let mut chan = session
                .channel_session()
                .map_err(|e| DispatchError::Transport(format!("channel open failed: {}", e)))?;
            chan.exec(&command)
                .map_err(|e| DispatchError::Transport(format!("exec failed: {}", e)))?;

            let mut stdout = String::new();
            chan.read_to_string(&mut stdout)
                .map_err(|e| DispatchError::Transport(format!("read failed: {}", e)))?;
            let mut stderr = String::new();
            let _ = chan.stderr().read_to_string(&mut stderr);

            chan.wait_close()
                .map_err(|e| DispatchError::Transport(format!("channel close failed: {}", e)))?;
            let status = chan
                .exit_status()
                .map_err(|e| DispatchError::Transport(format!("exit status failed: {}", e)))?;

            if status == 0 {
                Ok(stdout)
            } else {
                let output = if stderr.trim().is_empty() { stdout } else { stderr };
                Err(DispatchError::Command {
                    status,
                    output: output.trim().to_string(),
                })
            }
        })
        .await
        .map_err(|e| DispatchError::Transport(format!("executor task failed: {}", e)))?
    }
}
