//! Remote command executor boundary
//!
//! The orchestrator never talks to a transport directly; everything above
//! this trait sees opaque channel tokens and stdout text. The default
//! implementation is [`SshExecutor`], but tests script their own.

mod ssh;

pub use ssh::SshExecutor;

use crate::error::{ConnectError, DispatchError};
use crate::models::ConnectionProfile;

pub use async_trait::async_trait;

/// Trait for remote command execution implementations.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Open an authenticated channel to the host and return an opaque token.
    async fn open_channel(
        &self,
        profile: &ConnectionProfile,
        secret: &str,
    ) -> Result<String, ConnectError>;

    /// Close a previously opened channel. Idempotent.
    async fn close_channel(&self, token: &str) -> Result<(), DispatchError>;

    /// Run a shell command on the channel and return its stdout.
    async fn exec(&self, token: &str, command: &str) -> Result<String, DispatchError>;
}
