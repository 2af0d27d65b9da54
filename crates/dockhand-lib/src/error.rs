//! Failure taxonomy for the orchestrator
//!
//! Every operation returns a typed error to its immediate caller; nothing in
//! this crate panics past its own boundary outside of tests.

use crate::models::ProfileIdentity;
use std::time::Duration;
use thiserror::Error;

/// Failures while establishing a remote channel.
#[derive(Debug, Clone, Error)]
pub enum ConnectError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("host unreachable: {0}")]
    Unreachable(String),

    #[error("connection timed out after {0:?}")]
    Timeout(Duration),
}

/// Failures while dispatching a command on an established session.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The session was closed before the command could run, or never existed.
    #[error("session closed")]
    SessionClosed,

    #[error("command timed out after {0:?}")]
    Timeout(Duration),

    /// The remote command ran but exited non-zero.
    #[error("remote command exited with status {status}: {output}")]
    Command { status: i32, output: String },

    /// The transport failed mid-command (broken channel, I/O error, ...).
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Failures while mutating the profile store.
#[derive(Debug, Clone, Error)]
pub enum ProfileError {
    #[error("a profile already exists for {0}")]
    Conflict(ProfileIdentity),

    #[error("profile {0} has an active session")]
    SessionActive(ProfileIdentity),

    #[error("no profile found for {0}")]
    NotFound(ProfileIdentity),

    #[error("failed to persist profiles: {0}")]
    Storage(String),
}
