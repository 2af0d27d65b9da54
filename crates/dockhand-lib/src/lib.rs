//! Core library for driving Docker hosts over SSH
//!
//! This crate provides the session and telemetry orchestrator:
//! - Connection registry with profile persistence and idle cleanup
//! - Per-session serialized command dispatch
//! - Remote Docker CLI surface (status, info, containers, images, ...)
//! - Metrics polling with pause/resume and bounded per-channel history
//! - Snapshot persistence so metric history survives restarts

pub mod config;
pub mod context;
pub mod dispatch;
pub mod docker;
pub mod error;
pub mod executor;
pub mod models;
pub mod poller;
pub mod registry;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;

pub use config::OrchestratorConfig;
pub use context::AppContext;
pub use dispatch::Dispatcher;
pub use docker::DockerRemote;
pub use error::{ConnectError, DispatchError, ProfileError};
pub use executor::{RemoteExecutor, SshExecutor};
pub use models::*;
pub use poller::{MetricsPoller, PollerState, UsageSource};
pub use registry::{ConnectionRegistry, ProfileStore};
pub use telemetry::{
    ByteUnit, Channel, ChannelGroup, MetricHistory, MetricSeries, ScalingResult, SnapshotStore,
    Telemetry, SERIES_CAPACITY,
};
