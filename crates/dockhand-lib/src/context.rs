//! Application context
//!
//! One explicit object owns every orchestrator component; there is no global
//! state. Embedding applications build a context at startup and pass it (or
//! clones of its `Arc` handles) to whatever needs a component.

use crate::config::OrchestratorConfig;
use crate::dispatch::Dispatcher;
use crate::docker::DockerRemote;
use crate::executor::{RemoteExecutor, SshExecutor};
use crate::poller::MetricsPoller;
use crate::registry::{ConnectionRegistry, ProfileStore};
use crate::telemetry::{SnapshotStore, Telemetry};
use std::sync::Arc;
use tracing::info;

pub struct AppContext {
    pub config: OrchestratorConfig,
    pub registry: Arc<ConnectionRegistry>,
    pub dispatcher: Arc<Dispatcher>,
    pub docker: Arc<DockerRemote>,
    pub telemetry: Arc<Telemetry>,
    pub poller: Arc<MetricsPoller>,
}

impl AppContext {
    /// Wire the full component graph over the real SSH transport.
    pub fn new(config: OrchestratorConfig) -> Self {
        Self::with_executor(config, Arc::new(SshExecutor::new()))
    }

    /// Wire the component graph over a caller-supplied transport.
    pub fn with_executor(config: OrchestratorConfig, executor: Arc<dyn RemoteExecutor>) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&executor),
            config.command_timeout(),
        ));
        let profiles = Arc::new(ProfileStore::new(config.profiles_path.clone()));
        let registry = Arc::new(ConnectionRegistry::new(
            executor,
            Arc::clone(&dispatcher),
            profiles,
        ));
        let docker = Arc::new(DockerRemote::new(Arc::clone(&dispatcher)));
        let telemetry = Arc::new(Telemetry::new(SnapshotStore::new(
            config.history_path.clone(),
        )));
        let source: Arc<dyn crate::poller::UsageSource> =
            Arc::clone(&docker) as Arc<dyn crate::poller::UsageSource>;
        let poller = Arc::new(MetricsPoller::new(
            source,
            Arc::clone(&telemetry),
            config.poll_interval(),
        ));

        info!(
            poll_interval_secs = config.poll_interval_secs,
            idle_timeout_secs = config.idle_timeout_secs,
            "Orchestrator context initialized"
        );
        Self {
            config,
            registry,
            dispatcher,
            docker,
            telemetry,
            poller,
        }
    }

    /// Orderly teardown: stop polling, then close every live session.
    pub async fn shutdown(&self) {
        self.poller.stop().await;
        let closed = self.registry.disconnect_all();
        info!(sessions_closed = closed, "Orchestrator context shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConnectionProfile;
    use crate::poller::PollerState;
    use crate::testing::ScriptedExecutor;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> (AppContext, Arc<ScriptedExecutor>) {
        let executor = Arc::new(ScriptedExecutor::new());
        let config = OrchestratorConfig {
            history_path: dir.path().join("history.json"),
            profiles_path: dir.path().join("profiles.json"),
            ..Default::default()
        };
        (
            AppContext::with_executor(config, executor.clone()),
            executor,
        )
    }

    #[tokio::test]
    async fn context_wires_a_working_session_path() {
        let dir = TempDir::new().unwrap();
        let (ctx, _executor) = context(&dir);

        let session = ctx
            .registry
            .connect(ConnectionProfile::new("10.0.0.1", 22, "ops"), "pw")
            .await
            .unwrap();
        let out = ctx.dispatcher.submit(&session.id, "uptime").await.unwrap();
        assert_eq!(out, "ok:uptime");
    }

    #[tokio::test]
    async fn shutdown_stops_polling_and_sessions() {
        let dir = TempDir::new().unwrap();
        let (ctx, _executor) = context(&dir);

        let session = ctx
            .registry
            .connect(ConnectionProfile::new("10.0.0.1", 22, "ops"), "pw")
            .await
            .unwrap();
        ctx.poller.start(&session.id).await;

        ctx.shutdown().await;
        assert_eq!(ctx.poller.state().await, PollerState::Idle);
        assert!(ctx.registry.list_active().is_empty());
    }
}
