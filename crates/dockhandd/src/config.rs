//! Daemon configuration

use anyhow::Result;
use dockhand_lib::OrchestratorConfig;
use serde::Deserialize;

/// Daemon configuration: the target host plus orchestrator tunables.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Remote host to drive.
    #[serde(default = "default_host")]
    pub host: String,

    /// SSH port on the remote host.
    #[serde(default = "default_port")]
    pub port: u16,

    /// SSH user on the remote host.
    #[serde(default = "default_username")]
    pub username: String,

    /// SSH password; typically supplied as DOCKHAND_PASSWORD.
    #[serde(default)]
    pub password: String,

    /// Seconds between idle-session sweeps.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,

    #[serde(flatten)]
    pub orchestrator: OrchestratorConfig,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    22
}

fn default_username() -> String {
    "root".to_string()
}

fn default_cleanup_interval() -> u64 {
    60
}

impl DaemonConfig {
    /// Load configuration from the environment (DOCKHAND_* variables).
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("DOCKHAND"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| DaemonConfig {
            host: default_host(),
            port: default_port(),
            username: default_username(),
            password: String::new(),
            cleanup_interval_secs: default_cleanup_interval(),
            orchestrator: OrchestratorConfig::default(),
        }))
    }
}
