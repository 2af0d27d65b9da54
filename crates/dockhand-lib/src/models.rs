//! Core data models for the orchestrator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A saved remote-host profile. The secret is only present when the operator
/// explicitly opted in to storing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_secret: Option<String>,
}

impl ConnectionProfile {
    pub fn new(host: impl Into<String>, port: u16, username: impl Into<String>) -> Self {
        let host = host.into();
        let username = username.into();
        let display_name = format!("{}@{}", username, host);
        Self {
            host,
            port,
            username,
            display_name,
            saved_secret: None,
        }
    }

    /// The (host, port, username) tuple that identifies this profile.
    pub fn identity(&self) -> ProfileIdentity {
        ProfileIdentity {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
        }
    }
}

/// Profile identity: two profiles with the same identity are the same host
/// endpoint regardless of display name or saved secret.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileIdentity {
    pub host: String,
    pub port: u16,
    pub username: String,
}

impl fmt::Display for ProfileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.username, self.host, self.port)
    }
}

/// Snapshot of one live session, as reported by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub connected_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// One aggregated usage sample across all running containers on the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemUsage {
    pub cpu_online: u64,
    pub cpu_usage_percent: f64,
    pub memory_usage_bytes: u64,
    pub memory_limit_bytes: u64,
    pub network_rx_bytes: u64,
    pub network_tx_bytes: u64,
    pub block_read_bytes: u64,
    pub block_write_bytes: u64,
}

/// Docker daemon reachability on the remote host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockerStatus {
    Running,
    NotRunning,
    NotInstalled,
    Disconnected,
}

impl fmt::Display for DockerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DockerStatus::Running => "running",
            DockerStatus::NotRunning => "not running",
            DockerStatus::NotInstalled => "not installed",
            DockerStatus::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}

/// General information about the remote Docker installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerHostInfo {
    pub version: String,
    pub containers_total: i64,
    pub containers_running: i64,
    pub containers_paused: i64,
    pub containers_stopped: i64,
    pub images: i64,
    pub architecture: String,
    pub os: String,
    pub kernel_version: String,
}

/// Port mapping for a new container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortMapping {
    pub host_port: u16,
    pub container_port: u16,
    pub protocol: String,
}

/// Bind mount for a new container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeMount {
    pub host_path: String,
    pub container_path: String,
    #[serde(default)]
    pub read_only: bool,
}

/// Environment variable for a new container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

/// Everything needed to run a new container on the remote host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub image: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_detach")]
    pub detach: bool,
    #[serde(default)]
    pub ports: Vec<PortMapping>,
    #[serde(default)]
    pub volumes: Vec<VolumeMount>,
    #[serde(default)]
    pub env: Vec<EnvVar>,
    #[serde(default)]
    pub restart_policy: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
}

fn default_detach() -> bool {
    true
}

impl ContainerSpec {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            name: None,
            detach: true,
            ports: Vec::new(),
            volumes: Vec::new(),
            env: Vec::new(),
            restart_policy: None,
            command: None,
        }
    }
}

/// One parsed `docker stats` row for a single container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerStats {
    pub cpu_usage_percent: f64,
    pub memory_usage_bytes: u64,
    pub memory_limit_bytes: u64,
    pub network_rx_bytes: u64,
    pub network_tx_bytes: u64,
    pub block_read_bytes: u64,
    pub block_write_bytes: u64,
}

/// One row of `docker ps -a` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub id: String,
    pub name: String,
    pub image: String,
    pub state: String,
    pub status: String,
    pub ports: Vec<String>,
    pub created: String,
}

/// One row of `docker images` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSummary {
    pub id: String,
    pub repository: String,
    pub tag: String,
    pub created: String,
    pub size: String,
}

/// One row of `docker network ls` output (system networks filtered out).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub id: String,
    pub name: String,
    pub driver: String,
    pub scope: String,
}

/// One row of `docker volume ls` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
}
