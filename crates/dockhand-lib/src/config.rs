//! Orchestrator configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Tunables for the orchestrator. Every field has a default so an empty
/// configuration source yields a working setup.
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorConfig {
    /// Seconds between metric collection ticks.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Sessions idle longer than this many seconds are eligible for cleanup.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Per-command execution deadline in seconds; 0 disables the deadline.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,

    /// Durable slot for metric history.
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,

    /// Durable slot for saved connection profiles.
    #[serde(default = "default_profiles_path")]
    pub profiles_path: PathBuf,
}

fn default_poll_interval() -> u64 {
    2
}

fn default_idle_timeout() -> u64 {
    30 * 60
}

fn default_command_timeout() -> u64 {
    30
}

fn default_history_path() -> PathBuf {
    PathBuf::from("data/history.json")
}

fn default_profiles_path() -> PathBuf {
    PathBuf::from("data/profiles.json")
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            idle_timeout_secs: default_idle_timeout(),
            command_timeout_secs: default_command_timeout(),
            history_path: default_history_path(),
            profiles_path: default_profiles_path(),
        }
    }
}

impl OrchestratorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        (self.command_timeout_secs > 0).then(|| Duration::from_secs(self.command_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_deserializes_to_defaults() {
        let config: OrchestratorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.idle_timeout(), Duration::from_secs(1800));
        assert_eq!(config.command_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_command_timeout_disables_the_deadline() {
        let config: OrchestratorConfig =
            serde_json::from_str(r#"{"command_timeout_secs": 0}"#).unwrap();
        assert_eq!(config.command_timeout(), None);
    }
}
