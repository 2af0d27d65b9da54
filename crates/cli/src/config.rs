//! Configuration management for the CLI

use anyhow::{Context, Result};
use dockhand_lib::OrchestratorConfig;
use std::path::PathBuf;

/// Orchestrator settings with storage slots under the user's data directory,
/// shared with the daemon when both run on the same machine.
pub fn orchestrator_config() -> Result<OrchestratorConfig> {
    let dir = data_dir()?;
    Ok(OrchestratorConfig {
        history_path: dir.join("history.json"),
        profiles_path: dir.join("profiles.json"),
        ..Default::default()
    })
}

fn data_dir() -> Result<PathBuf> {
    let home = dirs_next::home_dir().context("could not determine home directory")?;
    Ok(home.join(".local").join("share").join("dockhand"))
}
