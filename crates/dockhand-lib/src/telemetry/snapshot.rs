//! Snapshot persistence for metric history
//!
//! One durable JSON slot per host application. Writes go through a temp file
//! and rename so a concurrent load never observes a partial snapshot.
//! Absent or corrupt state loads as empty history: a cold start, not an
//! error.

use super::series::Channel;
use super::MetricHistory;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValuePoint {
    time: DateTime<Utc>,
    value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RxTxPoint {
    time: DateTime<Utc>,
    rx: f64,
    tx: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadWritePoint {
    time: DateTime<Utc>,
    read: f64,
    write: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotState {
    #[serde(default)]
    cpu_history: Vec<ValuePoint>,
    #[serde(default)]
    memory_history: Vec<ValuePoint>,
    #[serde(default)]
    network_history: Vec<RxTxPoint>,
    #[serde(default)]
    block_history: Vec<ReadWritePoint>,
    #[serde(default)]
    last_update: Option<DateTime<Utc>>,
}

impl SnapshotState {
    fn from_history(history: &MetricHistory) -> Self {
        let single = |channel: Channel| {
            history
                .series(channel)
                .iter()
                .map(|p| ValuePoint {
                    time: p.time,
                    value: p.value,
                })
                .collect()
        };
        // Paired channels are appended together each tick, so zipping by
        // index reconstructs the per-tick pairs.
        let network_history = history
            .series(Channel::NetworkRx)
            .iter()
            .zip(history.series(Channel::NetworkTx).iter())
            .map(|(rx, tx)| RxTxPoint {
                time: rx.time,
                rx: rx.value,
                tx: tx.value,
            })
            .collect();
        let block_history = history
            .series(Channel::BlockRead)
            .iter()
            .zip(history.series(Channel::BlockWrite).iter())
            .map(|(read, write)| ReadWritePoint {
                time: read.time,
                read: read.value,
                write: write.value,
            })
            .collect();

        Self {
            cpu_history: single(Channel::Cpu),
            memory_history: single(Channel::Memory),
            network_history,
            block_history,
            last_update: history.last_update(),
        }
    }

    fn into_history(self) -> MetricHistory {
        let mut history = MetricHistory::default();
        for p in self.cpu_history {
            history.append(Channel::Cpu, p.time, p.value);
        }
        for p in self.memory_history {
            history.append(Channel::Memory, p.time, p.value);
        }
        for p in self.network_history {
            history.append(Channel::NetworkRx, p.time, p.rx);
            history.append(Channel::NetworkTx, p.time, p.tx);
        }
        for p in self.block_history {
            history.append(Channel::BlockRead, p.time, p.read);
            history.append(Channel::BlockWrite, p.time, p.write);
        }
        history.set_last_update(self.last_update);
        history
    }
}

/// Exclusive owner of the durable metric-history slot.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the slot with the current history. Atomic from a reader's
    /// perspective: temp file in the same directory, then rename.
    pub fn save(&self, history: &MetricHistory) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let state = SnapshotState::from_history(history);
        let json = serde_json::to_vec(&state).context("failed to serialize snapshot")?;
        let temp = self.path.with_extension("tmp");
        fs::write(&temp, json)
            .with_context(|| format!("failed to write {}", temp.display()))?;
        fs::rename(&temp, &self.path)
            .with_context(|| format!("failed to rename into {}", self.path.display()))?;
        debug!(path = %self.path.display(), "Snapshot saved");
        Ok(())
    }

    /// Read the slot. Missing or unparseable state yields empty history.
    pub fn load(&self) -> MetricHistory {
        if !self.path.exists() {
            return MetricHistory::default();
        }
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<SnapshotState>(&content) {
                Ok(state) => {
                    let history = state.into_history();
                    info!(
                        path = %self.path.display(),
                        samples = history.series(Channel::Cpu).len(),
                        "Restored metric history"
                    );
                    history
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Snapshot corrupt, starting empty");
                    MetricHistory::default()
                }
            },
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Snapshot unreadable, starting empty");
                MetricHistory::default()
            }
        }
    }

    /// Remove the durable slot.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SystemUsage;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn sample(i: u64) -> SystemUsage {
        SystemUsage {
            cpu_online: 4,
            cpu_usage_percent: i as f64,
            memory_usage_bytes: 1024 * i,
            memory_limit_bytes: 8 * 1024 * 1024 * 1024,
            network_rx_bytes: 10 * i,
            network_tx_bytes: 20 * i,
            block_read_bytes: 30 * i,
            block_write_bytes: 40 * i,
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("history.json"));

        let mut history = MetricHistory::default();
        for i in 0..5 {
            history.record(at(i as i64), &sample(i));
        }
        store.save(&history).unwrap();

        let restored = store.load();
        assert_eq!(restored.last_update(), history.last_update());
        for channel in [
            Channel::Cpu,
            Channel::Memory,
            Channel::NetworkRx,
            Channel::NetworkTx,
            Channel::BlockRead,
            Channel::BlockWrite,
        ] {
            let original: Vec<_> = history.series(channel).iter().copied().collect();
            let loaded: Vec<_> = restored.series(channel).iter().copied().collect();
            assert_eq!(original, loaded, "channel {:?}", channel);
        }
    }

    #[test]
    fn missing_slot_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("absent.json"));
        let history = store.load();
        assert!(history.series(Channel::Cpu).is_empty());
        assert!(history.last_update().is_none());
    }

    #[test]
    fn corrupt_slot_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "][ definitely not json").unwrap();
        let history = SnapshotStore::new(&path).load();
        assert!(history.series(Channel::Cpu).is_empty());
    }

    #[test]
    fn clear_removes_the_slot() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("history.json"));
        let mut history = MetricHistory::default();
        history.record(at(0), &sample(1));
        store.save(&history).unwrap();

        store.clear().unwrap();
        assert!(!store.path().exists());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn persisted_layout_uses_camel_case_slot_names() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("history.json"));
        let mut history = MetricHistory::default();
        history.record(at(0), &sample(2));
        store.save(&history).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        for key in [
            "cpuHistory",
            "memoryHistory",
            "networkHistory",
            "blockHistory",
            "lastUpdate",
            "\"rx\"",
            "\"tx\"",
            "\"read\"",
            "\"write\"",
        ] {
            assert!(raw.contains(key), "missing {} in {}", key, raw);
        }
    }
}
