//! Metric history: bounded series, display scaling, snapshot persistence
//!
//! `MetricHistory` is the single in-memory source of truth; the snapshot
//! store mirrors it to durable storage after every recorded tick. One tick
//! means one save, not one save per channel append.

mod scaling;
mod series;
mod snapshot;

pub use scaling::{compute_scaling, select_unit, ByteUnit, ChannelGroup, ScaledSeries, ScalingResult};
pub use series::{Channel, MetricSeries, SeriesPoint, SERIES_CAPACITY};
pub use snapshot::SnapshotStore;

use crate::models::SystemUsage;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use tracing::warn;

/// All channels plus the metadata scaling needs (core count, memory limit,
/// last update time).
#[derive(Debug, Clone, Default)]
pub struct MetricHistory {
    cpu: MetricSeries,
    memory: MetricSeries,
    network_rx: MetricSeries,
    network_tx: MetricSeries,
    block_read: MetricSeries,
    block_write: MetricSeries,
    last_update: Option<DateTime<Utc>>,
    // Host facts from the most recent sample; not part of the snapshot.
    cpu_online: u64,
    memory_limit_bytes: u64,
}

impl MetricHistory {
    pub fn series(&self, channel: Channel) -> &MetricSeries {
        match channel {
            Channel::Cpu => &self.cpu,
            Channel::Memory => &self.memory,
            Channel::NetworkRx => &self.network_rx,
            Channel::NetworkTx => &self.network_tx,
            Channel::BlockRead => &self.block_read,
            Channel::BlockWrite => &self.block_write,
        }
    }

    fn series_mut(&mut self, channel: Channel) -> &mut MetricSeries {
        match channel {
            Channel::Cpu => &mut self.cpu,
            Channel::Memory => &mut self.memory,
            Channel::NetworkRx => &mut self.network_rx,
            Channel::NetworkTx => &mut self.network_tx,
            Channel::BlockRead => &mut self.block_read,
            Channel::BlockWrite => &mut self.block_write,
        }
    }

    /// Push one value onto a channel, evicting the oldest at capacity.
    pub fn append(&mut self, channel: Channel, time: DateTime<Utc>, value: f64) {
        self.series_mut(channel).push(time, value);
    }

    /// Record one collection tick: one sample appended to every channel.
    pub fn record(&mut self, at: DateTime<Utc>, usage: &SystemUsage) {
        self.append(Channel::Cpu, at, usage.cpu_usage_percent);
        self.append(Channel::Memory, at, usage.memory_usage_bytes as f64);
        self.append(Channel::NetworkRx, at, usage.network_rx_bytes as f64);
        self.append(Channel::NetworkTx, at, usage.network_tx_bytes as f64);
        self.append(Channel::BlockRead, at, usage.block_read_bytes as f64);
        self.append(Channel::BlockWrite, at, usage.block_write_bytes as f64);
        self.cpu_online = usage.cpu_online;
        self.memory_limit_bytes = usage.memory_limit_bytes;
        self.last_update = Some(at);
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub(crate) fn set_last_update(&mut self, at: Option<DateTime<Utc>>) {
        self.last_update = at;
    }

    pub fn cpu_online(&self) -> u64 {
        self.cpu_online
    }

    pub fn memory_limit_bytes(&self) -> u64 {
        self.memory_limit_bytes
    }

    /// Empty every series and forget the last update. Host facts (core
    /// count, memory limit) survive until the next sample overwrites them.
    pub fn clear(&mut self) {
        for channel in Channel::ALL {
            self.series_mut(channel).clear();
        }
        self.last_update = None;
    }
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Cpu,
        Channel::Memory,
        Channel::NetworkRx,
        Channel::NetworkTx,
        Channel::BlockRead,
        Channel::BlockWrite,
    ];
}

/// Thread-safe owner of the history plus its durable mirror.
pub struct Telemetry {
    history: Mutex<MetricHistory>,
    store: SnapshotStore,
}

impl Telemetry {
    /// Restore persisted history (cold start on any read failure).
    pub fn new(store: SnapshotStore) -> Self {
        let history = store.load();
        Self {
            history: Mutex::new(history),
            store,
        }
    }

    /// Record one tick and mirror the snapshot out. Persistence failures are
    /// logged, never surfaced: history stays usable in memory.
    pub fn record(&self, usage: &SystemUsage) {
        self.record_at(Utc::now(), usage);
    }

    pub fn record_at(&self, at: DateTime<Utc>, usage: &SystemUsage) {
        let history = {
            let mut history = self.history.lock().unwrap();
            history.record(at, usage);
            history.clone()
        };
        if let Err(e) = self.store.save(&history) {
            warn!(error = %e, "Failed to persist metric snapshot");
        }
    }

    /// Derived display scaling; recomputed from current contents, no
    /// mutation.
    pub fn scaling(&self, group: ChannelGroup) -> ScalingResult {
        compute_scaling(&self.history.lock().unwrap(), group)
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.history.lock().unwrap().last_update()
    }

    pub fn sample_count(&self, channel: Channel) -> usize {
        self.history.lock().unwrap().series(channel).len()
    }

    /// Clone of the full in-memory history, for presentation layers.
    pub fn history(&self) -> MetricHistory {
        self.history.lock().unwrap().clone()
    }

    /// Explicit "clear history": empties memory and removes the durable
    /// slot.
    pub fn clear(&self) {
        self.history.lock().unwrap().clear();
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear metric snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn sample(cpu: f64) -> SystemUsage {
        SystemUsage {
            cpu_online: 8,
            cpu_usage_percent: cpu,
            memory_usage_bytes: 512 * 1024 * 1024,
            memory_limit_bytes: 8 * 1024 * 1024 * 1024,
            network_rx_bytes: 1_000,
            network_tx_bytes: 2_000,
            block_read_bytes: 3_000,
            block_write_bytes: 4_000,
        }
    }

    #[test]
    fn record_appends_one_point_per_channel() {
        let mut history = MetricHistory::default();
        history.record(at(0), &sample(10.0));
        history.record(at(1), &sample(20.0));

        for channel in Channel::ALL {
            assert_eq!(history.series(channel).len(), 2, "channel {:?}", channel);
        }
        assert_eq!(history.last_update(), Some(at(1)));
        assert_eq!(history.cpu_online(), 8);
    }

    #[test]
    fn telemetry_restores_from_its_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        let telemetry = Telemetry::new(SnapshotStore::new(&path));
        telemetry.record_at(at(0), &sample(42.0));
        telemetry.record_at(at(1), &sample(43.0));

        let reborn = Telemetry::new(SnapshotStore::new(&path));
        assert_eq!(reborn.sample_count(Channel::Cpu), 2);
        assert_eq!(reborn.last_update(), Some(at(1)));
    }

    #[test]
    fn clear_empties_memory_and_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        let telemetry = Telemetry::new(SnapshotStore::new(&path));
        telemetry.record_at(at(0), &sample(42.0));
        telemetry.clear();

        assert_eq!(telemetry.sample_count(Channel::Cpu), 0);
        assert!(Telemetry::new(SnapshotStore::new(&path))
            .last_update()
            .is_none());
    }

    #[test]
    fn scenario_three_cpu_samples_on_eight_cores() {
        let dir = TempDir::new().unwrap();
        let telemetry = Telemetry::new(SnapshotStore::new(dir.path().join("h.json")));
        for i in 0..3 {
            telemetry.record_at(at(i), &sample(42.0));
        }
        let result = telemetry.scaling(ChannelGroup::Cpu);
        assert!((result.max_value - f64::min(46.2, 800.0)).abs() < 1e-9);
    }
}
