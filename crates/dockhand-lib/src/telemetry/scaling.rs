//! Display scaling for metric channels
//!
//! Pure functions over current series contents: nothing here mutates state,
//! so callers may recompute on every UI refresh. GB from 1024³ bytes, MB
//! from 1024², otherwise KB; the axis maximum gets 10% headroom, a small
//! nonzero floor, and is capped at core-count × 100 for CPU and at the
//! reported limit for memory.

use super::series::{Channel, SeriesPoint};
use super::MetricHistory;
use serde::{Deserialize, Serialize};
use std::fmt;

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Headroom multiplier applied to the observed peak.
const PEAK_HEADROOM: f64 = 1.1;
/// Axis floor for byte channels, in scaled units.
const BYTE_AXIS_FLOOR: f64 = 1.0;
/// Axis floor for the CPU channel, in percent.
const CPU_AXIS_FLOOR: f64 = 10.0;

/// Display unit for byte-valued channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ByteUnit {
    B,
    Kb,
    Mb,
    Gb,
}

impl ByteUnit {
    pub fn divisor(self) -> f64 {
        match self {
            ByteUnit::B => 1.0,
            ByteUnit::Kb => KIB,
            ByteUnit::Mb => MIB,
            ByteUnit::Gb => GIB,
        }
    }
}

impl fmt::Display for ByteUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ByteUnit::B => "B",
            ByteUnit::Kb => "KB",
            ByteUnit::Mb => "MB",
            ByteUnit::Gb => "GB",
        };
        f.write_str(s)
    }
}

/// Channel grouping used for presentation: network and block are dual-line
/// groups scaled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelGroup {
    Cpu,
    Memory,
    Network,
    Block,
}

impl ChannelGroup {
    fn channels(self) -> &'static [Channel] {
        match self {
            ChannelGroup::Cpu => &[Channel::Cpu],
            ChannelGroup::Memory => &[Channel::Memory],
            ChannelGroup::Network => &[Channel::NetworkRx, Channel::NetworkTx],
            ChannelGroup::Block => &[Channel::BlockRead, Channel::BlockWrite],
        }
    }
}

/// One channel's points converted into the selected unit.
#[derive(Debug, Clone)]
pub struct ScaledSeries {
    pub channel: Channel,
    pub points: Vec<SeriesPoint>,
}

/// Derived unit and axis metadata for one channel group. Never stored.
#[derive(Debug, Clone)]
pub struct ScalingResult {
    pub unit: ByteUnit,
    pub max_value: f64,
    pub series: Vec<ScaledSeries>,
}

/// Smallest natural unit for a peak byte magnitude. Empty series (peak 0)
/// default to KB.
pub fn select_unit(peak_bytes: f64) -> ByteUnit {
    if peak_bytes >= GIB {
        ByteUnit::Gb
    } else if peak_bytes >= MIB {
        ByteUnit::Mb
    } else {
        ByteUnit::Kb
    }
}

/// Compute display scaling for a channel group from current history.
pub fn compute_scaling(history: &MetricHistory, group: ChannelGroup) -> ScalingResult {
    match group {
        ChannelGroup::Cpu => scale_cpu(history),
        ChannelGroup::Memory => scale_bytes(history, group, history.memory_limit_bytes()),
        ChannelGroup::Network | ChannelGroup::Block => scale_bytes(history, group, 0),
    }
}

fn scale_cpu(history: &MetricHistory) -> ScalingResult {
    let series = history.series(Channel::Cpu);
    let peak = series.peak();
    let mut max_value = f64::max(peak * PEAK_HEADROOM, CPU_AXIS_FLOOR);
    // The axis never implies more parallelism than the host has.
    if history.cpu_online() > 0 {
        max_value = f64::min(max_value, history.cpu_online() as f64 * 100.0);
    }
    ScalingResult {
        unit: ByteUnit::B,
        max_value,
        series: vec![ScaledSeries {
            channel: Channel::Cpu,
            points: series.iter().copied().collect(),
        }],
    }
}

fn scale_bytes(history: &MetricHistory, group: ChannelGroup, limit_bytes: u64) -> ScalingResult {
    let channels = group.channels();
    let peak_bytes = channels
        .iter()
        .map(|&c| history.series(c).peak())
        .fold(0.0, f64::max);
    let unit = select_unit(peak_bytes);
    let divisor = unit.divisor();

    let mut max_value = f64::max(peak_bytes * PEAK_HEADROOM / divisor, BYTE_AXIS_FLOOR);
    if limit_bytes > 0 {
        max_value = f64::min(max_value, limit_bytes as f64 / divisor);
    }

    let series = channels
        .iter()
        .map(|&channel| ScaledSeries {
            channel,
            points: history
                .series(channel)
                .iter()
                .map(|p| SeriesPoint {
                    time: p.time,
                    value: p.value / divisor,
                })
                .collect(),
        })
        .collect();

    ScalingResult {
        unit,
        max_value,
        series,
    }
}
