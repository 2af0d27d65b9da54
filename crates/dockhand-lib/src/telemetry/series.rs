//! Bounded per-channel time series

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Rolling-window length shared by every channel.
pub const SERIES_CAPACITY: usize = 120;

/// One named metric channel. Network and block channels are paired for
/// presentation but remain independent series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Cpu,
    Memory,
    NetworkRx,
    NetworkTx,
    BlockRead,
    BlockWrite,
}

/// A single timestamped value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

/// Ordered, bounded sequence of samples with FIFO eviction. `push` is the
/// only mutator; appending at capacity drops the oldest point.
#[derive(Debug, Clone)]
pub struct MetricSeries {
    points: VecDeque<SeriesPoint>,
    capacity: usize,
}

impl MetricSeries {
    pub fn new() -> Self {
        Self::with_capacity(SERIES_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, time: DateTime<Utc>, value: f64) {
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(SeriesPoint { time, value });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.back()
    }

    /// Largest absolute value currently held; 0.0 for an empty series.
    pub fn peak(&self) -> f64 {
        self.points.iter().map(|p| p.value.abs()).fold(0.0, f64::max)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl Default for MetricSeries {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        chrono::TimeZone::timestamp_opt(&Utc, 1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn never_exceeds_capacity_and_keeps_newest_in_order() {
        let mut series = MetricSeries::new();
        for i in 0..(SERIES_CAPACITY as i64 + 50) {
            series.push(at(i), i as f64);
        }

        assert_eq!(series.len(), SERIES_CAPACITY);
        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        let expected: Vec<f64> = (50..(SERIES_CAPACITY as i64 + 50)).map(|i| i as f64).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn short_series_keeps_everything() {
        let mut series = MetricSeries::new();
        for i in 0..10 {
            series.push(at(i), i as f64);
        }
        assert_eq!(series.len(), 10);
        assert_eq!(series.latest().unwrap().value, 9.0);
    }

    #[test]
    fn peak_is_zero_for_empty_series() {
        assert_eq!(MetricSeries::new().peak(), 0.0);
    }

    #[test]
    fn peak_tracks_largest_magnitude() {
        let mut series = MetricSeries::new();
        series.push(at(0), 3.0);
        series.push(at(1), 42.0);
        series.push(at(2), 7.0);
        assert_eq!(series.peak(), 42.0);
    }
}
