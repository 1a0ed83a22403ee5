//! Telemetry value types, random-walk smoothing, and display formatting.
//!
//! Everything here is pure: given a random number generator and the previous
//! walk state, produce the next readings and the strings a display needs.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Largest change a smoothed metric can make in one step.
pub const MAX_STEP: f64 = 2.5;

/// Upper bound (exclusive) of simulated uptime, in seconds.
pub const UPTIME_SPAN_SECS: u64 = 86_400;

/// Upper bound (exclusive) of simulated load averages.
pub const LOAD_SPAN: f64 = 2.0;

// ---------------------------------------------------------------------------
// MetricRange
// ---------------------------------------------------------------------------

/// Closed interval `[min, max]` a metric lives in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn clamp(self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn key(self) -> (u64, u64) {
        (self.min.to_bits(), self.max.to_bits())
    }
}

/// Bar fill for `value` within `[min, max]`, clamped to `0..=100` percent.
pub fn bar_percent(value: f64, min: f64, max: f64) -> f64 {
    let percentage = (value - min) / (max - min) * 100.0;
    percentage.clamp(0.0, 100.0)
}

// ---------------------------------------------------------------------------
// MetricMemory — bounded random walk keyed by range
// ---------------------------------------------------------------------------

/// Last emitted value per range, so successive samples form a bounded random
/// walk instead of independent draws.
#[derive(Debug, Clone, Default)]
pub struct MetricMemory {
    last: HashMap<(u64, u64), f64>,
}

impl MetricMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the walk for `range` by a uniform step in `[-MAX_STEP, MAX_STEP]`.
    ///
    /// The first call for a range starts from its midpoint.
    pub fn next_value<R: Rng>(&mut self, range: MetricRange, rng: &mut R) -> f64 {
        let last = self
            .last
            .entry(range.key())
            .or_insert_with(|| range.midpoint());
        let delta = rng.random_range(-MAX_STEP..=MAX_STEP);
        *last = range.clamp(*last + delta);
        *last
    }

    /// Last value emitted for `range`, if any.
    pub fn last(&self, range: MetricRange) -> Option<f64> {
        self.last.get(&range.key()).copied()
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

/// The four simulated sensor metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CpuTemp,
    MemoryUsage,
    CpuUsage,
    DiskUsage,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::CpuTemp,
        Metric::MemoryUsage,
        Metric::CpuUsage,
        Metric::DiskUsage,
    ];

    /// Range the simulated value walks within.
    pub fn range(self) -> MetricRange {
        match self {
            Self::CpuTemp => MetricRange::new(35.0, 75.0),
            Self::MemoryUsage => MetricRange::new(20.0, 80.0),
            Self::CpuUsage => MetricRange::new(10.0, 70.0),
            Self::DiskUsage => MetricRange::new(30.0, 60.0),
        }
    }

    /// Range the display bar spans.
    pub fn bar_range(self) -> MetricRange {
        match self {
            Self::CpuTemp => MetricRange::new(30.0, 75.0),
            Self::MemoryUsage | Self::CpuUsage | Self::DiskUsage => MetricRange::new(0.0, 100.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CpuTemp => "CPU Temperature",
            Self::MemoryUsage => "Memory Usage",
            Self::CpuUsage => "CPU Usage",
            Self::DiskUsage => "Disk Usage",
        }
    }

    pub fn format(self, value: f64) -> String {
        match self {
            Self::CpuTemp => format!("{value:.1}°C"),
            Self::MemoryUsage | Self::CpuUsage | Self::DiskUsage => format!("{value:.0}%"),
        }
    }

    pub fn reading(self, value: f64) -> SensorReading {
        let bar = self.bar_range();
        SensorReading {
            metric: self,
            value,
            text: self.format(value),
            bar_percent: bar_percent(value, bar.min, bar.max),
        }
    }
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// One formatted sensor value plus its bar width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub metric: Metric,
    pub value: f64,
    pub text: String,
    pub bar_percent: f64,
}

/// Readings for every metric from one refresh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub readings: Vec<SensorReading>,
}

impl SensorSnapshot {
    pub fn get(&self, metric: Metric) -> Option<&SensorReading> {
        self.readings.iter().find(|r| r.metric == metric)
    }
}

/// System information panel contents from one refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub uptime_secs: u64,
    pub uptime: String,
    pub load_average: [f64; 3],
    pub load_text: String,
    pub last_updated: String,
}

impl SystemInfo {
    pub fn new(uptime_secs: u64, load_average: [f64; 3], last_updated: String) -> Self {
        Self {
            uptime_secs,
            uptime: format_uptime(uptime_secs),
            load_average,
            load_text: format_load(load_average),
            last_updated,
        }
    }
}

/// Format seconds as `"Xd Yh Zm"`, dropping leading zero units.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// 1/5/15-minute load averages as `"a, b, c"` with two decimals.
pub fn format_load(load: [f64; 3]) -> String {
    format!("{:.2}, {:.2}, {:.2}", load[0], load[1], load[2])
}

/// Local wall-clock time as `HH:MM:SS`.
pub fn clock_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
