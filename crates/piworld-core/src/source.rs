//! Telemetry source abstraction.
//!
//! A [`TelemetrySource`] stands in for the sensor-polling service a real
//! deployment would query. The only implementation shipped here is
//! [`SimulatedTelemetry`], which fabricates plausible readings with a bounded
//! random walk.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::telemetry::{
    LOAD_SPAN, Metric, MetricMemory, SensorSnapshot, SystemInfo, UPTIME_SPAN_SECS, clock_time,
};

/// Produces sensor and system readings on demand.
pub trait TelemetrySource: Send {
    /// Short name for logs and the API index.
    fn name(&self) -> &str;

    /// Read all four sensor metrics.
    fn sensors(&mut self) -> SensorSnapshot;

    /// Read uptime, load averages, and the refresh timestamp.
    fn system(&mut self) -> SystemInfo;
}

/// Random-walk telemetry generator.
///
/// Uptime is drawn uniformly from `[0, 86400)` on every call rather than
/// counting up.
pub struct SimulatedTelemetry<R = StdRng> {
    rng: R,
    memory: MetricMemory,
}

impl SimulatedTelemetry<StdRng> {
    /// Seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Deterministic sequence for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for SimulatedTelemetry<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SimulatedTelemetry<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            memory: MetricMemory::new(),
        }
    }
}

impl<R: Rng + Send> TelemetrySource for SimulatedTelemetry<R> {
    fn name(&self) -> &str {
        "simulated"
    }

    fn sensors(&mut self) -> SensorSnapshot {
        let readings = Metric::ALL
            .iter()
            .map(|&metric| {
                let value = self.memory.next_value(metric.range(), &mut self.rng);
                metric.reading(value)
            })
            .collect();
        SensorSnapshot { readings }
    }

    fn system(&mut self) -> SystemInfo {
        let uptime_secs = self.rng.random_range(0..UPTIME_SPAN_SECS);
        let load_average = [
            self.rng.random_range(0.0..LOAD_SPAN),
            self.rng.random_range(0.0..LOAD_SPAN),
            self.rng.random_range(0.0..LOAD_SPAN),
        ];
        SystemInfo::new(uptime_secs, load_average, clock_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::MAX_STEP;

    #[test]
    fn sensors_cover_every_metric_in_order() {
        let mut source = SimulatedTelemetry::seeded(11);
        let snapshot = source.sensors();
        let metrics: Vec<Metric> = snapshot.readings.iter().map(|r| r.metric).collect();
        assert_eq!(metrics, Metric::ALL.to_vec());
    }

    #[test]
    fn sensors_walk_within_ranges() {
        let mut source = SimulatedTelemetry::seeded(5);
        let mut prev = source.sensors();
        for _ in 0..500 {
            let next = source.sensors();
            for metric in Metric::ALL {
                let a = prev.get(metric).unwrap();
                let b = next.get(metric).unwrap();
                assert!(metric.range().contains(b.value));
                assert!((b.value - a.value).abs() <= MAX_STEP);
                assert!((0.0..=100.0).contains(&b.bar_percent));
            }
            prev = next;
        }
    }

    #[test]
    fn seeded_sources_repeat() {
        let mut a = SimulatedTelemetry::seeded(99);
        let mut b = SimulatedTelemetry::seeded(99);
        for _ in 0..10 {
            assert_eq!(a.sensors(), b.sensors());
        }
    }

    #[test]
    fn system_info_in_bounds() {
        let mut source = SimulatedTelemetry::seeded(2);
        for _ in 0..200 {
            let info = source.system();
            assert!(info.uptime_secs < UPTIME_SPAN_SECS);
            assert!(info.load_average.iter().all(|l| (0.0..LOAD_SPAN).contains(l)));
            assert_eq!(info.load_text.split(", ").count(), 3);
            assert!(!info.uptime.is_empty());
        }
    }

    #[test]
    fn name_is_simulated() {
        assert_eq!(SimulatedTelemetry::seeded(0).name(), "simulated");
    }
}
