//! # piworld-core
//!
//! State and formatting layer for the Pi World dashboard: simulated device
//! telemetry (CPU temperature, memory / CPU / disk usage, uptime, load
//! average) and a mock LED control panel (color, brightness, power).
//!
//! ## Quick Start
//!
//! ```
//! use piworld_core::{Dashboard, DashboardConfig};
//! use std::time::{Duration, Instant};
//!
//! let mut dashboard = Dashboard::simulated(DashboardConfig::default(), Some(7));
//! let mut scheduler = dashboard.initialize().unwrap();
//!
//! dashboard.set_power(true).unwrap();
//! dashboard.set_brightness("50").unwrap();
//! assert_eq!(dashboard.preview().opacity, 0.5);
//!
//! let t0 = Instant::now();
//! scheduler.start(t0).unwrap();
//! for job in scheduler.poll(t0 + Duration::from_secs(2)) {
//!     dashboard.run(job);
//! }
//! assert_eq!(dashboard.snapshot().sensor_refreshes, 2);
//! ```
//!
//! ## Architecture
//!
//! Control events → [`Dashboard`] → [`DashboardSnapshot`] → rendering adapter
//!
//! - [`TelemetrySource`] supplies readings. [`SimulatedTelemetry`] walks each
//!   metric within a fixed range, moving at most 2.5 units per refresh.
//! - [`LedActuator`] receives power commands. [`LoggingActuator`] only logs.
//! - [`Scheduler`] decides when the sensor (2 s) and system-info (5 s)
//!   refreshes are due; the host loop executes them.

pub mod actuator;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod led;
pub mod scheduler;
pub mod source;
pub mod telemetry;

pub use actuator::{LedActuator, LoggingActuator, RecordingActuator};
pub use config::{
    DEFAULT_SENSOR_INTERVAL, DEFAULT_SYSTEM_INTERVAL, DashboardConfig, Preset, default_presets,
};
pub use dashboard::{ControlEvent, Dashboard, DashboardSnapshot};
pub use error::DashboardError;
pub use led::{Brightness, LedColor, LedCommand, LedPreview, LedState, hex_to_rgba};
pub use scheduler::{RefreshJob, Scheduler, SchedulerState};
pub use source::{SimulatedTelemetry, TelemetrySource};
pub use telemetry::{
    Metric, MetricMemory, MetricRange, SensorReading, SensorSnapshot, SystemInfo, bar_percent,
    format_load, format_uptime,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
