pub mod monitor;
pub mod server;
pub mod snapshot;
pub mod watch;

use std::time::Duration;

use piworld_core::{Dashboard, DashboardConfig};

/// Interval and seed flags common to every subcommand.
#[derive(Debug, Clone, Copy)]
pub struct DashboardOptions {
    pub sensor_interval_ms: u64,
    pub system_interval_ms: u64,
    pub seed: Option<u64>,
}

impl DashboardOptions {
    pub fn config(&self) -> DashboardConfig {
        DashboardConfig {
            sensor_interval: Duration::from_millis(self.sensor_interval_ms),
            system_interval: Duration::from_millis(self.system_interval_ms),
            ..DashboardConfig::default()
        }
    }
}

/// Build a simulated dashboard from the command-line options.
pub fn make_dashboard(options: DashboardOptions) -> Dashboard {
    Dashboard::simulated(options.config(), options.seed)
}
