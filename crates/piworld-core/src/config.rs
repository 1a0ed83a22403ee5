//! Dashboard configuration: refresh periods, presets, initial LED state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::led::{LedColor, LedState};
use crate::scheduler::RefreshJob;

/// Default sensor refresh period.
pub const DEFAULT_SENSOR_INTERVAL: Duration = Duration::from_millis(2000);

/// Default system-info refresh period.
pub const DEFAULT_SYSTEM_INTERVAL: Duration = Duration::from_millis(5000);

/// A named color button on the LED panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub color: LedColor,
}

impl Preset {
    pub fn new(name: &str, color: LedColor) -> Self {
        Self {
            name: name.to_string(),
            color,
        }
    }
}

/// The color buttons shown by default.
pub fn default_presets() -> Vec<Preset> {
    vec![
        Preset::new("red", LedColor::from_rgb(0xff, 0x00, 0x00)),
        Preset::new("green", LedColor::from_rgb(0x00, 0xff, 0x00)),
        Preset::new("blue", LedColor::from_rgb(0x00, 0x00, 0xff)),
        Preset::new("white", LedColor::from_rgb(0xff, 0xff, 0xff)),
        Preset::new("yellow", LedColor::from_rgb(0xff, 0xff, 0x00)),
        Preset::new("magenta", LedColor::from_rgb(0xff, 0x00, 0xff)),
        Preset::new("cyan", LedColor::from_rgb(0x00, 0xff, 0xff)),
        Preset::new("orange", LedColor::from_rgb(0xff, 0xa5, 0x00)),
    ]
}

/// Configuration for a [`Dashboard`](crate::Dashboard).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub sensor_interval: Duration,
    pub system_interval: Duration,
    pub initial_led: LedState,
    pub presets: Vec<Preset>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sensor_interval: DEFAULT_SENSOR_INTERVAL,
            system_interval: DEFAULT_SYSTEM_INTERVAL,
            initial_led: LedState::default(),
            presets: default_presets(),
        }
    }
}

impl DashboardConfig {
    /// Job table for [`Scheduler::new`](crate::Scheduler::new).
    pub fn refresh_jobs(&self) -> [(RefreshJob, Duration); 2] {
        [
            (RefreshJob::Sensors, self.sensor_interval),
            (RefreshJob::SystemInfo, self.system_interval),
        ]
    }

    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_cadence() {
        let config = DashboardConfig::default();
        assert_eq!(config.sensor_interval, Duration::from_secs(2));
        assert_eq!(config.system_interval, Duration::from_secs(5));
        assert!(!config.initial_led.on);
        assert_eq!(config.initial_led.color.to_string(), "#ff0000");
        assert_eq!(config.initial_led.brightness.percent(), 100);
    }

    #[test]
    fn preset_lookup_ignores_case() {
        let config = DashboardConfig::default();
        assert_eq!(
            config.preset("Blue").map(|p| p.color.to_string()),
            Some("#0000ff".to_string())
        );
        assert!(config.preset("ultraviolet").is_none());
    }

    #[test]
    fn preset_names_unique() {
        let presets = default_presets();
        for (i, a) in presets.iter().enumerate() {
            for b in &presets[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
