//! The dashboard controller.
//!
//! [`Dashboard`] owns the LED panel state and the latest telemetry, turns
//! [`ControlEvent`]s into state changes, and runs refresh jobs on request.
//! It never touches a rendering surface: adapters read a [`DashboardSnapshot`]
//! and draw it however they like.

use serde::{Deserialize, Serialize};

use crate::actuator::{LedActuator, LoggingActuator};
use crate::config::{DashboardConfig, Preset};
use crate::error::DashboardError;
use crate::led::{Brightness, LedColor, LedCommand, LedPreview, LedState};
use crate::scheduler::{RefreshJob, Scheduler};
use crate::source::{SimulatedTelemetry, TelemetrySource};
use crate::telemetry::{SensorSnapshot, SystemInfo};

/// A user interaction with the LED panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ControlEvent {
    /// Color picker moved; carries the picker's `#RRGGBB` value.
    ColorInput(String),
    /// Brightness slider moved; carries the slider's raw value.
    BrightnessInput(String),
    PowerOn,
    PowerOff,
    /// Preset button pressed; carries the button's color.
    Preset(String),
}

/// Everything a rendering adapter needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub led: LedState,
    pub picker_color: LedColor,
    pub brightness_label: String,
    pub preview: LedPreview,
    pub presets: Vec<Preset>,
    pub sensors: Option<SensorSnapshot>,
    pub system: Option<SystemInfo>,
    pub sensor_refreshes: u64,
    pub system_refreshes: u64,
}

pub struct Dashboard {
    config: DashboardConfig,
    led: LedState,
    picker_color: LedColor,
    preview: LedPreview,
    source: Box<dyn TelemetrySource>,
    actuator: Box<dyn LedActuator>,
    sensors: Option<SensorSnapshot>,
    system: Option<SystemInfo>,
    sensor_refreshes: u64,
    system_refreshes: u64,
}

impl Dashboard {
    pub fn new(
        config: DashboardConfig,
        source: Box<dyn TelemetrySource>,
        actuator: Box<dyn LedActuator>,
    ) -> Self {
        let led = config.initial_led;
        Self {
            led,
            picker_color: led.color,
            preview: LedPreview::render(&led),
            config,
            source,
            actuator,
            sensors: None,
            system: None,
            sensor_refreshes: 0,
            system_refreshes: 0,
        }
    }

    /// Random-walk telemetry and a logging actuator. `seed` makes the
    /// telemetry sequence reproducible.
    pub fn simulated(config: DashboardConfig, seed: Option<u64>) -> Self {
        let source = match seed {
            Some(seed) => SimulatedTelemetry::seeded(seed),
            None => SimulatedTelemetry::new(),
        };
        Self::new(config, Box::new(source), Box::new(LoggingActuator))
    }

    /// Render the LED preview, refresh everything once, and hand back a
    /// stopped scheduler for the two refresh cycles.
    pub fn initialize(&mut self) -> Result<Scheduler, DashboardError> {
        let scheduler = Scheduler::new(&self.config.refresh_jobs())?;
        self.render_led_preview();
        self.refresh_sensors();
        self.refresh_system_info();
        log::info!(
            "Pi World dashboard initialized (telemetry: {}, sensors every {:?}, system every {:?})",
            self.source.name(),
            self.config.sensor_interval,
            self.config.system_interval
        );
        Ok(scheduler)
    }

    // -----------------------------------------------------------------------
    // LED controls
    // -----------------------------------------------------------------------

    pub fn set_color(&mut self, value: &str) -> Result<(), DashboardError> {
        let color = LedColor::parse(value)?;
        self.set_led_color(color);
        Ok(())
    }

    pub fn set_led_color(&mut self, color: LedColor) {
        self.led.color = color;
        self.picker_color = color;
        self.render_led_preview();
    }

    /// Apply a raw slider value. Returns the new label text, e.g. `"40%"`.
    pub fn set_brightness(&mut self, value: &str) -> Result<String, DashboardError> {
        let brightness = Brightness::parse(value)?;
        Ok(self.set_brightness_level(brightness))
    }

    pub fn set_brightness_level(&mut self, brightness: Brightness) -> String {
        self.led.brightness = brightness;
        self.render_led_preview();
        brightness.label()
    }

    /// Switch the LED and forward the command to the actuator.
    ///
    /// State is updated even when the actuator fails; the error is returned
    /// so the adapter can surface it.
    pub fn set_power(&mut self, on: bool) -> Result<(), DashboardError> {
        self.led.on = on;
        self.render_led_preview();
        let command = LedCommand::for_power(on);
        self.actuator.send(command, &self.led).inspect_err(|e| {
            log::warn!("LED command {command} failed: {e}");
        })
    }

    /// Set the color from a preset button and move the picker to match.
    pub fn apply_preset(&mut self, color: &str) -> Result<(), DashboardError> {
        let color = LedColor::parse(color)?;
        self.set_led_color(color);
        Ok(())
    }

    pub fn apply_preset_named(&mut self, name: &str) -> Result<(), DashboardError> {
        let color = self
            .config
            .preset(name)
            .map(|p| p.color)
            .ok_or_else(|| DashboardError::UnknownPreset(name.to_string()))?;
        self.set_led_color(color);
        Ok(())
    }

    pub fn render_led_preview(&mut self) -> &LedPreview {
        self.preview = LedPreview::render(&self.led);
        &self.preview
    }

    /// Dispatch a control event to the matching setter.
    pub fn handle(&mut self, event: ControlEvent) -> Result<(), DashboardError> {
        match event {
            ControlEvent::ColorInput(value) => self.set_color(&value),
            ControlEvent::BrightnessInput(value) => self.set_brightness(&value).map(|_| ()),
            ControlEvent::PowerOn => self.set_power(true),
            ControlEvent::PowerOff => self.set_power(false),
            ControlEvent::Preset(color) => self.apply_preset(&color),
        }
    }

    // -----------------------------------------------------------------------
    // Refresh
    // -----------------------------------------------------------------------

    pub fn refresh_sensors(&mut self) -> &SensorSnapshot {
        let snapshot = self.source.sensors();
        self.sensor_refreshes += 1;
        log::debug!("sensor refresh #{}", self.sensor_refreshes);
        self.sensors.insert(snapshot)
    }

    pub fn refresh_system_info(&mut self) -> &SystemInfo {
        let info = self.source.system();
        self.system_refreshes += 1;
        log::debug!("system info refresh #{}", self.system_refreshes);
        self.system.insert(info)
    }

    pub fn run(&mut self, job: RefreshJob) {
        match job {
            RefreshJob::Sensors => {
                self.refresh_sensors();
            }
            RefreshJob::SystemInfo => {
                self.refresh_system_info();
            }
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn led(&self) -> &LedState {
        &self.led
    }
    pub fn picker_color(&self) -> LedColor {
        self.picker_color
    }
    pub fn brightness_label(&self) -> String {
        self.led.brightness.label()
    }
    pub fn preview(&self) -> &LedPreview {
        &self.preview
    }
    pub fn sensors(&self) -> Option<&SensorSnapshot> {
        self.sensors.as_ref()
    }
    pub fn system_info(&self) -> Option<&SystemInfo> {
        self.system.as_ref()
    }
    pub fn presets(&self) -> &[Preset] {
        &self.config.presets
    }
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            led: self.led,
            picker_color: self.picker_color,
            brightness_label: self.brightness_label(),
            preview: self.preview.clone(),
            presets: self.config.presets.clone(),
            sensors: self.sensors.clone(),
            system: self.system.clone(),
            sensor_refreshes: self.sensor_refreshes,
            system_refreshes: self.system_refreshes,
        }
    }
}
