//! LED control state and preview rendering.
//!
//! The LED is a simulated actuator: state is a color, a brightness, and an
//! on/off flag. [`LedPreview`] is the pure description of how a rendering
//! adapter should draw it (fill, opacity, glow). Adapters never compute
//! styles themselves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Fill color used for the preview while the LED is off.
pub const OFF_BACKGROUND: LedColor = LedColor([0x33, 0x33, 0x33]);

/// Preview opacity while the LED is off.
pub const OFF_OPACITY: f64 = 0.3;

/// Glow layers drawn around a lit LED: (blur radius in px, alpha).
pub const GLOW_LAYERS: [(u32, f64); 2] = [(30, 0.6), (60, 0.4)];

// ---------------------------------------------------------------------------
// LedColor
// ---------------------------------------------------------------------------

/// A `#RRGGBB` color. Displays as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LedColor([u8; 3]);

impl LedColor {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Parse a `#RRGGBB` string (hex digits in either case).
    pub fn parse(value: &str) -> Result<Self, DashboardError> {
        let invalid = || DashboardError::InvalidColor(value.to_string());
        let digits = value.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (self.0[0], self.0[1], self.0[2])
    }

    /// CSS `rgba(r, g, b, alpha)` for glow layering.
    pub fn to_rgba(self, alpha: f64) -> String {
        let (r, g, b) = self.rgb();
        format!("rgba({r}, {g}, {b}, {alpha})")
    }
}

impl fmt::Display for LedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.rgb();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for LedColor {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LedColor {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LedColor> for String {
    fn from(color: LedColor) -> Self {
        color.to_string()
    }
}

/// Convert a `#RRGGBB` string into a CSS `rgba(...)` string.
///
/// Malformed input is reported as [`DashboardError::InvalidColor`].
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Result<String, DashboardError> {
    LedColor::parse(hex).map(|c| c.to_rgba(alpha))
}

// ---------------------------------------------------------------------------
// Brightness
// ---------------------------------------------------------------------------

/// LED brightness in percent, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Brightness(u8);

impl Brightness {
    pub const MAX: Brightness = Brightness(100);

    pub fn new(percent: u8) -> Result<Self, DashboardError> {
        if percent > 100 {
            return Err(DashboardError::InvalidBrightness(percent.to_string()));
        }
        Ok(Self(percent))
    }

    /// Parse the value of a brightness slider.
    pub fn parse(value: &str) -> Result<Self, DashboardError> {
        let percent: u8 = value
            .trim()
            .parse()
            .map_err(|_| DashboardError::InvalidBrightness(value.to_string()))?;
        Self::new(percent).map_err(|_| DashboardError::InvalidBrightness(value.to_string()))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// Step by `delta` percent, saturating at both ends.
    pub fn step(self, delta: i16) -> Self {
        Self((i16::from(self.0) + delta).clamp(0, 100) as u8)
    }

    pub fn opacity(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Text shown next to the slider, e.g. `"75%"`.
    pub fn label(self) -> String {
        format!("{}%", self.0)
    }
}

impl TryFrom<u8> for Brightness {
    type Error = DashboardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Brightness> for u8 {
    fn from(b: Brightness) -> Self {
        b.0
    }
}

// ---------------------------------------------------------------------------
// LedState / LedCommand
// ---------------------------------------------------------------------------

/// Current state of the simulated LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedState {
    pub on: bool,
    pub color: LedColor,
    pub brightness: Brightness,
}

impl Default for LedState {
    fn default() -> Self {
        Self {
            on: false,
            color: LedColor::from_rgb(0xff, 0x00, 0x00),
            brightness: Brightness::MAX,
        }
    }
}

/// Command forwarded to the actuator when power is toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedCommand {
    On,
    Off,
}

impl LedCommand {
    pub fn for_power(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl fmt::Display for LedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "on"),
            Self::Off => write!(f, "off"),
        }
    }
}

// ---------------------------------------------------------------------------
// LedPreview
// ---------------------------------------------------------------------------

/// How the LED preview element should look.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedPreview {
    pub background: LedColor,
    pub opacity: f64,
    /// CSS `box-shadow` value, `"none"` when unlit.
    pub box_shadow: String,
    pub glow: bool,
}

impl LedPreview {
    pub fn render(state: &LedState) -> Self {
        if !state.on {
            return Self {
                background: OFF_BACKGROUND,
                opacity: OFF_OPACITY,
                box_shadow: "none".to_string(),
                glow: false,
            };
        }
        let box_shadow = GLOW_LAYERS
            .iter()
            .map(|&(blur, alpha)| format!("0 0 {blur}px {}", state.color.to_rgba(alpha)))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            background: state.color,
            opacity: state.brightness.opacity(),
            box_shadow,
            glow: true,
        }
    }

    /// Background blended toward black by opacity, for surfaces without alpha.
    pub fn dimmed_rgb(&self) -> (u8, u8, u8) {
        let scale = |c: u8| (f64::from(c) * self.opacity).round() as u8;
        let (r, g, b) = self.background.rgb();
        (scale(r), scale(g), scale(b))
    }
}
