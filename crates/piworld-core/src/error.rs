//! Error type shared by the dashboard, scheduler, and actuator boundary.

use std::time::Duration;

/// Everything that can go wrong while driving the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// Color input was not a `#RRGGBB` string.
    InvalidColor(String),
    /// Brightness input was not an integer in `0..=100`.
    InvalidBrightness(String),
    /// No preset with this name is configured.
    UnknownPreset(String),
    /// A refresh period of zero was requested.
    InvalidInterval(Duration),
    /// `start` was called after `dispose`.
    SchedulerDisposed,
    /// The LED actuator rejected a command.
    Actuator(String),
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidColor(value) => {
                write!(f, "invalid color {value:?}: expected #RRGGBB")
            }
            Self::InvalidBrightness(value) => {
                write!(f, "invalid brightness {value:?}: expected an integer 0-100")
            }
            Self::UnknownPreset(name) => write!(f, "unknown preset: {name}"),
            Self::InvalidInterval(period) => {
                write!(f, "refresh interval must be non-zero (got {period:?})")
            }
            Self::SchedulerDisposed => write!(f, "scheduler has been disposed"),
            Self::Actuator(msg) => write!(f, "LED actuator failed: {msg}"),
        }
    }
}

impl std::error::Error for DashboardError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_bad_input() {
        let err = DashboardError::InvalidColor("#zz0000".into());
        assert!(err.to_string().contains("#zz0000"));

        let err = DashboardError::InvalidBrightness("150".into());
        assert!(err.to_string().contains("150"));
        assert!(err.to_string().contains("0-100"));
    }

    #[test]
    fn disposed_message() {
        assert_eq!(
            DashboardError::SchedulerDisposed.to_string(),
            "scheduler has been disposed"
        );
    }
}
