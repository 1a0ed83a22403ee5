//! LED actuator boundary.
//!
//! Power changes are forwarded to an [`LedActuator`] together with the full
//! LED state. The shipped [`LoggingActuator`] only writes a log line; a
//! hardware or HTTP-backed actuator slots in behind the same trait.

use crate::error::DashboardError;
use crate::led::{LedCommand, LedState};

/// Receives LED control commands.
pub trait LedActuator: Send {
    fn send(&mut self, command: LedCommand, state: &LedState) -> Result<(), DashboardError>;
}

/// Logs every command at `info` level and always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingActuator;

impl LedActuator for LoggingActuator {
    fn send(&mut self, command: LedCommand, state: &LedState) -> Result<(), DashboardError> {
        let payload = serde_json::to_string(state).unwrap_or_default();
        log::info!("LED command: {command} {payload}");
        Ok(())
    }
}

/// Keeps every command in memory. Handy for adapters that want to show a
/// command history, and for tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingActuator {
    sent: Vec<(LedCommand, LedState)>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[(LedCommand, LedState)] {
        &self.sent
    }
}

impl LedActuator for RecordingActuator {
    fn send(&mut self, command: LedCommand, state: &LedState) -> Result<(), DashboardError> {
        self.sent.push((command, *state));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_actuator_accepts_everything() {
        let mut actuator = LoggingActuator;
        assert!(actuator.send(LedCommand::On, &LedState::default()).is_ok());
        assert!(actuator.send(LedCommand::Off, &LedState::default()).is_ok());
    }

    #[test]
    fn recording_actuator_keeps_order() {
        let mut actuator = RecordingActuator::new();
        let on = LedState {
            on: true,
            ..LedState::default()
        };
        actuator.send(LedCommand::On, &on).unwrap();
        actuator.send(LedCommand::Off, &LedState::default()).unwrap();
        let sent = actuator.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], (LedCommand::On, on));
        assert_eq!(sent[1].0, LedCommand::Off);
    }
}
