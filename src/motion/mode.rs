//! Cyclic sensor mode state machine

use super::SensorMode;

/// Tracks which sensor is active
///
/// Modes advance one step at a time, Gyroscope → Accelerometer →
/// Magnetometer → Gyroscope. There is no terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeMachine {
    current: SensorMode,
    transitions: u64,
}

/// A completed mode change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: SensorMode,
    pub to: SensorMode,
}

impl ModeMachine {
    pub fn new() -> Self {
        Self::starting_at(SensorMode::Gyroscope)
    }

    pub fn starting_at(mode: SensorMode) -> Self {
        Self {
            current: mode,
            transitions: 0,
        }
    }

    pub fn current(&self) -> SensorMode {
        self.current
    }

    /// Number of transitions since creation
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Move to the next mode in the cycle
    pub fn advance(&mut self) -> ModeTransition {
        let from = self.current;
        self.current = from.next();
        self.transitions += 1;
        ModeTransition {
            from,
            to: self.current,
        }
    }
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new()
    }
}
