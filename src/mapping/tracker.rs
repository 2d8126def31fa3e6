//! Running-maximum trackers for sensor axes
//!
//! The largest magnitude seen on an axis since the last reset defines full
//! scale for that axis, so the response calibrates itself to the session
//! rather than to physical units.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One scalar component of a sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Tracks the current magnitude and running maximum of one axis
///
/// `running_max >= current_abs >= 0` holds after every update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisTracker {
    current_abs: f64,
    running_max: f64,
}

impl AxisTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a raw reading, returning `(abs_value, running_max)`
    ///
    /// Non-finite readings leave the tracker untouched.
    pub fn update(&mut self, raw: f64) -> (f64, f64) {
        if raw.is_finite() {
            self.current_abs = raw.abs();
            if self.current_abs > self.running_max {
                self.running_max = self.current_abs;
            }
        }
        (self.current_abs, self.running_max)
    }

    pub fn current_abs(&self) -> f64 {
        self.current_abs
    }

    pub fn running_max(&self) -> f64 {
        self.running_max
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Trackers for all three axes of the active sensor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisTrackers {
    trackers: [AxisTracker; 3],
}

impl AxisTrackers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, axis: Axis, raw: f64) -> (f64, f64) {
        self.trackers[axis.index()].update(raw)
    }

    pub fn get(&self, axis: Axis) -> &AxisTracker {
        &self.trackers[axis.index()]
    }

    /// Zero every axis, starting a new epoch
    pub fn reset(&mut self) {
        for tracker in &mut self.trackers {
            tracker.reset();
        }
    }
}
