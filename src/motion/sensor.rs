//! Motion sensor trait and sample definition

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::mapping::Axis;

/// The sensor currently feeding the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorMode {
    /// Rotation rate, rad/s
    Gyroscope,
    /// Acceleration, g
    Accelerometer,
    /// Magnetic field, microtesla
    Magnetometer,
}

impl SensorMode {
    pub const ALL: [SensorMode; 3] = [
        SensorMode::Gyroscope,
        SensorMode::Accelerometer,
        SensorMode::Magnetometer,
    ];

    /// The mode that follows this one in the cycle
    pub fn next(self) -> Self {
        match self {
            SensorMode::Gyroscope => SensorMode::Accelerometer,
            SensorMode::Accelerometer => SensorMode::Magnetometer,
            SensorMode::Magnetometer => SensorMode::Gyroscope,
        }
    }

    /// Human-readable label for display
    pub fn label(self) -> &'static str {
        match self {
            SensorMode::Gyroscope => "Gyroscope",
            SensorMode::Accelerometer => "Accelerometer",
            SensorMode::Magnetometer => "Magnetometer",
        }
    }
}

impl fmt::Display for SensorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One three-axis reading, ordered by the tick that captured it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SensorSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Source of motion readings
///
/// Acquisition runs at whatever rate the device pushes; the pipeline only
/// ever asks for the latest reading of the active mode.
pub trait MotionSensor: Send {
    /// Begin acquiring readings for `mode`
    fn start_stream(&mut self, mode: SensorMode) -> Result<()>;

    /// Stop acquiring readings for `mode`
    fn stop_stream(&mut self, mode: SensorMode);

    /// Most recent reading for `mode`, if its stream is producing any
    fn latest_sample(&mut self, mode: SensorMode) -> Option<SensorSample>;

    /// Whether the device has this sensor at all
    fn is_available(&self, _mode: SensorMode) -> bool {
        true
    }
}

impl<M: MotionSensor + ?Sized> MotionSensor for Box<M> {
    fn start_stream(&mut self, mode: SensorMode) -> Result<()> {
        (**self).start_stream(mode)
    }

    fn stop_stream(&mut self, mode: SensorMode) {
        (**self).stop_stream(mode)
    }

    fn latest_sample(&mut self, mode: SensorMode) -> Option<SensorSample> {
        (**self).latest_sample(mode)
    }

    fn is_available(&self, mode: SensorMode) -> bool {
        (**self).is_available(mode)
    }
}
