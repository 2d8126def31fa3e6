//! Scripted motion source
//!
//! Replays readings captured from a device, loaded from a JSON file:
//!
//! ```json
//! {
//!   "looped": true,
//!   "gyroscope": [{ "x": 0.4, "y": -0.1, "z": 0.0 }],
//!   "magnetometer": [{ "x": 38.0, "y": -12.5, "z": -40.2 }]
//! }
//! ```

use super::{MotionSensor, SensorMode, SensorSample};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Recorded readings per sensor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MotionScript {
    /// Start over when a sensor's readings run out
    #[serde(default)]
    pub looped: bool,

    #[serde(default)]
    pub gyroscope: Vec<SensorSample>,

    #[serde(default)]
    pub accelerometer: Vec<SensorSample>,

    #[serde(default)]
    pub magnetometer: Vec<SensorSample>,
}

impl MotionScript {
    /// Load a script from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read motion script: {:?}", path))?;
        let script: MotionScript = serde_json::from_str(&contents)
            .with_context(|| format!("invalid motion script: {:?}", path))?;
        Ok(script)
    }

    fn readings(&self, mode: SensorMode) -> &[SensorSample] {
        match mode {
            SensorMode::Gyroscope => &self.gyroscope,
            SensorMode::Accelerometer => &self.accelerometer,
            SensorMode::Magnetometer => &self.magnetometer,
        }
    }
}

/// Motion source that plays back a [`MotionScript`]
///
/// A sensor with no readings in the script is treated as missing.
pub struct ScriptedMotion {
    script: MotionScript,
    active: Option<SensorMode>,
    cursor: usize,
}

impl ScriptedMotion {
    pub fn new(script: MotionScript) -> Self {
        Self {
            script,
            active: None,
            cursor: 0,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(MotionScript::load(path)?))
    }
}

impl MotionSensor for ScriptedMotion {
    fn start_stream(&mut self, mode: SensorMode) -> Result<()> {
        if !self.is_available(mode) {
            bail!("script has no {} readings", mode);
        }
        self.active = Some(mode);
        self.cursor = 0;
        Ok(())
    }

    fn stop_stream(&mut self, mode: SensorMode) {
        if self.active == Some(mode) {
            self.active = None;
        }
    }

    fn latest_sample(&mut self, mode: SensorMode) -> Option<SensorSample> {
        if self.active != Some(mode) {
            return None;
        }

        let readings = self.script.readings(mode);
        let index = if self.script.looped {
            self.cursor % readings.len()
        } else {
            self.cursor
        };
        let sample = readings.get(index).copied();
        if sample.is_some() {
            self.cursor += 1;
        }
        sample
    }

    fn is_available(&self, mode: SensorMode) -> bool {
        !self.script.readings(mode).is_empty()
    }
}
