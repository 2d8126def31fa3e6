//! Simulated motion source
//!
//! Produces smooth, repeatable gestures for each sensor so the pipeline can
//! run on machines without motion hardware.

use super::{MotionSensor, SensorMode, SensorSample};
use anyhow::{bail, Result};
use log::debug;
use std::collections::HashSet;
use std::f64::consts::TAU;
use std::time::Duration;

/// Deterministic motion generator
///
/// Every call to `latest_sample` advances the simulated clock by one step,
/// so a run with the same step length always yields the same readings.
pub struct SimulatedMotion {
    step: f64,
    elapsed: f64,
    active: Option<SensorMode>,
    unavailable: HashSet<SensorMode>,
}

impl SimulatedMotion {
    /// Create a simulator advancing `step` per reading
    pub fn new(step: Duration) -> Self {
        Self {
            step: step.as_secs_f64(),
            elapsed: 0.0,
            active: None,
            unavailable: HashSet::new(),
        }
    }

    /// Mark sensors the simulated device lacks
    pub fn without(mut self, modes: impl IntoIterator<Item = SensorMode>) -> Self {
        self.unavailable.extend(modes);
        self
    }

    /// Simulated seconds since creation
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed
    }

    fn sample_at(mode: SensorMode, t: f64) -> SensorSample {
        match mode {
            // Slow wrist rotations with a swelling envelope
            SensorMode::Gyroscope => SensorSample::new(
                3.0 * (TAU * 0.11 * t).sin() * (1.0 + 0.5 * (TAU * 0.02 * t).sin()),
                2.0 * (TAU * 0.17 * t + 1.0).sin(),
                1.5 * (TAU * 0.08 * t + 2.0).sin(),
            ),
            // Gentle tilting with gravity on z
            SensorMode::Accelerometer => SensorSample::new(
                0.8 * (TAU * 0.14 * t).sin(),
                0.6 * (TAU * 0.21 * t).cos(),
                -1.0 + 0.3 * (TAU * 0.06 * t).sin(),
            ),
            // Heading sweep through the earth's field
            SensorMode::Magnetometer => SensorSample::new(
                40.0 + 20.0 * (TAU * 0.03 * t).sin(),
                -15.0 + 5.0 * (TAU * 0.05 * t).cos(),
                -35.0 + 10.0 * (TAU * 0.04 * t).sin(),
            ),
        }
    }
}

impl MotionSensor for SimulatedMotion {
    fn start_stream(&mut self, mode: SensorMode) -> Result<()> {
        if !self.is_available(mode) {
            bail!("{} is not available on this device", mode);
        }
        debug!("simulated {} stream started", mode);
        self.active = Some(mode);
        Ok(())
    }

    fn stop_stream(&mut self, mode: SensorMode) {
        if self.active == Some(mode) {
            debug!("simulated {} stream stopped", mode);
            self.active = None;
        }
    }

    fn latest_sample(&mut self, mode: SensorMode) -> Option<SensorSample> {
        if self.active != Some(mode) {
            return None;
        }
        let sample = Self::sample_at(mode, self.elapsed);
        self.elapsed += self.step;
        Some(sample)
    }

    fn is_available(&self, mode: SensorMode) -> bool {
        !self.unavailable.contains(&mode)
    }
}
