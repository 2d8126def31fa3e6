//! Sample-to-parameter pipeline
//!
//! Once per tick: read the active sensor, update the axis trackers, map each
//! axis onto its parameter range, scale by sensitivity, then guard and apply.
//!
//! | axis | parameter | range                         |
//! |------|-----------|-------------------------------|
//! | x    | frequency | `[min_frequency, ceiling]`    |
//! | y    | amplitude | `[0, ceiling]`                |
//! | z    | ramp time | `[0, ceiling]`                |
//!
//! In magnetometer mode the x axis bypasses the mapper: frequency is
//! `|x| * magnetometer_scale`, independent of the running maximum.

use log::debug;

use super::{ControlError, GuardOutcome, ParamKind, ParameterGuard, Parameters, Sensitivity};
use crate::mapping::{Axis, AxisTrackers, LinearMapper};
use crate::motion::{ModeMachine, MotionSensor, SensorMode, SensorSample};
use crate::synth::Synthesizer;

/// Mutable state carried from tick to tick
#[derive(Debug, Clone)]
pub struct SessionState {
    pub mode: ModeMachine,
    pub trackers: AxisTrackers,
    pub params: Parameters,
}

impl SessionState {
    pub fn new(params: Parameters) -> Self {
        Self {
            mode: ModeMachine::new(),
            trackers: AxisTrackers::new(),
            params,
        }
    }
}

/// How axis readings become parameter requests
#[derive(Debug, Clone, PartialEq)]
pub struct MappingRules {
    pub frequency: LinearMapper,
    pub amplitude: LinearMapper,
    pub ramp_time: LinearMapper,
    pub magnetometer_scale: f64,
    pub sensitivity: Sensitivity,
}

impl MappingRules {
    /// Standard ranges below the guard's ceilings
    pub fn new(guard: &ParameterGuard, min_frequency: f64) -> Self {
        let ceilings = guard.ceilings();
        Self {
            frequency: LinearMapper::new(min_frequency, ceilings.frequency),
            amplitude: LinearMapper::new(0.0, ceilings.amplitude),
            ramp_time: LinearMapper::new(0.0, ceilings.ramp_time),
            magnetometer_scale: 10.0,
            sensitivity: Sensitivity::default(),
        }
    }

    pub fn with_magnetometer_scale(mut self, scale: f64) -> Self {
        self.magnetometer_scale = scale;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.sensitivity = sensitivity;
        self
    }
}

/// What a live tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Playback owns the parameters; the pipeline did not run
    Suspended,
    /// The active sensor had nothing to report
    NoSample(SensorMode),
    /// The sample was processed
    Applied(TickReport),
}

/// Per-parameter results of a processed tick
///
/// `None` means the axis was skipped because its running maximum was zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub mode: SensorMode,
    pub sample: SensorSample,
    pub frequency: Option<GuardOutcome>,
    pub amplitude: Option<GuardOutcome>,
    pub ramp_time: Option<GuardOutcome>,
}

/// Stateless tick processor; all state lives in [`SessionState`]
#[derive(Debug, Clone)]
pub struct Pipeline {
    rules: MappingRules,
    guard: ParameterGuard,
}

impl Pipeline {
    pub fn new(rules: MappingRules, guard: ParameterGuard) -> Self {
        Self { rules, guard }
    }

    pub fn guard(&self) -> &ParameterGuard {
        &self.guard
    }

    pub fn rules(&self) -> &MappingRules {
        &self.rules
    }

    pub fn sensitivity_mut(&mut self) -> &mut Sensitivity {
        &mut self.rules.sensitivity
    }

    /// Run one tick against the active sensor
    pub fn tick<M, S>(&self, state: &mut SessionState, motion: &mut M, synth: &mut S) -> TickOutcome
    where
        M: MotionSensor + ?Sized,
        S: Synthesizer + ?Sized,
    {
        let mode = state.mode.current();
        let Some(sample) = motion.latest_sample(mode) else {
            debug!("{}, skipping tick", ControlError::SensorUnavailable(mode));
            return TickOutcome::NoSample(mode);
        };

        for axis in Axis::ALL {
            state.trackers.update(axis, sample.axis(axis));
        }

        let sensitivity = self.rules.sensitivity;
        let frequency = match mode {
            SensorMode::Magnetometer => {
                Some(state.trackers.get(Axis::X).current_abs() * self.rules.magnetometer_scale)
            }
            _ => map_axis(&state.trackers, Axis::X, &self.rules.frequency),
        }
        .map(|f| f * sensitivity.x);
        let amplitude =
            map_axis(&state.trackers, Axis::Y, &self.rules.amplitude).map(|a| a * sensitivity.y);
        let ramp_time =
            map_axis(&state.trackers, Axis::Z, &self.rules.ramp_time).map(|r| r * sensitivity.z);

        // Ramp time first so this tick's changes glide at the new rate
        let ramp_time = ramp_time
            .map(|r| self.guard.apply_to(ParamKind::RampTime, r, &mut state.params, synth));
        let frequency = frequency
            .map(|f| self.guard.apply_to(ParamKind::Frequency, f, &mut state.params, synth));
        let amplitude = amplitude
            .map(|a| self.guard.apply_to(ParamKind::Amplitude, a, &mut state.params, synth));

        TickOutcome::Applied(TickReport {
            mode,
            sample,
            frequency,
            amplitude,
            ramp_time,
        })
    }
}

fn map_axis(trackers: &AxisTrackers, axis: Axis, mapper: &LinearMapper) -> Option<f64> {
    let tracker = trackers.get(axis);
    match mapper.map_from_zero(tracker.current_abs(), tracker.running_max()) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("axis {}: {}, leaving parameter unchanged", axis, err);
            None
        }
    }
}
