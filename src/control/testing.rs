//! Test doubles for the motion and synthesis collaborators

use std::collections::{HashSet, VecDeque};

use anyhow::{bail, Result};

use crate::motion::{MotionSensor, SensorMode, SensorSample};
use crate::synth::{EffectPreset, Synthesizer, Waveform};

#[derive(Debug, Clone, PartialEq)]
pub enum SynthCall {
    Frequency(f64),
    Amplitude(f64),
    RampTime(f64),
    EffectMix(f64),
    Waveform(Waveform),
    Effect(EffectPreset),
}

/// Synthesizer that remembers every call
#[derive(Debug, Default)]
pub struct RecordingSynth {
    pub calls: Vec<SynthCall>,
}

impl RecordingSynth {
    pub fn frequencies(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SynthCall::Frequency(f) => Some(*f),
                _ => None,
            })
            .collect()
    }
}

impl Synthesizer for RecordingSynth {
    fn set_frequency(&mut self, hz: f64) {
        self.calls.push(SynthCall::Frequency(hz));
    }

    fn set_amplitude(&mut self, amplitude: f64) {
        self.calls.push(SynthCall::Amplitude(amplitude));
    }

    fn set_ramp_time(&mut self, seconds: f64) {
        self.calls.push(SynthCall::RampTime(seconds));
    }

    fn set_effect_mix(&mut self, mix: f64) {
        self.calls.push(SynthCall::EffectMix(mix));
    }

    fn select_waveform(&mut self, waveform: Waveform) {
        self.calls.push(SynthCall::Waveform(waveform));
    }

    fn select_effect_preset(&mut self, preset: EffectPreset) {
        self.calls.push(SynthCall::Effect(preset));
    }
}

/// Motion source fed by hand, one queue per sensor
#[derive(Debug, Default)]
pub struct QueuedMotion {
    pub queues: [VecDeque<SensorSample>; 3],
    pub active: Option<SensorMode>,
    pub missing: HashSet<SensorMode>,
    pub started: Vec<SensorMode>,
    pub stopped: Vec<SensorMode>,
}

impl QueuedMotion {
    fn slot(mode: SensorMode) -> usize {
        match mode {
            SensorMode::Gyroscope => 0,
            SensorMode::Accelerometer => 1,
            SensorMode::Magnetometer => 2,
        }
    }

    pub fn push(&mut self, mode: SensorMode, x: f64, y: f64, z: f64) {
        self.queues[Self::slot(mode)].push_back(SensorSample::new(x, y, z));
    }
}

impl MotionSensor for QueuedMotion {
    fn start_stream(&mut self, mode: SensorMode) -> Result<()> {
        if self.missing.contains(&mode) {
            bail!("no {}", mode);
        }
        self.started.push(mode);
        self.active = Some(mode);
        Ok(())
    }

    fn stop_stream(&mut self, mode: SensorMode) {
        self.stopped.push(mode);
        if self.active == Some(mode) {
            self.active = None;
        }
    }

    fn latest_sample(&mut self, mode: SensorMode) -> Option<SensorSample> {
        if self.active != Some(mode) {
            return None;
        }
        self.queues[Self::slot(mode)].pop_front()
    }

    fn is_available(&self, mode: SensorMode) -> bool {
        !self.missing.contains(&mode)
    }
}
