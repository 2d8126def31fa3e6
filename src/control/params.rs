//! Synthesis parameters and their ceilings

use serde::{Deserialize, Serialize};
use std::fmt;

/// A synthesis parameter the guard controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Frequency,
    Amplitude,
    RampTime,
    EffectMix,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Frequency => "frequency",
            ParamKind::Amplitude => "amplitude",
            ParamKind::RampTime => "ramp time",
            ParamKind::EffectMix => "effect mix",
        };
        f.write_str(name)
    }
}

/// Maximum permitted value for each parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ceilings {
    pub frequency: f64,
    pub amplitude: f64,
    pub ramp_time: f64,
    pub effect_mix: f64,
}

impl Ceilings {
    pub fn get(&self, kind: ParamKind) -> f64 {
        match kind {
            ParamKind::Frequency => self.frequency,
            ParamKind::Amplitude => self.amplitude,
            ParamKind::RampTime => self.ramp_time,
            ParamKind::EffectMix => self.effect_mix,
        }
    }
}

impl Default for Ceilings {
    fn default() -> Self {
        Self {
            frequency: 2000.0,
            amplitude: 1.0,
            ramp_time: 5.0,
            effect_mix: 1.0,
        }
    }
}

/// Live parameter values, mirroring what the synthesizer was last given
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub frequency: f64,
    pub amplitude: f64,
    pub ramp_time: f64,
    pub effect_mix: f64,
}

impl Parameters {
    pub fn get(&self, kind: ParamKind) -> f64 {
        match kind {
            ParamKind::Frequency => self.frequency,
            ParamKind::Amplitude => self.amplitude,
            ParamKind::RampTime => self.ramp_time,
            ParamKind::EffectMix => self.effect_mix,
        }
    }

    pub fn set(&mut self, kind: ParamKind, value: f64) {
        match kind {
            ParamKind::Frequency => self.frequency = value,
            ParamKind::Amplitude => self.amplitude = value,
            ParamKind::RampTime => self.ramp_time = value,
            ParamKind::EffectMix => self.effect_mix = value,
        }
    }
}

/// Post-mapping multipliers per axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sensitivity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0, z: 1.0 }
    }
}
