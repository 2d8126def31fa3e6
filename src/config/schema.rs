//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::control::{Ceilings, GuardPolicy, Sensitivity};
use crate::motion::SensorMode;
use crate::synth::{EffectPreset, Waveform};

/// Main configuration for gyrotone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GyrotoneConfig {
    /// Tick timing and mapping rules
    #[serde(default)]
    pub control: ControlConfig,

    /// Per-parameter ceilings enforced by the guard
    #[serde(default)]
    pub ceilings: CeilingConfig,

    /// Post-mapping scale factors per axis
    #[serde(default)]
    pub sensitivity: SensitivityConfig,

    /// Initial synthesizer state
    #[serde(default)]
    pub synth: SynthConfig,

    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Where motion readings come from
    #[serde(default)]
    pub motion: MotionConfig,
}

impl GyrotoneConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let control = &self.control;
        if control.tick_interval_ms < 10 || control.tick_interval_ms > 5000 {
            bail!("Tick interval must be between 10 and 5000 ms");
        }
        if !(control.magnetometer_scale.is_finite() && control.magnetometer_scale > 0.0) {
            bail!("Magnetometer scale must be a positive number");
        }

        let ceilings = &self.ceilings;
        for (name, value) in [
            ("max_frequency", ceilings.max_frequency),
            ("max_amplitude", ceilings.max_amplitude),
            ("max_ramp_time", ceilings.max_ramp_time),
            ("max_effect_mix", ceilings.max_effect_mix),
        ] {
            if !(value.is_finite() && value > 0.0) {
                bail!("Ceiling '{}' must be a positive number", name);
            }
        }
        if control.min_frequency < 0.0 || control.min_frequency >= ceilings.max_frequency {
            bail!("Minimum frequency must be between 0 and max_frequency");
        }

        for (axis, factor) in [
            ("x", self.sensitivity.x),
            ("y", self.sensitivity.y),
            ("z", self.sensitivity.z),
        ] {
            if !(factor.is_finite() && factor >= 0.0) {
                bail!("Sensitivity for axis '{}' must be zero or positive", axis);
            }
        }

        let synth = &self.synth;
        if synth.effect_mix < 0.0 || synth.effect_mix > ceilings.max_effect_mix {
            bail!("Initial effect mix must be between 0 and max_effect_mix");
        }
        if synth.frequency <= 0.0 || synth.frequency > ceilings.max_frequency {
            bail!("Initial frequency must be between 0 and max_frequency");
        }
        if synth.amplitude < 0.0 || synth.amplitude > ceilings.max_amplitude {
            bail!("Initial amplitude must be between 0 and max_amplitude");
        }
        if synth.ramp_time < 0.0 || synth.ramp_time > ceilings.max_ramp_time {
            bail!("Initial ramp time must be between 0 and max_ramp_time");
        }

        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if self.audio.buffer_size < 64 || self.audio.buffer_size > 8192 {
            bail!("Buffer size must be between 64 and 8192");
        }

        if self.motion.source == MotionSourceKind::Scripted && self.motion.script.is_none() {
            bail!("Scripted motion source requires a 'script' path");
        }
        if self.motion.cycle_secs == Some(0) {
            bail!("Mode cycle period must be at least 1 second");
        }

        Ok(())
    }

    /// Fixed interval between pipeline ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.control.tick_interval_ms)
    }

    pub fn ceilings(&self) -> Ceilings {
        Ceilings {
            frequency: self.ceilings.max_frequency,
            amplitude: self.ceilings.max_amplitude,
            ramp_time: self.ceilings.max_ramp_time,
            effect_mix: self.ceilings.max_effect_mix,
        }
    }

    pub fn sensitivity(&self) -> Sensitivity {
        Sensitivity {
            x: self.sensitivity.x,
            y: self.sensitivity.y,
            z: self.sensitivity.z,
        }
    }
}

/// Tick timing and mapping rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Milliseconds between ticks (default: 500)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// What the guard does with over-ceiling requests (default: clamp)
    #[serde(default)]
    pub guard_policy: GuardPolicy,

    /// Bottom of the frequency range the x axis maps onto (default: 20 Hz)
    #[serde(default = "default_min_frequency")]
    pub min_frequency: f64,

    /// Hz per microtesla in magnetometer mode (default: 10)
    #[serde(default = "default_magnetometer_scale")]
    pub magnetometer_scale: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            guard_policy: GuardPolicy::default(),
            min_frequency: default_min_frequency(),
            magnetometer_scale: default_magnetometer_scale(),
        }
    }
}

fn default_tick_interval_ms() -> u64 { 500 }
fn default_min_frequency() -> f64 { 20.0 }
fn default_magnetometer_scale() -> f64 { 10.0 }

/// Parameter ceilings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CeilingConfig {
    /// Hz (default: 2000)
    #[serde(default = "default_max_frequency")]
    pub max_frequency: f64,

    /// Linear gain (default: 1.0)
    #[serde(default = "default_max_amplitude")]
    pub max_amplitude: f64,

    /// Seconds (default: 5.0)
    #[serde(default = "default_max_ramp_time")]
    pub max_ramp_time: f64,

    /// Dry/wet balance (default: 1.0)
    #[serde(default = "default_max_effect_mix")]
    pub max_effect_mix: f64,
}

impl Default for CeilingConfig {
    fn default() -> Self {
        Self {
            max_frequency: default_max_frequency(),
            max_amplitude: default_max_amplitude(),
            max_ramp_time: default_max_ramp_time(),
            max_effect_mix: default_max_effect_mix(),
        }
    }
}

fn default_max_frequency() -> f64 { 2000.0 }
fn default_max_amplitude() -> f64 { 1.0 }
fn default_max_ramp_time() -> f64 { 5.0 }
fn default_max_effect_mix() -> f64 { 1.0 }

/// Multipliers applied after mapping, before the guard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityConfig {
    #[serde(default = "default_sensitivity")]
    pub x: f64,
    #[serde(default = "default_sensitivity")]
    pub y: f64,
    #[serde(default = "default_sensitivity")]
    pub z: f64,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            x: default_sensitivity(),
            y: default_sensitivity(),
            z: default_sensitivity(),
        }
    }
}

fn default_sensitivity() -> f64 { 1.0 }

/// Initial synthesizer state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Oscillator waveform (default: sine)
    #[serde(default)]
    pub waveform: Waveform,

    /// Effect preset (default: dry)
    #[serde(default)]
    pub effect: EffectPreset,

    /// Effect dry/wet mix (default: 0.0)
    #[serde(default)]
    pub effect_mix: f64,

    /// Hz before the first tick lands (default: 440)
    #[serde(default = "default_frequency")]
    pub frequency: f64,

    /// Gain before the first tick lands (default: 0.5)
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,

    /// Seconds to glide between values (default: 0.2)
    #[serde(default = "default_ramp_time")]
    pub ramp_time: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            waveform: Waveform::default(),
            effect: EffectPreset::default(),
            effect_mix: 0.0,
            frequency: default_frequency(),
            amplitude: default_amplitude(),
            ramp_time: default_ramp_time(),
        }
    }
}

fn default_frequency() -> f64 { 440.0 }
fn default_amplitude() -> f64 { 0.5 }
fn default_ramp_time() -> f64 { 0.2 }

/// Audio output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Buffer size in samples (default: 512)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Output device name (None = default device)
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            buffer_size: default_buffer_size(),
            device: None,
        }
    }
}

fn default_sample_rate() -> u32 { 44100 }
fn default_buffer_size() -> usize { 512 }

/// Motion source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Source type (default: simulated)
    #[serde(default)]
    pub source: MotionSourceKind,

    /// JSON script for the scripted source
    pub script: Option<PathBuf>,

    /// Sensors the simulated device should lack
    #[serde(default)]
    pub unavailable: Vec<SensorMode>,

    /// Seconds between automatic mode advances (None = never)
    pub cycle_secs: Option<u64>,
}

/// Types of motion sources
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MotionSourceKind {
    /// Synthetic gestures
    #[default]
    Simulated,
    /// Readings replayed from a JSON file
    Scripted,
}
