//! Single-oscillator tone generator with gliding parameters

use super::{EffectPreset, FeedbackDelay, Oscillator, Synthesizer, Waveform};
use crate::config::SynthConfig;

/// A value that glides linearly toward its target
#[derive(Debug, Clone, Copy, PartialEq)]
struct Glide {
    current: f64,
    target: f64,
    step: f64,
    remaining: u64,
}

impl Glide {
    fn new(value: f64) -> Self {
        Self {
            current: value,
            target: value,
            step: 0.0,
            remaining: 0,
        }
    }

    fn retarget(&mut self, target: f64, samples: u64) {
        self.target = target;
        if samples == 0 {
            self.current = target;
            self.remaining = 0;
        } else {
            self.step = (target - self.current) / samples as f64;
            self.remaining = samples;
        }
    }

    fn next(&mut self) -> f64 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.current = if self.remaining == 0 {
                self.target
            } else {
                self.current + self.step
            };
        }
        self.current
    }
}

/// Reference synthesizer: one oscillator, a gain stage, and an effect send
///
/// Frequency and amplitude changes glide over the configured ramp time.
pub struct ToneSynth {
    oscillator: Oscillator,
    delay: FeedbackDelay,
    sample_rate: f64,
    frequency: Glide,
    amplitude: Glide,
    ramp_time: f64,
    effect_mix: f64,
    preset: EffectPreset,
}

impl ToneSynth {
    pub fn new(sample_rate: f64) -> Self {
        Self::from_config(&SynthConfig::default(), sample_rate)
    }

    pub fn from_config(config: &SynthConfig, sample_rate: f64) -> Self {
        Self {
            oscillator: Oscillator::new(config.waveform, config.frequency, sample_rate),
            delay: FeedbackDelay::new(config.effect, sample_rate),
            sample_rate,
            frequency: Glide::new(config.frequency),
            amplitude: Glide::new(config.amplitude),
            ramp_time: config.ramp_time.max(0.0),
            effect_mix: config.effect_mix.clamp(0.0, 1.0),
            preset: config.effect,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Frequency currently sounding (mid-glide values included)
    pub fn frequency(&self) -> f64 {
        self.frequency.current
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude.current
    }

    pub fn ramp_time(&self) -> f64 {
        self.ramp_time
    }

    pub fn effect_mix(&self) -> f64 {
        self.effect_mix
    }

    pub fn waveform(&self) -> Waveform {
        self.oscillator.waveform()
    }

    pub fn effect_preset(&self) -> EffectPreset {
        self.preset
    }

    fn ramp_samples(&self) -> u64 {
        (self.ramp_time * self.sample_rate).round() as u64
    }

    /// Generate the next sample
    pub fn process(&mut self) -> f64 {
        let frequency = self.frequency.next();
        self.oscillator.set_frequency(frequency);
        let dry = self.oscillator.generate() * self.amplitude.next();
        let wet = self.delay.process(dry);
        dry * (1.0 - self.effect_mix) + wet * self.effect_mix
    }

    /// Fill a buffer with samples
    pub fn fill_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process() as f32;
        }
    }
}

impl Synthesizer for ToneSynth {
    fn set_frequency(&mut self, hz: f64) {
        let samples = self.ramp_samples();
        self.frequency.retarget(hz.max(0.0), samples);
    }

    fn set_amplitude(&mut self, amplitude: f64) {
        let samples = self.ramp_samples();
        self.amplitude.retarget(amplitude.clamp(0.0, 1.0), samples);
    }

    fn set_ramp_time(&mut self, seconds: f64) {
        self.ramp_time = seconds.max(0.0);
    }

    fn set_effect_mix(&mut self, mix: f64) {
        self.effect_mix = mix.clamp(0.0, 1.0);
    }

    fn select_waveform(&mut self, waveform: Waveform) {
        self.oscillator.set_waveform(waveform);
    }

    fn select_effect_preset(&mut self, preset: EffectPreset) {
        self.preset = preset;
        self.delay.load(preset);
    }
}
