//! Synthesizer trait for parameter sinks

use std::sync::{Arc, Mutex, PoisonError};

use super::{EffectPreset, Waveform};

/// Receiver of synthesis parameter updates
///
/// The control core only ever calls these setters. Values reaching a
/// synthesizer have already passed the parameter guard.
pub trait Synthesizer: Send {
    /// Oscillator frequency in Hz
    fn set_frequency(&mut self, hz: f64);

    /// Output gain, nominally 0..1
    fn set_amplitude(&mut self, amplitude: f64);

    /// Glide time in seconds for subsequent frequency/amplitude changes
    fn set_ramp_time(&mut self, seconds: f64);

    /// Effect dry/wet balance, nominally 0..1
    fn set_effect_mix(&mut self, mix: f64);

    fn select_waveform(&mut self, waveform: Waveform);

    fn select_effect_preset(&mut self, preset: EffectPreset);
}

/// Shared synthesizers, e.g. one also owned by an audio callback
impl<S: Synthesizer> Synthesizer for Arc<Mutex<S>> {
    fn set_frequency(&mut self, hz: f64) {
        self.lock().unwrap_or_else(PoisonError::into_inner).set_frequency(hz);
    }

    fn set_amplitude(&mut self, amplitude: f64) {
        self.lock().unwrap_or_else(PoisonError::into_inner).set_amplitude(amplitude);
    }

    fn set_ramp_time(&mut self, seconds: f64) {
        self.lock().unwrap_or_else(PoisonError::into_inner).set_ramp_time(seconds);
    }

    fn set_effect_mix(&mut self, mix: f64) {
        self.lock().unwrap_or_else(PoisonError::into_inner).set_effect_mix(mix);
    }

    fn select_waveform(&mut self, waveform: Waveform) {
        self.lock().unwrap_or_else(PoisonError::into_inner).select_waveform(waveform);
    }

    fn select_effect_preset(&mut self, preset: EffectPreset) {
        self.lock().unwrap_or_else(PoisonError::into_inner).select_effect_preset(preset);
    }
}
