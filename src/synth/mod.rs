//! Reference synthesizer
//!
//! The control core talks to any [`Synthesizer`]. [`ToneSynth`] is the
//! implementation used by the binary for live output and WAV rendering.

mod effect;
mod oscillator;
mod synthesizer;
mod tone;

pub use effect::{EffectPreset, FeedbackDelay};
pub use oscillator::{Oscillator, Waveform};
pub use synthesizer::Synthesizer;
pub use tone::ToneSynth;
