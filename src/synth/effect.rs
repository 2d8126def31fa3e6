//! Feedback delay used for the dry/wet effect send

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named effect settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectPreset {
    /// No effect
    #[default]
    Dry,
    /// Short, dense reflections
    Room,
    /// Longer, brighter tail
    Hall,
    /// Audible repeats
    Echo,
}

impl EffectPreset {
    pub const ALL: [EffectPreset; 4] = [
        EffectPreset::Dry,
        EffectPreset::Room,
        EffectPreset::Hall,
        EffectPreset::Echo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectPreset::Dry => "dry",
            EffectPreset::Room => "room",
            EffectPreset::Hall => "hall",
            EffectPreset::Echo => "echo",
        }
    }

    /// `(delay_secs, feedback)` for this preset
    fn settings(self) -> (f64, f64) {
        match self {
            EffectPreset::Dry => (0.0, 0.0),
            EffectPreset::Room => (0.03, 0.35),
            EffectPreset::Hall => (0.09, 0.6),
            EffectPreset::Echo => (0.35, 0.45),
        }
    }
}

impl fmt::Display for EffectPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectPreset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectPreset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("unknown effect preset '{}'", s))
    }
}

/// Single-tap feedback delay line
pub struct FeedbackDelay {
    buffer: Vec<f64>,
    write_pos: usize,
    feedback: f64,
    sample_rate: f64,
}

impl FeedbackDelay {
    pub fn new(preset: EffectPreset, sample_rate: f64) -> Self {
        let mut delay = Self {
            buffer: Vec::new(),
            write_pos: 0,
            feedback: 0.0,
            sample_rate,
        };
        delay.load(preset);
        delay
    }

    /// Switch presets, clearing the tail
    pub fn load(&mut self, preset: EffectPreset) {
        let (delay_secs, feedback) = preset.settings();
        let len = (delay_secs * self.sample_rate).round() as usize;
        self.buffer = vec![0.0; len];
        self.write_pos = 0;
        self.feedback = feedback;
    }

    /// Feed one dry sample, returning the wet signal
    pub fn process(&mut self, input: f64) -> f64 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        let delayed = self.buffer[self.write_pos];
        self.buffer[self.write_pos] = input + delayed * self.feedback;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        delayed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_preset_is_silent() {
        let mut delay = FeedbackDelay::new(EffectPreset::Dry, 44100.0);
        assert_eq!(delay.process(1.0), 0.0);
    }

    #[test]
    fn test_echo_returns_after_delay() {
        let sample_rate = 1000.0;
        let mut delay = FeedbackDelay::new(EffectPreset::Echo, sample_rate);
        let delay_samples = (0.35 * sample_rate).round() as usize;

        assert_eq!(delay.process(1.0), 0.0);
        for _ in 1..delay_samples {
            assert_eq!(delay.process(0.0), 0.0);
        }
        assert_eq!(delay.process(0.0), 1.0);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("hall".parse::<EffectPreset>().unwrap(), EffectPreset::Hall);
        assert!("plate".parse::<EffectPreset>().is_err());
    }
}
