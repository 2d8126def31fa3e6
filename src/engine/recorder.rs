//! WAV output for rendered sessions

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Mono 32-bit float WAV writer
pub struct WavRecorder {
    writer: WavWriter<BufWriter<File>>,
    path: PathBuf,
    sample_rate: u32,
    frames: u64,
}

impl WavRecorder {
    /// Create `path`, truncating anything already there
    pub fn create(path: &Path, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            sample_rate,
            frames: 0,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Audio written so far
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames as f64 / self.sample_rate as f64)
    }

    /// Append a block of samples
    pub fn write_block(&mut self, block: &[f32]) -> Result<()> {
        for &sample in block {
            self.writer
                .write_sample(sample)
                .with_context(|| format!("failed to write to {:?}", self.path))?;
        }
        self.frames += block.len() as u64;
        Ok(())
    }

    /// Flush and write the final header
    pub fn finish(self) -> Result<Duration> {
        let duration = self.duration();
        self.writer
            .finalize()
            .with_context(|| format!("failed to finalize {:?}", self.path))?;
        Ok(duration)
    }
}
