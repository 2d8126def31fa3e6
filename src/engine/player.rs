//! Real-time audio output using cpal

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::SharedSynth;

/// Streams a shared [`ToneSynth`](crate::synth::ToneSynth) to an output device
pub struct Player {
    stream: Option<Stream>,
    running: Arc<AtomicBool>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            stream: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Open `device_name` (or the default device) and start streaming
    pub fn start(&mut self, synth: SharedSynth, device_name: Option<&str>) -> Result<()> {
        let device = find_output_device(device_name)?;
        let config = device
            .default_output_config()
            .context("output device has no default config")?;
        let sample_format = config.sample_format();
        let stream_config: StreamConfig = config.into();

        info!(
            "audio output: {} ({} Hz, {} ch)",
            device.name().unwrap_or_default(),
            stream_config.sample_rate.0,
            stream_config.channels
        );

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, synth, running)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, synth, running)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, synth, running)?,
            other => return Err(anyhow!("unsupported sample format {:?}", other)),
        };

        stream.play()?;
        self.stream = Some(stream);
        Ok(())
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.stream = None;
    }

    pub fn is_playing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

fn find_output_device(name: Option<&str>) -> Result<Device> {
    let host = cpal::default_host();
    match name {
        Some(name) => host
            .output_devices()?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
            .ok_or_else(|| anyhow!("no output device named '{}'", name)),
        None => host
            .default_output_device()
            .ok_or_else(|| anyhow!("no output device available")),
    }
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    synth: SharedSynth,
    running: Arc<AtomicBool>,
) -> Result<Stream>
where
    T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let silence = T::from_sample(0.0f32);
            if !running.load(Ordering::SeqCst) {
                data.fill(silence);
                return;
            }

            // The control thread holds the lock only briefly; never block here
            match synth.try_lock() {
                Ok(mut synth) => {
                    for frame in data.chunks_mut(channels) {
                        let sample = T::from_sample(synth.process() as f32);
                        frame.fill(sample);
                    }
                }
                Err(_) => data.fill(silence),
            }
        },
        |err| {
            error!("audio stream error: {}", err);
        },
        None,
    )?;

    Ok(stream)
}

/// Names and configs of every output device
pub fn list_output_devices() -> Vec<(String, StreamConfig)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.into()));
            }
        }
    }

    devices
}

pub fn default_device_name() -> Option<String> {
    cpal::default_host()
        .default_output_device()
        .and_then(|d| d.name().ok())
}
