//! Engine for gyrotone
//!
//! Wires a configured motion source and the reference synthesizer into a
//! control session, and renders sessions to audio.

mod player;
mod recorder;
mod runner;

pub use player::{default_device_name, list_output_devices, Player};
pub use recorder::WavRecorder;
pub use runner::{run_session, RunOptions, RunStats};

use anyhow::Result;
use log::info;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::config::{GyrotoneConfig, MotionSourceKind};
use crate::control::Session;
use crate::motion::{MotionSensor, ScriptedMotion, SimulatedMotion};
use crate::synth::ToneSynth;

/// Synthesizer shared between the control loop and an audio consumer
pub type SharedSynth = Arc<Mutex<ToneSynth>>;

/// The session type the binary runs
pub type EngineSession = Session<Box<dyn MotionSensor>, SharedSynth>;

/// A session plus a handle on the synthesizer it drives
pub struct Engine {
    session: EngineSession,
    synth: SharedSynth,
    sample_rate: u32,
}

impl Engine {
    /// Build the configured motion source and synthesizer
    pub fn new(config: &GyrotoneConfig) -> Result<Self> {
        config.validate()?;
        Self::with_motion(config, build_motion(config)?)
    }

    /// Build around a caller-supplied motion source
    ///
    /// Fails if `config` does not pass [`GyrotoneConfig::validate`].
    pub fn with_motion(config: &GyrotoneConfig, motion: Box<dyn MotionSensor>) -> Result<Self> {
        config.validate()?;
        let sample_rate = config.audio.sample_rate;
        let synth: SharedSynth = Arc::new(Mutex::new(ToneSynth::from_config(
            &config.synth,
            sample_rate as f64,
        )));
        let session = Session::new(config, motion, synth.clone());

        Ok(Self {
            session,
            synth,
            sample_rate,
        })
    }

    pub fn session(&self) -> &EngineSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EngineSession {
        &mut self.session
    }

    pub fn synth(&self) -> SharedSynth {
        self.synth.clone()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Render `duration` of audio offline, ticking on the session's grid
    ///
    /// Time is simulated: each tick (or playback step) is followed by exactly
    /// one tick interval of synthesized audio.
    pub fn render(&mut self, recorder: &mut WavRecorder, duration: Duration) -> Result<u64> {
        let interval = self.session.tick_interval();
        let steps = (duration.as_secs_f64() / interval.as_secs_f64()).ceil() as u64;
        self.render_steps(recorder, steps, false)
    }

    /// Render until the running playback completes, plus one trailing step
    pub fn render_playback(&mut self, recorder: &mut WavRecorder) -> Result<u64> {
        let steps = self.session.trajectory().len() as u64 + 1;
        self.render_steps(recorder, steps, true)
    }

    fn render_steps(&mut self, recorder: &mut WavRecorder, steps: u64, until_played: bool) -> Result<u64> {
        let interval = self.session.tick_interval();
        let block_len = (interval.as_secs_f64() * self.sample_rate as f64).round() as usize;
        let mut block = vec![0.0f32; block_len];
        let mut playback_step: Option<u64> = None;
        let mut rendered = 0;

        for step in 0..steps {
            if self.session.is_playing() {
                let start = *playback_step.get_or_insert(step);
                self.session.poll_playback(interval * (step - start) as u32);
            } else if until_played && playback_step.is_some() {
                break;
            } else {
                playback_step = None;
                self.session.tick();
            }

            self.synth
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .fill_buffer(&mut block);
            recorder.write_block(&block)?;
            rendered += 1;
        }

        info!(
            "rendered {} steps ({:.1}s)",
            rendered,
            recorder.duration().as_secs_f64()
        );
        Ok(rendered)
    }
}

/// Create the motion source named in the configuration
pub fn build_motion(config: &GyrotoneConfig) -> Result<Box<dyn MotionSensor>> {
    let motion: Box<dyn MotionSensor> = match config.motion.source {
        MotionSourceKind::Simulated => Box::new(
            SimulatedMotion::new(config.tick_interval())
                .without(config.motion.unavailable.iter().copied()),
        ),
        MotionSourceKind::Scripted => {
            let path = config
                .motion
                .script
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("scripted motion source requires a script path"))?;
            Box::new(ScriptedMotion::from_file(path)?)
        }
    };
    Ok(motion)
}
