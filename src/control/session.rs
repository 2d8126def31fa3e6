//! A control session: the pipeline, recorder, and player around one
//! motion source and one synthesizer
//!
//! The session is the command/query surface a front end talks to. It is
//! owned by a single control thread; nothing in here locks.

use log::{info, warn};
use serde::Serialize;
use std::time::Duration;

use super::{
    ControlError, ControlResult, GuardOutcome, MappingRules, ParamKind, ParameterGuard,
    Parameters, Pipeline, PlaybackSchedule, RecordingState, Sensitivity, SessionState,
    TickOutcome, ToneEvent, Trajectory,
};
use crate::config::GyrotoneConfig;
use crate::mapping::Axis;
use crate::motion::{ModeTransition, MotionSensor, SensorMode};
use crate::synth::{EffectPreset, Synthesizer, Waveform};

/// Commands a front end can issue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    AdvanceMode,
    StartRecording,
    StopRecording,
    Play,
    StopPlayback,
    SelectWaveform(Waveform),
    SelectEffect(EffectPreset),
    SetEffectMix(f64),
    SetSensitivity(Axis, f64),
}

/// Everything a front end displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub mode: SensorMode,
    pub parameters: Parameters,
    pub waveform: Waveform,
    pub effect: EffectPreset,
    pub sensitivity: Sensitivity,
    pub recording: RecordingState,
    pub playing: bool,
    pub pending_tones: usize,
    pub logged_tones: usize,
}

pub struct Session<M, S> {
    motion: M,
    synth: S,
    pipeline: Pipeline,
    state: SessionState,
    trajectory: Trajectory,
    playback: Option<PlaybackSchedule>,
    tick_interval: Duration,
    waveform: Waveform,
    effect: EffectPreset,
}

impl<M: MotionSensor, S: Synthesizer> Session<M, S> {
    /// Build a session from configuration and start the gyroscope stream
    pub fn new(config: &GyrotoneConfig, motion: M, synth: S) -> Self {
        let guard = ParameterGuard::new(config.ceilings(), config.control.guard_policy);
        let rules = MappingRules::new(&guard, config.control.min_frequency)
            .with_magnetometer_scale(config.control.magnetometer_scale)
            .with_sensitivity(config.sensitivity());

        // No previous value exists yet, so a rejected start value falls back
        // to its ceiling
        let initial = |kind: ParamKind, requested: f64| {
            guard
                .apply(kind, requested)
                .applied()
                .unwrap_or_else(|| guard.ceilings().get(kind))
        };
        let params = Parameters {
            frequency: initial(ParamKind::Frequency, config.synth.frequency),
            amplitude: initial(ParamKind::Amplitude, config.synth.amplitude),
            ramp_time: initial(ParamKind::RampTime, config.synth.ramp_time),
            effect_mix: initial(ParamKind::EffectMix, config.synth.effect_mix),
        };

        let mut session = Self {
            motion,
            synth,
            pipeline: Pipeline::new(rules, guard),
            state: SessionState::new(params),
            trajectory: Trajectory::new(),
            playback: None,
            tick_interval: config.tick_interval(),
            waveform: config.synth.waveform,
            effect: config.synth.effect,
        };

        session.synth.select_waveform(session.waveform);
        session.synth.select_effect_preset(session.effect);
        session.synth.set_ramp_time(params.ramp_time);
        session.synth.set_effect_mix(params.effect_mix);
        session.synth.set_frequency(params.frequency);
        session.synth.set_amplitude(params.amplitude);

        let mode = session.state.mode.current();
        session.start_stream(mode);
        session
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn mode(&self) -> SensorMode {
        self.state.mode.current()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.state.params
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn synth(&self) -> &S {
        &self.synth
    }

    pub fn motion(&self) -> &M {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut M {
        &mut self.motion
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    /// Run the live pipeline once, recording the result if armed
    pub fn tick(&mut self) -> TickOutcome {
        if self.playback.is_some() {
            return TickOutcome::Suspended;
        }

        let outcome = self
            .pipeline
            .tick(&mut self.state, &mut self.motion, &mut self.synth);

        if let TickOutcome::Applied(_) = outcome {
            self.trajectory.record(ToneEvent::from(&self.state.params));
        }
        outcome
    }

    /// Switch to the next sensor, resetting every axis tracker
    pub fn advance_mode(&mut self) -> ModeTransition {
        let from = self.state.mode.current();
        self.motion.stop_stream(from);

        let transition = self.state.mode.advance();
        self.state.trackers.reset();
        self.start_stream(transition.to);

        info!("mode: {} -> {}", transition.from, transition.to);
        transition
    }

    fn start_stream(&mut self, mode: SensorMode) {
        if let Err(err) = self.motion.start_stream(mode) {
            warn!("{} stream did not start ({:#}); ticks will be skipped", mode, err);
        }
    }

    /// Clear the log and arm recording
    pub fn start_recording(&mut self) {
        if self.playback.is_some() {
            warn!("recording armed during playback; nothing is captured until it ends");
        }
        self.trajectory.start_recording();
        info!("recording started");
    }

    pub fn stop_recording(&mut self) {
        self.trajectory.stop_recording();
        info!("recording stopped, {} tones logged", self.trajectory.len());
    }

    /// Replace the log with previously recorded tones
    pub fn load_tones(&mut self, events: Vec<ToneEvent>) -> ControlResult<()> {
        if self.trajectory.is_armed() {
            return Err(ControlError::InvalidPlaybackState("recording is armed"));
        }
        if self.playback.is_some() {
            return Err(ControlError::InvalidPlaybackState("playback is running"));
        }
        self.trajectory = Trajectory::from_events(events);
        Ok(())
    }

    /// Schedule the logged tones and suspend the live pipeline
    ///
    /// Tone `k` is due `k` tick intervals after start; call
    /// [`Session::poll_playback`] with the elapsed time to release them.
    pub fn play(&mut self) -> ControlResult<usize> {
        if self.trajectory.is_armed() {
            return Err(ControlError::InvalidPlaybackState("recording is armed"));
        }
        if self.playback.is_some() {
            return Err(ControlError::InvalidPlaybackState("already playing"));
        }
        if self.trajectory.is_empty() {
            return Err(ControlError::InvalidPlaybackState("nothing recorded"));
        }

        let schedule = PlaybackSchedule::plan(self.trajectory.events(), self.tick_interval);
        let total = schedule.total();
        self.playback = Some(schedule);
        info!("playback started, {} tones", total);
        Ok(total)
    }

    /// Next playback deadline, measured from playback start
    pub fn next_playback_deadline(&self) -> Option<Duration> {
        self.playback.as_ref().and_then(|s| s.next_deadline())
    }

    /// Apply every tone due `elapsed` after playback start
    ///
    /// Returns the number of tones applied. The live pipeline resumes once
    /// the final tone has been applied.
    pub fn poll_playback(&mut self, elapsed: Duration) -> usize {
        let Some(schedule) = self.playback.as_mut() else {
            return 0;
        };

        let due = schedule.take_due(elapsed);
        let finished = schedule.is_finished();

        let guard = self.pipeline.guard();
        for tone in &due {
            let event = tone.event;
            guard.apply_to(ParamKind::RampTime, event.ramp_time, &mut self.state.params, &mut self.synth);
            guard.apply_to(ParamKind::Frequency, event.frequency, &mut self.state.params, &mut self.synth);
            guard.apply_to(ParamKind::Amplitude, event.amplitude, &mut self.state.params, &mut self.synth);
        }

        if finished {
            self.playback = None;
            info!("playback finished, live input resumed");
        }
        due.len()
    }

    /// Cancel pending tones and resume the live pipeline
    ///
    /// Returns the number of tones that never fired. The log is kept.
    pub fn stop_playback(&mut self) -> usize {
        match self.playback.take() {
            Some(mut schedule) => {
                let cancelled = schedule.cancel();
                info!("playback stopped, {} tones cancelled", cancelled);
                cancelled
            }
            None => 0,
        }
    }

    pub fn select_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
        self.synth.select_waveform(waveform);
    }

    pub fn select_effect(&mut self, preset: EffectPreset) {
        self.effect = preset;
        self.synth.select_effect_preset(preset);
    }

    /// Request a new effect mix through the guard
    pub fn set_effect_mix(&mut self, mix: f64) -> GuardOutcome {
        self.pipeline
            .guard()
            .apply_to(ParamKind::EffectMix, mix, &mut self.state.params, &mut self.synth)
    }

    /// Change an axis's post-mapping multiplier
    pub fn set_sensitivity(&mut self, axis: Axis, factor: f64) -> ControlResult<()> {
        if !(factor.is_finite() && factor >= 0.0) {
            return Err(ControlError::InvalidSensitivity { axis, factor });
        }
        let sensitivity = self.pipeline.sensitivity_mut();
        match axis {
            Axis::X => sensitivity.x = factor,
            Axis::Y => sensitivity.y = factor,
            Axis::Z => sensitivity.z = factor,
        }
        Ok(())
    }

    /// Apply a front-end command
    pub fn handle(&mut self, command: Command) -> ControlResult<()> {
        match command {
            Command::AdvanceMode => {
                self.advance_mode();
            }
            Command::StartRecording => self.start_recording(),
            Command::StopRecording => self.stop_recording(),
            Command::Play => {
                self.play()?;
            }
            Command::StopPlayback => {
                self.stop_playback();
            }
            Command::SelectWaveform(waveform) => self.select_waveform(waveform),
            Command::SelectEffect(preset) => self.select_effect(preset),
            Command::SetEffectMix(mix) => {
                self.set_effect_mix(mix);
            }
            Command::SetSensitivity(axis, factor) => self.set_sensitivity(axis, factor)?,
        }
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode(),
            parameters: self.state.params,
            waveform: self.waveform,
            effect: self.effect,
            sensitivity: self.pipeline.rules().sensitivity,
            recording: self.trajectory.state(),
            playing: self.playback.is_some(),
            pending_tones: self.playback.as_ref().map_or(0, |s| s.pending()),
            logged_tones: self.trajectory.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::testing::{QueuedMotion, RecordingSynth, SynthCall};
    use crate::control::GuardPolicy;

    fn session_with(config: &GyrotoneConfig) -> Session<QueuedMotion, RecordingSynth> {
        let mut session = Session::new(config, QueuedMotion::default(), RecordingSynth::default());
        session.synth.calls.clear();
        session
    }

    fn session() -> Session<QueuedMotion, RecordingSynth> {
        session_with(&GyrotoneConfig::default())
    }

    fn tones() -> Vec<ToneEvent> {
        vec![
            ToneEvent::new(100.0, 0.2, 0.1),
            ToneEvent::new(200.0, 0.4, 0.2),
            ToneEvent::new(300.0, 0.6, 0.3),
        ]
    }

    #[test]
    fn test_starts_in_gyroscope_with_stream() {
        let session = session();
        assert_eq!(session.mode(), SensorMode::Gyroscope);
        assert_eq!(session.motion().started, vec![SensorMode::Gyroscope]);
    }

    #[test]
    fn test_mode_change_swaps_streams_and_resets_trackers() {
        let mut session = session();
        session.motion.push(SensorMode::Gyroscope, 2.0, -3.0, 1.0);
        session.tick();
        assert_eq!(session.state().trackers.get(Axis::Y).running_max(), 3.0);

        let transition = session.advance_mode();

        assert_eq!(transition.to, SensorMode::Accelerometer);
        assert_eq!(session.motion().stopped, vec![SensorMode::Gyroscope]);
        assert_eq!(
            session.motion().started,
            vec![SensorMode::Gyroscope, SensorMode::Accelerometer]
        );
        for axis in Axis::ALL {
            assert_eq!(session.state().trackers.get(axis).running_max(), 0.0);
        }
    }

    #[test]
    fn test_missing_sensor_is_tolerated() {
        let mut motion = QueuedMotion::default();
        motion.missing.insert(SensorMode::Accelerometer);
        let mut session = Session::new(&GyrotoneConfig::default(), motion, RecordingSynth::default());

        session.advance_mode();
        assert_eq!(session.mode(), SensorMode::Accelerometer);
        assert_eq!(session.tick(), TickOutcome::NoSample(SensorMode::Accelerometer));

        session.advance_mode();
        assert_eq!(session.mode(), SensorMode::Magnetometer);
    }

    #[test]
    fn test_magnetometer_rule_in_session() {
        let mut session = session();
        session.advance_mode();
        session.advance_mode();
        session.motion.push(SensorMode::Magnetometer, -5.0, 0.0, 0.0);

        session.tick();

        assert_eq!(session.parameters().frequency, 50.0);
    }

    #[test]
    fn test_recording_appends_each_tick() {
        let mut session = session();
        session.start_recording();
        session.motion.push(SensorMode::Gyroscope, 1.0, 1.0, 1.0);
        session.motion.push(SensorMode::Gyroscope, 0.5, 0.5, 0.5);
        session.tick();
        session.tick();
        // No sample, nothing appended
        session.tick();
        session.stop_recording();

        let events = session.trajectory().events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ToneEvent::new(2000.0, 1.0, 5.0));
        assert_eq!(events[1], ToneEvent::new(1010.0, 0.5, 2.5));
    }

    #[test]
    fn test_restarting_recording_empties_log() {
        let mut session = session();
        session.start_recording();
        for i in 0..5 {
            session.motion.push(SensorMode::Gyroscope, i as f64 + 1.0, 1.0, 1.0);
            session.tick();
        }
        assert_eq!(session.trajectory().len(), 5);

        session.start_recording();
        assert!(session.trajectory().is_empty());

        session.motion.push(SensorMode::Gyroscope, 1.0, 1.0, 1.0);
        session.tick();
        assert_eq!(session.trajectory().len(), 1);
    }

    #[test]
    fn test_play_schedules_on_tick_grid() {
        let mut config = GyrotoneConfig::default();
        config.control.tick_interval_ms = 500;
        let mut session = session_with(&config);
        session.load_tones(tones()).unwrap();

        assert_eq!(session.play().unwrap(), 3);
        assert!(session.is_playing());

        assert_eq!(session.poll_playback(Duration::ZERO), 1);
        assert_eq!(session.next_playback_deadline(), Some(Duration::from_millis(500)));
        assert_eq!(session.poll_playback(Duration::from_millis(499)), 0);
        assert_eq!(session.poll_playback(Duration::from_millis(500)), 1);
        assert_eq!(session.poll_playback(Duration::from_millis(1000)), 1);
        assert!(!session.is_playing());

        assert_eq!(
            session.synth().calls,
            vec![
                SynthCall::RampTime(0.1),
                SynthCall::Frequency(100.0),
                SynthCall::Amplitude(0.2),
                SynthCall::RampTime(0.2),
                SynthCall::Frequency(200.0),
                SynthCall::Amplitude(0.4),
                SynthCall::RampTime(0.3),
                SynthCall::Frequency(300.0),
                SynthCall::Amplitude(0.6),
            ]
        );
    }

    #[test]
    fn test_playback_suspends_live_ticks() {
        let mut session = session();
        session.load_tones(tones()).unwrap();
        session.motion.push(SensorMode::Gyroscope, 1.0, 1.0, 1.0);

        session.play().unwrap();
        assert_eq!(session.tick(), TickOutcome::Suspended);

        session.stop_playback();
        assert!(matches!(session.tick(), TickOutcome::Applied(_)));
    }

    #[test]
    fn test_play_rejected_while_armed_or_playing() {
        let mut session = session();
        assert_eq!(
            session.play(),
            Err(ControlError::InvalidPlaybackState("nothing recorded"))
        );

        session.load_tones(tones()).unwrap();
        session.start_recording();
        assert_eq!(
            session.play(),
            Err(ControlError::InvalidPlaybackState("recording is armed"))
        );
        assert!(!session.is_playing());

        session.stop_recording();
        session.motion.push(SensorMode::Gyroscope, 1.0, 1.0, 1.0);
        session.start_recording();
        session.tick();
        session.stop_recording();

        session.play().unwrap();
        assert_eq!(
            session.play(),
            Err(ControlError::InvalidPlaybackState("already playing"))
        );
    }

    #[test]
    fn test_stop_cancels_pending_and_keeps_log() {
        let mut session = session();
        session.load_tones(tones()).unwrap();
        session.play().unwrap();
        session.poll_playback(Duration::ZERO);

        assert_eq!(session.stop_playback(), 2);
        assert_eq!(session.poll_playback(Duration::from_secs(10)), 0);
        assert_eq!(session.trajectory().len(), 3);
        assert_eq!(session.parameters().frequency, 100.0);
    }

    #[test]
    fn test_playback_goes_through_guard() {
        let mut config = GyrotoneConfig::default();
        config.control.guard_policy = GuardPolicy::Reject;
        config.ceilings.max_frequency = 250.0;
        let mut session = session_with(&config);
        session.load_tones(tones()).unwrap();

        session.play().unwrap();
        session.poll_playback(Duration::from_secs(5));

        assert_eq!(session.synth().frequencies(), vec![100.0, 200.0]);
        assert_eq!(session.parameters().frequency, 200.0);
        assert_eq!(session.parameters().amplitude, 0.6);
    }

    #[test]
    fn test_initial_values_are_guarded() {
        for policy in [GuardPolicy::Reject, GuardPolicy::Clamp] {
            let mut config = GyrotoneConfig::default();
            config.control.guard_policy = policy;
            config.ceilings.max_frequency = 250.0;
            config.synth.amplitude = 3.0;

            let session =
                Session::new(&config, QueuedMotion::default(), RecordingSynth::default());

            assert_eq!(session.synth().frequencies(), vec![250.0]);
            assert!(session.synth().calls.contains(&SynthCall::Amplitude(1.0)));
            assert_eq!(session.parameters().frequency, 250.0);
            assert_eq!(session.parameters().amplitude, 1.0);
            assert_eq!(session.parameters().ramp_time, 0.2);
        }
    }

    #[test]
    fn test_commands_and_snapshot() {
        let mut session = session();

        session.handle(Command::SelectWaveform(Waveform::Square)).unwrap();
        session.handle(Command::SelectEffect(EffectPreset::Hall)).unwrap();
        session.handle(Command::SetEffectMix(1.5)).unwrap();
        session.handle(Command::SetSensitivity(Axis::Y, 0.25)).unwrap();
        session.handle(Command::AdvanceMode).unwrap();
        session.handle(Command::StartRecording).unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.mode, SensorMode::Accelerometer);
        assert_eq!(snapshot.waveform, Waveform::Square);
        assert_eq!(snapshot.effect, EffectPreset::Hall);
        assert_eq!(snapshot.parameters.effect_mix, 1.0);
        assert_eq!(snapshot.sensitivity.y, 0.25);
        assert_eq!(snapshot.recording, RecordingState::Armed);
        assert!(!snapshot.playing);

        assert!(session.handle(Command::Play).is_err());
        assert_eq!(
            session.handle(Command::SetSensitivity(Axis::X, -1.0)),
            Err(ControlError::InvalidSensitivity {
                axis: Axis::X,
                factor: -1.0
            })
        );
    }
}
