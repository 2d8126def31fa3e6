//! Recorded parameter trajectories

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::Parameters;

/// One tick's worth of live parameters, captured while recording
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneEvent {
    pub frequency: f64,
    pub amplitude: f64,
    pub ramp_time: f64,
}

impl ToneEvent {
    pub fn new(frequency: f64, amplitude: f64, ramp_time: f64) -> Self {
        Self {
            frequency,
            amplitude,
            ramp_time,
        }
    }
}

impl From<&Parameters> for ToneEvent {
    fn from(params: &Parameters) -> Self {
        Self::new(params.frequency, params.amplitude, params.ramp_time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    #[default]
    Idle,
    Armed,
}

/// Append-only tone log with an armed/idle switch
///
/// The log is only cleared by starting a new recording.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    events: Vec<ToneEvent>,
    state: RecordingState,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing log, idle
    pub fn from_events(events: Vec<ToneEvent>) -> Self {
        Self {
            events,
            state: RecordingState::Idle,
        }
    }

    /// Clear the log and start capturing
    pub fn start_recording(&mut self) {
        self.events.clear();
        self.state = RecordingState::Armed;
    }

    /// Stop capturing; the log is kept
    pub fn stop_recording(&mut self) {
        self.state = RecordingState::Idle;
    }

    /// Append an event if armed, returning whether it was kept
    pub fn record(&mut self, event: ToneEvent) -> bool {
        if self.state == RecordingState::Armed {
            self.events.push(event);
            true
        } else {
            false
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == RecordingState::Armed
    }

    pub fn events(&self) -> &[ToneEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// On-disk form of a recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryFile {
    /// Tick interval the recording was captured at
    pub tick_interval_ms: u64,
    pub events: Vec<ToneEvent>,
}

impl TrajectoryFile {
    pub fn new(tick_interval: Duration, events: &[ToneEvent]) -> Self {
        Self {
            tick_interval_ms: tick_interval.as_millis() as u64,
            events: events.to_vec(),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Write a recording as pretty-printed JSON
pub fn save_trajectory(path: &Path, file: &TrajectoryFile) -> Result<()> {
    let json = serde_json::to_string_pretty(file)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write trajectory: {:?}", path))
}

/// Read a recording written by [`save_trajectory`]
pub fn load_trajectory(path: &Path) -> Result<TrajectoryFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read trajectory: {:?}", path))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("invalid trajectory file: {:?}", path))
}
