//! Synthesis control core
//!
//! Guards parameter requests, runs the per-tick sample pipeline, and records
//! and replays parameter trajectories.

mod error;
mod guard;
mod params;
mod pipeline;
mod playback;
mod session;
mod trajectory;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ControlError, ControlResult};
pub use guard::{GuardOutcome, GuardPolicy, ParameterGuard};
pub use params::{Ceilings, ParamKind, Parameters, Sensitivity};
pub use pipeline::{MappingRules, Pipeline, SessionState, TickOutcome, TickReport};
pub use playback::{PlaybackSchedule, ScheduledTone};
pub use session::{Command, Session, SessionSnapshot};
pub use trajectory::{
    load_trajectory, save_trajectory, RecordingState, ToneEvent, Trajectory, TrajectoryFile,
};
