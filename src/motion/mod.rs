//! Motion sensors for gyrotone
//!
//! A motion source exposes one acquisition stream per sensor. Exactly one
//! stream is active at a time, chosen by the mode state machine.

mod mode;
mod scripted;
mod sensor;
mod simulated;

pub use mode::{ModeMachine, ModeTransition};
pub use scripted::{MotionScript, ScriptedMotion};
pub use sensor::{MotionSensor, SensorMode, SensorSample};
pub use simulated::SimulatedMotion;
