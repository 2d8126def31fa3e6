//! Gyrotone - motion sensors as synthesis controllers
//!
//! Turns live gyroscope, accelerometer, and magnetometer readings into
//! oscillator frequency, amplitude, and glide time. Each axis calibrates
//! itself against the strongest motion seen since the last sensor switch.

pub mod config;
pub mod control;
pub mod engine;
pub mod mapping;
pub mod motion;
pub mod synth;

pub use config::GyrotoneConfig;
pub use control::Session;
pub use engine::Engine;
