//! Mapping from sensor magnitudes to synthesis parameter ranges
//!
//! Each axis keeps a running maximum that defines full scale, and readings
//! are remapped linearly from `[0, running_max]` onto a parameter range.

mod linear;
mod tracker;

pub use linear::{map_range, LinearMapper};
pub use tracker::{Axis, AxisTracker, AxisTrackers};
