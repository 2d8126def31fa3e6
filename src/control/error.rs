//! Error kinds raised by the control core

use crate::control::ParamKind;
use crate::mapping::Axis;
use crate::motion::SensorMode;
use thiserror::Error;

/// Errors produced by the mapping and control core.
///
/// Only [`ControlError::InvalidPlaybackState`] and
/// [`ControlError::InvalidSensitivity`] are returned to callers. The rest
/// are absorbed where they occur and surface as log diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    /// The source interval of a range mapping has zero width
    #[error("cannot map from a degenerate range [{low}, {high}]")]
    DivisionDegenerate { low: f64, high: f64 },

    /// A parameter request exceeded its ceiling
    #[error("{kind} of {requested} exceeds ceiling {ceiling}")]
    ParameterOverCeiling {
        kind: ParamKind,
        requested: f64,
        ceiling: f64,
    },

    /// No sample was available for the active sensor
    #[error("no {0} sample available")]
    SensorUnavailable(SensorMode),

    /// Playback was requested in a state that does not allow it
    #[error("cannot start playback: {0}")]
    InvalidPlaybackState(&'static str),

    /// A sensitivity factor was negative or not finite
    #[error("invalid sensitivity {factor} for axis {axis}")]
    InvalidSensitivity { axis: Axis, factor: f64 },
}

pub type ControlResult<T> = std::result::Result<T, ControlError>;
