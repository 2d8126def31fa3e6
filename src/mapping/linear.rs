//! Linear range mapping

use crate::control::{ControlError, ControlResult};

/// Map `value` from `[from_low, from_high]` onto `[to_low, to_high]`.
///
/// The result is not clamped: values outside the source interval
/// extrapolate. A zero-width source interval has no defined mapping and
/// yields [`ControlError::DivisionDegenerate`].
pub fn map_range(
    value: f64,
    from_low: f64,
    from_high: f64,
    to_low: f64,
    to_high: f64,
) -> ControlResult<f64> {
    let from_span = from_high - from_low;
    if from_span == 0.0 {
        return Err(ControlError::DivisionDegenerate {
            low: from_low,
            high: from_high,
        });
    }

    Ok((value - from_low) / from_span * (to_high - to_low) + to_low)
}

/// A fixed output range that inputs are mapped onto
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMapper {
    out_min: f64,
    out_max: f64,
}

impl LinearMapper {
    /// Create a mapper targeting `[out_min, out_max]`
    pub fn new(out_min: f64, out_max: f64) -> Self {
        Self { out_min, out_max }
    }

    pub fn out_min(&self) -> f64 {
        self.out_min
    }

    pub fn out_max(&self) -> f64 {
        self.out_max
    }

    /// Map a magnitude measured against `[0, full_scale]` onto the output range
    pub fn map_from_zero(&self, value: f64, full_scale: f64) -> ControlResult<f64> {
        map_range(value, 0.0, full_scale, self.out_min, self.out_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_range_basic() {
        assert_eq!(map_range(0.0, 0.0, 100.0, 0.0, 1.0).unwrap(), 0.0);
        assert_eq!(map_range(50.0, 0.0, 100.0, 0.0, 1.0).unwrap(), 0.5);
        assert_eq!(map_range(100.0, 0.0, 100.0, 0.0, 1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_map_range_inverted_output() {
        assert_eq!(map_range(0.0, 0.0, 100.0, 1.0, 0.0).unwrap(), 1.0);
        assert_eq!(map_range(100.0, 0.0, 100.0, 1.0, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_map_range_extrapolates() {
        assert_eq!(map_range(-50.0, 0.0, 100.0, 0.0, 1.0).unwrap(), -0.5);
        assert_eq!(map_range(150.0, 0.0, 100.0, 0.0, 1.0).unwrap(), 1.5);
    }

    #[test]
    fn test_map_range_degenerate() {
        let err = map_range(1.0, 2.0, 2.0, 0.0, 1.0).unwrap_err();
        assert_eq!(err, ControlError::DivisionDegenerate { low: 2.0, high: 2.0 });
    }

    #[test]
    fn test_map_range_order_preserving() {
        // Rotation rate 0..4 rad/s -> 20..2000 Hz
        let mut previous = f64::NEG_INFINITY;
        for i in 0..=40 {
            let v = i as f64 * 0.1;
            let mapped = map_range(v, 0.0, 4.0, 20.0, 2000.0).unwrap();
            assert!(mapped > previous, "{} not above {}", mapped, previous);
            previous = mapped;
        }
    }

    #[test]
    fn test_map_range_affine() {
        let a = map_range(1.0, 0.0, 4.0, 20.0, 2000.0).unwrap();
        let b = map_range(3.0, 0.0, 4.0, 20.0, 2000.0).unwrap();
        let mid = map_range(2.0, 0.0, 4.0, 20.0, 2000.0).unwrap();
        assert!((mid - (a + b) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_mapper_full_scale_hits_top() {
        let mapper = LinearMapper::new(20.0, 2000.0);
        assert_eq!(mapper.map_from_zero(3.0, 3.0).unwrap(), 2000.0);
        assert_eq!(mapper.map_from_zero(0.0, 3.0).unwrap(), 20.0);
        assert!(mapper.map_from_zero(1.0, 0.0).is_err());
    }
}
