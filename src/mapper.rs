//! Normalisation of raw values against an observed range.

use serde::{Deserialize, Serialize};

use crate::error::{EncodeError, Result};
use crate::range::RangeState;
use crate::transform::Transform;

/// Normalised value used when the transformed range has zero width.
pub const DEGENERATE_MIDPOINT: f64 = 0.5;

/// Target interval for a size-like channel (width, point size).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputRange {
    pub min: f64,
    pub max: f64,
}

impl OutputRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(EncodeError::InvalidArgument(format!(
                "output range bounds must be finite, got [{min}, {max}]"
            )));
        }
        Ok(Self { min, max })
    }

    /// Rescale a normalised value into this range.
    pub fn rescale(&self, normalized: f64) -> f64 {
        rescale(normalized, self.min, self.max)
    }
}

impl Default for OutputRange {
    fn default() -> Self {
        Self { min: 1.0, max: 10.0 }
    }
}

/// Normalise `value` to `[0, 1]` within `range` after applying `transform`.
///
/// `(T(v) - T(min)) / (T(max) - T(min))`. A degenerate range, before or
/// after the transform, yields [`DEGENERATE_MIDPOINT`] for any value.
///
/// Values outside the range are not clamped.
///
/// # Example
/// ```
/// use geoencode::{normalize, RangeState, Transform};
///
/// let range = RangeState::new(5.0, 15.0).unwrap();
/// assert_eq!(normalize(10.0, &range, Transform::Identity).unwrap(), 0.5);
///
/// let flat = RangeState::new(3.0, 3.0).unwrap();
/// assert_eq!(normalize(-7.0, &flat, Transform::Sqrt).unwrap(), 0.5);
/// ```
pub fn normalize(value: f64, range: &RangeState, transform: Transform) -> Result<f64> {
    if range.is_degenerate() {
        return Ok(DEGENERATE_MIDPOINT);
    }

    let t_min = transform.apply(range.min)?;
    let t_max = transform.apply(range.max)?;
    if t_max == t_min {
        return Ok(DEGENERATE_MIDPOINT);
    }

    let t_value = transform.apply(value)?;
    Ok((t_value - t_min) / (t_max - t_min))
}

/// Map a normalised value into `[target_min, target_max]` (extrapolating).
pub fn rescale(normalized: f64, target_min: f64, target_max: f64) -> f64 {
    target_min + normalized * (target_max - target_min)
}

/// Normalise then rescale in one step.
pub fn map_value(value: f64, range: &RangeState, transform: Transform, target: &OutputRange) -> Result<f64> {
    normalize(value, range, transform).map(|n| target.rescale(n))
}
