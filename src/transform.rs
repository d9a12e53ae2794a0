//! Value transforms applied before normalisation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EncodeError, Result};

/// Reshapes a raw value before it is normalised against its range.
///
/// The same transform is applied to the value and to both range bounds, so
/// the resulting mapping stays monotonic for the chosen reshaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    #[default]
    Identity,
    /// `ln(value + 1)`, clamped at zero.
    Log,
    Sqrt,
    Square,
}

impl Transform {
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Identity => "identity",
            Transform::Log => "log",
            Transform::Sqrt => "sqrt",
            Transform::Square => "square",
        }
    }

    /// Apply the transform.
    ///
    /// # Example
    /// ```
    /// use geoencode::Transform;
    /// assert_eq!(Transform::Square.apply(3.0).unwrap(), 9.0);
    /// assert!(Transform::Sqrt.apply(-1.0).is_err());
    /// ```
    pub fn apply(&self, value: f64) -> Result<f64> {
        match self {
            Transform::Identity => Ok(value),
            Transform::Log => {
                if value <= -1.0 {
                    return Err(self.domain_error(value));
                }
                Ok((value + 1.0).ln().max(0.0))
            }
            Transform::Sqrt => {
                if value < 0.0 {
                    return Err(self.domain_error(value));
                }
                Ok(value.sqrt())
            }
            Transform::Square => Ok(value * value),
        }
    }

    fn domain_error(&self, value: f64) -> EncodeError {
        EncodeError::InvalidDomain {
            transform: self.name(),
            value,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = EncodeError;

    /// Accepts the control panel's spellings (`none`, `norm`, `pow2`) too.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" | "none" | "norm" | "" => Ok(Transform::Identity),
            "log" => Ok(Transform::Log),
            "sqrt" => Ok(Transform::Sqrt),
            "square" | "pow2" => Ok(Transform::Square),
            _ => Err(EncodeError::UnknownOption {
                kind: "transform",
                value: s.to_string(),
            }),
        }
    }
}
