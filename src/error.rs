//! Unified error handling for the encoding engine.
//!
//! Every failure in this crate is local and recoverable: the feature builder
//! catches per-feature errors, counts them and falls back to fixed styling.
//! Only dataset-level problems (missing columns, empty tables) stop a pass.

use thiserror::Error;

use crate::GeoPoint;

/// Errors produced by the encoding engine and its CSV data source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// A required column is absent from the first record of a dataset.
    #[error("missing required field '{field}' for {shape} dataset")]
    MissingRequiredField { shape: &'static str, field: String },

    /// A CSV row whose field count does not match the header.
    #[error("malformed row at line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// No record carries a usable numeric value for the variable.
    #[error("no numeric values available for variable '{variable}'")]
    EmptyRange { variable: String },

    /// A value outside the domain of a transform.
    #[error("value {value} is outside the domain of the {transform} transform")]
    InvalidDomain { transform: &'static str, value: f64 },

    /// An argument outside its accepted range (radius, segment count, bounds).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Great-circle interpolation between antipodal points.
    #[error(
        "great circle between ({}, {}) and ({}, {}) is undefined",
        .from.lat, .from.lon, .to.lat, .to.lon
    )]
    DegenerateGreatCircle { from: GeoPoint, to: GeoPoint },

    /// A dataset (or one of its tables) has no records at all.
    #[error("{shape} dataset contains no records")]
    EmptyDataset { shape: &'static str },

    /// A color string that is not `#rrggbb` / `#rgb`.
    #[error("invalid color '{0}'")]
    InvalidColor(String),

    /// A string option that does not name a known variant.
    #[error("unknown {kind} '{value}'")]
    UnknownOption { kind: &'static str, value: String },

    /// I/O or CSV syntax failure in the data source.
    #[error("csv error: {0}")]
    Csv(String),
}

impl From<csv::Error> for EncodeError {
    fn from(err: csv::Error) -> Self {
        EncodeError::Csv(err.to_string())
    }
}

impl From<std::io::Error> for EncodeError {
    fn from(err: std::io::Error) -> Self {
        EncodeError::Csv(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Conversions from `Option` into the crate's error kinds.
pub trait OptionExt<T> {
    /// Map `None` to [`EncodeError::EmptyRange`].
    fn ok_or_empty_range(self, variable: &str) -> Result<T>;

    /// Map `None` to [`EncodeError::MissingRequiredField`].
    fn ok_or_missing_field(self, shape: &'static str, field: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_empty_range(self, variable: &str) -> Result<T> {
        self.ok_or_else(|| EncodeError::EmptyRange {
            variable: variable.to_string(),
        })
    }

    fn ok_or_missing_field(self, shape: &'static str, field: &str) -> Result<T> {
        self.ok_or_else(|| EncodeError::MissingRequiredField {
            shape,
            field: field.to_string(),
        })
    }
}
