//! # geoencode
//!
//! Geospatial visual encoding engine for trajectory and flow visualisation.
//!
//! This library turns tabular geographic records into renderable, styled
//! primitives for either a 3D globe or a 2D map backend:
//! - Sphere and planar projection, great-circle interpolation, arc elevation
//! - Data ranges, value transforms and normalisation for styling channels
//! - Colormap evaluation (perceptual ramps, categorical palette, gradients)
//! - Bidirectional flow aggregation for origin-destination edges
//! - Per-dataset feature builders producing paths, markers and legends
//!
//! ## Features
//!
//! - **`parallel`** - Run range scans and arc geometry on rayon (default)
//! - **`synthetic`** - Seeded synthetic dataset generator for benches
//! - **`cli`** - Command-line front end (`geoencode-cli`)
//!
//! ## Quick Start
//!
//! ```rust
//! use geoencode::{Dataset, FeatureBuilder, LoadedDataset, Record, StyleConfig};
//!
//! let records = vec![
//!     Record::new().with("route_id", 1.0).with("point_id", 1.0).with("lat", 0.0).with("lon", 0.0),
//!     Record::new().with("route_id", 1.0).with("point_id", 2.0).with("lat", 10.0).with("lon", 10.0),
//! ];
//! let dataset = LoadedDataset::new(Dataset::TrajectoryPoints(records));
//!
//! let mut builder = FeatureBuilder::new();
//! let output = builder.build(&dataset, &StyleConfig::default()).unwrap();
//! assert_eq!(output.paths().count(), 1);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{EncodeError, OptionExt, Result};

// Geographic utilities (distances, bounds, planar offsets)
pub mod geo_utils;

// Sphere / planar projection and great-circle interpolation
pub mod projection;
pub use projection::{
    apply_arc_elevation, interpolate_great_circle, interpolate_straight, to_planar_position,
    to_surface_position,
};

// Tabular input model
pub mod record;
pub use record::{FieldValue, Record};

pub mod dataset;
pub use dataset::{Dataset, DatasetId, DatasetShape, LoadedDataset};

// CSV data source adapter
pub mod source;

// Value pipeline: transform -> range -> normalise -> rescale
pub mod transform;
pub use transform::Transform;

pub mod range;
pub use range::{
    compute_range, compute_range_by, range_from_values, RangeKey, RangeState, RangeTracker,
    StyleChannel,
};

pub mod mapper;
pub use mapper::{map_value, normalize, rescale, OutputRange};

// Colour evaluation
pub mod colormap;
pub use colormap::{interpolate_color, Color, Colormap, Gradient, RampId};

// Origin-destination flow aggregation
pub mod flow;
pub use flow::{group_by_unordered_pair, resolve_flows, FlowGroup, FlowMode, OutputEdge, PairKey};

// Style configuration
pub mod style;
pub use style::{
    ColorMode, LineStyle, PointStyle, RouteStyle, SizeMode, StyleConfig, Surface, Variable,
};

// Legends
pub mod legend;
pub use legend::{format_legend_value, LegendDescriptor, LegendEntry};

// Feature builders (orchestration)
pub mod builder;
pub use builder::{
    ArrowGlyph, BuildOutput, BuildStats, CategoryPalette, FeatureBuilder, FeatureKind,
    FeaturePayload, MarkerPrimitive, PathPrimitive, RenderPrimitive,
};

// Synthetic dataset generation for benches and stress tests
#[cfg(feature = "synthetic")]
pub mod synthetic;

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate in degrees.
///
/// # Example
/// ```
/// use geoencode::GeoPoint;
/// let point = GeoPoint::new(51.5074, -0.1278); // London
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new geographic point.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat >= -90.0
            && self.lat <= 90.0
            && self.lon >= -180.0
            && self.lon <= 180.0
    }
}

/// A position in globe space. `y` is the polar ("up") axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position3D {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        self.sub(other).length()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalized(&self) -> Option<Self> {
        let len = self.length();
        (len > f64::EPSILON && len.is_finite()).then(|| self.scale(1.0 / len))
    }

    /// Linear interpolation towards `other`.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        self.add(&other.sub(self).scale(t))
    }
}

/// A position on a planar map: latitude/longitude passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MapPosition {
    pub lat: f64,
    pub lon: f64,
}

impl MapPosition {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A projected position for either rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "surface", rename_all = "lowercase")]
pub enum Position {
    Globe(Position3D),
    Map(MapPosition),
}

impl Position {
    /// Midpoint between two positions on the same surface.
    pub fn midpoint(&self, other: &Position) -> Option<Position> {
        match (self, other) {
            (Position::Globe(a), Position::Globe(b)) => Some(Position::Globe(a.lerp(b, 0.5))),
            (Position::Map(a), Position::Map(b)) => Some(Position::Map(MapPosition::new(
                (a.lat + b.lat) / 2.0,
                (a.lon + b.lon) / 2.0,
            ))),
            _ => None,
        }
    }

    /// Unit direction from `self` to `other`, `None` when they coincide.
    pub fn direction_to(&self, other: &Position) -> Option<Position> {
        match (self, other) {
            (Position::Globe(a), Position::Globe(b)) => b.sub(a).normalized().map(Position::Globe),
            (Position::Map(a), Position::Map(b)) => {
                let d_lat = b.lat - a.lat;
                let d_lon = b.lon - a.lon;
                let len = d_lat.hypot(d_lon);
                (len > f64::EPSILON)
                    .then(|| Position::Map(MapPosition::new(d_lat / len, d_lon / len)))
            }
            _ => None,
        }
    }
}

/// Geographic bounding box of drawn geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Create bounds from geographic points.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut bounds = Self {
            min_lat: f64::MAX,
            max_lat: f64::MIN,
            min_lon: f64::MAX,
            max_lon: f64::MIN,
        };
        for p in points {
            bounds.extend(p);
        }
        Some(bounds)
    }

    /// Grow the bounds to include `point`.
    pub fn extend(&mut self, point: &GeoPoint) {
        self.min_lat = self.min_lat.min(point.lat);
        self.max_lat = self.max_lat.max(point.lat);
        self.min_lon = self.min_lon.min(point.lon);
        self.max_lon = self.max_lon.max(point.lon);
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}
