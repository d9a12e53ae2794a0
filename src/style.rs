//! Style configuration.
//!
//! [`StyleConfig`] is an immutable value handed to the feature builder on
//! every pass. Setters consume and return the config, so the caller always
//! holds one complete, consistent set of options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::colormap::{Color, Gradient, RampId};
use crate::error::{EncodeError, Result};
use crate::flow::FlowMode;
use crate::mapper::OutputRange;
use crate::transform::Transform;

pub use crate::projection::Surface;

/// A styling variable: a record column or a pseudo-variable computed from
/// geometry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Variable {
    Field(String),
    /// Unit-sphere chord length of the feature (`$length`).
    Length,
    /// Zero-based feature index in draw order (`$order`).
    Order,
}

impl Variable {
    pub fn field(name: impl Into<String>) -> Self {
        Variable::Field(name.into())
    }

    /// Human-readable name for legends.
    pub fn label(&self) -> String {
        match self {
            Variable::Field(name) => name.clone(),
            Variable::Length => "Distance".to_string(),
            Variable::Order => "Order".to_string(),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Field(name) => f.write_str(name),
            Variable::Length => f.write_str("$length"),
            Variable::Order => f.write_str("$order"),
        }
    }
}

impl FromStr for Variable {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" => Err(EncodeError::InvalidArgument(
                "variable name must not be empty".to_string(),
            )),
            "$length" => Ok(Variable::Length),
            "$order" => Ok(Variable::Order),
            name => Ok(Variable::Field(name.to_string())),
        }
    }
}

impl Serialize for Variable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Variable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// How path colors are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    #[default]
    Fixed,
    ByCategory,
    ByVariable,
    /// Interpolate along the feature sequence, first to last.
    GradientBySequence,
}

impl FromStr for ColorMode {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" | "single" => Ok(ColorMode::Fixed),
            "by-category" | "category" => Ok(ColorMode::ByCategory),
            "by-variable" | "variable" => Ok(ColorMode::ByVariable),
            "gradient-by-sequence" | "gradient" | "sequence" => Ok(ColorMode::GradientBySequence),
            _ => Err(EncodeError::UnknownOption {
                kind: "color mode",
                value: s.to_string(),
            }),
        }
    }
}

/// How widths and point sizes are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeMode {
    #[default]
    Fixed,
    ByVariable,
}

impl FromStr for SizeMode {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" | "single" => Ok(SizeMode::Fixed),
            "by-variable" | "variable" => Ok(SizeMode::ByVariable),
            _ => Err(EncodeError::UnknownOption {
                kind: "size mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Stroke style carried on every path.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dash { dash_size: f64, gap_size: f64 },
    Glow,
    /// Solid stroke plus direction glyphs.
    Arrow,
}

impl LineStyle {
    pub const DEFAULT_DASH: LineStyle = LineStyle::Dash {
        dash_size: 0.1,
        gap_size: 0.05,
    };

    pub fn has_arrows(&self) -> bool {
        matches!(self, LineStyle::Arrow)
    }
}

impl FromStr for LineStyle {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" => Ok(LineStyle::Solid),
            "dash" | "dashed" => Ok(LineStyle::DEFAULT_DASH),
            "glow" => Ok(LineStyle::Glow),
            "arrow" | "arrows" => Ok(LineStyle::Arrow),
            _ => Err(EncodeError::UnknownOption {
                kind: "line style",
                value: s.to_string(),
            }),
        }
    }
}

/// Styling of paths: routes, segments, ordered trajectories and edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteStyle {
    pub color_mode: ColorMode,
    pub color: Color,
    pub color_variable: Option<Variable>,
    pub width_mode: SizeMode,
    pub width: f64,
    pub width_variable: Option<Variable>,
    pub width_range: OutputRange,
    /// Shared by the color and width channels.
    pub transform: Transform,
    pub ramp: RampId,
    pub custom_gradient: Gradient,
    /// Endpoints for [`ColorMode::GradientBySequence`].
    pub sequence_gradient: Gradient,
    pub line_style: LineStyle,
    /// Radial lift at the middle of globe arcs.
    pub arc_height: f64,
    pub flow_mode: FlowMode,
    /// Perpendicular displacement of directional edges, in degrees.
    pub flow_offset_degrees: f64,
    /// Douglas-Peucker tolerance for route geometry, in degrees.
    pub simplify_tolerance: Option<f64>,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Fixed,
            color: Color::RED,
            color_variable: None,
            width_mode: SizeMode::Fixed,
            width: 3.0,
            width_variable: None,
            width_range: OutputRange::default(),
            transform: Transform::Identity,
            ramp: RampId::Viridis,
            custom_gradient: Gradient::new(Color::BLUE, Color::RED),
            sequence_gradient: Gradient::new(Color::RED, Color::BLUE),
            line_style: LineStyle::Solid,
            arc_height: 0.4,
            flow_mode: FlowMode::Directional,
            flow_offset_degrees: 0.5,
            simplify_tolerance: None,
        }
    }
}

/// Styling of markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointStyle {
    pub visible: bool,
    pub color: Color,
    pub size: f64,
    pub size_mode: SizeMode,
    pub size_variable: Option<Variable>,
    pub size_range: OutputRange,
    pub size_transform: Transform,
    /// Emit a marker for every trajectory point, not only connection points.
    pub show_route_vertices: bool,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            visible: true,
            color: Color::WHITE,
            size: 2.0,
            size_mode: SizeMode::Fixed,
            size_variable: None,
            size_range: OutputRange::default(),
            size_transform: Transform::Identity,
            show_route_vertices: false,
        }
    }
}

/// Complete styling input for one build pass.
///
/// # Example
/// ```
/// use geoencode::{ColorMode, RampId, StyleConfig, Variable};
///
/// let config = StyleConfig::default()
///     .with_color_mode(ColorMode::ByVariable)
///     .with_color_variable(Variable::field("speed"))
///     .with_ramp(RampId::Turbo);
/// assert_eq!(config.routes.ramp, RampId::Turbo);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub surface: Surface,
    pub routes: RouteStyle,
    pub points: PointStyle,
}

impl StyleConfig {
    /// Parse a JSON config; absent keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| EncodeError::InvalidArgument(format!("style config: {e}")))
    }

    #[must_use]
    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }

    #[must_use]
    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.routes.color_mode = mode;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.routes.color = color;
        self
    }

    #[must_use]
    pub fn with_color_variable(mut self, variable: Variable) -> Self {
        self.routes.color_variable = Some(variable);
        self
    }

    #[must_use]
    pub fn with_width_mode(mut self, mode: SizeMode) -> Self {
        self.routes.width_mode = mode;
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.routes.width = width;
        self
    }

    #[must_use]
    pub fn with_width_variable(mut self, variable: Variable) -> Self {
        self.routes.width_variable = Some(variable);
        self
    }

    #[must_use]
    pub fn with_width_range(mut self, range: OutputRange) -> Self {
        self.routes.width_range = range;
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.routes.transform = transform;
        self
    }

    #[must_use]
    pub fn with_ramp(mut self, ramp: RampId) -> Self {
        self.routes.ramp = ramp;
        self
    }

    #[must_use]
    pub fn with_custom_gradient(mut self, start: Color, end: Color) -> Self {
        self.routes.custom_gradient = Gradient::new(start, end);
        self
    }

    #[must_use]
    pub fn with_sequence_gradient(mut self, start: Color, end: Color) -> Self {
        self.routes.sequence_gradient = Gradient::new(start, end);
        self
    }

    #[must_use]
    pub fn with_line_style(mut self, style: LineStyle) -> Self {
        self.routes.line_style = style;
        self
    }

    #[must_use]
    pub fn with_arc_height(mut self, arc_height: f64) -> Self {
        self.routes.arc_height = arc_height;
        self
    }

    #[must_use]
    pub fn with_flow_mode(mut self, mode: FlowMode) -> Self {
        self.routes.flow_mode = mode;
        self
    }

    #[must_use]
    pub fn with_flow_offset(mut self, degrees: f64) -> Self {
        self.routes.flow_offset_degrees = degrees;
        self
    }

    #[must_use]
    pub fn with_simplify_tolerance(mut self, tolerance: Option<f64>) -> Self {
        self.routes.simplify_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_points_visible(mut self, visible: bool) -> Self {
        self.points.visible = visible;
        self
    }

    #[must_use]
    pub fn with_point_color(mut self, color: Color) -> Self {
        self.points.color = color;
        self
    }

    #[must_use]
    pub fn with_point_size(mut self, size: f64) -> Self {
        self.points.size = size;
        self
    }

    #[must_use]
    pub fn with_point_size_mode(mut self, mode: SizeMode) -> Self {
        self.points.size_mode = mode;
        self
    }

    #[must_use]
    pub fn with_point_size_variable(mut self, variable: Variable) -> Self {
        self.points.size_variable = Some(variable);
        self
    }

    #[must_use]
    pub fn with_point_size_range(mut self, range: OutputRange) -> Self {
        self.points.size_range = range;
        self
    }

    #[must_use]
    pub fn with_point_size_transform(mut self, transform: Transform) -> Self {
        self.points.size_transform = transform;
        self
    }

    #[must_use]
    pub fn with_route_vertices(mut self, show: bool) -> Self {
        self.points.show_route_vertices = show;
        self
    }
}
