//! # Feature Builder
//!
//! Turns a loaded dataset and a [`StyleConfig`] into render primitives.
//!
//! Each pass:
//! 1. Validates the dataset (missing columns reject the whole pass)
//! 2. Collects shape-specific features (routes, segments, ordered segments,
//!    flow-resolved edges, markers)
//! 3. Resolves ranges for variable-driven channels through the cached
//!    [`RangeTracker`]
//! 4. Resolves color and width per path, size per marker
//! 5. Projects geometry onto the configured surface
//! 6. Emits primitives, one legend and the bounds of everything drawn
//!
//! Per-feature failures (no usable values, transform domain errors,
//! antipodal arcs) fall back to fixed styling or straight geometry and are
//! counted in [`BuildStats`]. They never abort the pass.

mod connections;
mod geometry;
mod ordered;
mod palette;
mod routes;
mod segments;

pub use palette::CategoryPalette;

use std::time::Instant;

use log::{info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::colormap::{Color, Colormap};
use crate::dataset::{Dataset, DatasetId, LoadedDataset};
use crate::error::Result;
use crate::flow::FlowMode;
use crate::legend::LegendDescriptor;
use crate::mapper::{map_value, normalize, OutputRange};
use crate::range::{
    compute_range_by, range_from_values, RangeKey, RangeState, RangeTracker, StyleChannel,
};
use crate::record::Record;
use crate::style::{ColorMode, LineStyle, RouteStyle, SizeMode, StyleConfig, Variable};
use crate::transform::Transform;
use crate::{Bounds, GeoPoint, Position};

use geometry::Projected;

/// Width or size used when a resolved value is unusable.
const FALLBACK_SIZE: f64 = 1.0;

/// What a primitive was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureKind {
    Route,
    Segment,
    OrderedSegment,
    Edge,
    Point,
    RouteVertex,
}

/// Opaque inspection data attached to a primitive (tooltips and the like).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturePayload {
    pub kind: FeatureKind,
    pub id: String,
    /// Source records, after flow aggregation for edges.
    pub records: Vec<Record>,
    /// Great-circle length of the drawn feature in meters.
    pub distance_m: f64,
}

/// A direction marker along a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowGlyph {
    pub position: Position,
    /// Unit direction of travel.
    pub direction: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPrimitive {
    pub points: Vec<Position>,
    pub color: Color,
    pub width: f64,
    pub style: LineStyle,
    pub arrows: Vec<ArrowGlyph>,
    pub payload: FeaturePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPrimitive {
    pub position: Position,
    pub color: Color,
    pub size: f64,
    pub payload: FeaturePayload,
}

/// One drawable item. Rebuilt from scratch on every pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenderPrimitive {
    Path(PathPrimitive),
    Marker(MarkerPrimitive),
}

impl RenderPrimitive {
    pub fn as_path(&self) -> Option<&PathPrimitive> {
        match self {
            RenderPrimitive::Path(path) => Some(path),
            RenderPrimitive::Marker(_) => None,
        }
    }

    pub fn as_marker(&self) -> Option<&MarkerPrimitive> {
        match self {
            RenderPrimitive::Marker(marker) => Some(marker),
            RenderPrimitive::Path(_) => None,
        }
    }

    pub fn payload(&self) -> &FeaturePayload {
        match self {
            RenderPrimitive::Path(path) => &path.payload,
            RenderPrimitive::Marker(marker) => &marker.payload,
        }
    }
}

/// Diagnostics of one build pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub paths: usize,
    pub markers: usize,
    /// Features (or whole channels) that fell back to fixed styling.
    pub fallbacks: usize,
    /// Records without usable coordinates.
    pub skipped_records: usize,
    /// Paths with fewer than two usable vertices.
    pub skipped_features: usize,
    /// Edges whose endpoints are not in the point table.
    pub skipped_edges: usize,
    /// Antipodal arcs drawn along the straight lat/lon line instead.
    pub degenerate_arcs: usize,
    /// Malformed rows the data source dropped.
    pub dropped_rows: usize,
}

/// Everything a backend needs to draw one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildOutput {
    pub primitives: Vec<RenderPrimitive>,
    pub legend: LegendDescriptor,
    /// Bounding box of every drawn vertex, `None` if nothing was drawn.
    pub bounds: Option<Bounds>,
    pub stats: BuildStats,
}

impl BuildOutput {
    pub fn paths(&self) -> impl Iterator<Item = &PathPrimitive> {
        self.primitives.iter().filter_map(RenderPrimitive::as_path)
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerPrimitive> {
        self.primitives.iter().filter_map(RenderPrimitive::as_marker)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::EncodeError::InvalidArgument(format!("serialize output: {e}")))
    }
}

// ============================================================================
// Collected features (shape-independent intermediate form)
// ============================================================================

pub(crate) enum PathGeometry {
    /// Vertices joined in order. `elevation` holds one radius multiplier
    /// per vertex.
    Polyline {
        vertices: Vec<GeoPoint>,
        elevation: Option<Vec<f64>>,
    },
    /// Flow arc between two points, drawn on side `offset` of the direct line.
    Arc {
        start: GeoPoint,
        end: GeoPoint,
        offset: i8,
    },
}

pub(crate) struct PathFeature {
    pub kind: FeatureKind,
    pub id: String,
    pub records: Vec<Record>,
    pub geometry: PathGeometry,
    pub category: Option<String>,
    /// Unit-sphere chord length (`$length`).
    pub length: f64,
    /// Position in the shape's input sequence (`$order`, sequence gradient).
    pub sequence: usize,
}

impl PathFeature {
    /// Value of `variable` for this feature.
    ///
    /// Record fields are averaged over every record of the feature.
    fn value(&self, variable: &Variable) -> Option<f64> {
        match variable {
            Variable::Length => Some(self.length),
            Variable::Order => Some(self.sequence as f64),
            Variable::Field(name) => mean(self.records.iter().filter_map(|r| r.number(name))),
        }
    }
}

pub(crate) struct MarkerFeature {
    pub kind: FeatureKind,
    pub id: String,
    pub record: Record,
    pub point: GeoPoint,
    /// Radius multiplier on the globe.
    pub elevation: f64,
}

impl MarkerFeature {
    fn value(&self, variable: &Variable, index: usize) -> Option<f64> {
        match variable {
            Variable::Field(name) => self.record.number(name),
            Variable::Order => Some(index as f64),
            Variable::Length => None,
        }
    }
}

#[derive(Default)]
pub(crate) struct Features {
    pub paths: Vec<PathFeature>,
    pub markers: Vec<MarkerFeature>,
    pub skipped_records: usize,
    pub skipped_features: usize,
    pub skipped_edges: usize,
    /// Length of the sequence `PathFeature::sequence` indexes into.
    pub sequence_len: usize,
    /// Records of features that could not be drawn; they still count
    /// towards field ranges.
    pub unplaced: Vec<Record>,
}

fn mean<I: Iterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Read a finite coordinate pair from a record.
pub(crate) fn read_point(record: &Record, lat_field: &str, lon_field: &str) -> Option<GeoPoint> {
    let point = GeoPoint::new(record.number(lat_field)?, record.number(lon_field)?);
    point.is_valid().then_some(point)
}

fn sequence_ratio(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

fn sanitize_size(value: f64, what: &str, id: &str, stats: &mut BuildStats) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!("[Builder] {what} {value} for '{id}' is unusable, using {FALLBACK_SIZE}");
        stats.fallbacks += 1;
        FALLBACK_SIZE
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Range cache scope of one pass.
struct PassContext {
    dataset: DatasetId,
    flow: Option<FlowMode>,
}

impl PassContext {
    fn key(&self, variable: &Variable) -> RangeKey {
        RangeKey {
            dataset: self.dataset,
            variable: variable.clone(),
            flow: self.flow,
        }
    }
}

/// Builds render primitives; keeps per-channel ranges between passes.
///
/// # Example
/// ```
/// use geoencode::{ColorMode, Dataset, FeatureBuilder, LoadedDataset, RampId, Record, StyleConfig, Variable};
///
/// let segment = |id: &str, value: f64| {
///     Record::new()
///         .with("segment_id", id)
///         .with("start_lat", 0.0).with("start_lon", 0.0)
///         .with("end_lat", 0.0).with("end_lon", 10.0)
///         .with("value", value)
/// };
/// let dataset = LoadedDataset::new(Dataset::TrajectorySegments(vec![
///     segment("a", 5.0),
///     segment("b", 15.0),
/// ]));
/// let config = StyleConfig::default()
///     .with_color_mode(ColorMode::ByVariable)
///     .with_color_variable(Variable::field("value"))
///     .with_ramp(RampId::RedBlue);
///
/// let mut builder = FeatureBuilder::new();
/// let output = builder.build(&dataset, &config).unwrap();
/// let colors: Vec<String> = output.paths().map(|p| p.color.to_hex()).collect();
/// assert_eq!(colors, ["#ff0000", "#0000ff"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureBuilder {
    ranges: RangeTracker,
}

impl FeatureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranges computed by the most recent passes.
    pub fn ranges(&self) -> &RangeTracker {
        &self.ranges
    }

    /// Build the primitives for `loaded` under `config`.
    ///
    /// Fails only when the dataset itself is unusable (missing required
    /// columns, empty tables) or the surface is misconfigured.
    pub fn build(&mut self, loaded: &LoadedDataset, config: &StyleConfig) -> Result<BuildOutput> {
        let start = Instant::now();
        let dataset = loaded.dataset();
        dataset.validate()?;
        config.surface.validate()?;

        let (features, flow) = match dataset {
            Dataset::TrajectoryPoints(records) => (routes::collect(records, config), None),
            Dataset::TrajectorySegments(records) => (segments::collect(records), None),
            Dataset::OrderedTrajectory(records) => (ordered::collect(records), None),
            Dataset::Connections { points, edges } => (
                connections::collect(points, edges, config.routes.flow_mode),
                Some(config.routes.flow_mode),
            ),
        };
        let ctx = PassContext {
            dataset: loaded.id(),
            flow,
        };

        let mut stats = BuildStats {
            skipped_records: features.skipped_records,
            skipped_features: features.skipped_features,
            skipped_edges: features.skipped_edges,
            dropped_rows: loaded.dropped_rows(),
            ..BuildStats::default()
        };

        let routes = &config.routes;
        let (colors, legend) = self.path_colors(&ctx, &features, routes, &mut stats);
        let widths = self.path_widths(&ctx, &features, routes, &mut stats);
        let projected = project_paths(&features.paths, config)?;

        let mut drawn: Vec<GeoPoint> = Vec::new();
        let mut primitives: Vec<RenderPrimitive> =
            Vec::with_capacity(features.paths.len() + features.markers.len());

        for (((feature, projected_path), color), width) in features
            .paths
            .into_iter()
            .zip(projected)
            .zip(colors)
            .zip(widths)
        {
            let Projected {
                points,
                drawn: vertices,
                degenerate,
            } = projected_path;
            if degenerate {
                warn!(
                    "[Builder] antipodal endpoints for '{}', drawing straight arc",
                    feature.id
                );
                stats.degenerate_arcs += 1;
            }

            let arrows = if routes.line_style.has_arrows() {
                geometry::arrows(feature.kind, &points)
            } else {
                Vec::new()
            };
            let distance_m = crate::geo_utils::path_distance(&vertices);
            drawn.extend(vertices);

            primitives.push(RenderPrimitive::Path(PathPrimitive {
                points,
                color,
                width,
                style: routes.line_style,
                arrows,
                payload: FeaturePayload {
                    kind: feature.kind,
                    id: feature.id,
                    records: feature.records,
                    distance_m,
                },
            }));
        }
        stats.paths = primitives.len();

        if config.points.visible && !features.markers.is_empty() {
            let sizes = self.marker_sizes(&ctx, &features.markers, config, &mut stats);
            for (marker, size) in features.markers.into_iter().zip(sizes) {
                let position = geometry::project_marker(&marker, &config.surface)?;
                drawn.push(marker.point);
                primitives.push(RenderPrimitive::Marker(MarkerPrimitive {
                    position,
                    color: config.points.color,
                    size,
                    payload: FeaturePayload {
                        kind: marker.kind,
                        id: marker.id,
                        records: vec![marker.record],
                        distance_m: 0.0,
                    },
                }));
            }
        }
        stats.markers = primitives.len() - stats.paths;

        info!(
            "[Builder] {}: {} paths, {} markers, {} fallbacks in {}ms",
            dataset.shape_name(),
            stats.paths,
            stats.markers,
            stats.fallbacks,
            start.elapsed().as_millis()
        );

        Ok(BuildOutput {
            primitives,
            legend,
            bounds: Bounds::from_points(&drawn),
            stats,
        })
    }

    /// Range of `variable` over path features, cached per channel.
    fn path_range(
        &mut self,
        channel: StyleChannel,
        ctx: &PassContext,
        variable: &Variable,
        features: &Features,
    ) -> Result<RangeState> {
        self.ranges.resolve(channel, ctx.key(variable), || match variable {
            // Field ranges span every record, not the per-feature means.
            Variable::Field(name) => {
                let records: Vec<&Record> = features
                    .paths
                    .iter()
                    .flat_map(|f| &f.records)
                    .chain(&features.unplaced)
                    .collect();
                compute_range_by(&records, name, |r| r.number(name))
            }
            // Whole input sequence, drawn or not.
            Variable::Order if !features.paths.is_empty() => range_from_values(
                &variable.to_string(),
                [0.0, features.sequence_len.saturating_sub(1) as f64],
            ),
            pseudo => range_from_values(
                &pseudo.to_string(),
                features.paths.iter().filter_map(|f| f.value(pseudo)),
            ),
        })
    }

    fn path_colors(
        &mut self,
        ctx: &PassContext,
        all: &Features,
        style: &RouteStyle,
        stats: &mut BuildStats,
    ) -> (Vec<Color>, LegendDescriptor) {
        let features = &all.paths;
        let fixed = vec![style.color; features.len()];

        match style.color_mode {
            ColorMode::Fixed => {
                self.ranges.invalidate(StyleChannel::Color);
                (fixed, LegendDescriptor::None)
            }
            ColorMode::ByCategory => {
                self.ranges.invalidate(StyleChannel::Color);
                let mut palette = CategoryPalette::new();
                let colors = features
                    .iter()
                    .map(|f| {
                        f.category
                            .as_deref()
                            .map_or(style.color, |c| palette.color_for(c))
                    })
                    .collect();
                (colors, LegendDescriptor::categorical(palette.entries()))
            }
            ColorMode::GradientBySequence => {
                self.ranges.invalidate(StyleChannel::Color);
                let colors = features
                    .iter()
                    .map(|f| {
                        let ratio = sequence_ratio(f.sequence, all.sequence_len);
                        style.sequence_gradient.at(ratio)
                    })
                    .collect();
                (colors, LegendDescriptor::sequence(&style.sequence_gradient))
            }
            ColorMode::ByVariable => {
                let Some(variable) = style.color_variable.as_ref() else {
                    warn!("[Builder] color by variable without a variable, using fixed color");
                    self.ranges.invalidate(StyleChannel::Color);
                    stats.fallbacks += 1;
                    return (fixed, LegendDescriptor::None);
                };
                let range = match self.path_range(StyleChannel::Color, ctx, variable, all) {
                    Ok(range) => range,
                    Err(err) => {
                        warn!("[Builder] {err}, using fixed color");
                        stats.fallbacks += 1;
                        return (fixed, LegendDescriptor::None);
                    }
                };

                let colormap = Colormap::new(style.ramp, style.custom_gradient);
                let colors = features
                    .iter()
                    .map(|f| {
                        let normalized = f
                            .value(variable)
                            .map(|v| normalize(v, &range, style.transform));
                        match normalized {
                            Some(Ok(t)) => colormap.evaluate(t),
                            Some(Err(err)) => {
                                warn!("[Builder] '{}': {err}, using fixed color", f.id);
                                stats.fallbacks += 1;
                                style.color
                            }
                            None => {
                                stats.fallbacks += 1;
                                style.color
                            }
                        }
                    })
                    .collect();
                (colors, LegendDescriptor::continuous(variable, &range, &colormap))
            }
        }
    }

    fn path_widths(
        &mut self,
        ctx: &PassContext,
        all: &Features,
        style: &RouteStyle,
        stats: &mut BuildStats,
    ) -> Vec<f64> {
        let variable_range = match (style.width_mode, style.width_variable.as_ref()) {
            (SizeMode::Fixed, _) => {
                self.ranges.invalidate(StyleChannel::Width);
                None
            }
            (SizeMode::ByVariable, None) => {
                warn!("[Builder] width by variable without a variable, using fixed width");
                self.ranges.invalidate(StyleChannel::Width);
                stats.fallbacks += 1;
                None
            }
            (SizeMode::ByVariable, Some(variable)) => {
                match self.path_range(StyleChannel::Width, ctx, variable, all) {
                    Ok(range) => Some((variable, range)),
                    Err(err) => {
                        warn!("[Builder] {err}, using fixed width");
                        stats.fallbacks += 1;
                        None
                    }
                }
            }
        };

        all.paths
            .iter()
            .map(|f| {
                let width = match &variable_range {
                    None => style.width,
                    Some((variable, range)) => resolve_size(
                        f.value(variable),
                        range,
                        style.transform,
                        &style.width_range,
                        style.width,
                        &f.id,
                        stats,
                    ),
                };
                sanitize_size(width, "width", &f.id, stats)
            })
            .collect()
    }

    fn marker_sizes(
        &mut self,
        ctx: &PassContext,
        markers: &[MarkerFeature],
        config: &StyleConfig,
        stats: &mut BuildStats,
    ) -> Vec<f64> {
        let style = &config.points;
        let variable_range = match (style.size_mode, style.size_variable.as_ref()) {
            (SizeMode::Fixed, _) => {
                self.ranges.invalidate(StyleChannel::PointSize);
                None
            }
            (SizeMode::ByVariable, None) => {
                warn!("[Builder] point size by variable without a variable, using fixed size");
                self.ranges.invalidate(StyleChannel::PointSize);
                stats.fallbacks += 1;
                None
            }
            (SizeMode::ByVariable, Some(variable)) => {
                let key = RangeKey {
                    flow: None,
                    ..ctx.key(variable)
                };
                let resolved = self.ranges.resolve(StyleChannel::PointSize, key, || {
                    let label = variable.to_string();
                    let indexed: Vec<(usize, &MarkerFeature)> = markers.iter().enumerate().collect();
                    compute_range_by(&indexed, &label, |(i, m)| m.value(variable, *i))
                });
                match resolved {
                    Ok(range) => Some((variable, range)),
                    Err(err) => {
                        warn!("[Builder] {err}, using fixed point size");
                        stats.fallbacks += 1;
                        None
                    }
                }
            }
        };

        markers
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let size = match &variable_range {
                    None => style.size,
                    Some((variable, range)) => resolve_size(
                        m.value(variable, i),
                        range,
                        style.size_transform,
                        &style.size_range,
                        style.size,
                        &m.id,
                        stats,
                    ),
                };
                sanitize_size(size, "point size", &m.id, stats)
            })
            .collect()
    }
}

/// Normalise and rescale one value, or fall back to `fixed`.
fn resolve_size(
    value: Option<f64>,
    range: &RangeState,
    transform: Transform,
    target: &OutputRange,
    fixed: f64,
    id: &str,
    stats: &mut BuildStats,
) -> f64 {
    let Some(value) = value else {
        stats.fallbacks += 1;
        return fixed;
    };
    match map_value(value, range, transform, target) {
        Ok(size) => size,
        Err(err) => {
            warn!("[Builder] '{id}': {err}, using fixed size");
            stats.fallbacks += 1;
            fixed
        }
    }
}

fn project_paths(features: &[PathFeature], config: &StyleConfig) -> Result<Vec<Projected>> {
    #[cfg(feature = "parallel")]
    {
        features
            .par_iter()
            .map(|f| geometry::project_path(f, &config.surface, &config.routes))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        features
            .iter()
            .map(|f| geometry::project_path(f, &config.surface, &config.routes))
            .collect()
    }
}
