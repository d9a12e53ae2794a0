//! Surface projection of collected features and arrow placement.

use crate::error::{EncodeError, Result};
use crate::geo_utils::offset_endpoints;
use crate::projection::{
    apply_arc_elevation, arc_segments, interpolate_great_circle, interpolate_straight,
    to_planar_position, to_surface_position, Surface,
};
use crate::style::RouteStyle;
use crate::{GeoPoint, Position};

use super::{ArrowGlyph, FeatureKind, MarkerFeature, PathFeature, PathGeometry};

/// Most direction glyphs placed along one route.
const MAX_ROUTE_ARROWS: usize = 5;
/// Fraction of an arc at which its glyph sits.
const EDGE_ARROW_POSITION: f64 = 0.67;

pub(crate) struct Projected {
    pub points: Vec<Position>,
    /// Geographic vertices actually drawn, for bounds and distances.
    pub drawn: Vec<GeoPoint>,
    /// The arc fell back to straight interpolation.
    pub degenerate: bool,
}

fn project_at(point: &GeoPoint, surface: &Surface, elevation: f64) -> Result<Position> {
    match surface {
        Surface::Globe { radius } => {
            to_surface_position(point, radius * elevation).map(Position::Globe)
        }
        Surface::Map => Ok(Position::Map(to_planar_position(point))),
    }
}

pub(crate) fn project_path(feature: &PathFeature, surface: &Surface, style: &RouteStyle) -> Result<Projected> {
    match &feature.geometry {
        PathGeometry::Polyline {
            vertices,
            elevation,
        } => {
            let points = vertices
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let lift = elevation.as_ref().and_then(|e| e.get(i)).copied().unwrap_or(1.0);
                    project_at(p, surface, lift)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Projected {
                points,
                drawn: vertices.clone(),
                degenerate: false,
            })
        }
        PathGeometry::Arc { start, end, offset } => {
            let distance = style.flow_offset_degrees;
            // The side is relative to the pair's forward (low -> high) line,
            // so a backward edge is displaced along its reversed direction.
            let (a, b) = match offset.signum() {
                0 => (*start, *end),
                1 => offset_endpoints(start, end, 1.0, distance),
                _ => {
                    let (b, a) = offset_endpoints(end, start, -1.0, distance);
                    (a, b)
                }
            };
            project_arc(&a, &b, surface, style.arc_height)
        }
    }
}

fn project_arc(a: &GeoPoint, b: &GeoPoint, surface: &Surface, arc_height: f64) -> Result<Projected> {
    let radius = match surface {
        Surface::Map => {
            return Ok(Projected {
                points: vec![
                    Position::Map(to_planar_position(a)),
                    Position::Map(to_planar_position(b)),
                ],
                drawn: vec![*a, *b],
                degenerate: false,
            });
        }
        Surface::Globe { radius } => *radius,
    };

    let segments = arc_segments(a, b);
    let (drawn, degenerate) = match interpolate_great_circle(a, b, segments) {
        Ok(points) => (points, false),
        Err(EncodeError::DegenerateGreatCircle { .. }) => {
            (interpolate_straight(a, b, segments)?, true)
        }
        Err(err) => return Err(err),
    };

    let on_surface = drawn
        .iter()
        .map(|p| to_surface_position(p, radius))
        .collect::<Result<Vec<_>>>()?;
    let points = apply_arc_elevation(&on_surface, arc_height * radius)
        .into_iter()
        .map(Position::Globe)
        .collect();

    Ok(Projected {
        points,
        drawn,
        degenerate,
    })
}

pub(crate) fn project_marker(marker: &MarkerFeature, surface: &Surface) -> Result<Position> {
    project_at(&marker.point, surface, marker.elevation)
}

fn glyph_between(a: &Position, b: &Position) -> Option<ArrowGlyph> {
    Some(ArrowGlyph {
        position: a.midpoint(b)?,
        direction: a.direction_to(b)?,
    })
}

/// Direction glyphs for a projected path.
///
/// Routes get up to five, evenly stepped, at segment midpoints. Segments get
/// one at their midpoint. Edges get one two thirds along, oriented along the
/// local tangent. Zero-length directions produce no glyph.
pub(crate) fn arrows(kind: FeatureKind, points: &[Position]) -> Vec<ArrowGlyph> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }

    match kind {
        FeatureKind::Route => {
            let count = MAX_ROUTE_ARROWS.min(n - 1);
            let step = (n - 1) / count;
            (1..=count)
                .filter_map(|k| glyph_between(&points[k * step - 1], &points[k * step]))
                .collect()
        }
        FeatureKind::Edge if n > 2 => {
            let at = (n as f64 * EDGE_ARROW_POSITION).floor() as usize;
            let at = at.min(n - 1);
            let prev = &points[at.saturating_sub(1)];
            let next = &points[(at + 1).min(n - 1)];
            prev.direction_to(next)
                .map(|direction| ArrowGlyph {
                    position: points[at],
                    direction,
                })
                .into_iter()
                .collect()
        }
        _ => glyph_between(&points[0], &points[n - 1]).into_iter().collect(),
    }
}
