//! Projection of geographic coordinates onto the rendering surfaces.
//!
//! - Equirectangular-to-sphere mapping with `y` as the polar axis
//! - Planar pass-through for 2D map backends
//! - Great-circle (slerp) and straight interpolation between two points
//! - Arc elevation for origin-destination curves

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::error::{EncodeError, Result};
use crate::geo_utils::central_angle;
use crate::{GeoPoint, MapPosition, Position, Position3D};

/// Dot-product tolerance for antipodal endpoint detection.
const DEGENERATE_EPSILON: f64 = 1e-12;
/// Below this angular separation arcs are interpolated along the chord.
const NEAR_EPSILON: f64 = 1e-10;

/// Arc resolution for endpoints more than a quarter turn apart.
pub const LONG_ARC_SEGMENTS: usize = 100;
/// Arc resolution for everything else.
pub const SHORT_ARC_SEGMENTS: usize = 50;

/// Target rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Surface {
    /// 3D globe of the given radius.
    Globe { radius: f64 },
    /// 2D map; coordinates pass through unchanged.
    Map,
}

impl Default for Surface {
    fn default() -> Self {
        Surface::Globe { radius: 1.0 }
    }
}

impl std::str::FromStr for Surface {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "globe" | "sphere" | "3d" => Ok(Surface::default()),
            "map" | "planar" | "2d" => Ok(Surface::Map),
            _ => Err(EncodeError::UnknownOption {
                kind: "surface",
                value: s.to_string(),
            }),
        }
    }
}

impl Surface {
    /// Reject a globe radius that is not positive and finite.
    pub fn validate(&self) -> Result<()> {
        match self {
            Surface::Globe { radius } => check_radius(*radius),
            Surface::Map => Ok(()),
        }
    }

    /// Project a point onto this surface.
    pub fn project(&self, point: &GeoPoint) -> Result<Position> {
        match self {
            Surface::Globe { radius } => to_surface_position(point, *radius).map(Position::Globe),
            Surface::Map => Ok(Position::Map(to_planar_position(point))),
        }
    }
}

/// Map a geographic point onto a sphere of the given radius.
///
/// `lat = 90` lands on `+y`; longitude wraps modulo 360 through the
/// trigonometric functions.
///
/// # Example
/// ```
/// use geoencode::{to_surface_position, GeoPoint};
///
/// let pole = to_surface_position(&GeoPoint::new(90.0, 0.0), 2.0).unwrap();
/// assert!((pole.y - 2.0).abs() < 1e-12);
/// ```
pub fn to_surface_position(point: &GeoPoint, radius: f64) -> Result<Position3D> {
    check_radius(radius)?;
    Ok(unit_vector(point).scale(radius))
}

fn check_radius(radius: f64) -> Result<()> {
    if radius > 0.0 && radius.is_finite() {
        Ok(())
    } else {
        Err(EncodeError::InvalidArgument(format!(
            "sphere radius must be positive and finite, got {radius}"
        )))
    }
}

/// Unit-sphere position of a point. Infallible counterpart of
/// [`to_surface_position`] used by the geometric helpers.
pub(crate) fn unit_vector(point: &GeoPoint) -> Position3D {
    let phi = (90.0 - point.lat).to_radians();
    let theta = (point.lon + 180.0).to_radians();

    Position3D::new(
        -phi.sin() * theta.cos(),
        phi.cos(),
        phi.sin() * theta.sin(),
    )
}

/// Inverse of [`unit_vector`] for any non-zero vector.
fn from_vector(v: &Position3D) -> GeoPoint {
    let len = v.length();
    let lat = (v.y / len).clamp(-1.0, 1.0).asin().to_degrees();
    let theta = v.z.atan2(-v.x);
    // theta = lon + 180, wrapped back into [-180, 180)
    let lon = theta.to_degrees().rem_euclid(360.0) - 180.0;
    GeoPoint::new(lat, lon)
}

/// Planar pass-through for map backends. No distortion correction.
pub fn to_planar_position(point: &GeoPoint) -> MapPosition {
    MapPosition::new(point.lat, point.lon)
}

/// Interpolate `segments + 1` points along the great circle from `a` to `b`.
///
/// The first and last entries are exactly `a` and `b`. Identical endpoints
/// yield `segments + 1` copies of `a`; antipodal endpoints have no unique
/// great circle and fail with [`EncodeError::DegenerateGreatCircle`].
pub fn interpolate_great_circle(a: &GeoPoint, b: &GeoPoint, segments: usize) -> Result<Vec<GeoPoint>> {
    if segments == 0 {
        return Err(EncodeError::InvalidArgument(
            "great-circle interpolation needs at least one segment".to_string(),
        ));
    }

    let u = unit_vector(a);
    let v = unit_vector(b);
    let cos_omega = u.dot(&v).clamp(-1.0, 1.0);

    if a == b || u == v {
        // Same spot; `b` may still differ by a full turn of longitude.
        let mut points = vec![*a; segments + 1];
        points[segments] = *b;
        return Ok(points);
    }
    if cos_omega <= -1.0 + DEGENERATE_EPSILON {
        return Err(EncodeError::DegenerateGreatCircle { from: *a, to: *b });
    }

    let omega = cos_omega.acos();
    let sin_omega = omega.sin();

    let mut points: Vec<GeoPoint> = if cos_omega >= 1.0 - NEAR_EPSILON {
        // sin(omega) is unstable here; the chord is indistinguishable from the arc.
        (0..=segments)
            .map(|i| from_vector(&u.lerp(&v, i as f64 / segments as f64)))
            .collect()
    } else {
        (0..=segments)
            .map(|i| {
                let t = i as f64 / segments as f64;
                let wa = ((1.0 - t) * omega).sin() / sin_omega;
                let wb = (t * omega).sin() / sin_omega;
                from_vector(&u.scale(wa).add(&v.scale(wb)))
            })
            .collect()
    };

    points[0] = *a;
    points[segments] = *b;
    Ok(points)
}

/// Interpolate `segments + 1` points on the straight lat/lon line from `a` to `b`.
pub fn interpolate_straight(a: &GeoPoint, b: &GeoPoint, segments: usize) -> Result<Vec<GeoPoint>> {
    if segments == 0 {
        return Err(EncodeError::InvalidArgument(
            "straight interpolation needs at least one segment".to_string(),
        ));
    }
    Ok((0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            GeoPoint::new(a.lat + t * (b.lat - a.lat), a.lon + t * (b.lon - a.lon))
        })
        .collect())
}

/// Raise each position's radial distance by `arc_height * sin(pi * t)`.
///
/// `t` runs from 0 at the first position to 1 at the last, so the endpoints
/// stay on the surface and the apex sits in the middle. A zero-length
/// position cannot be raised and is passed through.
pub fn apply_arc_elevation(interpolated: &[Position3D], arc_height: f64) -> Vec<Position3D> {
    let last = interpolated.len().saturating_sub(1);
    interpolated
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let t = if last == 0 { 0.0 } else { i as f64 / last as f64 };
            let len = p.length();
            if len <= f64::EPSILON {
                return *p;
            }
            let lift = arc_height * (PI * t).sin();
            p.scale((len + lift) / len)
        })
        .collect()
}

/// Segment count for a globe arc between two points.
pub fn arc_segments(a: &GeoPoint, b: &GeoPoint) -> usize {
    if central_angle(a, b) > FRAC_PI_2 {
        LONG_ARC_SEGMENTS
    } else {
        SHORT_ARC_SEGMENTS
    }
}
