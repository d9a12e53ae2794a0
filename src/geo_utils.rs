//! Geographic helpers shared by the projection and the feature builders.

use geo::{Coord, HaversineDistance, LineString, Point, SimplifyIdx};

use crate::projection::unit_vector;
use crate::{Bounds, GeoPoint};

/// Great-circle distance in meters.
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    Point::new(a.lon, a.lat).haversine_distance(&Point::new(b.lon, b.lat))
}

/// Length of a polyline in meters.
pub fn path_distance(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Indices of the vertices kept by Douglas-Peucker simplification.
///
/// `tolerance` is in degrees. The first and last vertex are always kept.
pub fn simplify_indices(points: &[GeoPoint], tolerance: f64) -> Vec<usize> {
    if points.len() < 3 || !(tolerance > 0.0) {
        return (0..points.len()).collect();
    }
    let line: LineString<f64> = points
        .iter()
        .map(|p| Coord { x: p.lon, y: p.lat })
        .collect();
    line.simplify_idx(&tolerance)
}

/// Chord length between two points projected on the unit sphere.
///
/// This is the `$length` pseudo-variable: the straight-line distance between
/// the projected endpoints, independent of the configured globe radius.
pub fn chord_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    unit_vector(a).distance_to(&unit_vector(b))
}

/// Sum of chord lengths along an ordered sequence of points.
pub fn path_chord_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| chord_distance(&w[0], &w[1]))
        .sum()
}

/// Central angle between two points in radians.
pub fn central_angle(a: &GeoPoint, b: &GeoPoint) -> f64 {
    unit_vector(a).dot(&unit_vector(b)).clamp(-1.0, 1.0).acos()
}

/// Compute the bounding box of a set of points.
///
/// Returns a zero-sized box at the origin for empty input.
pub fn compute_bounds(points: &[GeoPoint]) -> Bounds {
    Bounds::from_points(points).unwrap_or(Bounds {
        min_lat: 0.0,
        max_lat: 0.0,
        min_lon: 0.0,
        max_lon: 0.0,
    })
}

/// Shift a line perpendicular to its direction in lat/lon space.
///
/// `sign` selects the side (+1 left of travel, -1 right). The longitude
/// component is stretched by `1 / cos(start.lat)` so the displacement looks
/// even on a Web-Mercator style map.
pub fn offset_endpoints(
    start: &GeoPoint,
    end: &GeoPoint,
    sign: f64,
    distance_deg: f64,
) -> (GeoPoint, GeoPoint) {
    let dx = end.lon - start.lon;
    let dy = end.lat - start.lat;
    let angle = dy.atan2(dx) + std::f64::consts::FRAC_PI_2;

    let d_lat = distance_deg * angle.sin();
    let cos_lat = start.lat.to_radians().cos();
    // Near the poles the stretch factor blows up; leave longitude alone there.
    let d_lon = if cos_lat.abs() > 1e-9 {
        distance_deg * angle.cos() / cos_lat
    } else {
        0.0
    };

    (
        GeoPoint::new(start.lat + sign * d_lat, start.lon + sign * d_lon),
        GeoPoint::new(end.lat + sign * d_lat, end.lon + sign * d_lon),
    )
}
