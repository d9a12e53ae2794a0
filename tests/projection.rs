//! Tests for sphere/planar projection and great-circle interpolation

use geoencode::projection::{arc_segments, LONG_ARC_SEGMENTS, SHORT_ARC_SEGMENTS};
use geoencode::{
    apply_arc_elevation, interpolate_great_circle, interpolate_straight, to_planar_position,
    to_surface_position, EncodeError, GeoPoint, Position, Position3D, Surface,
};

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn assert_point_eq(p: &GeoPoint, lat: f64, lon: f64) {
    assert!(
        approx_eq(p.lat, lat, 1e-9) && approx_eq(p.lon, lon, 1e-9),
        "expected ({lat}, {lon}), got ({}, {})",
        p.lat,
        p.lon
    );
}

// ============================================================================
// Surface position
// ============================================================================

#[test]
fn test_north_pole_is_up() {
    let p = to_surface_position(&GeoPoint::new(90.0, 0.0), 1.0).unwrap();
    assert!(approx_eq(p.x, 0.0, 1e-12));
    assert!(approx_eq(p.y, 1.0, 1e-12));
    assert!(approx_eq(p.z, 0.0, 1e-12));
}

#[test]
fn test_equator_prime_meridian() {
    // theta = 180 deg: x = -sin(90)cos(180) = 1, z = sin(90)sin(180) = 0
    let p = to_surface_position(&GeoPoint::new(0.0, 0.0), 1.0).unwrap();
    assert!(approx_eq(p.x, 1.0, 1e-12));
    assert!(approx_eq(p.y, 0.0, 1e-12));
    assert!(approx_eq(p.z, 0.0, 1e-12));
}

#[test]
fn test_radius_scales_position() {
    let p = GeoPoint::new(37.0, -122.0);
    let unit = to_surface_position(&p, 1.0).unwrap();
    let big = to_surface_position(&p, 6.5).unwrap();
    assert!(approx_eq(big.length(), 6.5, 1e-9));
    assert!(approx_eq(big.x, unit.x * 6.5, 1e-9));
}

#[test]
fn test_longitude_wraps() {
    let a = to_surface_position(&GeoPoint::new(10.0, 190.0), 1.0).unwrap();
    let b = to_surface_position(&GeoPoint::new(10.0, -170.0), 1.0).unwrap();
    assert!(a.distance_to(&b) < 1e-9);
}

#[test]
fn test_invalid_radius_rejected() {
    let p = GeoPoint::new(0.0, 0.0);
    for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            to_surface_position(&p, radius),
            Err(EncodeError::InvalidArgument(_))
        ));
    }
    assert!(Surface::Globe { radius: 0.0 }.validate().is_err());
    assert!(Surface::Map.validate().is_ok());
}

#[test]
fn test_planar_passes_through() {
    let m = to_planar_position(&GeoPoint::new(12.5, -45.25));
    assert_eq!((m.lat, m.lon), (12.5, -45.25));
    assert!(matches!(
        Surface::Map.project(&GeoPoint::new(1.0, 2.0)),
        Ok(Position::Map(_))
    ));
}

#[test]
fn test_surface_from_str() {
    assert_eq!("globe".parse::<Surface>().unwrap(), Surface::default());
    assert_eq!("2D".parse::<Surface>().unwrap(), Surface::Map);
    assert!("cube".parse::<Surface>().is_err());
}

// ============================================================================
// Great-circle interpolation
// ============================================================================

#[test]
fn test_great_circle_endpoints_exact() {
    let a = GeoPoint::new(47.37, 8.55);
    let b = GeoPoint::new(40.71, -74.0);
    let points = interpolate_great_circle(&a, &b, 50).unwrap();
    assert_eq!(points.len(), 51);
    assert_eq!(points[0], a);
    assert_eq!(points[50], b);
}

#[test]
fn test_great_circle_along_equator() {
    let a = GeoPoint::new(0.0, 0.0);
    let b = GeoPoint::new(0.0, 90.0);
    let points = interpolate_great_circle(&a, &b, 2).unwrap();
    assert_point_eq(&points[1], 0.0, 45.0);
}

#[test]
fn test_great_circle_passes_near_pole() {
    // Both at lat 60, opposite sides: shortest path goes over the pole.
    let a = GeoPoint::new(60.0, 0.0);
    let b = GeoPoint::new(60.0, 180.0);
    let points = interpolate_great_circle(&a, &b, 2).unwrap();
    assert!(approx_eq(points[1].lat, 90.0, 1e-6));
}

#[test]
fn test_identical_endpoints_copy() {
    let a = GeoPoint::new(12.0, 34.0);
    let points = interpolate_great_circle(&a, &a, 10).unwrap();
    assert_eq!(points.len(), 11);
    assert!(points.iter().all(|p| *p == a));
}

#[test]
fn test_nearby_endpoints_keep_their_span() {
    // About 5 m apart: still a real arc ending at b, sampled monotonically.
    let a = GeoPoint::new(0.0, 0.0);
    let b = GeoPoint::new(0.0, 0.00005);
    let points = interpolate_great_circle(&a, &b, 10).unwrap();
    assert_eq!(points.len(), 11);
    assert_eq!(points[0], a);
    assert_eq!(points[10], b);
    assert!(approx_eq(points[5].lon, 0.000025, 1e-12));
    assert!(points.windows(2).all(|w| w[1].lon > w[0].lon));
}

#[test]
fn test_antipodal_is_degenerate() {
    let a = GeoPoint::new(0.0, 0.0);
    let b = GeoPoint::new(0.0, 180.0);
    assert!(matches!(
        interpolate_great_circle(&a, &b, 10),
        Err(EncodeError::DegenerateGreatCircle { .. })
    ));
}

#[test]
fn test_zero_segments_rejected() {
    let a = GeoPoint::new(0.0, 0.0);
    let b = GeoPoint::new(1.0, 1.0);
    assert!(interpolate_great_circle(&a, &b, 0).is_err());
    assert!(interpolate_straight(&a, &b, 0).is_err());
}

#[test]
fn test_straight_interpolation_is_linear() {
    let a = GeoPoint::new(0.0, 0.0);
    let b = GeoPoint::new(10.0, 20.0);
    let points = interpolate_straight(&a, &b, 4).unwrap();
    assert_eq!(points.len(), 5);
    assert_point_eq(&points[2], 5.0, 10.0);
}

#[test]
fn test_arc_segment_count() {
    let a = GeoPoint::new(0.0, 0.0);
    assert_eq!(arc_segments(&a, &GeoPoint::new(10.0, 10.0)), SHORT_ARC_SEGMENTS);
    assert_eq!(arc_segments(&a, &GeoPoint::new(0.0, 150.0)), LONG_ARC_SEGMENTS);
}

// ============================================================================
// Arc elevation
// ============================================================================

#[test]
fn test_arc_elevation_profile() {
    let a = GeoPoint::new(0.0, 0.0);
    let b = GeoPoint::new(0.0, 60.0);
    let on_surface: Vec<Position3D> = interpolate_great_circle(&a, &b, 10)
        .unwrap()
        .iter()
        .map(|p| to_surface_position(p, 2.0).unwrap())
        .collect();
    let raised = apply_arc_elevation(&on_surface, 0.5);

    assert!(approx_eq(raised[0].length(), 2.0, 1e-9));
    assert!(approx_eq(raised[10].length(), 2.0, 1e-9));
    assert!(approx_eq(raised[5].length(), 2.5, 1e-9));
    assert!(raised[3].length() > 2.0 && raised[3].length() < 2.5);
}

#[test]
fn test_arc_elevation_keeps_direction() {
    let p = Position3D::new(0.0, 0.0, 1.0);
    let raised = apply_arc_elevation(&[p, p, p], 1.0);
    assert!(approx_eq(raised[1].z, 2.0, 1e-12));
    assert!(approx_eq(raised[1].x, 0.0, 1e-12));
}

#[test]
fn test_arc_elevation_zero_vector_passthrough() {
    let zero = Position3D::default();
    let raised = apply_arc_elevation(&[zero, zero, zero], 1.0);
    assert!(raised.iter().all(|p| *p == zero));
}
