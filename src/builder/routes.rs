//! Trajectory points: one path per route.

use std::cmp::Ordering;
use std::collections::HashMap;

use log::debug;

use crate::geo_utils::{path_chord_length, simplify_indices};
use crate::record::{FieldValue, Record};
use crate::style::StyleConfig;
use crate::GeoPoint;

use super::{read_point, FeatureKind, Features, MarkerFeature, PathFeature, PathGeometry};

/// Meters of `z` that lift a vertex by one globe radius.
const ELEVATION_SCALE: f64 = 500.0;

fn cmp_point_ids(a: &Record, b: &Record) -> Ordering {
    match (a.get("point_id"), b.get("point_id")) {
        (Some(x), Some(y)) => x.id_cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Group by `route_id` (first-seen order) and sort each route by `point_id`.
fn group_routes(records: &[Record]) -> Vec<(String, Vec<Record>)> {
    let mut routes: Vec<(String, Vec<Record>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let id = record
            .get("route_id")
            .map(FieldValue::to_string)
            .unwrap_or_default();
        let slot = *index.entry(id.clone()).or_insert_with(|| {
            routes.push((id, Vec::new()));
            routes.len() - 1
        });
        routes[slot].1.push(record.clone());
    }

    for (_, points) in &mut routes {
        points.sort_by(cmp_point_ids);
    }
    routes
}

/// Radius multiplier from an optional `z` field.
fn elevation_of(record: &Record) -> f64 {
    record.number("z").map_or(1.0, |z| 1.0 + z / ELEVATION_SCALE)
}

pub(crate) fn collect(records: &[Record], config: &StyleConfig) -> Features {
    let mut features = Features::default();
    let with_vertices = config.points.show_route_vertices;

    for (route_id, points) in group_routes(records) {
        let mut vertices: Vec<GeoPoint> = Vec::with_capacity(points.len());
        let mut elevation: Vec<f64> = Vec::with_capacity(points.len());
        let mut elevated = false;

        for record in &points {
            let Some(point) = read_point(record, "lat", "lon") else {
                features.skipped_records += 1;
                continue;
            };
            elevated |= record.contains("z");
            vertices.push(point);
            elevation.push(elevation_of(record));

            if with_vertices {
                features.markers.push(MarkerFeature {
                    kind: FeatureKind::RouteVertex,
                    id: record.label("point_id").unwrap_or_default(),
                    record: record.clone(),
                    point,
                    elevation: elevation_of(record),
                });
            }
        }

        if vertices.len() < 2 {
            debug!("[Routes] route '{route_id}' has fewer than two usable points");
            features.skipped_features += 1;
            features.unplaced.extend(points);
            continue;
        }

        let length = path_chord_length(&vertices);
        if let Some(tolerance) = config.routes.simplify_tolerance {
            let keep = simplify_indices(&vertices, tolerance);
            if keep.len() < vertices.len() {
                debug!(
                    "[Routes] route '{route_id}' simplified {} -> {} points",
                    vertices.len(),
                    keep.len()
                );
                vertices = keep.iter().map(|&i| vertices[i]).collect();
                elevation = keep.iter().map(|&i| elevation[i]).collect();
            }
        }

        // Last non-empty category wins.
        let category = points.iter().rev().find_map(|r| r.label("category"));

        features.paths.push(PathFeature {
            kind: FeatureKind::Route,
            id: route_id,
            records: points,
            geometry: PathGeometry::Polyline {
                vertices,
                elevation: elevated.then_some(elevation),
            },
            category,
            length,
            sequence: features.paths.len(),
        });
    }

    features.sequence_len = features.paths.len();
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_in_first_seen_order_and_sorts_points() {
        let records = vec![
            Record::new().with("route_id", "b").with("point_id", 2.0),
            Record::new().with("route_id", "a").with("point_id", 10.0),
            Record::new().with("route_id", "b").with("point_id", 1.0),
            Record::new().with("route_id", "a").with("point_id", 9.0),
        ];
        let routes = group_routes(&records);
        assert_eq!(routes[0].0, "b");
        assert_eq!(routes[1].0, "a");
        assert_eq!(routes[0].1[0].number("point_id"), Some(1.0));
        // numeric ids sort numerically, not lexically
        assert_eq!(routes[1].1[0].number("point_id"), Some(9.0));
    }

    #[test]
    fn z_lifts_vertices() {
        assert_eq!(elevation_of(&Record::new()), 1.0);
        assert_eq!(elevation_of(&Record::new().with("z", 250.0)), 1.5);
    }
}
