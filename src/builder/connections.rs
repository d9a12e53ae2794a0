//! Connections: markers for the point table, flow arcs for the edge table.

use std::collections::HashMap;

use log::{debug, warn};

use crate::flow::{resolve_flows, FlowMode};
use crate::geo_utils::chord_distance;
use crate::record::Record;
use crate::GeoPoint;

use super::{read_point, FeatureKind, Features, MarkerFeature, PathFeature, PathGeometry};

pub(crate) fn collect(points: &[Record], edges: &[Record], mode: FlowMode) -> Features {
    let mut features = Features::default();
    let mut lookup: HashMap<String, GeoPoint> = HashMap::with_capacity(points.len());

    for record in points {
        let (Some(id), Some(point)) = (record.label("id"), read_point(record, "lat", "lon")) else {
            features.skipped_records += 1;
            continue;
        };
        lookup.insert(id.clone(), point);
        features.markers.push(MarkerFeature {
            kind: FeatureKind::Point,
            id,
            record: record.clone(),
            point,
            elevation: 1.0,
        });
    }

    // Aggregate first so summed fields are available for styling.
    for edge in resolve_flows(edges, mode) {
        let source = edge.record.label("source").unwrap_or_default();
        let destination = edge.record.label("destination").unwrap_or_default();
        let (Some(start), Some(end)) = (lookup.get(&source), lookup.get(&destination)) else {
            debug!("[Connections] edge {source} -> {destination} references an unknown point");
            features.skipped_edges += 1;
            features.unplaced.push(edge.record);
            continue;
        };

        features.paths.push(PathFeature {
            kind: FeatureKind::Edge,
            id: format!("{source}-{destination}"),
            category: edge.record.label("category"),
            length: chord_distance(start, end),
            sequence: features.paths.len(),
            geometry: PathGeometry::Arc {
                start: *start,
                end: *end,
                offset: edge.offset,
            },
            records: vec![edge.record],
        });
    }

    features.sequence_len = features.paths.len();
    if features.skipped_edges > 0 {
        warn!(
            "[Connections] skipped {} edges with unresolved endpoints",
            features.skipped_edges
        );
    }
    features
}
