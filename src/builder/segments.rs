//! Trajectory segments: one two-point path per record.

use crate::geo_utils::chord_distance;
use crate::record::Record;

use super::{read_point, FeatureKind, Features, PathFeature, PathGeometry};

/// Build a straight two-point path from a record's start/end columns.
pub(crate) fn segment_feature(
    record: &Record,
    kind: FeatureKind,
    id: String,
    sequence: usize,
) -> Option<PathFeature> {
    let start = read_point(record, "start_lat", "start_lon")?;
    let end = read_point(record, "end_lat", "end_lon")?;
    Some(PathFeature {
        kind,
        id,
        records: vec![record.clone()],
        geometry: PathGeometry::Polyline {
            vertices: vec![start, end],
            elevation: None,
        },
        category: record.label("category"),
        length: chord_distance(&start, &end),
        sequence,
    })
}

pub(crate) fn collect(records: &[Record]) -> Features {
    let mut features = Features {
        sequence_len: records.len(),
        ..Features::default()
    };
    for (i, record) in records.iter().enumerate() {
        let id = record.label("segment_id").unwrap_or_else(|| i.to_string());
        match segment_feature(record, FeatureKind::Segment, id, i) {
            Some(feature) => features.paths.push(feature),
            None => {
                features.skipped_records += 1;
                features.unplaced.push(record.clone());
            }
        }
    }
    features
}
