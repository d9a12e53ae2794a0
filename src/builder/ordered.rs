//! Ordered trajectories: segments drawn in ascending `order`.

use std::cmp::Ordering;

use crate::record::Record;

use super::segments::segment_feature;
use super::{FeatureKind, Features};

fn cmp_order(a: &Record, b: &Record) -> Ordering {
    match (a.get("order"), b.get("order")) {
        (Some(x), Some(y)) => x.id_cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub(crate) fn collect(records: &[Record]) -> Features {
    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by(|a, b| cmp_order(a, b));

    // Sequence positions count every sorted record, so an undrawable row
    // leaves a gap rather than shifting the rest.
    let mut features = Features {
        sequence_len: sorted.len(),
        ..Features::default()
    };
    for (i, record) in sorted.into_iter().enumerate() {
        let id = record.label("order").unwrap_or_else(|| i.to_string());
        match segment_feature(record, FeatureKind::OrderedSegment, id, i) {
            Some(feature) => features.paths.push(feature),
            None => {
                features.skipped_records += 1;
                features.unplaced.push(record.clone());
            }
        }
    }
    features
}
