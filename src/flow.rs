//! Origin-destination flow aggregation.
//!
//! Directed edges are grouped by their unordered endpoint pair. In
//! [`FlowMode::Directional`] both directions survive with opposite offsets so
//! they can be drawn side by side; in [`FlowMode::Total`] each pair collapses
//! into a single edge whose numeric fields are summed.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{EncodeError, Result};
use crate::record::{FieldValue, Record};

/// Identifier columns; never summed.
const SOURCE: &str = "source";
const DESTINATION: &str = "destination";

/// How edges between the same two points are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowMode {
    /// Keep both directions, offset to opposite sides of the direct line.
    #[default]
    Directional,
    /// Merge every edge of a pair into one aggregate edge.
    Total,
}

impl fmt::Display for FlowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlowMode::Directional => "directional",
            FlowMode::Total => "total",
        })
    }
}

impl FromStr for FlowMode {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "directional" | "direction" | "both" => Ok(FlowMode::Directional),
            "total" | "sum" | "aggregate" => Ok(FlowMode::Total),
            _ => Err(EncodeError::UnknownOption {
                kind: "flow mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Unordered endpoint pair, lower identifier first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub low: String,
    pub high: String,
}

impl PairKey {
    fn new(source: &FieldValue, destination: &FieldValue) -> Self {
        let (low, high) = match source.id_cmp(destination) {
            Ordering::Greater => (destination, source),
            _ => (source, destination),
        };
        Self {
            low: low.to_string(),
            high: high.to_string(),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Edges sharing one unordered pair, split by direction.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowGroup {
    pub key: PairKey,
    /// `source <= destination`
    pub forward: Vec<Record>,
    pub backward: Vec<Record>,
}

impl FlowGroup {
    pub fn len(&self) -> usize {
        self.forward.len() + self.backward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.backward.is_empty()
    }
}

/// An edge ready for drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEdge {
    pub record: Record,
    /// Side of the direct line to draw on: `+1`, `-1`, or `0` for none.
    pub offset: i8,
}

/// Partition directed edges by unordered endpoint pair.
///
/// Groups come back in first-seen order. Edges lacking a `source` or
/// `destination` value are skipped.
///
/// # Example
/// ```
/// use geoencode::{group_by_unordered_pair, Record};
///
/// let edges = vec![
///     Record::new().with("source", 1.0).with("destination", 2.0),
///     Record::new().with("source", 2.0).with("destination", 1.0),
/// ];
/// let groups = group_by_unordered_pair(&edges);
/// assert_eq!(groups.len(), 1);
/// assert_eq!((groups[0].forward.len(), groups[0].backward.len()), (1, 1));
/// ```
pub fn group_by_unordered_pair(edges: &[Record]) -> Vec<FlowGroup> {
    let mut groups: Vec<FlowGroup> = Vec::new();
    let mut index: HashMap<PairKey, usize> = HashMap::new();

    for edge in edges {
        let (Some(source), Some(destination)) = (edge.get(SOURCE), edge.get(DESTINATION)) else {
            debug!("[Flow] skipping edge without endpoints");
            continue;
        };
        let key = PairKey::new(source, destination);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(FlowGroup {
                key,
                forward: Vec::new(),
                backward: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        if source.id_cmp(destination) == Ordering::Greater {
            group.backward.push(edge.clone());
        } else {
            group.forward.push(edge.clone());
        }
    }

    groups
}

/// Resolve one pair group into drawable edges.
pub fn resolve(mode: FlowMode, group: &FlowGroup) -> Vec<OutputEdge> {
    match mode {
        FlowMode::Directional => group
            .forward
            .iter()
            .map(|e| (e, 1))
            .chain(group.backward.iter().map(|e| (e, -1)))
            .map(|(record, offset)| OutputEdge {
                record: record.clone(),
                offset,
            })
            .collect(),
        FlowMode::Total => aggregate(group.forward.iter().chain(&group.backward))
            .map(|record| vec![OutputEdge { record, offset: 0 }])
            .unwrap_or_default(),
    }
}

/// Group and resolve a whole edge table.
pub fn resolve_flows(edges: &[Record], mode: FlowMode) -> Vec<OutputEdge> {
    let groups = group_by_unordered_pair(edges);
    let resolved: Vec<OutputEdge> = groups.iter().flat_map(|g| resolve(mode, g)).collect();
    debug!(
        "[Flow] {} edges, {} pairs -> {} output edges ({})",
        edges.len(),
        groups.len(),
        resolved.len(),
        mode
    );
    resolved
}

/// First edge as representative, numeric fields of the rest summed in.
fn aggregate<'a, I>(edges: I) -> Option<Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut edges = edges.into_iter();
    let mut total = edges.next()?.clone();

    for edge in edges {
        for (field, value) in edge.iter() {
            if field == SOURCE || field == DESTINATION {
                continue;
            }
            let Some(n) = value.as_number() else {
                continue;
            };
            let sum = total.number(field).unwrap_or(0.0) + n;
            total.insert(field, sum);
        }
    }

    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(source: f64, destination: f64, w: f64) -> Record {
        Record::new()
            .with("source", source)
            .with("destination", destination)
            .with("w", w)
    }

    #[test]
    fn identifiers_are_not_summed() {
        let edges = vec![edge(1.0, 2.0, 1.0), edge(2.0, 1.0, 4.0)];
        let out = resolve_flows(&edges, FlowMode::Total);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].record.number("source"), Some(1.0));
        assert_eq!(out[0].record.number("destination"), Some(2.0));
        assert_eq!(out[0].record.number("w"), Some(5.0));
    }

    #[test]
    fn text_ids_pair_up() {
        let edges = vec![
            Record::new().with("source", "ZRH").with("destination", "AMS"),
            Record::new().with("source", "AMS").with("destination", "ZRH"),
        ];
        let groups = group_by_unordered_pair(&edges);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key.to_string(), "AMS-ZRH");
        assert_eq!(groups[0].forward[0].label("source").as_deref(), Some("AMS"));
    }
}
