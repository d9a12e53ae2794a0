//! Dataset shapes, validation and variable discovery.
//!
//! A dataset is loaded once per user action and held until replaced. Each
//! load gets a fresh [`DatasetId`] so cached ranges can tell datasets apart.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{EncodeError, OptionExt, Result};
use crate::record::Record;
use crate::style::Variable;

/// Input tables by layout. Connections contribute two tables, points and edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetShape {
    TrajectoryPoints,
    TrajectorySegments,
    OrderedTrajectory,
    ConnectionPoints,
    ConnectionEdges,
}

impl DatasetShape {
    pub fn name(&self) -> &'static str {
        match self {
            DatasetShape::TrajectoryPoints => "trajectory points",
            DatasetShape::TrajectorySegments => "trajectory segments",
            DatasetShape::OrderedTrajectory => "ordered trajectory",
            DatasetShape::ConnectionPoints => "connection points",
            DatasetShape::ConnectionEdges => "connection edges",
        }
    }

    /// Columns that must be present in the first record.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            DatasetShape::TrajectoryPoints => &["route_id", "point_id", "lat", "lon"],
            DatasetShape::TrajectorySegments => {
                &["segment_id", "start_lat", "start_lon", "end_lat", "end_lon"]
            }
            DatasetShape::OrderedTrajectory => {
                &["order", "start_lat", "start_lon", "end_lat", "end_lon"]
            }
            DatasetShape::ConnectionPoints => &["id", "lat", "lon"],
            DatasetShape::ConnectionEdges => &["source", "destination"],
        }
    }

    /// Columns never offered as styling variables.
    fn reserved_fields(&self) -> &'static [&'static str] {
        match self {
            DatasetShape::TrajectoryPoints => &["route_id", "point_id", "lat", "lon", "category"],
            DatasetShape::TrajectorySegments => &[
                "segment_id",
                "start_lat",
                "start_lon",
                "end_lat",
                "end_lon",
                "category",
            ],
            DatasetShape::OrderedTrajectory => {
                &["order", "start_lat", "start_lon", "end_lat", "end_lon"]
            }
            DatasetShape::ConnectionPoints => &["id", "lat", "lon", "name"],
            DatasetShape::ConnectionEdges => &["source", "destination", "category"],
        }
    }

    /// Validate that the first record carries every required column.
    ///
    /// Only the first record is inspected; the whole table is rejected if a
    /// column is missing there.
    pub fn validate(&self, records: &[Record]) -> Result<()> {
        let first = records.first().ok_or(EncodeError::EmptyDataset { shape: self.name() })?;
        for field in self.required_fields() {
            first
                .contains(field)
                .then_some(())
                .ok_or_missing_field(self.name(), field)?;
        }
        Ok(())
    }

    /// Numeric columns of the first record that can drive styling.
    pub fn numeric_columns(&self, records: &[Record]) -> Vec<String> {
        let Some(first) = records.first() else {
            return Vec::new();
        };
        let reserved = self.reserved_fields();
        first
            .iter()
            .filter(|(name, value)| !reserved.contains(name) && value.as_number().is_some())
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

/// A loaded dataset, tagged by shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "records", rename_all = "kebab-case")]
pub enum Dataset {
    /// Points grouped by `route_id`, ordered by `point_id` within a route.
    TrajectoryPoints(Vec<Record>),
    /// Independent start/end pairs.
    TrajectorySegments(Vec<Record>),
    /// Segments with an explicit `order`, consumed ascending.
    OrderedTrajectory(Vec<Record>),
    /// A point table keyed by `id` and an edge table referencing it.
    Connections {
        points: Vec<Record>,
        edges: Vec<Record>,
    },
}

impl Dataset {
    pub fn shape_name(&self) -> &'static str {
        match self {
            Dataset::TrajectoryPoints(_) => DatasetShape::TrajectoryPoints.name(),
            Dataset::TrajectorySegments(_) => DatasetShape::TrajectorySegments.name(),
            Dataset::OrderedTrajectory(_) => DatasetShape::OrderedTrajectory.name(),
            Dataset::Connections { .. } => "connections",
        }
    }

    /// Check required columns of every table.
    pub fn validate(&self) -> Result<()> {
        match self {
            Dataset::TrajectoryPoints(records) => DatasetShape::TrajectoryPoints.validate(records),
            Dataset::TrajectorySegments(records) => {
                DatasetShape::TrajectorySegments.validate(records)
            }
            Dataset::OrderedTrajectory(records) => DatasetShape::OrderedTrajectory.validate(records),
            Dataset::Connections { points, edges } => {
                DatasetShape::ConnectionPoints.validate(points)?;
                DatasetShape::ConnectionEdges.validate(edges)
            }
        }
    }

    /// Variables available for color and width styling, pseudo-variables last.
    pub fn variable_columns(&self) -> Vec<Variable> {
        let (shape, records, pseudo): (_, &[Record], &[Variable]) = match self {
            Dataset::TrajectoryPoints(r) => (DatasetShape::TrajectoryPoints, r, &[]),
            Dataset::TrajectorySegments(r) => {
                (DatasetShape::TrajectorySegments, r, &[Variable::Length])
            }
            Dataset::OrderedTrajectory(r) => (
                DatasetShape::OrderedTrajectory,
                r,
                &[Variable::Length, Variable::Order],
            ),
            Dataset::Connections { edges, .. } => {
                (DatasetShape::ConnectionEdges, edges, &[Variable::Length])
            }
        };
        shape
            .numeric_columns(records)
            .into_iter()
            .map(Variable::Field)
            .chain(pseudo.iter().cloned())
            .collect()
    }

    /// Variables available for connection point sizing.
    pub fn point_size_variables(&self) -> Vec<Variable> {
        match self {
            Dataset::Connections { points, .. } => DatasetShape::ConnectionPoints
                .numeric_columns(points)
                .into_iter()
                .map(Variable::Field)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Identity of one load; never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatasetId(u64);

impl DatasetId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        DatasetId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A dataset together with its load identity and data-source diagnostics.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    id: DatasetId,
    dataset: Dataset,
    dropped_rows: usize,
}

impl LoadedDataset {
    /// Wrap an in-memory dataset with a fresh identity.
    pub fn new(dataset: Dataset) -> Self {
        Self::with_dropped_rows(dataset, 0)
    }

    /// Wrap a dataset whose source skipped `dropped_rows` malformed rows.
    pub fn with_dropped_rows(dataset: Dataset, dropped_rows: usize) -> Self {
        Self {
            id: DatasetId::next(),
            dataset,
            dropped_rows,
        }
    }

    pub fn id(&self) -> DatasetId {
        self.id
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }
}
