//! CSV data source.
//!
//! Reads a headed CSV table into [`Record`]s. Cells that parse as finite
//! numbers become [`FieldValue::Number`]; everything else stays text. Rows
//! whose field count differs from the header, or that are not valid UTF-8,
//! are dropped and counted rather than failing the load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::dataset::{Dataset, LoadedDataset};
use crate::error::{EncodeError, Result};
use crate::record::{FieldValue, Record};

/// A parsed table and the number of rows skipped while reading it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub records: Vec<Record>,
    pub dropped_rows: usize,
}

/// Parse CSV text from any reader.
///
/// # Example
/// ```
/// use geoencode::source::parse_csv;
///
/// let table = parse_csv("id,name\n1,\"Zurich, CH\"\n2\n".as_bytes()).unwrap();
/// assert_eq!(table.records.len(), 1);
/// assert_eq!(table.dropped_rows, 1);
/// assert_eq!(table.records[0].label("name").as_deref(), Some("Zurich, CH"));
/// ```
pub fn parse_csv<R: Read>(reader: R) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::default();

    for row in csv_reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                debug!("[Source] dropping unreadable row: {err}");
                table.dropped_rows += 1;
                continue;
            }
        };
        if row.len() != headers.len() {
            let line = row.position().map_or(0, |p| p.line());
            debug!(
                "[Source] dropping row: {}",
                EncodeError::MalformedRow {
                    line,
                    expected: headers.len(),
                    found: row.len(),
                }
            );
            table.dropped_rows += 1;
            continue;
        }

        table.records.push(
            headers
                .iter()
                .zip(row.iter())
                .map(|(name, cell)| (name.as_str(), coerce(cell)))
                .collect(),
        );
    }

    Ok(table)
}

/// Read and parse a CSV file.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let table = parse_csv(File::open(path)?)?;
    info!(
        "[Source] {}: {} rows ({} dropped)",
        path.display(),
        table.records.len(),
        table.dropped_rows
    );
    Ok(table)
}

fn coerce(cell: &str) -> FieldValue {
    match cell.parse::<f64>() {
        Ok(n) if n.is_finite() => FieldValue::Number(n),
        _ => FieldValue::Text(cell.to_string()),
    }
}

fn validated(dataset: Dataset, dropped_rows: usize) -> Result<LoadedDataset> {
    dataset.validate()?;
    Ok(LoadedDataset::with_dropped_rows(dataset, dropped_rows))
}

/// Wrap a parsed table as trajectory points.
pub fn trajectory_points(table: Table) -> Result<LoadedDataset> {
    validated(Dataset::TrajectoryPoints(table.records), table.dropped_rows)
}

/// Wrap a parsed table as trajectory segments.
pub fn trajectory_segments(table: Table) -> Result<LoadedDataset> {
    validated(Dataset::TrajectorySegments(table.records), table.dropped_rows)
}

/// Wrap a parsed table as an ordered trajectory.
pub fn ordered_trajectory(table: Table) -> Result<LoadedDataset> {
    validated(Dataset::OrderedTrajectory(table.records), table.dropped_rows)
}

/// Combine a point table and an edge table.
pub fn connections(points: Table, edges: Table) -> Result<LoadedDataset> {
    validated(
        Dataset::Connections {
            points: points.records,
            edges: edges.records,
        },
        points.dropped_rows + edges.dropped_rows,
    )
}

pub fn load_trajectory_points(path: impl AsRef<Path>) -> Result<LoadedDataset> {
    trajectory_points(load_csv(path)?)
}

pub fn load_trajectory_segments(path: impl AsRef<Path>) -> Result<LoadedDataset> {
    trajectory_segments(load_csv(path)?)
}

pub fn load_ordered_trajectory(path: impl AsRef<Path>) -> Result<LoadedDataset> {
    ordered_trajectory(load_csv(path)?)
}

pub fn load_connections(
    points_path: impl AsRef<Path>,
    edges_path: impl AsRef<Path>,
) -> Result<LoadedDataset> {
    connections(load_csv(points_path)?, load_csv(edges_path)?)
}
