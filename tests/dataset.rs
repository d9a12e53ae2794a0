//! Tests for dataset validation and variable discovery

use geoencode::{Dataset, DatasetShape, EncodeError, LoadedDataset, Record, Variable};

fn segment() -> Record {
    Record::new()
        .with("segment_id", 1.0)
        .with("start_lat", 0.0)
        .with("start_lon", 0.0)
        .with("end_lat", 1.0)
        .with("end_lon", 1.0)
}

#[test]
fn test_validate_accepts_required_columns() {
    assert!(Dataset::TrajectorySegments(vec![segment()]).validate().is_ok());
}

#[test]
fn test_validate_reports_missing_column() {
    let records = vec![Record::new().with("route_id", 1.0).with("lat", 0.0)];
    let err = Dataset::TrajectoryPoints(records).validate().unwrap_err();
    assert_eq!(
        err,
        EncodeError::MissingRequiredField {
            shape: "trajectory points",
            field: "point_id".to_string(),
        }
    );
}

#[test]
fn test_validate_only_inspects_first_record() {
    let records = vec![segment(), Record::new().with("unrelated", 1.0)];
    assert!(Dataset::TrajectorySegments(records).validate().is_ok());
}

#[test]
fn test_validate_empty_table() {
    assert!(matches!(
        Dataset::OrderedTrajectory(Vec::new()).validate(),
        Err(EncodeError::EmptyDataset { .. })
    ));
}

#[test]
fn test_connections_validate_both_tables() {
    let points = vec![Record::new().with("id", 1.0).with("lat", 0.0).with("lon", 0.0)];
    let edges = vec![Record::new().with("source", 1.0)];
    let err = Dataset::Connections { points, edges }.validate().unwrap_err();
    assert!(matches!(
        err,
        EncodeError::MissingRequiredField { shape: "connection edges", .. }
    ));
}

#[test]
fn test_variable_columns_segments() {
    let records = vec![segment()
        .with("speed", 3.0)
        .with("category", "bus")
        .with("note", "text")];
    let vars = Dataset::TrajectorySegments(records).variable_columns();
    assert_eq!(vars, vec![Variable::field("speed"), Variable::Length]);
}

#[test]
fn test_variable_columns_ordered_has_order() {
    let records = vec![Record::new()
        .with("order", 1.0)
        .with("start_lat", 0.0)
        .with("start_lon", 0.0)
        .with("end_lat", 1.0)
        .with("end_lon", 1.0)
        .with("value", 2.0)];
    let vars = Dataset::OrderedTrajectory(records).variable_columns();
    assert_eq!(
        vars,
        vec![Variable::field("value"), Variable::Length, Variable::Order]
    );
}

#[test]
fn test_variable_columns_points_have_no_pseudo() {
    let records = vec![Record::new()
        .with("route_id", 1.0)
        .with("point_id", 1.0)
        .with("lat", 0.0)
        .with("lon", 0.0)
        .with("z", 100.0)];
    let vars = Dataset::TrajectoryPoints(records).variable_columns();
    assert_eq!(vars, vec![Variable::field("z")]);
}

#[test]
fn test_connection_variables() {
    let points = vec![Record::new()
        .with("id", 1.0)
        .with("lat", 0.0)
        .with("lon", 0.0)
        .with("name", "hub")
        .with("population", 1e6)];
    let edges = vec![Record::new()
        .with("source", 1.0)
        .with("destination", 2.0)
        .with("flow", 5.0)];
    let dataset = Dataset::Connections { points, edges };
    assert_eq!(
        dataset.variable_columns(),
        vec![Variable::field("flow"), Variable::Length]
    );
    assert_eq!(dataset.point_size_variables(), vec![Variable::field("population")]);
    assert!(Dataset::TrajectorySegments(vec![segment()])
        .point_size_variables()
        .is_empty());
}

#[test]
fn test_required_fields() {
    assert_eq!(
        DatasetShape::ConnectionEdges.required_fields(),
        &["source", "destination"]
    );
}

#[test]
fn test_loaded_ids_are_unique() {
    let a = LoadedDataset::new(Dataset::TrajectorySegments(vec![segment()]));
    let b = LoadedDataset::new(Dataset::TrajectorySegments(vec![segment()]));
    assert_ne!(a.id(), b.id());
    assert_eq!(a.dataset(), b.dataset());
    assert_eq!(a.dropped_rows(), 0);
    assert_eq!(
        LoadedDataset::with_dropped_rows(a.dataset().clone(), 3).dropped_rows(),
        3
    );
}
