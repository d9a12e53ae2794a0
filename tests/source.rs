//! Tests for the CSV data source

use std::fs;
use std::path::PathBuf;

use geoencode::source::{
    connections, load_csv, load_trajectory_points, ordered_trajectory, parse_csv,
    trajectory_segments,
};
use geoencode::{Dataset, EncodeError, FieldValue};

fn temp_csv(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("geoencode-{}-{name}", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_parse_headers_and_values() {
    let table = parse_csv("id,lat,lon,name\n1,47.3,8.5,Zurich\n2,52.5,13.4,Berlin\n".as_bytes())
        .unwrap();
    assert_eq!(table.records.len(), 2);
    assert_eq!(table.dropped_rows, 0);
    assert_eq!(table.records[1].number("lat"), Some(52.5));
    assert_eq!(table.records[1].label("name").as_deref(), Some("Berlin"));
}

#[test]
fn test_parse_trims_whitespace() {
    let table = parse_csv("a , b\n 1 , x y \n".as_bytes()).unwrap();
    assert_eq!(table.records[0].number("a"), Some(1.0));
    assert_eq!(table.records[0].label("b").as_deref(), Some("x y"));
}

#[test]
fn test_parse_drops_malformed_rows() {
    let table = parse_csv("a,b\n1,2\n3\n4,5,6\n7,8\n".as_bytes()).unwrap();
    assert_eq!(table.records.len(), 2);
    assert_eq!(table.dropped_rows, 2);
    assert_eq!(table.records[1].number("a"), Some(7.0));
}

#[test]
fn test_parse_keeps_empty_cells_as_text() {
    let table = parse_csv("a,b\n1,\n".as_bytes()).unwrap();
    assert_eq!(table.records[0].get("b"), Some(&FieldValue::Text(String::new())));
    assert_eq!(table.records[0].label("b"), None);
}

#[test]
fn test_segments_wrapper_validates() {
    let ok = parse_csv(
        "segment_id,start_lat,start_lon,end_lat,end_lon\n1,0,0,1,1\n".as_bytes(),
    )
    .unwrap();
    let loaded = trajectory_segments(ok).unwrap();
    assert!(matches!(loaded.dataset(), Dataset::TrajectorySegments(r) if r.len() == 1));

    let missing = parse_csv("segment_id,start_lat\n1,0\n".as_bytes()).unwrap();
    assert!(matches!(
        trajectory_segments(missing),
        Err(EncodeError::MissingRequiredField { .. })
    ));
}

#[test]
fn test_ordered_wrapper_counts_dropped_rows() {
    let table = parse_csv(
        "order,start_lat,start_lon,end_lat,end_lon\n2,0,0,1,1\nbroken\n1,1,1,2,2\n".as_bytes(),
    )
    .unwrap();
    let loaded = ordered_trajectory(table).unwrap();
    assert_eq!(loaded.dropped_rows(), 1);
}

#[test]
fn test_connections_wrapper_combines_tables() {
    let points = parse_csv("id,lat,lon\nA,0,0\nB,1,1\n".as_bytes()).unwrap();
    let edges = parse_csv("source,destination,flow\nA,B,3\nB,A\n".as_bytes()).unwrap();
    let loaded = connections(points, edges).unwrap();
    assert_eq!(loaded.dropped_rows(), 1);
    let Dataset::Connections { points, edges } = loaded.dataset() else {
        panic!("expected connections");
    };
    assert_eq!((points.len(), edges.len()), (2, 1));
}

#[test]
fn test_load_from_file() {
    let path = temp_csv(
        "points.csv",
        "route_id,point_id,lat,lon,speed\nr1,1,47.0,8.0,10\nr1,2,47.1,8.1,12\n",
    );
    let table = load_csv(&path).unwrap();
    assert_eq!(table.records.len(), 2);

    let loaded = load_trajectory_points(&path).unwrap();
    assert_eq!(loaded.dataset().shape_name(), "trajectory points");
    fs::remove_file(&path).ok();
}

#[test]
fn test_missing_file_is_error() {
    let path = std::env::temp_dir().join("geoencode-does-not-exist.csv");
    assert!(matches!(load_csv(&path), Err(EncodeError::Csv(_))));
}
