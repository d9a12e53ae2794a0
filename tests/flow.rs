//! Tests for bidirectional flow grouping and aggregation

use geoencode::flow::resolve;
use geoencode::{FlowGroup, PairKey};
use geoencode::{group_by_unordered_pair, resolve_flows, FlowMode, Record};

fn edge(source: f64, destination: f64, flow: f64) -> Record {
    Record::new()
        .with("source", source)
        .with("destination", destination)
        .with("flow", flow)
}

#[test]
fn test_groups_by_unordered_pair() {
    let edges = vec![
        edge(1.0, 2.0, 10.0),
        edge(3.0, 1.0, 5.0),
        edge(2.0, 1.0, 7.0),
        edge(1.0, 2.0, 1.0),
    ];
    let groups = group_by_unordered_pair(&edges);
    assert_eq!(groups.len(), 2);

    // first-seen order
    assert_eq!(groups[0].key.to_string(), "1-2");
    assert_eq!(groups[0].forward.len(), 2);
    assert_eq!(groups[0].backward.len(), 1);
    assert_eq!(groups[0].len(), 3);

    assert_eq!(groups[1].key.to_string(), "1-3");
    assert_eq!(groups[1].forward.len(), 0);
    assert_eq!(groups[1].backward.len(), 1);
}

#[test]
fn test_numeric_ids_compare_numerically() {
    let edges = vec![edge(10.0, 9.0, 1.0)];
    let groups = group_by_unordered_pair(&edges);
    assert_eq!(groups[0].key.to_string(), "9-10");
    assert_eq!(groups[0].backward.len(), 1);
}

#[test]
fn test_edges_without_endpoints_skipped() {
    let edges = vec![
        Record::new().with("source", 1.0),
        Record::new().with("destination", 2.0),
        edge(1.0, 2.0, 1.0),
    ];
    let groups = group_by_unordered_pair(&edges);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 1);
}

#[test]
fn test_directional_offsets() {
    let edges = vec![edge(1.0, 2.0, 10.0), edge(2.0, 1.0, 7.0)];
    let out = resolve_flows(&edges, FlowMode::Directional);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].offset, 1);
    assert_eq!(out[0].record.number("flow"), Some(10.0));
    assert_eq!(out[1].offset, -1);
    assert_eq!(out[1].record.number("flow"), Some(7.0));
}

#[test]
fn test_directional_single_direction_still_offset() {
    let out = resolve_flows(&[edge(5.0, 6.0, 1.0)], FlowMode::Directional);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].offset, 1);
}

#[test]
fn test_total_sums_numeric_fields() {
    let edges = vec![
        edge(1.0, 2.0, 10.0).with("label", "a").with("trips", 2.0),
        edge(2.0, 1.0, 7.0).with("label", "b").with("trips", 3.0),
        edge(1.0, 2.0, 3.0),
    ];
    let out = resolve_flows(&edges, FlowMode::Total);
    assert_eq!(out.len(), 1);

    let total = &out[0];
    assert_eq!(total.offset, 0);
    assert_eq!(total.record.number("flow"), Some(20.0));
    assert_eq!(total.record.number("trips"), Some(5.0));
    // representative keeps its identifiers and text
    assert_eq!(total.record.number("source"), Some(1.0));
    assert_eq!(total.record.number("destination"), Some(2.0));
    assert_eq!(total.record.label("label").as_deref(), Some("a"));
}

#[test]
fn test_total_adds_fields_missing_on_representative() {
    let edges = vec![edge(1.0, 2.0, 1.0), edge(2.0, 1.0, 1.0).with("extra", 4.0)];
    let out = resolve_flows(&edges, FlowMode::Total);
    assert_eq!(out[0].record.number("extra"), Some(4.0));
}

#[test]
fn test_resolve_per_group() {
    let groups = group_by_unordered_pair(&[edge(1.0, 2.0, 1.0), edge(2.0, 1.0, 2.0)]);
    assert_eq!(resolve(FlowMode::Directional, &groups[0]).len(), 2);
    assert_eq!(resolve(FlowMode::Total, &groups[0]).len(), 1);
}

#[test]
fn test_flow_mode_parse() {
    assert_eq!("sum".parse::<FlowMode>().unwrap(), FlowMode::Total);
    assert_eq!("Both".parse::<FlowMode>().unwrap(), FlowMode::Directional);
    assert_eq!(FlowMode::Total.to_string(), "total");
    assert!("sideways".parse::<FlowMode>().is_err());
}

#[test]
fn test_empty_group_yields_nothing() {
    let group = FlowGroup {
        key: PairKey {
            low: "1".to_string(),
            high: "2".to_string(),
        },
        forward: vec![],
        backward: vec![],
    };
    assert!(group.is_empty());
    assert!(resolve(FlowMode::Total, &group).is_empty());
    assert!(resolve(FlowMode::Directional, &group).is_empty());
}
