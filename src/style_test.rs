//! Tests for categorical coloring and attribute-driven resizing.

use super::*;
use crate::graph::build_graph;
use crate::models::RawGraphData;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

// ============================================================================
// Helpers
// ============================================================================

/// Ramp returning "<scale>-<position>" so assignments are easy to assert.
struct LabeledRamp;

impl ColorRamp for LabeledRamp {
    fn colors(&self, scale: &str, count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{}-{}", scale, i)).collect()
    }
}

fn build(nodes: serde_json::Value) -> crate::graph::GraphBundle {
    let raw = RawGraphData::from_value(&json!({
        "nodes": nodes,
        "edges": [],
        "directed": false,
    }))
    .unwrap();
    build_graph(&raw, &mut StdRng::seed_from_u64(11)).unwrap()
}

// ============================================================================
// Coloring
// ============================================================================

#[test]
fn one_color_per_distinct_value_in_first_seen_order() {
    let mut bundle = build(json!([
        ["a", {"group": "x"}],
        ["b", {"group": "y"}],
        ["c", {"group": "x"}],
    ]));
    color_nodes(&mut bundle.graph, &bundle.node_index, "group", "OrRd", &LabeledRamp).unwrap();
    assert_eq!(bundle.graph.node("a").unwrap().color(), "OrRd-0");
    assert_eq!(bundle.graph.node("c").unwrap().color(), "OrRd-0");
    assert_eq!(bundle.graph.node("b").unwrap().color(), "OrRd-1");
    assert_eq!(bundle.graph.node("a").unwrap().original_color(), "OrRd-0");
}

#[test]
fn nodes_without_the_attribute_keep_the_provisional_color() {
    let mut bundle = build(json!([
        ["a", {"group": "x"}],
        ["b", {}],
    ]));
    color_nodes(&mut bundle.graph, &bundle.node_index, "group", "OrRd", &LabeledRamp).unwrap();
    assert_eq!(bundle.graph.node("b").unwrap().color(), PROVISIONAL_COLOR);
    assert_eq!(
        bundle.graph.node("b").unwrap().original_color(),
        PROVISIONAL_COLOR
    );
}

#[test]
fn coloring_twice_is_idempotent() {
    let mut bundle = build(json!([
        ["a", {"group": "x"}],
        ["b", {"group": "y"}],
    ]));
    color_nodes(&mut bundle.graph, &bundle.node_index, "group", "OrRd", &LabeledRamp).unwrap();
    let first: Vec<String> = bundle
        .graph
        .nodes()
        .iter()
        .map(|n| n.color().to_string())
        .collect();
    color_nodes(&mut bundle.graph, &bundle.node_index, "group", "OrRd", &LabeledRamp).unwrap();
    let second: Vec<String> = bundle
        .graph
        .nodes()
        .iter()
        .map(|n| n.color().to_string())
        .collect();
    assert_eq!(first, second);
}

#[test]
fn coloring_unknown_attribute_fails() {
    let mut bundle = build(json!([["a", {}]]));
    let err =
        color_nodes(&mut bundle.graph, &bundle.node_index, "ghost", "OrRd", &LabeledRamp)
            .unwrap_err();
    assert!(matches!(err, GraphError::UnknownAttribute(_)));
}

// ============================================================================
// Resizing
// ============================================================================

#[test]
fn numeric_attribute_scales_linearly_into_the_range() {
    let mut bundle = build(json!([
        ["a", {"val": 1}],
        ["b", {"val": 5}],
        ["c", {"val": 3}],
    ]));
    resize_nodes(&mut bundle.graph, &bundle.node_index, "val", 2.0, 20.0).unwrap();
    assert_eq!(bundle.graph.node("a").unwrap().size(), 2.0);
    assert_eq!(bundle.graph.node("b").unwrap().size(), 20.0);
    assert_eq!(bundle.graph.node("c").unwrap().size(), 11.0);
}

#[test]
fn single_numeric_value_lands_at_the_midpoint() {
    let mut bundle = build(json!([
        ["a", {"val": 4}],
        ["b", {"val": 4}],
    ]));
    resize_nodes(&mut bundle.graph, &bundle.node_index, "val", 2.0, 20.0).unwrap();
    assert_eq!(bundle.graph.node("a").unwrap().size(), 11.0);
    assert_eq!(bundle.graph.node("b").unwrap().size(), 11.0);
}

#[test]
fn non_numeric_straggler_is_pinned_to_the_midpoint() {
    let mut bundle = build(json!([
        ["a", {"val": 1}],
        ["b", {"val": "oops"}],
        ["c", {"val": 5}],
    ]));
    resize_nodes(&mut bundle.graph, &bundle.node_index, "val", 2.0, 20.0).unwrap();
    assert_eq!(bundle.graph.node("a").unwrap().size(), 2.0);
    assert_eq!(bundle.graph.node("b").unwrap().size(), 11.0);
    assert_eq!(bundle.graph.node("c").unwrap().size(), 20.0);
}

#[test]
fn categorical_attribute_sizes_by_sort_rank() {
    let mut bundle = build(json!([
        ["a", {"val": "apple"}],
        ["b", {"val": "banana"}],
        ["c", {"val": "apple"}],
    ]));
    resize_nodes(&mut bundle.graph, &bundle.node_index, "val", 2.0, 20.0).unwrap();
    // Ascending order is a, c, b (apple ties break on label), so ranks are
    // 0, 1, 2 over 3 nodes.
    assert_eq!(bundle.graph.node("a").unwrap().size(), 2.0);
    assert_eq!(bundle.graph.node("c").unwrap().size(), 8.0);
    assert_eq!(bundle.graph.node("b").unwrap().size(), 14.0);
}

#[test]
fn degree_resize_uses_the_pseudo_attribute() {
    let raw = RawGraphData::from_value(&json!({
        "nodes": [["a", {}], ["b", {}], ["c", {}]],
        "edges": [["a", "b", {}], ["a", "c", {}]],
        "directed": false,
    }))
    .unwrap();
    let mut bundle = build_graph(&raw, &mut StdRng::seed_from_u64(11)).unwrap();
    resize_nodes(&mut bundle.graph, &bundle.node_index, "degree", 2.0, 20.0).unwrap();
    assert_eq!(bundle.graph.node("a").unwrap().size(), 20.0);
    assert_eq!(bundle.graph.node("b").unwrap().size(), 2.0);
    assert_eq!(bundle.graph.node("c").unwrap().size(), 2.0);
}

#[test]
fn resizing_unknown_attribute_fails() {
    let mut bundle = build(json!([["a", {}]]));
    let err =
        resize_nodes(&mut bundle.graph, &bundle.node_index, "ghost", 2.0, 20.0).unwrap_err();
    assert!(matches!(err, GraphError::UnknownAttribute(_)));
}
