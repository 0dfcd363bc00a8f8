//! Tests for the attribute-driven node ordering.

use super::*;
use crate::graph::build_graph;
use crate::models::RawGraphData;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

// ============================================================================
// Helpers
// ============================================================================

fn build(nodes: serde_json::Value, edges: serde_json::Value) -> Graph {
    let raw = RawGraphData::from_value(&json!({
        "nodes": nodes,
        "edges": edges,
        "directed": false,
    }))
    .unwrap();
    build_graph(&raw, &mut StdRng::seed_from_u64(3)).unwrap().graph
}

// ============================================================================
// Value comparison
// ============================================================================

#[test]
fn numbers_order_by_value() {
    assert_eq!(cmp_values(&json!(2), &json!(10)), Ordering::Less);
    assert_eq!(cmp_values(&json!(2.5), &json!(2.5)), Ordering::Equal);
    assert_eq!(cmp_values(&json!(-1), &json!(-2)), Ordering::Greater);
}

#[test]
fn mixed_types_order_by_type_rank() {
    assert_eq!(cmp_values(&json!(null), &json!(false)), Ordering::Less);
    assert_eq!(cmp_values(&json!(true), &json!(0)), Ordering::Less);
    assert_eq!(cmp_values(&json!(99), &json!("0")), Ordering::Less);
    assert_eq!(cmp_values(&json!("z"), &json!([1])), Ordering::Less);
    assert_eq!(cmp_values(&json!([1]), &json!({"a": 1})), Ordering::Less);
}

// ============================================================================
// Node ordering
// ============================================================================

#[test]
fn ascend_orders_by_numeric_attribute() {
    let graph = build(
        json!([["a", {"rank": 3}], ["b", {"rank": 1}], ["c", {"rank": 2}]]),
        json!([]),
    );
    assert_eq!(
        sort_nodes(&graph, "rank", SortDirection::Ascend),
        vec!["b", "c", "a"]
    );
}

#[test]
fn descend_is_the_exact_reverse_without_ties() {
    let graph = build(
        json!([["a", {"rank": 3}], ["b", {"rank": 1}], ["c", {"rank": 2}]]),
        json!([]),
    );
    let mut ascending = sort_nodes(&graph, "rank", SortDirection::Ascend);
    ascending.reverse();
    assert_eq!(sort_nodes(&graph, "rank", SortDirection::Descend), ascending);
}

#[test]
fn missing_values_sort_first() {
    let graph = build(
        json!([["a", {"rank": 1}], ["b", {}], ["c", {"rank": 0}]]),
        json!([]),
    );
    assert_eq!(
        sort_nodes(&graph, "rank", SortDirection::Ascend),
        vec!["b", "c", "a"]
    );
}

#[test]
fn ties_break_on_label() {
    let graph = build(
        json!([
            ["k1", {"group": "x", "label": "beta"}],
            ["k2", {"group": "x", "label": "alpha"}],
            ["k3", {"group": "w", "label": "gamma"}],
        ]),
        json!([]),
    );
    assert_eq!(
        sort_nodes(&graph, "group", SortDirection::Ascend),
        vec!["k3", "k2", "k1"]
    );
}

#[test]
fn degree_family_resolves_live_counts() {
    let graph = build(
        json!([["a", {}], ["b", {}], ["c", {}]]),
        json!([["a", "b", {}]]),
    );
    // c has degree 0; a and b tie at 1 and fall back to label order.
    assert_eq!(
        sort_nodes(&graph, "degree", SortDirection::Ascend),
        vec!["c", "a", "b"]
    );
}

#[test]
fn direction_parse_defaults_to_ascend() {
    assert_eq!(SortDirection::parse("descend"), SortDirection::Descend);
    assert_eq!(SortDirection::parse("ascend"), SortDirection::Ascend);
    assert_eq!(SortDirection::parse("sideways"), SortDirection::Ascend);
}
