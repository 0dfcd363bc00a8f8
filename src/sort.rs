//! Stable attribute-driven node ordering.
//!
//! A fresh call always recomputes the full permutation; there is no
//! resumable sort state.

use crate::graph::Graph;
use serde_json::Value;
use std::cmp::Ordering;

/// Sort direction. `Descend` reverses both the primary comparison and the
/// label tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascend,
    Descend,
}

impl SortDirection {
    /// Parse a direction name; anything other than "descend" sorts ascending.
    pub fn parse(name: &str) -> Self {
        if name == "descend" {
            Self::Descend
        } else {
            Self::Ascend
        }
    }
}

/// Rank ordering values of different JSON types deterministically:
/// null < bool < number < string < array < object.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Natural ordering over attribute values. Within a type: booleans false
/// before true, numbers by value, strings lexicographically; arrays and
/// objects fall back to their serialized form. Mixed types order by type
/// rank, so any attribute yields a deterministic total order.
pub fn cmp_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        _ if type_rank(a) != type_rank(b) => type_rank(a).cmp(&type_rank(b)),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn resolve_sort_value(graph: &Graph, key: &str, attr: &str) -> Value {
    // Degree-family attributes resolve to live counts, not stored attrs.
    match attr {
        "degree" => Value::from(graph.degree(key)),
        "inDegree" => Value::from(graph.in_degree(key)),
        "outDegree" => Value::from(graph.out_degree(key)),
        _ => graph
            .node(key)
            .and_then(|n| n.attr(attr).cloned())
            .unwrap_or(Value::Null),
    }
}

/// Produce the full node-key ordering for `attr`. Missing attribute values
/// compare as null and sort first; ties break on the `label` attribute.
pub fn sort_nodes(graph: &Graph, attr: &str, direction: SortDirection) -> Vec<String> {
    let mut decorated: Vec<(Value, Value, String)> = graph
        .node_keys()
        .into_iter()
        .map(|key| {
            let value = resolve_sort_value(graph, &key, attr);
            let label = graph
                .node(&key)
                .and_then(|n| n.attr("label").cloned())
                .unwrap_or(Value::Null);
            (value, label, key)
        })
        .collect();

    decorated.sort_by(|a, b| {
        let ord = cmp_values(&a.0, &b.0).then_with(|| cmp_values(&a.1, &b.1));
        match direction {
            SortDirection::Ascend => ord,
            SortDirection::Descend => ord.reverse(),
        }
    });

    decorated.into_iter().map(|(_, _, key)| key).collect()
}

#[cfg(test)]
#[path = "sort_test.rs"]
mod sort_test;
