//! Categorical coloring and attribute-driven resizing, built on the
//! attribute index.

use crate::errors::{GraphError, Result};
use crate::graph::{AttributeIndex, Graph};
use crate::models::parse_number;
use crate::sort::{sort_nodes, SortDirection};
use crate::PROVISIONAL_COLOR;
use std::collections::HashMap;

/// Rank-to-color mapper supplied by the host. `colors` returns exactly
/// `count` colors drawn from the named scale.
pub trait ColorRamp {
    fn colors(&self, scale: &str, count: usize) -> Vec<String>;
}

/// Color every node by its value for `attr`: one ramp color per distinct
/// value, assigned in the index's first-seen value order. Sets both `color`
/// and `originalColor`; nodes without the attribute keep the provisional
/// color. Idempotent for a fixed ramp.
pub fn color_nodes(
    graph: &mut Graph,
    index: &AttributeIndex<String>,
    attr: &str,
    scale: &str,
    ramp: &dyn ColorRamp,
) -> Result<()> {
    let buckets = index
        .buckets(attr)
        .ok_or_else(|| GraphError::unknown_attribute(attr))?;
    let colors = ramp.colors(scale, buckets.len());

    for node in graph.nodes_mut() {
        node.set_color(PROVISIONAL_COLOR);
        node.set_original_color(PROVISIONAL_COLOR);
    }
    for (position, keys) in buckets.values().enumerate() {
        let color = colors
            .get(position)
            .map(String::as_str)
            .unwrap_or(PROVISIONAL_COLOR);
        for key in keys {
            if let Some(node) = graph.node_mut(key) {
                node.set_color(color);
                node.set_original_color(color);
            }
        }
    }
    log::debug!(
        "colored {} nodes by {} ({} distinct values, scale {})",
        graph.order(),
        attr,
        buckets.len(),
        scale
    );
    Ok(())
}

/// Resize nodes by their value for `attr`, scaled into
/// `[min_size, max_size]`.
///
/// The numeric-vs-categorical dispatch is decided from the FIRST distinct
/// value only, kept for compatibility with mixed-type attribute bags: if it
/// parses as a number the whole attribute is treated numerically, with the
/// min/max taken over the parseable values and any non-numeric straggler
/// pinned to the midpoint; otherwise a node's relative size is its rank in
/// the ascending sort divided by the node count. A single distinct numeric
/// value puts every node at the midpoint.
pub fn resize_nodes(
    graph: &mut Graph,
    index: &AttributeIndex<String>,
    attr: &str,
    min_size: f64,
    max_size: f64,
) -> Result<()> {
    let buckets = index
        .buckets(attr)
        .ok_or_else(|| GraphError::unknown_attribute(attr))?;
    let Some(first) = buckets.keys().next() else {
        return Ok(());
    };
    let span = max_size - min_size;

    if parse_number(first).is_some() {
        let parsed: Vec<Option<f64>> = buckets.keys().map(|v| parse_number(v)).collect();
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for value in parsed.iter().flatten() {
            lo = lo.min(*value);
            hi = hi.max(*value);
        }
        for (position, keys) in buckets.values().enumerate() {
            let relative = match parsed[position] {
                Some(value) if hi > lo => (value - lo) / (hi - lo),
                // Single distinct value, or a non-numeric straggler.
                _ => 0.5,
            };
            let size = relative * span + min_size;
            for key in keys {
                if let Some(node) = graph.node_mut(key) {
                    node.set_size(size);
                }
            }
        }
    } else {
        let ordered = sort_nodes(graph, attr, SortDirection::Ascend);
        let ranks: HashMap<&str, usize> = ordered
            .iter()
            .enumerate()
            .map(|(rank, key)| (key.as_str(), rank))
            .collect();
        let total = graph.order() as f64;
        for keys in buckets.values() {
            for key in keys {
                let Some(&rank) = ranks.get(key.as_str()) else {
                    continue;
                };
                let size = (rank as f64 / total) * span + min_size;
                if let Some(node) = graph.node_mut(key) {
                    node.set_size(size);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;
