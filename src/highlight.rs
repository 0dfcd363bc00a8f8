//! Single-hop ego-network highlighting with color save/restore.

use crate::errors::{GraphError, Result};
use crate::graph::{EdgeId, Graph};
use crate::MUTED_COLOR;
use std::collections::HashSet;

/// The active highlight selection. Both sets empty means no highlight is
/// active, which is distinct from "everything highlighted".
#[derive(Debug, Default)]
pub struct HighlightState {
    nodes: HashSet<String>,
    edges: HashSet<EdgeId>,
}

impl HighlightState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.nodes.is_empty() || !self.edges.is_empty()
    }

    pub fn nodes(&self) -> &HashSet<String> {
        &self.nodes
    }

    pub fn edges(&self) -> &HashSet<EdgeId> {
        &self.edges
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}

/// Highlight `key`, its direct neighbors, and its incident edges, muting
/// everything else. Always a full re-derivation over the whole graph, never
/// incremental; calling it twice with the same key is idempotent.
pub fn highlight_node(graph: &mut Graph, state: &mut HighlightState, key: &str) -> Result<()> {
    if !graph.contains_node(key) {
        return Err(GraphError::node_not_found(key));
    }
    state.clear();
    state.nodes.insert(key.to_string());
    for neighbor in graph.neighbors(key) {
        state.nodes.insert(neighbor);
    }
    for edge in graph.incident_edges(key) {
        state.edges.insert(edge);
    }

    for node in graph.nodes_mut() {
        if state.nodes.contains(&node.key) {
            let original = node.original_color().to_string();
            node.set_color(&original);
            node.set_z(1);
        } else {
            node.set_color(MUTED_COLOR);
            node.set_z(0);
        }
    }
    let highlighted_edges = state.edges.clone();
    for (id, edge) in graph.edges_mut().enumerate() {
        if highlighted_edges.contains(&id) {
            let original = edge.original_color().to_string();
            edge.set_color(&original);
            edge.set_z(1);
        } else {
            edge.set_color(MUTED_COLOR);
            edge.set_z(0);
        }
    }
    Ok(())
}

/// Clear the highlight and restore every node and edge to its saved
/// `originalColor` with `z = 1`. No-op when nothing is highlighted.
pub fn unhighlight(graph: &mut Graph, state: &mut HighlightState) {
    if !state.is_active() {
        return;
    }
    state.clear();

    for node in graph.nodes_mut() {
        let original = node.original_color().to_string();
        node.set_color(&original);
        node.set_z(1);
    }
    for edge in graph.edges_mut() {
        let original = edge.original_color().to_string();
        edge.set_color(&original);
        edge.set_z(1);
    }
}

#[cfg(test)]
#[path = "highlight_test.rs"]
mod highlight_test;
