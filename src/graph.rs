//! Graph construction and attribute indexing.
//!
//! `build_graph` turns a raw record set into an attributed in-memory graph
//! plus inverted indices from attribute value to the entities holding it.
//! The graph and its indices are created together, owned together, and
//! replaced together; nothing here is ever incrementally patched.

use crate::errors::{GraphError, Result};
use crate::models::{display_value, viz_color_to_rgb, AttrMap, RawGraphData};
use crate::{DEFAULT_EDGE_COLOR, DEFAULT_NODE_COLOR, DEFAULT_NODE_SIZE};
use indexmap::IndexMap;
use rand::Rng;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};

/// Dense edge identifier, assigned in insertion order.
pub type EdgeId = usize;

// ============================================================================
// Nodes and edges
// ============================================================================

/// A node: stable caller-supplied key plus its attribute bag. The reserved
/// visual attributes (`x`, `y`, `z`, `size`, `color`, `originalColor`,
/// `label`) live in the bag alongside arbitrary user attributes.
#[derive(Debug, Clone)]
pub struct Node {
    pub key: String,
    pub attrs: AttrMap,
}

impl Node {
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn color(&self) -> &str {
        attr_str(&self.attrs, "color").unwrap_or(DEFAULT_NODE_COLOR)
    }

    pub fn original_color(&self) -> &str {
        attr_str(&self.attrs, "originalColor").unwrap_or(DEFAULT_NODE_COLOR)
    }

    pub fn set_color(&mut self, color: &str) {
        self.attrs
            .insert("color".to_string(), Value::String(color.to_string()));
    }

    pub fn set_original_color(&mut self, color: &str) {
        self.attrs
            .insert("originalColor".to_string(), Value::String(color.to_string()));
    }

    pub fn z(&self) -> i64 {
        attr_f64(&self.attrs, "z").unwrap_or(1.0) as i64
    }

    pub fn set_z(&mut self, z: i64) {
        self.attrs.insert("z".to_string(), json!(z));
    }

    pub fn size(&self) -> f64 {
        attr_f64(&self.attrs, "size").unwrap_or(DEFAULT_NODE_SIZE)
    }

    pub fn set_size(&mut self, size: f64) {
        self.attrs.insert("size".to_string(), json!(size));
    }

    pub fn x(&self) -> f64 {
        attr_f64(&self.attrs, "x").unwrap_or(0.0)
    }

    pub fn y(&self) -> f64 {
        attr_f64(&self.attrs, "y").unwrap_or(0.0)
    }

    pub fn set_x(&mut self, x: f64) {
        self.attrs.insert("x".to_string(), json!(x));
    }

    pub fn set_y(&mut self, y: f64) {
        self.attrs.insert("y".to_string(), json!(y));
    }

    pub fn label(&self) -> String {
        self.attrs
            .get("label")
            .map(display_value)
            .unwrap_or_else(|| self.key.clone())
    }
}

/// An edge between two node keys, with the same `z`/`color`/`originalColor`
/// reserved fields in its attribute bag.
#[derive(Debug, Clone)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub attrs: AttrMap,
}

impl Edge {
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn color(&self) -> &str {
        attr_str(&self.attrs, "color").unwrap_or(DEFAULT_EDGE_COLOR)
    }

    pub fn original_color(&self) -> &str {
        attr_str(&self.attrs, "originalColor").unwrap_or(DEFAULT_EDGE_COLOR)
    }

    pub fn set_color(&mut self, color: &str) {
        self.attrs
            .insert("color".to_string(), Value::String(color.to_string()));
    }

    pub fn z(&self) -> i64 {
        attr_f64(&self.attrs, "z").unwrap_or(1.0) as i64
    }

    pub fn set_z(&mut self, z: i64) {
        self.attrs.insert("z".to_string(), json!(z));
    }
}

fn attr_str<'a>(attrs: &'a AttrMap, name: &str) -> Option<&'a str> {
    attrs.get(name).and_then(Value::as_str)
}

fn attr_f64(attrs: &AttrMap, name: &str) -> Option<f64> {
    attrs.get(name).and_then(Value::as_f64)
}

// ============================================================================
// Graph
// ============================================================================

/// Directed or undirected attributed graph. Nodes keep insertion order;
/// multi-edge mode is upgraded lazily on the first duplicate pair and never
/// reverts for the lifetime of the instance.
#[derive(Debug)]
pub struct Graph {
    directed: bool,
    multi: bool,
    nodes: Vec<Node>,
    slots: HashMap<String, usize>,
    edges: Vec<Edge>,
    out_edges: Vec<Vec<EdgeId>>,
    in_edges: Vec<Vec<EdgeId>>,
    seen_pairs: HashSet<(usize, usize)>,
}

impl Graph {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            multi: false,
            nodes: Vec::new(),
            slots: HashMap::new(),
            edges: Vec::new(),
            out_edges: Vec::new(),
            in_edges: Vec::new(),
            seen_pairs: HashSet::new(),
        }
    }

    /// Node count.
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// Edge count.
    pub fn size(&self) -> usize {
        self.edges.len()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    pub fn contains_node(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn node(&self, key: &str) -> Option<&Node> {
        self.slots.get(key).map(|&i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, key: &str) -> Option<&mut Node> {
        let slot = *self.slots.get(key)?;
        Some(&mut self.nodes[slot])
    }

    /// Node keys in insertion order.
    pub fn node_keys(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.key.clone()).collect()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.edges.iter_mut()
    }

    pub fn add_node(&mut self, key: String, attrs: AttrMap) -> Result<()> {
        if self.slots.contains_key(&key) {
            return Err(GraphError::data(format!("duplicate node key: {}", key)));
        }
        self.slots.insert(key.clone(), self.nodes.len());
        self.nodes.push(Node { key, attrs });
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        Ok(())
    }

    /// Insert an edge. A second edge over the same (source, target) pair
    /// (unordered pair when the graph is undirected) upgrades the graph to
    /// multi-edge mode before insertion.
    pub fn add_edge(&mut self, source: &str, target: &str, attrs: AttrMap) -> Result<EdgeId> {
        let s = self.slot_of(source)?;
        let t = self.slot_of(target)?;
        let pair = if self.directed {
            (s, t)
        } else {
            (s.min(t), s.max(t))
        };
        if !self.seen_pairs.insert(pair) {
            self.multi = true;
        }
        let id = self.edges.len();
        self.edges.push(Edge {
            source: source.to_string(),
            target: target.to_string(),
            attrs,
        });
        self.out_edges[s].push(id);
        self.in_edges[t].push(id);
        Ok(id)
    }

    fn slot_of(&self, key: &str) -> Result<usize> {
        self.slots
            .get(key)
            .copied()
            .ok_or_else(|| GraphError::data(format!("edge references unknown node: {}", key)))
    }

    /// Incident-edge count. For directed graphs this is the in-degree plus
    /// the out-degree; a self-loop counts twice.
    pub fn degree(&self, key: &str) -> usize {
        match self.slots.get(key) {
            Some(&i) => self.out_edges[i].len() + self.in_edges[i].len(),
            None => 0,
        }
    }

    /// In-degree. For undirected graphs every incident edge counts.
    pub fn in_degree(&self, key: &str) -> usize {
        if !self.directed {
            return self.degree(key);
        }
        match self.slots.get(key) {
            Some(&i) => self.in_edges[i].len(),
            None => 0,
        }
    }

    /// Out-degree. For undirected graphs every incident edge counts.
    pub fn out_degree(&self, key: &str) -> usize {
        if !self.directed {
            return self.degree(key);
        }
        match self.slots.get(key) {
            Some(&i) => self.out_edges[i].len(),
            None => 0,
        }
    }

    /// Distinct one-hop neighbors of `key`, in first-seen order, across
    /// both edge directions.
    pub fn neighbors(&self, key: &str) -> Vec<String> {
        let Some(&i) = self.slots.get(key) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for &id in self.out_edges[i].iter().chain(self.in_edges[i].iter()) {
            let edge = &self.edges[id];
            let other = if edge.source == key {
                &edge.target
            } else {
                &edge.source
            };
            if seen.insert(other.clone()) {
                result.push(other.clone());
            }
        }
        result
    }

    /// Every edge incident to `key`, in first-seen order.
    pub fn incident_edges(&self, key: &str) -> Vec<EdgeId> {
        let Some(&i) = self.slots.get(key) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for &id in self.out_edges[i].iter().chain(self.in_edges[i].iter()) {
            if seen.insert(id) {
                result.push(id);
            }
        }
        result
    }

    /// Human-readable summary of the graph shape.
    pub fn describe(&self) -> String {
        format!(
            "{} {} graph, {} nodes, {} edges",
            if self.multi { "multi" } else { "simple" },
            if self.directed { "directed" } else { "undirected" },
            self.order(),
            self.size()
        )
    }
}

// ============================================================================
// Attribute index
// ============================================================================

/// Inverted index: attribute name to stringified value to the keys holding
/// that value, everything in first-seen order. The node index always carries
/// the `degree` / `inDegree` / `outDegree` pseudo-attributes after a build.
#[derive(Debug, Clone)]
pub struct AttributeIndex<K> {
    attrs: IndexMap<String, IndexMap<String, Vec<K>>>,
}

impl<K> AttributeIndex<K> {
    pub fn new() -> Self {
        Self {
            attrs: IndexMap::new(),
        }
    }

    /// Append `key` to the bucket for `value` under `attr`, creating the
    /// nested maps on first sight.
    pub fn record(&mut self, attr: &str, value: &Value, key: K) {
        self.record_value(attr, display_value(value), key);
    }

    /// Like `record` with an already-stringified value.
    pub fn record_value(&mut self, attr: &str, value: String, key: K) {
        self.attrs
            .entry(attr.to_string())
            .or_default()
            .entry(value)
            .or_default()
            .push(key);
    }

    pub fn contains(&self, attr: &str) -> bool {
        self.attrs.contains_key(attr)
    }

    /// The value buckets for `attr`, distinct values in first-seen order.
    pub fn buckets(&self, attr: &str) -> Option<&IndexMap<String, Vec<K>>> {
        self.attrs.get(attr)
    }

    /// Indexed attribute names, in first-seen order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }
}

impl<K> Default for AttributeIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Build
// ============================================================================

/// The active graph and its indices, created and replaced as a unit.
#[derive(Debug)]
pub struct GraphBundle {
    pub graph: Graph,
    pub node_index: AttributeIndex<String>,
    pub edge_index: AttributeIndex<EdgeId>,
}

/// Build a graph and its attribute indices from a raw record set.
///
/// Node and edge attributes are defaulted first (visual attributes, `viz`
/// hints, positions from `rng` when unset), then indexed; the degree
/// pseudo-attributes are populated once all entities are in. Deterministic
/// given deterministic input order and random source.
pub fn build_graph(raw: &RawGraphData, rng: &mut impl Rng) -> Result<GraphBundle> {
    let mut graph = Graph::new(raw.directed);
    let mut node_index = AttributeIndex::new();
    let mut edge_index = AttributeIndex::new();

    for (key, raw_attrs) in &raw.nodes {
        let attrs = default_node_attrs(key, raw_attrs.clone(), rng);
        for (name, value) in &attrs {
            node_index.record(name, value, key.clone());
        }
        graph.add_node(key.clone(), attrs)?;
    }

    for (source, target, raw_attrs) in &raw.edges {
        let attrs = default_edge_attrs(raw_attrs.clone());
        let id = graph.add_edge(source, target, attrs)?;
        if let Some(edge) = graph.edge(id) {
            for (name, value) in &edge.attrs {
                edge_index.record(name, value, id);
            }
        }
    }

    // Degree pseudo-attributes, keyed by stringified integer degree, bucket
    // order following node insertion order.
    let keys = graph.node_keys();
    for key in &keys {
        node_index.record_value("degree", graph.degree(key).to_string(), key.clone());
    }
    for key in &keys {
        node_index.record_value("inDegree", graph.in_degree(key).to_string(), key.clone());
    }
    for key in &keys {
        node_index.record_value("outDegree", graph.out_degree(key).to_string(), key.clone());
    }

    log::debug!("built {}", graph.describe());

    Ok(GraphBundle {
        graph,
        node_index,
        edge_index,
    })
}

fn default_node_attrs(key: &str, mut attrs: AttrMap, rng: &mut impl Rng) -> AttrMap {
    attrs.insert("z".to_string(), json!(1));
    if !attrs.contains_key("viz") {
        attrs.insert("viz".to_string(), json!({}));
    }
    let viz = attrs.get("viz").cloned().unwrap_or_else(|| json!({}));

    if !attrs.contains_key("x") {
        let x = viz
            .pointer("/position/x")
            .and_then(Value::as_f64)
            .unwrap_or_else(|| rng.gen::<f64>());
        attrs.insert("x".to_string(), json!(x));
    }
    if !attrs.contains_key("y") {
        let y = viz
            .pointer("/position/y")
            .and_then(Value::as_f64)
            .unwrap_or_else(|| rng.gen::<f64>());
        attrs.insert("y".to_string(), json!(y));
    }
    if !attrs.contains_key("size") {
        let size = viz
            .get("size")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_NODE_SIZE);
        attrs.insert("size".to_string(), json!(size));
    }

    let color = match attrs.get("color") {
        Some(color) => color.clone(),
        None => {
            let color = Value::String(
                viz.get("color")
                    .and_then(viz_color_to_rgb)
                    .unwrap_or_else(|| DEFAULT_NODE_COLOR.to_string()),
            );
            attrs.insert("color".to_string(), color.clone());
            color
        }
    };
    if !attrs.contains_key("originalColor") {
        attrs.insert("originalColor".to_string(), color);
    }

    if !attrs.contains_key("label") {
        attrs.insert("label".to_string(), Value::String(key.to_string()));
    }
    attrs
}

fn default_edge_attrs(mut attrs: AttrMap) -> AttrMap {
    attrs.insert("z".to_string(), json!(1));
    if !attrs.contains_key("viz") {
        attrs.insert("viz".to_string(), json!({}));
    }
    let color = match attrs.get("color") {
        Some(color) => color.clone(),
        None => {
            let color = Value::String(DEFAULT_EDGE_COLOR.to_string());
            attrs.insert("color".to_string(), color.clone());
            color
        }
    };
    if !attrs.contains_key("originalColor") {
        attrs.insert("originalColor".to_string(), color);
    }
    attrs
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod graph_test;
