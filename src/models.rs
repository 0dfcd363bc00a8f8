//! Data models for the graph engine.
//!
//! The raw payload exchanged with the notebook host, attribute-value
//! helpers shared by the index and the styling operations, and the
//! outbound event type.

use crate::errors::{GraphError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Attribute bag attached to every node and edge: string key to tagged
/// JSON value.
pub type AttrMap = Map<String, Value>;

// ============================================================================
// Raw payload
// ============================================================================

/// Raw node/edge record set as supplied by the host:
/// `{ nodes: [[key, attrs], ...], edges: [[source, target, attrs], ...], directed }`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGraphData {
    pub nodes: Vec<(String, AttrMap)>,
    pub edges: Vec<(String, String, AttrMap)>,
    #[serde(default)]
    pub directed: bool,
}

impl RawGraphData {
    /// Parse a raw payload out of an untyped JSON value. A missing `nodes`
    /// or `edges` field is a data error; `directed` defaults to false.
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| GraphError::data(format!("malformed graph payload: {}", e)))
    }
}

// ============================================================================
// Outbound events
// ============================================================================

/// Notifications emitted toward the host, drained via
/// `GraphController::take_events` or mirrored by `poll_host`.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    /// A secondary plot was requested for the selected node keys.
    PlotRequested(Vec<String>),
    /// A node was picked on the rendering surface.
    NodeSelected(String),
}

// ============================================================================
// Attribute value helpers
// ============================================================================

/// Stringify an attribute value the way the index keys its buckets:
/// strings render bare, numbers and booleans via their display form,
/// nested structures as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a stringified attribute value as a finite number, if the whole
/// string is one.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render a `viz.color` hint (an `{r, g, b}` object with optional `a`) as
/// an RGB(A) CSS string. Returns None when the hint is not a color object.
pub fn viz_color_to_rgb(value: &Value) -> Option<String> {
    let obj = value.as_object()?;
    let r = obj.get("r")?.as_f64()?;
    let g = obj.get("g")?.as_f64()?;
    let b = obj.get("b")?.as_f64()?;
    match obj.get("a").and_then(Value::as_f64) {
        Some(a) => Some(format!("rgba({},{},{},{})", r, g, b, a)),
        None => Some(format!("rgb({},{},{})", r, g, b)),
    }
}
