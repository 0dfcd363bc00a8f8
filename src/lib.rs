//! neugraph - graph indexing and interactive styling engine for
//! notebook-embedded attributed-graph views.
//!
//! The engine ingests a raw node/edge record set, builds an
//! attribute-indexed in-memory graph, and exposes deterministic operations
//! for coloring, resizing, sorting, highlighting, and grid placement. It
//! never draws: rendering, the force-directed physics process, and the
//! notebook transport are opaque collaborators behind the traits in
//! [`render`], [`layout`], and [`style`].

pub mod animation;
pub mod controller;
pub mod errors;
pub mod graph;
pub mod highlight;
pub mod layout;
pub mod models;
pub mod render;
pub mod sort;
pub mod style;

// ============================================================================
// Visual defaults
// ============================================================================

/// Color given to nodes with neither a caller-supplied nor viz-derived color.
pub const DEFAULT_NODE_COLOR: &str = "#333";

/// Color given to edges without a caller-supplied color.
pub const DEFAULT_EDGE_COLOR: &str = "#CCC";

/// Color applied to every node before a ramp assignment is mapped on; nodes
/// missing the colored attribute keep it.
pub const PROVISIONAL_COLOR: &str = "#000";

/// Color of de-emphasized nodes and edges while a highlight is active.
pub const MUTED_COLOR: &str = "#FBFBFB";

/// Node size used when neither `size` nor `viz.size` is supplied.
pub const DEFAULT_NODE_SIZE: f64 = 2.0;

// ============================================================================
// Layout constants
// ============================================================================

/// Side length of the normalized square extent the grid layout maps into.
pub const GRID_EXTENT: f64 = 100.0;

/// Duration of the grid placement transition, in milliseconds.
pub const GRID_ANIMATION_MS: f64 = 2000.0;

/// Duration of camera transitions, in milliseconds.
pub const CAMERA_ANIMATION_MS: u64 = 150;

/// Camera ratio multiplier per zoom step.
pub const CAMERA_ZOOM_STEP: f64 = 1.5;

/// Node count above which the continuous layout switches to an approximate
/// long-range force algorithm.
pub const BARNES_HUT_THRESHOLD: usize = 2000;

// Re-export commonly used types
pub use controller::{Backend, GraphController, HostProperties};
pub use errors::{GraphError, Result};
pub use graph::{build_graph, AttributeIndex, Edge, EdgeId, Graph, GraphBundle, Node};
pub use highlight::{highlight_node, unhighlight, HighlightState};
pub use layout::{
    force_settings, grid_layout, ForceSettings, LayoutCoordinator, LayoutDriver, LayoutProcess,
};
pub use models::{AttrMap, GraphEvent, RawGraphData};
pub use render::{Camera, CameraState, PickEvent, Renderer, RendererFactory};
pub use sort::{cmp_values, sort_nodes, SortDirection};
pub use style::{color_nodes, resize_nodes, ColorRamp};
