//! Facade owning the active graph/index pair and the host-facing surface.
//!
//! The controller is an explicit handle returned to the host at
//! construction; there is no process-wide singleton. All operations run to
//! completion synchronously, and flag resets on the host property surface
//! happen after the corresponding work, with no async wrapper in between.

use crate::animation::PositionTween;
use crate::errors::{GraphError, Result};
use crate::graph::{build_graph, AttributeIndex, EdgeId, Graph};
use crate::highlight::{highlight_node, unhighlight, HighlightState};
use crate::layout::{grid_layout, LayoutCoordinator, LayoutDriver};
use crate::models::{GraphEvent, RawGraphData};
use crate::render::{CameraState, PickEvent, RendererFactory};
use crate::sort::{sort_nodes, SortDirection};
use crate::style::{color_nodes, resize_nodes, ColorRamp};
use crate::{CAMERA_ANIMATION_MS, CAMERA_ZOOM_STEP};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;

// ============================================================================
// Host property surface
// ============================================================================

/// Mirror of the property-change transport shared with the notebook host.
/// The names are the contract; the transport mechanism itself is the
/// host's concern.
#[derive(Debug)]
pub struct HostProperties {
    pub graph_data: Option<Value>,
    pub graph_data_changed: bool,
    pub callback_fired: bool,
    /// Registry name to positional-argument list.
    pub callback_dict: IndexMap<String, Vec<Value>>,
    pub plotted_nodes: Vec<String>,
    pub plotted_nodes_changed: bool,
    pub height: u32,
    pub start_layout: bool,
}

impl Default for HostProperties {
    fn default() -> Self {
        Self {
            graph_data: None,
            graph_data_changed: false,
            callback_fired: false,
            callback_dict: IndexMap::new(),
            plotted_nodes: Vec::new(),
            plotted_nodes_changed: false,
            height: 500,
            start_layout: false,
        }
    }
}

/// External collaborators the engine drives but does not implement.
pub struct Backend {
    pub layout_driver: Box<dyn LayoutDriver>,
    pub renderer_factory: Box<dyn RendererFactory>,
    pub color_ramp: Box<dyn ColorRamp>,
}

// ============================================================================
// Controller
// ============================================================================

/// Owns the single active (graph, index) pair and every binding derived
/// from it. Replacement is the only path by which the active graph changes,
/// and it swaps the pair atomically.
pub struct GraphController {
    graph: Graph,
    node_index: AttributeIndex<String>,
    edge_index: AttributeIndex<EdgeId>,
    highlight: HighlightState,
    selection: Vec<String>,
    coordinator: LayoutCoordinator,
    color_ramp: Box<dyn ColorRamp>,
    rng: StdRng,
    animation: Option<PositionTween>,
    events: Vec<GraphEvent>,
    start_layout_pending: bool,
    height: u32,
}

impl GraphController {
    /// Build the engine over an initial raw payload.
    pub fn new(raw_data: &Value, backend: Backend, start_layout: bool) -> Result<Self> {
        Self::with_rng(raw_data, backend, start_layout, StdRng::from_entropy())
    }

    /// Like `new` with an explicit random source, for deterministic builds.
    pub fn with_rng(
        raw_data: &Value,
        backend: Backend,
        start_layout: bool,
        mut rng: StdRng,
    ) -> Result<Self> {
        let raw = RawGraphData::from_value(raw_data)?;
        let bundle = build_graph(&raw, &mut rng)?;
        let mut coordinator =
            LayoutCoordinator::new(backend.layout_driver, backend.renderer_factory);
        coordinator.replace(&bundle.graph);
        Ok(Self {
            graph: bundle.graph,
            node_index: bundle.node_index,
            edge_index: bundle.edge_index,
            highlight: HighlightState::new(),
            selection: Vec::new(),
            coordinator,
            color_ramp: backend.color_ramp,
            rng,
            animation: None,
            events: Vec::new(),
            start_layout_pending: start_layout,
            height: 500,
        })
    }

    // ------------------------------------------------------------------
    // Replacement
    // ------------------------------------------------------------------

    /// Replace the active graph from a new raw payload. The build runs
    /// first, so a data error aborts the replacement and leaves the current
    /// graph, layout process, and rendering binding untouched and running.
    pub fn replace_from_raw(&mut self, raw_data: &Value) -> Result<()> {
        let raw = RawGraphData::from_value(raw_data)?;
        let bundle = build_graph(&raw, &mut self.rng)?;
        log::info!("replacing graph: {}", bundle.graph.describe());
        self.coordinator.replace(&bundle.graph);
        self.graph = bundle.graph;
        self.node_index = bundle.node_index;
        self.edge_index = bundle.edge_index;
        self.highlight = HighlightState::new();
        self.selection.clear();
        self.animation = None;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Styling and layout operations
    // ------------------------------------------------------------------

    pub fn color_nodes(&mut self, attr: &str, scale: &str) -> Result<()> {
        color_nodes(
            &mut self.graph,
            &self.node_index,
            attr,
            scale,
            self.color_ramp.as_ref(),
        )
    }

    pub fn resize_nodes(&mut self, attr: &str, min_size: f64, max_size: f64) -> Result<()> {
        resize_nodes(&mut self.graph, &self.node_index, attr, min_size, max_size)
    }

    pub fn sort_nodes(&self, attr: &str, direction: SortDirection) -> Vec<String> {
        sort_nodes(&self.graph, attr, direction)
    }

    /// Grid placement over the sorted order for `attr`; installs the
    /// position transition advanced by `on_frame`.
    pub fn grid_layout(
        &mut self,
        attr: &str,
        rows: Option<f64>,
        direction: SortDirection,
        scale: &str,
    ) -> Result<()> {
        self.animation = grid_layout(
            &mut self.graph,
            &self.node_index,
            attr,
            rows,
            direction,
            scale,
            self.color_ramp.as_ref(),
        )?;
        Ok(())
    }

    pub fn toggle_force_layout(&mut self) {
        self.coordinator.toggle_force_layout();
    }

    pub fn layout_running(&self) -> bool {
        self.coordinator.layout_running()
    }

    // ------------------------------------------------------------------
    // Highlighting and selection
    // ------------------------------------------------------------------

    pub fn highlight_node(&mut self, key: &str) -> Result<()> {
        highlight_node(&mut self.graph, &mut self.highlight, key)
    }

    pub fn unhighlight_node(&mut self) {
        unhighlight(&mut self.graph, &mut self.highlight);
    }

    /// Route a renderer pick event: node clicks select and highlight, stage
    /// clicks clear the highlight.
    pub fn handle_pick(&mut self, event: PickEvent) -> Result<()> {
        match event {
            PickEvent::Node(key) => self.handle_node_click(&key),
            PickEvent::Stage => {
                self.handle_stage_click();
                Ok(())
            }
        }
    }

    pub fn handle_node_click(&mut self, key: &str) -> Result<()> {
        highlight_node(&mut self.graph, &mut self.highlight, key)?;
        self.selection.clear();
        self.selection.push(key.to_string());
        self.events.push(GraphEvent::NodeSelected(key.to_string()));
        Ok(())
    }

    pub fn handle_stage_click(&mut self) {
        unhighlight(&mut self.graph, &mut self.highlight);
    }

    /// Request a secondary plot for the current selection. No-op when the
    /// selection is empty; the host renders the actual figure.
    pub fn select_for_plot(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.events
            .push(GraphEvent::PlotRequested(self.selection.clone()));
    }

    // ------------------------------------------------------------------
    // Callback dispatch
    // ------------------------------------------------------------------

    /// Execute a named operation from the fixed callback registry with
    /// positional JSON arguments. Unknown names are ignored by policy, not
    /// treated as errors.
    pub fn dispatch(&mut self, name: &str, args: &[Value]) -> Result<()> {
        match name {
            "gridLayout" => {
                let attr = str_arg(args, 0, "label");
                let rows = args.get(1).and_then(Value::as_f64);
                let direction = SortDirection::parse(&str_arg(args, 2, "ascend"));
                let scale = str_arg(args, 3, "OrRd");
                self.grid_layout(&attr, rows, direction, &scale)
            }
            "toggleForceLayout" => {
                self.toggle_force_layout();
                Ok(())
            }
            "colorNodes" => {
                let attr = str_arg(args, 0, "label");
                let scale = str_arg(args, 1, "OrRd");
                self.color_nodes(&attr, &scale)
            }
            "resizeNodes" => {
                let attr = str_arg(args, 0, "degree");
                let min_size = args.get(1).and_then(Value::as_f64).unwrap_or(2.0);
                let max_size = args.get(2).and_then(Value::as_f64).unwrap_or(20.0);
                self.resize_nodes(&attr, min_size, max_size)
            }
            other => {
                log::debug!("ignoring unknown callback: {}", other);
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------
    // Host synchronization
    // ------------------------------------------------------------------

    /// Apply pending host-side property changes: a flagged `graph_data`
    /// replacement first, then any fired callbacks. Flags reset once the
    /// corresponding work has run, and outbound plot requests are mirrored
    /// into `plotted_nodes`. The first error is reported after all pending
    /// work was attempted.
    pub fn poll_host(&mut self, props: &mut HostProperties) -> Result<()> {
        self.height = props.height;
        let mut first_error = None;

        if props.graph_data_changed {
            let outcome = match props.graph_data.as_ref() {
                Some(data) => self.replace_from_raw(data),
                None => Err(GraphError::data("graph_data_changed set without graph_data")),
            };
            props.graph_data_changed = false;
            if let Err(e) = outcome {
                first_error = Some(e);
            }
        }

        if props.callback_fired {
            let calls: Vec<(String, Vec<Value>)> = props
                .callback_dict
                .iter()
                .map(|(name, args)| (name.clone(), args.clone()))
                .collect();
            props.callback_fired = false;
            for (name, args) in calls {
                if let Err(e) = self.dispatch(&name, &args) {
                    log::warn!("callback {} failed: {}", name, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        for event in std::mem::take(&mut self.events) {
            if let GraphEvent::PlotRequested(keys) = event {
                props.plotted_nodes = keys;
                props.plotted_nodes_changed = true;
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Drain pending outbound events, for hosts consuming them directly
    /// instead of through `poll_host`.
    pub fn take_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Frame pump
    // ------------------------------------------------------------------

    /// Per-frame pump driven by the host's refresh signal: performs at most
    /// one pending renderer rebuild, auto-starts the continuous layout once
    /// if requested, and advances the active position transition.
    pub fn on_frame(&mut self, dt_ms: f64) {
        let rebuilt = self.coordinator.refresh(&self.graph);
        if rebuilt && self.start_layout_pending {
            self.coordinator.start_force_layout();
            self.start_layout_pending = false;
        }
        if let Some(tween) = self.animation.as_mut() {
            if tween.tick(&mut self.graph, dt_ms) {
                self.animation = None;
            }
        }
    }

    // ------------------------------------------------------------------
    // Camera controls
    // ------------------------------------------------------------------

    pub fn zoom_in(&mut self) {
        self.animate_zoom(1.0 / CAMERA_ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.animate_zoom(CAMERA_ZOOM_STEP);
    }

    fn animate_zoom(&mut self, factor: f64) {
        if let Some(camera) = self.coordinator.camera() {
            let state = camera.state();
            camera.animate(
                CameraState {
                    ratio: state.ratio * factor,
                    ..state
                },
                CAMERA_ANIMATION_MS,
            );
        }
    }

    pub fn reset_camera(&mut self) {
        if let Some(camera) = self.coordinator.camera() {
            camera.animate(CameraState::default(), CAMERA_ANIMATION_MS);
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn node_index(&self) -> &AttributeIndex<String> {
        &self.node_index
    }

    pub fn edge_index(&self) -> &AttributeIndex<EdgeId> {
        &self.edge_index
    }

    pub fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn has_renderer(&self) -> bool {
        self.coordinator.has_renderer()
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn describe(&self) -> String {
        self.graph.describe()
    }

    /// True while a grid placement transition is still in flight.
    pub fn animating(&self) -> bool {
        self.animation.is_some()
    }
}

fn str_arg(args: &[Value], idx: usize, default: &str) -> String {
    args.get(idx)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;
