//! Grid placement and lifecycle coordination with the continuous
//! force-directed layout process.
//!
//! The physics solver itself is opaque: the engine only holds a
//! start/stop/kill handle plus a running query, and swaps the process (and
//! the rendering binding that reads its positions) exactly when the graph
//! is replaced.

use crate::animation::PositionTween;
use crate::errors::Result;
use crate::graph::{AttributeIndex, Graph};
use crate::render::{Camera, Renderer, RendererFactory};
use crate::sort::{sort_nodes, SortDirection};
use crate::style::{color_nodes, ColorRamp};
use crate::{BARNES_HUT_THRESHOLD, GRID_ANIMATION_MS, GRID_EXTENT};
use std::collections::HashMap;

// ============================================================================
// Continuous layout collaborator
// ============================================================================

/// Settings for the continuous force-directed process, derived from graph
/// size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceSettings {
    pub barnes_hut_optimize: bool,
    pub strong_gravity_mode: bool,
    pub gravity: f64,
    pub scaling_ratio: f64,
    pub slow_down: f64,
}

/// Derive force settings from node count: approximate long-range forces
/// past the size threshold, and a slow-down growing with ln(order) so large
/// graphs settle instead of oscillating.
pub fn force_settings(order: usize) -> ForceSettings {
    ForceSettings {
        barnes_hut_optimize: order > BARNES_HUT_THRESHOLD,
        strong_gravity_mode: true,
        gravity: 0.05,
        scaling_ratio: 10.0,
        slow_down: 1.0 + (order.max(1) as f64).ln(),
    }
}

/// Handle on the opaque continuous layout process. The authoritative
/// "running" bit lives on the process side, not in the engine.
pub trait LayoutProcess {
    fn start(&mut self);
    fn stop(&mut self);

    /// Dispose the process. Position updates it would have emitted after
    /// disposal must be discarded by the implementation.
    fn kill(&mut self);

    fn is_running(&self) -> bool;
}

/// Constructs a layout process for a freshly installed graph.
pub trait LayoutDriver {
    fn spawn(&self, graph: &Graph, settings: ForceSettings) -> Box<dyn LayoutProcess>;
}

// ============================================================================
// Grid placement
// ============================================================================

/// Place nodes on a grid ordered by `attr`, coloring them by the same
/// attribute so grouping and coloring stay visually consistent.
///
/// With no row count, rows and columns both derive from the square root of
/// the node count; otherwise columns are sized to fit every node into the
/// requested rows. Returns the position transition to animate (a fixed
/// 2-second tween), or None for an empty graph.
pub fn grid_layout(
    graph: &mut Graph,
    index: &AttributeIndex<String>,
    attr: &str,
    rows: Option<f64>,
    direction: SortDirection,
    scale: &str,
    ramp: &dyn ColorRamp,
) -> Result<Option<PositionTween>> {
    let order = graph.order();
    if order == 0 {
        return Ok(None);
    }

    let (n_rows, n_cols) = match rows {
        Some(rows) if rows >= 1.0 => {
            let rows = rows.floor();
            (rows as usize, (order as f64 / rows).ceil() as usize)
        }
        _ => (
            (order as f64).sqrt().floor() as usize,
            (order as f64).sqrt().ceil() as usize,
        ),
    };
    let n_rows = n_rows.max(1);
    let n_cols = n_cols.max(1);

    let ordered = sort_nodes(graph, attr, direction);
    color_nodes(graph, index, attr, scale, ramp)?;

    let col_res = GRID_EXTENT / n_cols as f64;
    let row_res = GRID_EXTENT / n_rows as f64;
    let mut targets = HashMap::new();
    for (position, key) in ordered.iter().enumerate() {
        let col = position % n_cols;
        let row = position / n_cols;
        targets.insert(key.clone(), (col as f64 * col_res, row as f64 * row_res));
    }

    Ok(Some(PositionTween::new(graph, targets, GRID_ANIMATION_MS)))
}

// ============================================================================
// Lifecycle coordination
// ============================================================================

/// Owns the continuous layout process and the rendering binding for the
/// active graph, and swaps both when the graph is replaced.
pub struct LayoutCoordinator {
    driver: Box<dyn LayoutDriver>,
    renderer_factory: Box<dyn RendererFactory>,
    process: Option<Box<dyn LayoutProcess>>,
    renderer: Option<Box<dyn Renderer>>,
    pending_render: bool,
}

impl LayoutCoordinator {
    pub fn new(driver: Box<dyn LayoutDriver>, renderer_factory: Box<dyn RendererFactory>) -> Self {
        Self {
            driver,
            renderer_factory,
            process: None,
            renderer: None,
            pending_render: false,
        }
    }

    /// Tear down the bindings of the outgoing graph and spawn a fresh
    /// layout process for `graph`. The old process is disposed before the
    /// new one exists, and the rendering binding that read its positions is
    /// disposed with it; the new rendering binding is deferred to the next
    /// frame so it never sees a half-initialized structure.
    pub fn replace(&mut self, graph: &Graph) {
        if let Some(process) = self.process.as_mut() {
            process.kill();
        }
        self.process = None;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.kill();
        }
        self.renderer = None;

        let settings = force_settings(graph.order());
        log::debug!(
            "spawning layout process for {} nodes (slow_down {:.2}, barnes_hut {})",
            graph.order(),
            settings.slow_down,
            settings.barnes_hut_optimize
        );
        self.process = Some(self.driver.spawn(graph, settings));
        self.pending_render = true;
    }

    /// Build the deferred rendering binding, at most once per replacement.
    /// Returns true if a binding was built this frame.
    pub fn refresh(&mut self, graph: &Graph) -> bool {
        if !self.pending_render {
            return false;
        }
        self.renderer = Some(self.renderer_factory.create(graph));
        self.pending_render = false;
        true
    }

    /// Start the process if stopped, stop it if running. Pass-through
    /// control; the process's own running bit is authoritative.
    pub fn toggle_force_layout(&mut self) {
        if let Some(process) = self.process.as_mut() {
            if process.is_running() {
                log::debug!("stopping force layout");
                process.stop();
            } else {
                log::debug!("starting force layout");
                process.start();
            }
        }
    }

    pub fn start_force_layout(&mut self) {
        if let Some(process) = self.process.as_mut() {
            if !process.is_running() {
                process.start();
            }
        }
    }

    pub fn layout_running(&self) -> bool {
        self.process.as_ref().map(|p| p.is_running()).unwrap_or(false)
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn camera(&mut self) -> Option<&mut dyn Camera> {
        self.renderer.as_mut().map(|r| r.camera())
    }
}

impl Drop for LayoutCoordinator {
    fn drop(&mut self) {
        if let Some(process) = self.process.as_mut() {
            process.kill();
        }
        self.process = None;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.kill();
        }
        self.renderer = None;
    }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;
