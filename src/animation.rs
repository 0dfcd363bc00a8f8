//! Time-bounded position transitions, advanced by the host's frame signal.
//!
//! No callbacks: the controller calls `tick` with the frame delta and the
//! tween writes eased positions straight into the graph until it completes.

use crate::graph::Graph;
use std::collections::HashMap;

fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// An in-flight node position transition toward fixed targets.
#[derive(Debug)]
pub struct PositionTween {
    // key -> (start, target)
    frames: HashMap<String, ((f64, f64), (f64, f64))>,
    duration_ms: f64,
    elapsed_ms: f64,
}

impl PositionTween {
    /// Snapshot current positions as the start of a transition toward
    /// `targets`. Keys absent from the graph are skipped.
    pub fn new(graph: &Graph, targets: HashMap<String, (f64, f64)>, duration_ms: f64) -> Self {
        let frames = targets
            .into_iter()
            .filter_map(|(key, target)| {
                graph
                    .node(&key)
                    .map(|node| (key, ((node.x(), node.y()), target)))
            })
            .collect();
        Self {
            frames,
            duration_ms,
            elapsed_ms: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Advance by `dt_ms` and write interpolated positions into the graph.
    /// Returns true once the transition has reached its targets.
    pub fn tick(&mut self, graph: &mut Graph, dt_ms: f64) -> bool {
        self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms);
        let t = if self.duration_ms <= 0.0 {
            1.0
        } else {
            self.elapsed_ms / self.duration_ms
        };
        let eased = ease_in_out_quad(t);
        for (key, (start, target)) in &self.frames {
            if let Some(node) = graph.node_mut(key) {
                node.set_x(start.0 + (target.0 - start.0) * eased);
                node.set_y(start.1 + (target.1 - start.1) * eased);
            }
        }
        self.is_finished()
    }
}
