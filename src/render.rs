//! Rendering collaborator contract.
//!
//! The engine never draws. It owns the lifecycle of an opaque rendering
//! binding, consumes its pick events, and drives its camera; everything
//! else about repainting is the binding's concern.

use crate::graph::Graph;

/// Camera position over the normalized graph extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub x: f64,
    pub y: f64,
    pub ratio: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            ratio: 1.0,
        }
    }
}

pub trait Camera {
    fn state(&self) -> CameraState;

    /// Animate toward `target` over `duration_ms`.
    fn animate(&mut self, target: CameraState, duration_ms: u64);
}

/// An active rendering binding over the current graph.
pub trait Renderer {
    /// Dispose the binding. It must not be used afterwards.
    fn kill(&mut self);

    fn camera(&mut self) -> &mut dyn Camera;
}

/// Builds a rendering binding for a freshly installed graph.
pub trait RendererFactory {
    fn create(&self, graph: &Graph) -> Box<dyn Renderer>;
}

/// Pick events emitted by the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub enum PickEvent {
    /// A node was clicked, by key.
    Node(String),
    /// The empty stage was clicked.
    Stage,
}
