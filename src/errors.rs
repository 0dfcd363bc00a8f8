//! Error types for engine operations.
//!
//! All failures are local and synchronous, raised at the point of the
//! offending call; none are retried.

use thiserror::Error;

/// Errors raised by graph construction and styling operations.
#[derive(Error, Debug)]
pub enum GraphError {
    /// Malformed raw payload: missing required fields, a duplicate node key,
    /// or an edge referencing a node not present in the payload.
    #[error("invalid graph data: {0}")]
    Data(String),

    /// Operation referenced an attribute absent from the index.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// Highlight operation on a node key absent from the graph.
    #[error("node not found: {0}")]
    NodeNotFound(String),
}

impl GraphError {
    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Create an unknown-attribute error.
    pub fn unknown_attribute(attr: impl Into<String>) -> Self {
        Self::UnknownAttribute(attr.into())
    }

    /// Create a node-not-found error.
    pub fn node_not_found(key: impl Into<String>) -> Self {
        Self::NodeNotFound(key.into())
    }
}

/// Result type alias using the engine's error type.
pub type Result<T> = std::result::Result<T, GraphError>;
