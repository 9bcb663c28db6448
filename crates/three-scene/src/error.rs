//! Error types for scene graph and rendering operations.

use thiserror::Error;

use crate::NodeId;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or rendering a scene.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Handle does not belong to this graph.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// Failure in geometry data.
    #[error(transparent)]
    Core(#[from] three_core::Error),

    /// Failure in a math operation.
    #[error(transparent)]
    Math(#[from] three_math::Error),
}
