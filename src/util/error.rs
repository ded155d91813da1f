//! Error types for the conversion core.

use thiserror::Error;

/// Fatal conversion errors.
///
/// Structural problems in the chunk stream (missing prerequisite chunks,
/// duplicate names, unresolved surface references) are recoverable: they are
/// reported to the log sink and the affected element is dropped or left
/// unshaded. `Error` is reserved for conditions that make the output graph
/// itself invalid. The converter records the first such error and still
/// returns whatever partial graph was built.
#[derive(Error, Debug)]
pub enum Error {
    /// A layer's parent chain loops back on itself.
    #[error("cyclic parentage involving layer {0}")]
    CyclicLayerParent(u32),

    /// Invalid graph structure discovered during materialization.
    #[error("invalid scene structure: {0}")]
    InvalidStructure(String),
}

impl Error {
    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
