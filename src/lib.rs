//! # lwo-egg
//!
//! Conversion core that turns a flat, order-dependent sequence of typed
//! LightWave Object chunk records into a normalized, hierarchical egg scene
//! graph (groups, vertex pools, polygons, surfaces, UV coordinates).
//!
//! The low-level binary reader is an external collaborator: chunks arrive
//! here already decoded, as [`chunk::Chunk`] records. This crate correlates
//! them — layer membership, point-to-polygon ownership, polygon-to-surface
//! binding, named-tag indirection — and materializes the result into an
//! [`egg::EggData`] graph, tolerant of malformed, reordered, or missing
//! records.
//!
//! ## Modules
//!
//! - [`util`] - Basic types (math re-exports, errors)
//! - [`chunk`] - Typed, already-decoded chunk records
//! - [`egg`] - The egg scene graph populated by the converter
//! - [`convert`] - The collect/make/connect conversion pipeline
//!
//! ## Example
//!
//! ```
//! use lwo_egg::chunk::{Chunk, LayerChunk, PointsChunk};
//! use lwo_egg::convert::LwoToEggConverter;
//!
//! let chunks = vec![
//!     Chunk::Layer(LayerChunk::new(0, "scene")),
//!     Chunk::Points(PointsChunk::new(vec![glam::Vec3::ZERO])),
//! ];
//!
//! let mut converter = LwoToEggConverter::new();
//! let ok = converter.convert(&chunks);
//! assert!(ok);
//! ```

pub mod util;
pub mod chunk;
pub mod egg;
pub mod convert;

// Re-export commonly used types
pub use util::{Error, Result};
pub use convert::LwoToEggConverter;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::chunk::*;
    pub use crate::egg::{EggData, EggMaterial, EggTexture};
    pub use crate::convert::LwoToEggConverter;
}
