//! The egg scene graph populated by the converter.
//!
//! This module provides the output side of the conversion:
//! - [`EggData`] - group hierarchy, vertex pools, primitives
//! - [`EggMaterial`] - material records bound to primitives
//! - [`EggTexture`] - texture records bound to primitives
//!
//! The converter only ever populates the graph through the fixed operation
//! set on [`EggData`]; nothing here knows about chunks or wrappers.

mod data;
mod material;
mod texture;

pub use data::*;
pub use material::*;
pub use texture::*;
