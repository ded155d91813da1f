//! The collect/make/connect conversion pipeline.
//!
//! [`LwoToEggConverter`] consumes the chunk stream exactly once, correlating
//! records into wrappers ([`LwoLayer`], [`LwoPoints`], [`LwoPolygons`],
//! [`LwoSurface`]) behind four cursors, then materializes the egg graph in
//! two further passes: a make pass instantiating one output node per
//! wrapper, and a connect pass wiring the relationships that may point at
//! wrappers collected later in the stream.

mod converter;
mod layer;
mod points;
mod polygons;
mod surface;
mod uv;

pub use converter::{Diagnostics, LwoToEggConverter};
pub use layer::LwoLayer;
pub use points::{LayerRef, LwoPoints};
pub use polygons::LwoPolygons;
pub use surface::{LwoSurface, SurfaceFlags, DEFAULT_COLOR};
pub use uv::{UvKey, UvProjection};
