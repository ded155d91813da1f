//! Layer wrapper: one named grouping level of the source model.

use glam::Vec3;

use crate::chunk::LayerChunk;
use crate::egg::{EggData, GroupId};

/// Where a layer's data comes from: a stream chunk, or the synthesized
/// generic layer that adopts geometry appearing before any layer chunk.
enum LayerSource<'a> {
    Chunk(&'a LayerChunk),
    Generic(LayerChunk),
}

/// Converter-side view of one layer.
pub struct LwoLayer<'a> {
    source: LayerSource<'a>,
    group: Option<GroupId>,
}

impl<'a> LwoLayer<'a> {
    /// Wrap a layer chunk.
    pub fn new(chunk: &'a LayerChunk) -> Self {
        Self {
            source: LayerSource::Chunk(chunk),
            group: None,
        }
    }

    /// The generic layer. It lives outside the numbered index, declares no
    /// parent, and sits at the pivot origin.
    pub fn generic() -> Self {
        Self {
            source: LayerSource::Generic(LayerChunk::new(0, "layer")),
            group: None,
        }
    }

    fn chunk(&self) -> &LayerChunk {
        match &self.source {
            LayerSource::Chunk(chunk) => chunk,
            LayerSource::Generic(chunk) => chunk,
        }
    }

    /// Check whether this is the synthesized generic layer.
    pub fn is_generic(&self) -> bool {
        matches!(self.source, LayerSource::Generic(_))
    }

    /// Layer number within the sparse index.
    pub fn number(&self) -> u32 {
        self.chunk().number
    }

    /// Layer name.
    pub fn name(&self) -> &str {
        &self.chunk().name
    }

    /// Declared parent layer number, if any.
    pub fn parent(&self) -> Option<u32> {
        self.chunk().parent
    }

    /// Pivot point of the layer.
    pub fn pivot(&self) -> Vec3 {
        self.chunk().pivot
    }

    /// Materialized egg group, once the make pass ran.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Make pass: create the group node at top level. Parent nesting is
    /// wired by the connect pass, once every layer exists.
    pub fn make_egg(&mut self, egg: &mut EggData) {
        let group = egg.create_group(None, self.name());
        let pivot = self.pivot();
        if pivot != Vec3::ZERO {
            egg.set_group_translate(group, pivot);
        }
        self.group = Some(group);
    }
}
