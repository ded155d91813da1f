//! Points wrapper: a vertex table and its named per-vertex attribute maps.

use std::collections::HashMap;

use glam::{Vec2, Vec3};

use crate::chunk::{PointsChunk, VertexMapChunk, VertexMapKind};
use crate::egg::{EggData, GroupId, PoolId, VertexId};

/// Which layer owns a points wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerRef {
    /// The synthesized generic layer.
    Generic,
    /// The layer stored at this number in the layer index.
    Numbered(u32),
}

/// Converter-side view of one points chunk.
pub struct LwoPoints<'a> {
    chunk: &'a PointsChunk,
    layer: LayerRef,
    /// Per-vertex lookup for each named UV map, prebuilt on attach.
    uv_maps: HashMap<String, HashMap<u32, Vec2>>,
    /// Non-UV attribute maps, kept as delivered.
    aux_maps: Vec<&'a VertexMapChunk>,
    pool: Option<PoolId>,
    vertex_ids: Vec<VertexId>,
}

impl<'a> LwoPoints<'a> {
    /// Wrap a points chunk owned by the given layer.
    pub fn new(chunk: &'a PointsChunk, layer: LayerRef) -> Self {
        Self {
            chunk,
            layer,
            uv_maps: HashMap::new(),
            aux_maps: Vec::new(),
            pool: None,
            vertex_ids: Vec::new(),
        }
    }

    /// The owning layer.
    pub fn layer(&self) -> LayerRef {
        self.layer
    }

    /// Number of positions in the table.
    pub fn len(&self) -> usize {
        self.chunk.len()
    }

    /// Check whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.chunk.is_empty()
    }

    /// Position of a vertex by chunk index.
    pub fn position(&self, vertex: u32) -> Option<Vec3> {
        self.chunk.position(vertex as usize)
    }

    /// Materialized vertex pool, once the make pass ran.
    pub fn pool(&self) -> Option<PoolId> {
        self.pool
    }

    /// Egg vertex behind a chunk index, once the make pass ran.
    pub fn vertex_id(&self, vertex: u32) -> Option<VertexId> {
        self.vertex_ids.get(vertex as usize).copied()
    }

    /// Attach a vertex map delivered after this points chunk.
    ///
    /// UV maps get a per-vertex lookup built eagerly; other kinds are kept
    /// as delivered and served through [`Self::aux_map`].
    pub fn add_vmap(&mut self, vmap: &'a VertexMapChunk) {
        if vmap.kind == VertexMapKind::Uv && vmap.dimension >= 2 {
            let map = vmap
                .entries
                .iter()
                .map(|e| {
                    let u = e.values.first().copied().unwrap_or(0.0);
                    let v = e.values.get(1).copied().unwrap_or(0.0);
                    (e.vertex, Vec2::new(u, v))
                })
                .collect();
            self.uv_maps.insert(vmap.name.clone(), map);
        } else {
            self.aux_maps.push(vmap);
        }
    }

    /// UV of a vertex in the named UV map, if the map has an entry for it.
    pub fn uv(&self, name: &str, vertex: u32) -> Option<Vec2> {
        self.uv_maps.get(name)?.get(&vertex).copied()
    }

    /// A non-UV attribute map by kind and name.
    pub fn aux_map(&self, kind: VertexMapKind, name: &str) -> Option<&'a VertexMapChunk> {
        self.aux_maps
            .iter()
            .find(|m| m.kind == kind && m.name == name)
            .copied()
    }

    /// Make pass: create the vertex pool and its deduplicated vertices
    /// under the owning layer's group.
    pub fn make_egg(&mut self, egg: &mut EggData, group: GroupId, index: usize) {
        let pool = egg.create_vertex_pool(group, &format!("points{index}"));
        self.vertex_ids = self
            .chunk
            .positions
            .iter()
            .map(|&position| egg.add_vertex(pool, position))
            .collect();
        self.pool = Some(pool);
    }
}
