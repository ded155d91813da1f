//! The egg scene-graph arena.
//!
//! Groups, vertex pools, and primitives live in index-addressed arenas and
//! are referenced through copyable handles. Vertices within a pool are
//! deduplicated on identical (position, uv); a final
//! [`EggData::remove_unused_vertices`] sweep prunes every pool vertex no
//! primitive references.

use std::collections::HashMap;

use glam::{Vec2, Vec3, Vec4};

use super::{EggMaterial, EggTexture};

/// Handle to a group node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

/// Handle to a vertex pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolId(usize);

/// Handle to a vertex within its pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexId(usize);

/// Handle to a primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrimId(usize);

/// Handle to a texture record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(usize);

/// Handle to a material record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(usize);

/// Dedup key over the exact bit patterns of a vertex's attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct VertexKey {
    pos: [u32; 3],
    uv: Option<[u32; 2]>,
}

impl VertexKey {
    fn new(pos: Vec3, uv: Option<Vec2>) -> Self {
        Self {
            pos: [pos.x.to_bits(), pos.y.to_bits(), pos.z.to_bits()],
            uv: uv.map(|uv| [uv.x.to_bits(), uv.y.to_bits()]),
        }
    }
}

/// A group node in the scene hierarchy.
#[derive(Clone, Debug)]
pub struct EggGroup {
    /// Group name.
    pub name: String,
    /// Parent group; `None` for top-level groups.
    pub parent: Option<GroupId>,
    /// Translation applied to the group's contents.
    pub translate: Option<Vec3>,
    /// Crease threshold for normal smoothing, in radians.
    pub crease_angle: Option<f32>,
}

/// One vertex of a pool.
#[derive(Clone, Debug)]
pub struct EggVertex {
    /// Vertex position.
    pub position: Vec3,
    /// UV coordinates, once shading assigned them.
    pub uv: Option<Vec2>,
}

/// A vertex pool owned by a group.
#[derive(Clone, Debug)]
pub struct EggVertexPool {
    /// Pool name.
    pub name: String,
    /// Owning group.
    pub group: GroupId,
    vertices: Vec<EggVertex>,
    index: HashMap<VertexKey, usize>,
}

impl EggVertexPool {
    fn new(name: String, group: GroupId) -> Self {
        Self {
            name,
            group,
            vertices: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Find-or-create the vertex with exactly these attributes.
    fn add(&mut self, position: Vec3, uv: Option<Vec2>) -> VertexId {
        let key = VertexKey::new(position, uv);
        if let Some(&i) = self.index.get(&key) {
            return VertexId(i);
        }
        let i = self.vertices.len();
        self.vertices.push(EggVertex { position, uv });
        self.index.insert(key, i);
        VertexId(i)
    }

    /// Number of vertices currently in the pool.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Check whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex behind a handle.
    pub fn vertex(&self, id: VertexId) -> &EggVertex {
        &self.vertices[id.0]
    }

    /// Iterate over the pool's vertices.
    pub fn vertices(&self) -> impl Iterator<Item = &EggVertex> {
        self.vertices.iter()
    }
}

/// A primitive referencing vertices of one pool.
#[derive(Clone, Debug)]
pub struct EggPrimitive {
    /// Pool the vertex handles index into.
    pub pool: PoolId,
    /// Ordered vertex handles forming the primitive.
    pub vertices: Vec<VertexId>,
    /// Flat color with alpha, when shading assigned one.
    pub color: Option<Vec4>,
    /// Bound material.
    pub material: Option<MaterialId>,
    /// Bound texture.
    pub texture: Option<TextureId>,
    /// Render both sides.
    pub two_sided: bool,
}

/// The materialized scene graph.
#[derive(Default)]
pub struct EggData {
    groups: Vec<EggGroup>,
    pools: Vec<EggVertexPool>,
    primitives: Vec<EggPrimitive>,
    textures: Vec<EggTexture>,
    materials: Vec<EggMaterial>,
}

impl EggData {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group under the given parent, or at top level.
    pub fn create_group(&mut self, parent: Option<GroupId>, name: &str) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(EggGroup {
            name: name.to_string(),
            parent,
            translate: None,
            crease_angle: None,
        });
        id
    }

    /// Reparent a group.
    pub fn set_group_parent(&mut self, group: GroupId, parent: GroupId) {
        self.groups[group.0].parent = Some(parent);
    }

    /// Set a group's translation.
    pub fn set_group_translate(&mut self, group: GroupId, translate: Vec3) {
        self.groups[group.0].translate = Some(translate);
    }

    /// Set a group's crease threshold for normal smoothing, in radians.
    pub fn set_crease_angle(&mut self, group: GroupId, angle: f32) {
        self.groups[group.0].crease_angle = Some(angle);
    }

    /// Create a vertex pool owned by the given group.
    pub fn create_vertex_pool(&mut self, group: GroupId, name: &str) -> PoolId {
        let id = PoolId(self.pools.len());
        self.pools.push(EggVertexPool::new(name.to_string(), group));
        id
    }

    /// Add a vertex to a pool, reusing any existing vertex at that position.
    pub fn add_vertex(&mut self, pool: PoolId, position: Vec3) -> VertexId {
        self.pools[pool.0].add(position, None)
    }

    /// Create a primitive over vertices of one pool.
    pub fn create_primitive(&mut self, pool: PoolId, vertices: &[VertexId]) -> PrimId {
        let id = PrimId(self.primitives.len());
        self.primitives.push(EggPrimitive {
            pool,
            vertices: vertices.to_vec(),
            color: None,
            material: None,
            texture: None,
            two_sided: false,
        });
        id
    }

    /// Set a primitive's flat color.
    pub fn set_color(&mut self, prim: PrimId, color: Vec4) {
        self.primitives[prim.0].color = Some(color);
    }

    /// Mark a primitive as double-sided.
    pub fn set_two_sided(&mut self, prim: PrimId, two_sided: bool) {
        self.primitives[prim.0].two_sided = two_sided;
    }

    /// Bind a material to a primitive.
    pub fn bind_material(&mut self, prim: PrimId, material: MaterialId) {
        self.primitives[prim.0].material = Some(material);
    }

    /// Bind a texture to a primitive.
    pub fn bind_texture(&mut self, prim: PrimId, texture: TextureId) {
        self.primitives[prim.0].texture = Some(texture);
    }

    /// Assign UV coordinates to one vertex slot of a primitive.
    ///
    /// The slot is repointed at the pool vertex carrying (same position,
    /// this uv), created on first use. The previously referenced vertex is
    /// left in place for other primitives; if nothing else references it,
    /// the final [`Self::remove_unused_vertices`] sweep prunes it.
    pub fn set_uv(&mut self, prim: PrimId, slot: usize, uv: Vec2) {
        let (pool, vertex) = {
            let prim = &self.primitives[prim.0];
            (prim.pool, prim.vertices[slot])
        };
        let position = self.pools[pool.0].vertex(vertex).position;
        let rebound = self.pools[pool.0].add(position, Some(uv));
        self.primitives[prim.0].vertices[slot] = rebound;
    }

    /// Register a texture record.
    pub fn add_texture(&mut self, texture: EggTexture) -> TextureId {
        let id = TextureId(self.textures.len());
        self.textures.push(texture);
        id
    }

    /// Register a material record.
    pub fn add_material(&mut self, material: EggMaterial) -> MaterialId {
        let id = MaterialId(self.materials.len());
        self.materials.push(material);
        id
    }

    /// Drop every pool vertex no primitive references. Returns the number of
    /// vertices removed.
    pub fn remove_unused_vertices(&mut self) -> usize {
        let mut used: Vec<Vec<bool>> = self
            .pools
            .iter()
            .map(|pool| vec![false; pool.vertices.len()])
            .collect();
        for prim in &self.primitives {
            for vertex in &prim.vertices {
                used[prim.pool.0][vertex.0] = true;
            }
        }

        let mut removed = 0;
        // old index -> new index per pool, None for dropped vertices
        let mut remaps: Vec<Vec<Option<usize>>> = Vec::with_capacity(self.pools.len());
        for (pool, used) in self.pools.iter_mut().zip(&used) {
            let old = std::mem::take(&mut pool.vertices);
            let mut remap = vec![None; old.len()];
            for (i, vertex) in old.into_iter().enumerate() {
                if used[i] {
                    remap[i] = Some(pool.vertices.len());
                    pool.vertices.push(vertex);
                } else {
                    removed += 1;
                }
            }
            pool.index = pool
                .vertices
                .iter()
                .enumerate()
                .map(|(i, v)| (VertexKey::new(v.position, v.uv), i))
                .collect();
            remaps.push(remap);
        }

        for prim in &mut self.primitives {
            let remap = &remaps[prim.pool.0];
            for vertex in &mut prim.vertices {
                if let Some(new) = remap[vertex.0] {
                    *vertex = VertexId(new);
                }
            }
        }
        removed
    }

    /// Number of groups in the graph.
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Group behind a handle.
    pub fn group(&self, id: GroupId) -> &EggGroup {
        &self.groups[id.0]
    }

    /// Iterate over (handle, group) pairs.
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &EggGroup)> {
        self.groups.iter().enumerate().map(|(i, g)| (GroupId(i), g))
    }

    /// First group with the given name.
    pub fn find_group(&self, name: &str) -> Option<GroupId> {
        self.groups.iter().position(|g| g.name == name).map(GroupId)
    }

    /// Child groups of the given group.
    pub fn children(&self, group: GroupId) -> Vec<GroupId> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.parent == Some(group))
            .map(|(i, _)| GroupId(i))
            .collect()
    }

    /// Number of vertex pools.
    pub fn num_pools(&self) -> usize {
        self.pools.len()
    }

    /// Pool behind a handle.
    pub fn pool(&self, id: PoolId) -> &EggVertexPool {
        &self.pools[id.0]
    }

    /// Iterate over (handle, pool) pairs.
    pub fn pools(&self) -> impl Iterator<Item = (PoolId, &EggVertexPool)> {
        self.pools.iter().enumerate().map(|(i, p)| (PoolId(i), p))
    }

    /// Number of primitives.
    pub fn num_primitives(&self) -> usize {
        self.primitives.len()
    }

    /// Primitive behind a handle.
    pub fn primitive(&self, id: PrimId) -> &EggPrimitive {
        &self.primitives[id.0]
    }

    /// Iterate over (handle, primitive) pairs.
    pub fn primitives(&self) -> impl Iterator<Item = (PrimId, &EggPrimitive)> {
        self.primitives
            .iter()
            .enumerate()
            .map(|(i, p)| (PrimId(i), p))
    }

    /// Number of texture records.
    pub fn num_textures(&self) -> usize {
        self.textures.len()
    }

    /// Texture behind a handle.
    pub fn texture(&self, id: TextureId) -> &EggTexture {
        &self.textures[id.0]
    }

    /// Number of material records.
    pub fn num_materials(&self) -> usize {
        self.materials.len()
    }

    /// Material behind a handle.
    pub fn material(&self, id: MaterialId) -> &EggMaterial {
        &self.materials[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_hierarchy() {
        let mut egg = EggData::new();
        let root = egg.create_group(None, "scene");
        let child = egg.create_group(Some(root), "limb");

        assert_eq!(egg.num_groups(), 2);
        assert_eq!(egg.group(child).parent, Some(root));
        assert_eq!(egg.children(root), vec![child]);
        assert_eq!(egg.find_group("limb"), Some(child));
        assert_eq!(egg.find_group("missing"), None);
    }

    #[test]
    fn test_vertex_dedup() {
        let mut egg = EggData::new();
        let group = egg.create_group(None, "scene");
        let pool = egg.create_vertex_pool(group, "points0");

        let a = egg.add_vertex(pool, Vec3::new(1.0, 2.0, 3.0));
        let b = egg.add_vertex(pool, Vec3::new(1.0, 2.0, 3.0));
        let c = egg.add_vertex(pool, Vec3::new(4.0, 5.0, 6.0));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(egg.pool(pool).len(), 2);
    }

    #[test]
    fn test_set_uv_rebinds_slot() {
        let mut egg = EggData::new();
        let group = egg.create_group(None, "scene");
        let pool = egg.create_vertex_pool(group, "points0");
        let verts: Vec<_> = [Vec3::ZERO, Vec3::X, Vec3::Y]
            .iter()
            .map(|&p| egg.add_vertex(pool, p))
            .collect();
        let prim = egg.create_primitive(pool, &verts);

        egg.set_uv(prim, 1, Vec2::new(0.5, 0.5));

        let rebound = egg.primitive(prim).vertices[1];
        assert_ne!(rebound, verts[1]);
        let vertex = egg.pool(pool).vertex(rebound);
        assert_eq!(vertex.position, Vec3::X);
        assert_eq!(vertex.uv, Some(Vec2::new(0.5, 0.5)));

        // same (position, uv) dedups back onto the same vertex
        egg.set_uv(prim, 1, Vec2::new(0.5, 0.5));
        assert_eq!(egg.primitive(prim).vertices[1], rebound);
    }

    #[test]
    fn test_remove_unused_vertices() {
        let mut egg = EggData::new();
        let group = egg.create_group(None, "scene");
        let pool = egg.create_vertex_pool(group, "points0");
        let a = egg.add_vertex(pool, Vec3::ZERO);
        let b = egg.add_vertex(pool, Vec3::X);
        let _unreferenced = egg.add_vertex(pool, Vec3::Y);
        let prim = egg.create_primitive(pool, &[a, b]);

        let removed = egg.remove_unused_vertices();

        assert_eq!(removed, 1);
        assert_eq!(egg.pool(pool).len(), 2);
        let kept: Vec<_> = egg
            .primitive(prim)
            .vertices
            .iter()
            .map(|&v| egg.pool(pool).vertex(v).position)
            .collect();
        assert_eq!(kept, vec![Vec3::ZERO, Vec3::X]);
    }

    #[test]
    fn test_remove_unused_after_uv_split() {
        let mut egg = EggData::new();
        let group = egg.create_group(None, "scene");
        let pool = egg.create_vertex_pool(group, "points0");
        let verts: Vec<_> = [Vec3::ZERO, Vec3::X, Vec3::Y]
            .iter()
            .map(|&p| egg.add_vertex(pool, p))
            .collect();
        let prim = egg.create_primitive(pool, &verts);
        for slot in 0..3 {
            egg.set_uv(prim, slot, Vec2::new(slot as f32, 0.0));
        }

        // the three original uv-less vertices are now unreferenced
        let removed = egg.remove_unused_vertices();
        assert_eq!(removed, 3);
        assert_eq!(egg.pool(pool).len(), 3);
        assert!(egg.pool(pool).vertices().all(|v| v.uv.is_some()));
    }
}
