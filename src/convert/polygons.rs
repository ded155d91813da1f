//! Polygons wrapper: faces over a points table, and their surface bindings.

use std::collections::HashMap;

use tracing::debug;

use crate::chunk::{PolygonTagKind, PolygonTagsChunk, PolygonsChunk, TagsChunk};
use crate::egg::{EggData, PrimId};

use super::{Diagnostics, LwoPoints, LwoSurface};

/// Converter-side view of one polygons chunk.
pub struct LwoPolygons<'a> {
    chunk: &'a PolygonsChunk,
    /// Index of the owning points wrapper in collection order.
    points: usize,
    /// Tag table the surface bindings resolve against, captured when the
    /// first surface tag assignment arrived. A tag table appearing later in
    /// the stream does not retroactively re-tag these faces.
    tags: Option<&'a TagsChunk>,
    tag_of_face: HashMap<u32, u32>,
    /// One entry per face once the make pass ran; `None` for faces that
    /// could not be materialized.
    prims: Vec<Option<PrimId>>,
}

impl<'a> LwoPolygons<'a> {
    /// Wrap a polygons chunk owned by the given points wrapper.
    pub fn new(chunk: &'a PolygonsChunk, points: usize) -> Self {
        Self {
            chunk,
            points,
            tags: None,
            tag_of_face: HashMap::new(),
            prims: Vec::new(),
        }
    }

    /// Index of the owning points wrapper.
    pub fn points_index(&self) -> usize {
        self.points
    }

    /// Number of faces.
    pub fn len(&self) -> usize {
        self.chunk.len()
    }

    /// Check whether the wrapper has no faces.
    pub fn is_empty(&self) -> bool {
        self.chunk.is_empty()
    }

    /// Tag index bound to a face, once assigned.
    pub fn surface_tag(&self, face: u32) -> Option<u32> {
        self.tag_of_face.get(&face).copied()
    }

    /// Materialized primitive of a face, once the make pass ran.
    pub fn prim(&self, face: usize) -> Option<PrimId> {
        self.prims.get(face).copied().flatten()
    }

    /// Bind per-face tag assignments against the given tag table.
    ///
    /// Only surface assignments participate in shading; other kinds carry
    /// no egg counterpart.
    pub fn add_ptags(&mut self, ptags: &PolygonTagsChunk, tags: &'a TagsChunk) {
        if ptags.kind != PolygonTagKind::Surface {
            debug!("ignoring {:?} polygon tags", ptags.kind);
            return;
        }
        self.tags = Some(tags);
        for &(face, tag) in &ptags.assignments {
            self.tag_of_face.insert(face, tag);
        }
    }

    /// Make pass: create one primitive per face, referencing the owning
    /// pool's vertices. Shading is wired by the connect pass.
    pub fn make_egg(
        &mut self,
        egg: &mut EggData,
        points: &LwoPoints<'_>,
        diagnostics: &mut Diagnostics,
    ) {
        let Some(pool) = points.pool() else {
            return;
        };
        self.prims = Vec::with_capacity(self.chunk.len());
        for (face_index, face) in self.chunk.faces.iter().enumerate() {
            if face.is_empty() {
                self.prims.push(None);
                continue;
            }
            let vertices: Option<Vec<_>> = face.iter().map(|&v| points.vertex_id(v)).collect();
            match vertices {
                Some(vertices) => {
                    self.prims.push(Some(egg.create_primitive(pool, &vertices)));
                }
                None => {
                    diagnostics.warn(format!(
                        "Polygon {face_index} references a vertex outside its points chunk."
                    ));
                    self.prims.push(None);
                }
            }
        }
    }

    /// Connect pass: resolve each face's tag through the bound tag table to
    /// a surface and apply its shading. Unresolvable faces are left
    /// unshaded.
    pub fn connect_egg(
        &mut self,
        egg: &mut EggData,
        points: &LwoPoints<'_>,
        surfaces: &mut HashMap<String, LwoSurface<'a>>,
        diagnostics: &mut Diagnostics,
    ) {
        let mut crease_angle: Option<f32> = None;
        for (face_index, face) in self.chunk.faces.iter().enumerate() {
            let Some(prim) = self.prim(face_index) else {
                continue;
            };
            let Some(tag) = self.surface_tag(face_index as u32) else {
                continue;
            };
            let Some(tags) = self.tags else {
                continue;
            };
            let Some(name) = tags.name(tag) else {
                diagnostics.warn(format!(
                    "Polygon {face_index} tag index {tag} is outside the tag table."
                ));
                continue;
            };
            let Some(surface) = surfaces.get_mut(name) else {
                diagnostics.warn(format!("Polygon tagged with unknown surface {name}."));
                continue;
            };
            surface.apply(egg, prim, face, points, &mut crease_angle);
        }

        if let Some(angle) = crease_angle {
            if let Some(pool) = points.pool() {
                let group = egg.pool(pool).group;
                let angle = egg
                    .group(group)
                    .crease_angle
                    .map_or(angle, |existing| existing.max(angle));
                egg.set_crease_angle(group, angle);
            }
        }
    }
}
