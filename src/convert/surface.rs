//! Surface wrapper: decoded shading attributes and their lazy egg bindings.

use std::collections::HashMap;

use bitflags::bitflags;
use glam::{Vec2, Vec3};
use tracing::debug;

use crate::chunk::{ProjectionMode, SurfaceChunk};
use crate::egg::{EggData, EggMaterial, EggTexture, MaterialId, PrimId, TextureId};
use crate::util::centroid_of;

use super::{LwoPoints, UvKey, UvProjection};

bitflags! {
    /// Which optional attributes the surface definition carried.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SurfaceFlags: u32 {
        const COLOR        = 0x0001;
        const DIFFUSE      = 0x0002;
        const LUMINOSITY   = 0x0004;
        const SPECULAR     = 0x0008;
        const REFLECTION   = 0x0010;
        const TRANSPARENCY = 0x0020;
        const TRANSLUCENCY = 0x0040;
        const SMOOTH_ANGLE = 0x0080;
        const BACKFACE     = 0x0100;
    }
}

/// Base color of surfaces that do not declare one.
pub const DEFAULT_COLOR: Vec3 = Vec3::new(0.78431, 0.78431, 0.78431);

/// A lazily computed handle: never computed yet, or computed and possibly
/// absent. Once resolved, the cached handle is returned even if the
/// underlying attributes would now resolve differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cached<T> {
    Unresolved,
    Resolved(Option<T>),
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self::Unresolved
    }
}

/// Converter-side view of one surface definition.
///
/// Unset attributes take the format-defined defaults, not zero: a light
/// gray base color, full diffuse reflectivity, everything else off.
pub struct LwoSurface<'a> {
    chunk: &'a SurfaceChunk,
    flags: SurfaceFlags,
    color: Vec3,
    diffuse: f32,
    luminosity: f32,
    specular: f32,
    reflection: f32,
    transparency: f32,
    translucency: f32,
    smooth_angle: f32,
    backface: bool,
    projection: Option<UvProjection>,
    center: Option<Vec3>,
    scale: Vec3,
    material: Cached<MaterialId>,
    texture: Cached<TextureId>,
    uv_cache: HashMap<UvKey, Vec2>,
}

impl<'a> LwoSurface<'a> {
    /// Wrap a surface chunk, decoding attribute presence into flags.
    pub fn new(chunk: &'a SurfaceChunk) -> Self {
        let mut flags = SurfaceFlags::empty();
        flags.set(SurfaceFlags::COLOR, chunk.color.is_some());
        flags.set(SurfaceFlags::DIFFUSE, chunk.diffuse.is_some());
        flags.set(SurfaceFlags::LUMINOSITY, chunk.luminosity.is_some());
        flags.set(SurfaceFlags::SPECULAR, chunk.specular.is_some());
        flags.set(SurfaceFlags::REFLECTION, chunk.reflection.is_some());
        flags.set(SurfaceFlags::TRANSPARENCY, chunk.transparency.is_some());
        flags.set(SurfaceFlags::TRANSLUCENCY, chunk.translucency.is_some());
        flags.set(SurfaceFlags::SMOOTH_ANGLE, chunk.smooth_angle.is_some());
        flags.set(SurfaceFlags::BACKFACE, chunk.backface.is_some());

        let projection = chunk.block.as_ref().and_then(|block| match block.projection {
            ProjectionMode::Planar => Some(UvProjection::Planar { axis: block.axis }),
            ProjectionMode::Cylindrical => Some(UvProjection::Cylindrical { axis: block.axis }),
            ProjectionMode::Spherical => Some(UvProjection::Spherical { axis: block.axis }),
            ProjectionMode::Cubic => Some(UvProjection::Cubic),
            ProjectionMode::FrontProjection => {
                debug!(
                    "surface {} uses front projection, which has no static equivalent",
                    chunk.name
                );
                None
            }
            ProjectionMode::Uv => None,
        });

        Self {
            chunk,
            flags,
            color: chunk.color.unwrap_or(DEFAULT_COLOR),
            diffuse: chunk.diffuse.unwrap_or(1.0),
            luminosity: chunk.luminosity.unwrap_or(0.0),
            specular: chunk.specular.unwrap_or(0.0),
            reflection: chunk.reflection.unwrap_or(0.0),
            transparency: chunk.transparency.unwrap_or(0.0),
            translucency: chunk.translucency.unwrap_or(0.0),
            smooth_angle: chunk.smooth_angle.unwrap_or(0.0),
            backface: chunk.backface.unwrap_or(false),
            projection,
            center: chunk.block.as_ref().and_then(|b| b.center),
            scale: chunk
                .block
                .as_ref()
                .and_then(|b| b.scale)
                .map_or(Vec3::ONE, sanitize_scale),
            material: Cached::default(),
            texture: Cached::default(),
            uv_cache: HashMap::new(),
        }
    }

    /// Surface name, as referenced from tag tables.
    pub fn name(&self) -> &str {
        &self.chunk.name
    }

    /// Decoded attribute-presence flags.
    pub fn flags(&self) -> SurfaceFlags {
        self.flags
    }

    /// Decoded base color.
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Check whether bound faces render both sides.
    pub fn is_two_sided(&self) -> bool {
        self.backface
    }

    /// Check whether UVs come from a named per-vertex map.
    pub fn has_named_uvs(&self) -> bool {
        self.uv_name().is_some()
    }

    /// Name of the per-vertex UV map the surface reads, if any.
    pub fn uv_name(&self) -> Option<&str> {
        let block = self.chunk.block.as_ref()?;
        if block.projection == ProjectionMode::Uv {
            block.uv_name.as_deref()
        } else {
            None
        }
    }

    /// The material for this surface, built on first request.
    pub fn material(&mut self, egg: &mut EggData) -> Option<MaterialId> {
        if let Cached::Resolved(handle) = self.material {
            return handle;
        }
        let handle = self.build_material(egg);
        self.material = Cached::Resolved(handle);
        handle
    }

    fn build_material(&self, egg: &mut EggData) -> Option<MaterialId> {
        let shaded = SurfaceFlags::COLOR
            | SurfaceFlags::DIFFUSE
            | SurfaceFlags::LUMINOSITY
            | SurfaceFlags::SPECULAR;
        if !self.flags.intersects(shaded) {
            return None;
        }
        let mut material = EggMaterial::new(self.name());
        material.diffuse = Some((self.color * self.diffuse).extend(1.0 - self.transparency));
        if self.flags.contains(SurfaceFlags::LUMINOSITY) {
            material.emission = Some(self.color * self.luminosity);
        }
        if self.flags.contains(SurfaceFlags::SPECULAR) {
            material.specular = Some(Vec3::splat(self.specular));
        }
        if self.flags.contains(SurfaceFlags::REFLECTION) {
            material.reflection = Some(self.reflection);
        }
        if self.flags.contains(SurfaceFlags::TRANSLUCENCY) {
            material.translucency = Some(self.translucency);
        }
        Some(egg.add_material(material))
    }

    /// The texture for this surface, built on first request.
    pub fn texture(&mut self, egg: &mut EggData) -> Option<TextureId> {
        if let Cached::Resolved(handle) = self.texture {
            return handle;
        }
        let handle = self.build_texture(egg);
        self.texture = Cached::Resolved(handle);
        handle
    }

    fn build_texture(&self, egg: &mut EggData) -> Option<TextureId> {
        let block = self.chunk.block.as_ref()?;
        let image = block.image.as_deref()?;
        let mut texture = EggTexture::new(self.name(), image);
        if self.has_named_uvs() {
            texture.uv_name = block.uv_name.clone();
        }
        Some(egg.add_texture(texture))
    }

    /// Apply this surface's shading to one primitive: color, sidedness,
    /// material and texture bindings, UV coordinates, and the crease angle
    /// the owning group uses for normal generation.
    pub fn apply(
        &mut self,
        egg: &mut EggData,
        prim: PrimId,
        face: &[u32],
        points: &LwoPoints<'_>,
        crease_angle: &mut Option<f32>,
    ) {
        if self
            .flags
            .intersects(SurfaceFlags::COLOR | SurfaceFlags::TRANSPARENCY)
        {
            egg.set_color(prim, self.color.extend(1.0 - self.transparency));
        }
        if self.backface {
            egg.set_two_sided(prim, true);
        }
        if self.flags.contains(SurfaceFlags::SMOOTH_ANGLE) {
            let angle = self.smooth_angle;
            *crease_angle = Some(crease_angle.map_or(angle, |a| a.max(angle)));
        }
        if let Some(material) = self.material(egg) {
            egg.bind_material(prim, material);
        }
        // only textured primitives need UV coordinates
        let Some(texture) = self.texture(egg) else {
            return;
        };
        egg.bind_texture(prim, texture);
        self.apply_uvs(egg, prim, face, points);
    }

    fn apply_uvs(&mut self, egg: &mut EggData, prim: PrimId, face: &[u32], points: &LwoPoints<'_>) {
        if let Some(name) = self.uv_name() {
            for (slot, &vertex) in face.iter().enumerate() {
                if let Some(uv) = points.uv(name, vertex) {
                    egg.set_uv(prim, slot, uv);
                }
            }
            return;
        }
        let Some(projection) = self.projection else {
            return;
        };
        let centroid = self.center.unwrap_or_else(|| {
            let positions: Vec<Vec3> = face.iter().filter_map(|&v| points.position(v)).collect();
            centroid_of(&positions)
        });
        for (slot, &vertex) in face.iter().enumerate() {
            let Some(position) = points.position(vertex) else {
                continue;
            };
            let uv = self.project_cached(projection, position, centroid);
            egg.set_uv(prim, slot, uv);
        }
    }

    /// Generated coordinates are computed once per (position, centroid) and
    /// reused on every later request against this surface.
    fn project_cached(&mut self, projection: UvProjection, position: Vec3, centroid: Vec3) -> Vec2 {
        let key = UvKey::new(position, centroid);
        if let Some(&uv) = self.uv_cache.get(&key) {
            return uv;
        }
        let uv = projection.project(position, centroid, self.scale);
        self.uv_cache.insert(key, uv);
        uv
    }
}

fn sanitize_scale(scale: Vec3) -> Vec3 {
    // a zero component would collapse the projection
    Vec3::new(
        if scale.x == 0.0 { 1.0 } else { scale.x },
        if scale.y == 0.0 { 1.0 } else { scale.y },
        if scale.z == 0.0 { 1.0 } else { scale.z },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{Axis, PointsChunk, SurfaceBlockChunk};
    use crate::convert::LayerRef;
    use glam::Vec4;

    #[test]
    fn test_flag_decoding_and_defaults() {
        let chunk = SurfaceChunk::new("Red")
            .with_color(Vec3::new(1.0, 0.0, 0.0))
            .with_transparency(0.25);
        let surface = LwoSurface::new(&chunk);

        assert!(surface.flags().contains(SurfaceFlags::COLOR));
        assert!(surface.flags().contains(SurfaceFlags::TRANSPARENCY));
        assert!(!surface.flags().contains(SurfaceFlags::DIFFUSE));
        // unset attributes take the format defaults
        assert_eq!(surface.diffuse, 1.0);
        assert_eq!(surface.luminosity, 0.0);
        assert!(!surface.is_two_sided());

        let bare = SurfaceChunk::new("Bare");
        let surface = LwoSurface::new(&bare);
        assert!(surface.flags().is_empty());
        assert_eq!(surface.color(), DEFAULT_COLOR);
    }

    #[test]
    fn test_material_memoized() {
        let chunk = SurfaceChunk::new("Red").with_color(Vec3::new(1.0, 0.0, 0.0));
        let mut surface = LwoSurface::new(&chunk);
        let mut egg = EggData::new();

        let first = surface.material(&mut egg);
        let second = surface.material(&mut egg);

        assert_eq!(first, second);
        assert!(first.is_some());
        assert_eq!(egg.num_materials(), 1);
        let material = egg.material(first.unwrap());
        assert_eq!(material.diffuse, Some(Vec4::new(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_material_absent_without_shading_flags() {
        let chunk = SurfaceChunk::new("Bare").with_backface(true);
        let mut surface = LwoSurface::new(&chunk);
        let mut egg = EggData::new();

        assert_eq!(surface.material(&mut egg), None);
        assert_eq!(surface.material(&mut egg), None);
        assert_eq!(egg.num_materials(), 0);
    }

    #[test]
    fn test_texture_requires_image() {
        let chunk = SurfaceChunk::new("Plain")
            .with_block(SurfaceBlockChunk::new(ProjectionMode::Planar, Axis::Z));
        let mut surface = LwoSurface::new(&chunk);
        let mut egg = EggData::new();
        assert_eq!(surface.texture(&mut egg), None);

        let chunk = SurfaceChunk::new("Mapped").with_block(
            SurfaceBlockChunk::new(ProjectionMode::Planar, Axis::Z).with_image("bricks.png"),
        );
        let mut surface = LwoSurface::new(&chunk);
        let texture = surface.texture(&mut egg).unwrap();
        assert_eq!(egg.texture(texture).filename, "bricks.png");
        assert_eq!(egg.num_textures(), 1);

        // second request is the cached handle
        assert_eq!(surface.texture(&mut egg), Some(texture));
        assert_eq!(egg.num_textures(), 1);
    }

    #[test]
    fn test_uv_generation_idempotent() {
        let chunk = SurfaceChunk::new("Mapped").with_block(
            SurfaceBlockChunk::new(ProjectionMode::Planar, Axis::Z).with_image("bricks.png"),
        );
        let mut surface = LwoSurface::new(&chunk);
        let mut egg = EggData::new();
        let group = egg.create_group(None, "layer");

        let positions = PointsChunk::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        let mut points = LwoPoints::new(&positions, LayerRef::Generic);
        points.make_egg(&mut egg, group, 0);
        let pool = points.pool().unwrap();
        let verts: Vec<_> = (0..3).map(|i| points.vertex_id(i).unwrap()).collect();
        let prim = egg.create_primitive(pool, &verts);

        let mut crease = None;
        surface.apply(&mut egg, prim, &[0, 1, 2], &points, &mut crease);
        let cached = surface.uv_cache.len();
        let first: Vec<_> = egg
            .primitive(prim)
            .vertices
            .iter()
            .map(|&v| egg.pool(pool).vertex(v).uv)
            .collect();

        surface.apply(&mut egg, prim, &[0, 1, 2], &points, &mut crease);
        let second: Vec<_> = egg
            .primitive(prim)
            .vertices
            .iter()
            .map(|&v| egg.pool(pool).vertex(v).uv)
            .collect();

        assert_eq!(first, second);
        assert_eq!(surface.uv_cache.len(), cached);
        assert!(first.iter().all(Option::is_some));
    }

    #[test]
    fn test_crease_angle_keeps_maximum() {
        let sharp = SurfaceChunk::new("Sharp").with_smooth_angle(0.5);
        let smooth = SurfaceChunk::new("Smooth").with_smooth_angle(1.2);
        let mut egg = EggData::new();
        let group = egg.create_group(None, "layer");
        let positions = PointsChunk::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        let mut points = LwoPoints::new(&positions, LayerRef::Generic);
        points.make_egg(&mut egg, group, 0);
        let verts: Vec<_> = (0..3).map(|i| points.vertex_id(i).unwrap()).collect();
        let prim = egg.create_primitive(points.pool().unwrap(), &verts);

        let mut crease = None;
        LwoSurface::new(&sharp).apply(&mut egg, prim, &[0, 1, 2], &points, &mut crease);
        LwoSurface::new(&smooth).apply(&mut egg, prim, &[0, 1, 2], &points, &mut crease);
        LwoSurface::new(&sharp).apply(&mut egg, prim, &[0, 1, 2], &points, &mut crease);

        assert_eq!(crease, Some(1.2));
    }
}
