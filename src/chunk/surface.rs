//! Surface-definition chunk records.
//!
//! A surface is a named shading definition. Every attribute beyond the name
//! is optional in the stream; an absent field means the format-defined
//! default applies, not zero. The optional shader block carries texture and
//! projection settings.

use glam::Vec3;

/// Dominant axis of a texture projection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    /// Project along X.
    X,
    /// Project along Y.
    Y,
    /// Project along Z (default).
    #[default]
    Z,
}

impl Axis {
    /// Component index of this axis in a position vector.
    pub fn index(&self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Parse from the numeric axis code carried in the stream.
    pub fn parse(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }
}

/// Texture projection mode of a shader block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Flat projection along the dominant axis (default).
    #[default]
    Planar,
    /// Wrapped around the dominant axis.
    Cylindrical,
    /// Wrapped around the projection center.
    Spherical,
    /// Projected onto the best-aligned cube face.
    Cubic,
    /// Projected from the camera; not resolvable without a view.
    FrontProjection,
    /// Coordinates come from a named per-vertex UV map.
    Uv,
}

impl ProjectionMode {
    /// Parse from the numeric projection code carried in the stream.
    pub fn parse(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::Planar),
            1 => Some(Self::Cylindrical),
            2 => Some(Self::Spherical),
            3 => Some(Self::Cubic),
            4 => Some(Self::FrontProjection),
            5 => Some(Self::Uv),
            _ => None,
        }
    }
}

/// Texture/projection settings of a surface's shader block.
#[derive(Clone, Debug, Default)]
pub struct SurfaceBlockChunk {
    /// How UV coordinates are obtained for this surface.
    pub projection: ProjectionMode,
    /// Dominant axis for planar and cylindrical projections.
    pub axis: Axis,
    /// Projection center.
    pub center: Option<Vec3>,
    /// Projection scale; components default to 1 when absent.
    pub scale: Option<Vec3>,
    /// Image file the texture maps.
    pub image: Option<String>,
    /// Named UV map, for [`ProjectionMode::Uv`].
    pub uv_name: Option<String>,
}

impl SurfaceBlockChunk {
    /// Create a block with the given projection mode and axis.
    pub fn new(projection: ProjectionMode, axis: Axis) -> Self {
        Self {
            projection,
            axis,
            ..Self::default()
        }
    }

    /// Set the mapped image file.
    pub fn with_image(mut self, image: &str) -> Self {
        self.image = Some(image.to_string());
        self
    }

    /// Set the named UV map.
    pub fn with_uv_name(mut self, uv_name: &str) -> Self {
        self.uv_name = Some(uv_name.to_string());
        self
    }

    /// Set the projection center.
    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = Some(center);
        self
    }

    /// Set the projection scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }
}

/// A named shading definition.
///
/// `None` fields were not present in the record; the converter substitutes
/// the format-defined defaults when decoding.
#[derive(Clone, Debug, Default)]
pub struct SurfaceChunk {
    /// Surface name, referenced from tag tables.
    pub name: String,
    /// Base color.
    pub color: Option<Vec3>,
    /// Diffuse reflectivity.
    pub diffuse: Option<f32>,
    /// Self-illumination.
    pub luminosity: Option<f32>,
    /// Specular reflectivity.
    pub specular: Option<f32>,
    /// Mirror reflectivity.
    pub reflection: Option<f32>,
    /// Transparency; 0 is opaque.
    pub transparency: Option<f32>,
    /// Light passing through the back side.
    pub translucency: Option<f32>,
    /// Crease threshold for normal smoothing, in radians.
    pub smooth_angle: Option<f32>,
    /// Render both sides of bound faces.
    pub backface: Option<bool>,
    /// Texture/projection settings.
    pub block: Option<SurfaceBlockChunk>,
}

impl SurfaceChunk {
    /// Create a surface record with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Set the base color.
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the diffuse reflectivity.
    pub fn with_diffuse(mut self, diffuse: f32) -> Self {
        self.diffuse = Some(diffuse);
        self
    }

    /// Set the self-illumination.
    pub fn with_luminosity(mut self, luminosity: f32) -> Self {
        self.luminosity = Some(luminosity);
        self
    }

    /// Set the specular reflectivity.
    pub fn with_specular(mut self, specular: f32) -> Self {
        self.specular = Some(specular);
        self
    }

    /// Set the transparency.
    pub fn with_transparency(mut self, transparency: f32) -> Self {
        self.transparency = Some(transparency);
        self
    }

    /// Set the smoothing crease threshold, in radians.
    pub fn with_smooth_angle(mut self, smooth_angle: f32) -> Self {
        self.smooth_angle = Some(smooth_angle);
        self
    }

    /// Mark the surface as double-sided.
    pub fn with_backface(mut self, backface: bool) -> Self {
        self.backface = Some(backface);
        self
    }

    /// Attach a shader block.
    pub fn with_block(mut self, block: SurfaceBlockChunk) -> Self {
        self.block = Some(block);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_mode_codes() {
        assert_eq!(ProjectionMode::parse(0), Some(ProjectionMode::Planar));
        assert_eq!(ProjectionMode::parse(3), Some(ProjectionMode::Cubic));
        assert_eq!(ProjectionMode::parse(5), Some(ProjectionMode::Uv));
        assert_eq!(ProjectionMode::parse(9), None);
    }

    #[test]
    fn test_axis_codes() {
        assert_eq!(Axis::parse(1), Some(Axis::Y));
        assert_eq!(Axis::parse(3), None);
        assert_eq!(Axis::Y.index(), 1);
    }

    #[test]
    fn test_surface_builder() {
        let surf = SurfaceChunk::new("Red")
            .with_color(Vec3::new(1.0, 0.0, 0.0))
            .with_block(SurfaceBlockChunk::new(ProjectionMode::Uv, Axis::Z).with_uv_name("base"));

        assert_eq!(surf.name, "Red");
        assert_eq!(surf.color, Some(Vec3::new(1.0, 0.0, 0.0)));
        assert!(surf.diffuse.is_none());
        assert_eq!(surf.block.unwrap().uv_name.as_deref(), Some("base"));
    }
}
