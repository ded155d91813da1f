//! Material records for the egg graph.

use glam::{Vec3, Vec4};

/// A material bound to primitives in the egg graph.
///
/// `None` channels were not present on the surface that produced the
/// material and keep the renderer's own defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EggMaterial {
    /// Material name; conventionally the surface name.
    pub name: String,
    /// Diffuse color with alpha.
    pub diffuse: Option<Vec4>,
    /// Self-illumination color.
    pub emission: Option<Vec3>,
    /// Specular color.
    pub specular: Option<Vec3>,
    /// Mirror reflectivity.
    pub reflection: Option<f32>,
    /// Light passing through the back side.
    pub translucency: Option<f32>,
}

impl EggMaterial {
    /// Create an empty material with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Set the diffuse color.
    pub fn with_diffuse(mut self, diffuse: Vec4) -> Self {
        self.diffuse = Some(diffuse);
        self
    }

    /// Set the emission color.
    pub fn with_emission(mut self, emission: Vec3) -> Self {
        self.emission = Some(emission);
        self
    }

    /// Set the specular color.
    pub fn with_specular(mut self, specular: Vec3) -> Self {
        self.specular = Some(specular);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_builder() {
        let mat = EggMaterial::new("Red").with_diffuse(Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(mat.name, "Red");
        assert_eq!(mat.diffuse, Some(Vec4::new(1.0, 0.0, 0.0, 1.0)));
        assert!(mat.emission.is_none());
    }
}
