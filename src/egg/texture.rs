//! Texture records for the egg graph.

/// A texture bound to primitives in the egg graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EggTexture {
    /// Texture name; conventionally the surface name.
    pub name: String,
    /// Image file the texture maps.
    pub filename: String,
    /// Named UV set the texture reads, when not using generated coordinates.
    pub uv_name: Option<String>,
}

impl EggTexture {
    /// Create a texture record.
    pub fn new(name: &str, filename: &str) -> Self {
        Self {
            name: name.to_string(),
            filename: filename.to_string(),
            uv_name: None,
        }
    }

    /// Set the named UV set.
    pub fn with_uv_name(mut self, uv_name: &str) -> Self {
        self.uv_name = Some(uv_name.to_string());
        self
    }
}
