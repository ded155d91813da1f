//! Geometry and tag chunk records.

use glam::Vec3;
use smallvec::SmallVec;

use super::SurfaceChunk;

/// Vertex indices of one face. Almost all faces are triangles or quads.
pub type FaceIndices = SmallVec<[u32; 4]>;

/// One decoded record from a LightWave object stream.
#[derive(Clone, Debug)]
pub enum Chunk {
    /// A named grouping level.
    Layer(LayerChunk),
    /// A vertex-position table.
    Points(PointsChunk),
    /// A named per-vertex attribute map.
    VertexMap(VertexMapChunk),
    /// A flat ordered list of names referenced by index.
    Tags(TagsChunk),
    /// A set of faces referencing the preceding points.
    Polygons(PolygonsChunk),
    /// Per-face tag assignments against the current tag table.
    PolygonTags(PolygonTagsChunk),
    /// A named shading definition.
    Surface(SurfaceChunk),
}

/// A named grouping level in the source model.
#[derive(Clone, Debug, Default)]
pub struct LayerChunk {
    /// Layer number. Need not be contiguous across the stream.
    pub number: u32,
    /// Raw layer flag word.
    pub flags: u16,
    /// Pivot point of the layer.
    pub pivot: Vec3,
    /// Layer name.
    pub name: String,
    /// Number of the parent layer, if the layer declares one.
    pub parent: Option<u32>,
}

impl LayerChunk {
    /// Create a layer record with the given number and name.
    pub fn new(number: u32, name: &str) -> Self {
        Self {
            number,
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Set the parent layer number.
    pub fn with_parent(mut self, parent: u32) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the pivot point.
    pub fn with_pivot(mut self, pivot: Vec3) -> Self {
        self.pivot = pivot;
        self
    }
}

/// A vertex-position table.
#[derive(Clone, Debug, Default)]
pub struct PointsChunk {
    /// Ordered vertex positions.
    pub positions: Vec<Vec3>,
}

impl PointsChunk {
    /// Create a points record from positions.
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self { positions }
    }

    /// Number of positions in the table.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position at the given vertex index.
    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }
}

/// Kind of a per-vertex attribute map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexMapKind {
    /// UV texture coordinates (TXUV).
    Uv,
    /// Skinning or deformation weights (WGHT).
    Weight,
    /// Morph target offsets (MORF).
    Morph,
    /// Per-vertex RGB color.
    Rgb,
    /// Per-vertex RGBA color.
    Rgba,
}

impl VertexMapKind {
    /// Parse from the four-character type tag carried in the stream.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "TXUV" => Some(Self::Uv),
            "WGHT" => Some(Self::Weight),
            "MORF" => Some(Self::Morph),
            "RGB " => Some(Self::Rgb),
            "RGBA" => Some(Self::Rgba),
            _ => None,
        }
    }

    /// The four-character type tag for this kind.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Uv => "TXUV",
            Self::Weight => "WGHT",
            Self::Morph => "MORF",
            Self::Rgb => "RGB ",
            Self::Rgba => "RGBA",
        }
    }
}

/// One sparse entry of a vertex map: a vertex index and its values.
#[derive(Clone, Debug)]
pub struct VertexMapEntry {
    /// Index into the owning points table.
    pub vertex: u32,
    /// Attribute values; `dimension` of them.
    pub values: SmallVec<[f32; 4]>,
}

/// A named per-vertex attribute map.
///
/// Entries are sparse: vertices without an entry have no value in this map.
#[derive(Clone, Debug)]
pub struct VertexMapChunk {
    /// Kind of attribute the map carries.
    pub kind: VertexMapKind,
    /// Map name, e.g. the UV set name a surface refers to.
    pub name: String,
    /// Number of values per entry.
    pub dimension: usize,
    /// Sparse per-vertex entries.
    pub entries: Vec<VertexMapEntry>,
}

impl VertexMapChunk {
    /// Create a vertex map record.
    pub fn new(kind: VertexMapKind, name: &str, dimension: usize) -> Self {
        Self {
            kind,
            name: name.to_string(),
            dimension,
            entries: Vec::new(),
        }
    }

    /// Append an entry for the given vertex.
    pub fn push(&mut self, vertex: u32, values: &[f32]) {
        self.entries.push(VertexMapEntry {
            vertex,
            values: SmallVec::from_slice(values),
        });
    }

    /// Values for the given vertex, if the map has an entry for it.
    pub fn value_for(&self, vertex: u32) -> Option<&[f32]> {
        self.entries
            .iter()
            .find(|e| e.vertex == vertex)
            .map(|e| e.values.as_slice())
    }
}

/// A flat ordered list of names referenced by index (typically surface names).
#[derive(Clone, Debug, Default)]
pub struct TagsChunk {
    /// The names, in tag-index order.
    pub names: Vec<String>,
}

impl TagsChunk {
    /// Create a tag table from names.
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Name at the given tag index.
    pub fn name(&self, index: u32) -> Option<&str> {
        self.names.get(index as usize).map(String::as_str)
    }

    /// Number of names in the table.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A set of faces referencing the preceding points table.
#[derive(Clone, Debug, Default)]
pub struct PolygonsChunk {
    /// Per-face vertex-index lists, in face order.
    pub faces: Vec<FaceIndices>,
}

impl PolygonsChunk {
    /// Create a polygons record from per-face index lists.
    pub fn new(faces: Vec<FaceIndices>) -> Self {
        Self { faces }
    }

    /// Build from plain slices; convenient for synthetic streams.
    pub fn from_faces(faces: &[&[u32]]) -> Self {
        Self {
            faces: faces.iter().map(|f| FaceIndices::from_slice(f)).collect(),
        }
    }

    /// Number of faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Check whether the record has no faces.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Vertex indices of the face at the given index.
    pub fn face(&self, index: usize) -> Option<&[u32]> {
        self.faces.get(index).map(|f| f.as_slice())
    }
}

/// Kind of a per-face tag assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolygonTagKind {
    /// Binds faces to surface names (SURF).
    Surface,
    /// Groups faces into named parts (PART).
    Part,
    /// Assigns faces to smoothing groups (SMGP).
    SmoothingGroup,
}

impl PolygonTagKind {
    /// Parse from the four-character type tag carried in the stream.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "SURF" => Some(Self::Surface),
            "PART" => Some(Self::Part),
            "SMGP" => Some(Self::SmoothingGroup),
            _ => None,
        }
    }
}

/// Per-face tag assignments against the current tag table.
#[derive(Clone, Debug)]
pub struct PolygonTagsChunk {
    /// What the tag indices mean.
    pub kind: PolygonTagKind,
    /// (face index, tag index) pairs.
    pub assignments: Vec<(u32, u32)>,
}

impl PolygonTagsChunk {
    /// Create a tag-assignment record.
    pub fn new(kind: PolygonTagKind, assignments: Vec<(u32, u32)>) -> Self {
        Self { kind, assignments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_map_kind_tags() {
        assert_eq!(VertexMapKind::parse("TXUV"), Some(VertexMapKind::Uv));
        assert_eq!(VertexMapKind::parse("WGHT"), Some(VertexMapKind::Weight));
        assert_eq!(VertexMapKind::parse("QUUX"), None);
        assert_eq!(VertexMapKind::Uv.as_tag(), "TXUV");
        assert_eq!(VertexMapKind::Rgb.as_tag(), "RGB ");
    }

    #[test]
    fn test_vertex_map_lookup() {
        let mut vmap = VertexMapChunk::new(VertexMapKind::Weight, "arm", 1);
        vmap.push(0, &[0.25]);
        vmap.push(7, &[1.0]);

        assert_eq!(vmap.value_for(7), Some(&[1.0][..]));
        assert_eq!(vmap.value_for(3), None);
    }

    #[test]
    fn test_tags_lookup() {
        let tags = TagsChunk::new(&["Red", "Green"]);
        assert_eq!(tags.name(1), Some("Green"));
        assert_eq!(tags.name(2), None);
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_polygons_faces() {
        let polys = PolygonsChunk::from_faces(&[&[0, 1, 2], &[2, 1, 3, 0]]);
        assert_eq!(polys.len(), 2);
        assert_eq!(polys.face(0), Some(&[0, 1, 2][..]));
        assert_eq!(polys.face(1).map(<[u32]>::len), Some(4));
        assert_eq!(polys.face(2), None);
    }
}
