//! End-to-end chunk-stream to egg-graph scenarios.

use glam::{Vec2, Vec3, Vec4};

use lwo_egg::chunk::{
    Axis, Chunk, LayerChunk, PointsChunk, PolygonTagKind, PolygonTagsChunk, PolygonsChunk,
    ProjectionMode, SurfaceBlockChunk, SurfaceChunk, TagsChunk, VertexMapChunk, VertexMapKind,
};
use lwo_egg::convert::LwoToEggConverter;

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn triangle_points() -> PointsChunk {
    PointsChunk::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y])
}

fn tagged_triangle(surface: SurfaceChunk) -> Vec<Chunk> {
    vec![
        Chunk::Layer(LayerChunk::new(0, "scene")),
        Chunk::Points(triangle_points()),
        Chunk::Tags(TagsChunk::new(&["Red"])),
        Chunk::Polygons(PolygonsChunk::from_faces(&[&[0, 1, 2]])),
        Chunk::PolygonTags(PolygonTagsChunk::new(PolygonTagKind::Surface, vec![(0, 0)])),
        Chunk::Surface(surface),
    ]
}

#[test]
fn round_trip_single_triangle() {
    init_logging();
    let chunks = tagged_triangle(SurfaceChunk::new("Red").with_color(Vec3::new(1.0, 0.0, 0.0)));
    let mut converter = LwoToEggConverter::new();

    assert!(converter.convert(&chunks));
    assert!(converter.diagnostics().is_empty());

    let egg = converter.egg_data();
    assert_eq!(egg.num_groups(), 1);
    assert_eq!(egg.num_pools(), 1);
    assert_eq!(egg.num_primitives(), 1);

    let (_, pool) = egg.pools().next().unwrap();
    assert_eq!(pool.len(), 3);

    let (_, prim) = egg.primitives().next().unwrap();
    assert_eq!(prim.vertices.len(), 3);
    assert_eq!(prim.color, Some(Vec4::new(1.0, 0.0, 0.0, 1.0)));
    let material = egg.material(prim.material.expect("material bound"));
    assert_eq!(material.name, "Red");
    // default diffuse reflectivity is 1, so the material color is the
    // surface color
    assert_eq!(material.diffuse, Some(Vec4::new(1.0, 0.0, 0.0, 1.0)));
}

#[test]
fn surface_definition_order_does_not_matter() {
    init_logging();
    // same stream, surface first instead of last
    let mut chunks = tagged_triangle(SurfaceChunk::new("Red").with_color(Vec3::X));
    let surface = chunks.pop().unwrap();
    chunks.insert(0, surface);

    let mut converter = LwoToEggConverter::new();
    assert!(converter.convert(&chunks));

    let egg = converter.egg_data();
    let (_, prim) = egg.primitives().next().unwrap();
    assert!(prim.material.is_some());
    assert_eq!(prim.color, Some(Vec4::new(1.0, 0.0, 0.0, 1.0)));
}

#[test]
fn layer_parent_numbers_nest_groups() {
    init_logging();
    let chunks = vec![
        // the child arrives before its parent exists
        Chunk::Layer(LayerChunk::new(2, "wheel").with_parent(1)),
        Chunk::Layer(LayerChunk::new(1, "car")),
    ];
    let mut converter = LwoToEggConverter::new();

    assert!(converter.convert(&chunks));
    assert!(converter.diagnostics().is_empty());

    let egg = converter.egg_data();
    let car = egg.find_group("car").unwrap();
    let wheel = egg.find_group("wheel").unwrap();
    assert_eq!(egg.group(wheel).parent, Some(car));
    assert_eq!(egg.children(car), vec![wheel]);
}

#[test]
fn named_uv_map_applies_to_primitive() {
    init_logging();
    let mut vmap = VertexMapChunk::new(VertexMapKind::Uv, "base", 2);
    vmap.push(0, &[0.0, 0.0]);
    vmap.push(1, &[1.0, 0.0]);
    vmap.push(2, &[0.0, 1.0]);

    let chunks = vec![
        Chunk::Layer(LayerChunk::new(0, "scene")),
        Chunk::Points(triangle_points()),
        Chunk::VertexMap(vmap),
        Chunk::Tags(TagsChunk::new(&["Mapped"])),
        Chunk::Polygons(PolygonsChunk::from_faces(&[&[0, 1, 2]])),
        Chunk::PolygonTags(PolygonTagsChunk::new(PolygonTagKind::Surface, vec![(0, 0)])),
        Chunk::Surface(
            SurfaceChunk::new("Mapped").with_block(
                SurfaceBlockChunk::new(ProjectionMode::Uv, Axis::Z)
                    .with_image("bricks.png")
                    .with_uv_name("base"),
            ),
        ),
    ];
    let mut converter = LwoToEggConverter::new();
    assert!(converter.convert(&chunks));

    let egg = converter.egg_data();
    let (_, prim) = egg.primitives().next().unwrap();
    let texture = egg.texture(prim.texture.expect("texture bound"));
    assert_eq!(texture.filename, "bricks.png");
    assert_eq!(texture.uv_name.as_deref(), Some("base"));

    let pool = egg.pool(prim.pool);
    let uvs: Vec<_> = prim.vertices.iter().map(|&v| pool.vertex(v).uv).collect();
    assert_eq!(
        uvs,
        vec![
            Some(Vec2::new(0.0, 0.0)),
            Some(Vec2::new(1.0, 0.0)),
            Some(Vec2::new(0.0, 1.0)),
        ]
    );
}

#[test]
fn projected_uvs_cover_every_vertex() {
    init_logging();
    let chunks = tagged_triangle(
        SurfaceChunk::new("Red").with_block(
            SurfaceBlockChunk::new(ProjectionMode::Planar, Axis::Z)
                .with_image("bricks.png")
                .with_center(Vec3::ZERO),
        ),
    );
    let mut converter = LwoToEggConverter::new();
    assert!(converter.convert(&chunks));

    let egg = converter.egg_data();
    let (_, prim) = egg.primitives().next().unwrap();
    assert!(prim.texture.is_some());

    let pool = egg.pool(prim.pool);
    // the unused-vertex sweep pruned the uv-less originals
    assert_eq!(pool.len(), 3);
    assert!(pool.vertices().all(|v| v.uv.is_some()));
    let uv = pool.vertex(prim.vertices[1]).uv.unwrap();
    assert_eq!(uv, Vec2::new(1.5, 0.5));
}

#[test]
fn unknown_surface_leaves_primitive_unshaded() {
    init_logging();
    let chunks = vec![
        Chunk::Layer(LayerChunk::new(0, "scene")),
        Chunk::Points(triangle_points()),
        Chunk::Tags(TagsChunk::new(&["Missing"])),
        Chunk::Polygons(PolygonsChunk::from_faces(&[&[0, 1, 2]])),
        Chunk::PolygonTags(PolygonTagsChunk::new(PolygonTagKind::Surface, vec![(0, 0)])),
    ];
    let mut converter = LwoToEggConverter::new();

    // unresolved shading is a warning, not a failure
    assert!(converter.convert(&chunks));
    assert!(converter
        .diagnostics()
        .iter()
        .any(|l| l.contains("unknown surface Missing")));

    let egg = converter.egg_data();
    let (_, prim) = egg.primitives().next().unwrap();
    assert!(prim.material.is_none());
    assert!(prim.texture.is_none());
    assert!(prim.color.is_none());
}

#[test]
fn one_material_shared_across_polygons() {
    init_logging();
    let chunks = vec![
        Chunk::Layer(LayerChunk::new(0, "scene")),
        Chunk::Points(PointsChunk::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z])),
        Chunk::Tags(TagsChunk::new(&["Red"])),
        Chunk::Polygons(PolygonsChunk::from_faces(&[&[0, 1, 2], &[0, 2, 3]])),
        Chunk::PolygonTags(PolygonTagsChunk::new(
            PolygonTagKind::Surface,
            vec![(0, 0), (1, 0)],
        )),
        Chunk::Surface(SurfaceChunk::new("Red").with_color(Vec3::X)),
    ];
    let mut converter = LwoToEggConverter::new();
    assert!(converter.convert(&chunks));

    let egg = converter.egg_data();
    assert_eq!(egg.num_primitives(), 2);
    assert_eq!(egg.num_materials(), 1);
    let bindings: Vec<_> = egg.primitives().map(|(_, p)| p.material).collect();
    assert_eq!(bindings[0], bindings[1]);
    assert!(bindings[0].is_some());
}

#[test]
fn orphaned_geometry_reuses_one_generic_layer() {
    init_logging();
    let chunks = vec![
        Chunk::Points(triangle_points()),
        Chunk::Polygons(PolygonsChunk::from_faces(&[&[0, 1, 2]])),
        Chunk::Points(triangle_points()),
    ];
    let mut converter = LwoToEggConverter::new();

    assert!(converter.convert(&chunks));
    assert!(converter.diagnostics().is_empty());

    let egg = converter.egg_data();
    assert_eq!(egg.num_groups(), 1);
    assert_eq!(egg.num_pools(), 2);
    assert_eq!(egg.num_primitives(), 1);
}

#[test]
fn later_tag_table_does_not_retag_earlier_polygons() {
    init_logging();
    let chunks = vec![
        Chunk::Layer(LayerChunk::new(0, "scene")),
        Chunk::Points(triangle_points()),
        Chunk::Tags(TagsChunk::new(&["Red"])),
        Chunk::Polygons(PolygonsChunk::from_faces(&[&[0, 1, 2]])),
        Chunk::PolygonTags(PolygonTagsChunk::new(PolygonTagKind::Surface, vec![(0, 0)])),
        // replaces the pointer used for later resolution only
        Chunk::Tags(TagsChunk::new(&["Green"])),
        Chunk::Surface(SurfaceChunk::new("Red").with_color(Vec3::X)),
        Chunk::Surface(SurfaceChunk::new("Green").with_color(Vec3::Y)),
    ];
    let mut converter = LwoToEggConverter::new();
    assert!(converter.convert(&chunks));

    let egg = converter.egg_data();
    let (_, prim) = egg.primitives().next().unwrap();
    let material = egg.material(prim.material.expect("material bound"));
    assert_eq!(material.name, "Red");
}
