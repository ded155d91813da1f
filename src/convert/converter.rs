//! The converter: one collection pass and two materialization passes.

use std::collections::HashMap;

use tracing::debug;

use crate::chunk::{Chunk, TagsChunk};
use crate::egg::EggData;
use crate::util::Error;

use super::{LayerRef, LwoLayer, LwoPoints, LwoPolygons, LwoSurface};

/// Sink for recoverable parse-quality warnings.
///
/// Lines are forwarded to the log and kept for inspection; none of them
/// abort the conversion.
#[derive(Debug, Default)]
pub struct Diagnostics {
    lines: Vec<String>,
}

impl Diagnostics {
    /// Record one warning line.
    pub fn warn(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::warn!("{line}");
        self.lines.push(line);
    }

    /// All recorded lines, in emission order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of recorded lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Converts a stream of decoded chunk records into an egg scene graph.
///
/// The structural relationships of the model — layer membership,
/// point-to-polygon ownership, polygon-to-surface binding — exist only
/// implicitly in the stream, via adjacency and numeric indices. A single
/// collection pass reconstructs them behind four cursors (current layer,
/// points, polygons, tag table); two further passes then materialize every
/// wrapper and wire the cross-references that may point at wrappers
/// collected later in the stream (a layer's parent number, a face's surface
/// binding), so the result does not depend on chunk order beyond the
/// cursors' own adjacency rules.
pub struct LwoToEggConverter<'a> {
    egg: EggData,
    diagnostics: Diagnostics,
    fatal: Option<Error>,
    generic_layer: Option<LwoLayer<'a>>,
    layers: Vec<Option<LwoLayer<'a>>>,
    points: Vec<LwoPoints<'a>>,
    polygons: Vec<LwoPolygons<'a>>,
    surfaces: HashMap<String, LwoSurface<'a>>,
}

impl Default for LwoToEggConverter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> LwoToEggConverter<'a> {
    /// Create a converter with an empty output graph.
    pub fn new() -> Self {
        Self {
            egg: EggData::new(),
            diagnostics: Diagnostics::default(),
            fatal: None,
            generic_layer: None,
            layers: Vec::new(),
            points: Vec::new(),
            polygons: Vec::new(),
            surfaces: HashMap::new(),
        }
    }

    /// Run the full pipeline over a chunk stream.
    ///
    /// Returns `true` unless a fatal error was raised; the graph built so
    /// far is available through [`Self::egg_data`] either way.
    pub fn convert(&mut self, chunks: &'a [Chunk]) -> bool {
        self.collect(chunks);
        debug!(
            "collected {} layer slots, {} points, {} polygons, {} surfaces",
            self.layers.len(),
            self.points.len(),
            self.polygons.len(),
            self.surfaces.len()
        );
        self.make_egg();
        self.connect_egg();
        let removed = self.egg.remove_unused_vertices();
        if removed > 0 {
            debug!("removed {removed} unused vertices");
        }
        self.fatal.is_none()
    }

    /// Walk the chunk stream once, instantiating and indexing wrappers.
    fn collect(&mut self, chunks: &'a [Chunk]) {
        let mut current_layer: Option<LayerRef> = None;
        let mut current_points: Option<usize> = None;
        let mut current_polygons: Option<usize> = None;
        let mut current_tags: Option<&'a TagsChunk> = None;

        for chunk in chunks {
            match chunk {
                Chunk::Layer(layer) => {
                    let number = layer.number as usize;
                    self.slot_layer(number);
                    if self.layers[number].is_some() {
                        self.diagnostics
                            .warn(format!("Multiple layers with number {}.", layer.number));
                    }
                    // overwriting releases any superseded wrapper before it
                    // can materialize
                    self.layers[number] = Some(LwoLayer::new(layer));
                    current_layer = Some(LayerRef::Numbered(layer.number));
                    current_points = None;
                    current_polygons = None;
                }
                Chunk::Points(points) => {
                    let layer = if let Some(layer) = current_layer {
                        layer
                    } else {
                        self.ensure_generic_layer();
                        current_layer = Some(LayerRef::Generic);
                        LayerRef::Generic
                    };
                    self.points.push(LwoPoints::new(points, layer));
                    current_points = Some(self.points.len() - 1);
                    current_polygons = None;
                }
                Chunk::VertexMap(vmap) => match current_points {
                    Some(pi) => self.points[pi].add_vmap(vmap),
                    None => self.diagnostics.warn(
                        "Vertex map chunk encountered without a preceding points chunk.",
                    ),
                },
                Chunk::Tags(tags) => {
                    current_tags = Some(tags);
                }
                Chunk::Polygons(polygons) => match current_points {
                    Some(pi) => {
                        self.polygons.push(LwoPolygons::new(polygons, pi));
                        current_polygons = Some(self.polygons.len() - 1);
                    }
                    None => self
                        .diagnostics
                        .warn("Polygon chunk encountered without a preceding points chunk."),
                },
                Chunk::PolygonTags(ptags) => match (current_polygons, current_tags) {
                    (None, _) => self.diagnostics.warn(
                        "Polygon tags chunk encountered without a preceding polygons chunk.",
                    ),
                    (_, None) => self
                        .diagnostics
                        .warn("Polygon tags chunk encountered without a preceding tags chunk."),
                    (Some(gi), Some(tags)) => self.polygons[gi].add_ptags(ptags, tags),
                },
                Chunk::Surface(surface) => {
                    if current_layer.is_none() {
                        self.ensure_generic_layer();
                        current_layer = Some(LayerRef::Generic);
                    }
                    if self.surfaces.contains_key(&surface.name) {
                        self.diagnostics
                            .warn(format!("Multiple surface definitions named {}.", surface.name));
                    } else {
                        self.surfaces
                            .insert(surface.name.clone(), LwoSurface::new(surface));
                    }
                }
            }
        }
    }

    /// Make pass: instantiate one output node per wrapper, in fixed
    /// traversal order, with no cross-wrapper links yet.
    fn make_egg(&mut self) {
        if let Some(layer) = self.generic_layer.as_mut() {
            layer.make_egg(&mut self.egg);
        }
        for layer in self.layers.iter_mut().flatten() {
            layer.make_egg(&mut self.egg);
        }

        for (index, points) in self.points.iter_mut().enumerate() {
            let group = match points.layer() {
                LayerRef::Generic => self.generic_layer.as_ref().and_then(LwoLayer::group),
                LayerRef::Numbered(number) => self
                    .layers
                    .get(number as usize)
                    .and_then(|slot| slot.as_ref())
                    .and_then(LwoLayer::group),
            };
            // collection guarantees the owning layer exists and was made above
            let Some(group) = group else { continue };
            points.make_egg(&mut self.egg, group, index);
        }

        for gi in 0..self.polygons.len() {
            let polygons = &mut self.polygons[gi];
            let points = &self.points[polygons.points_index()];
            polygons.make_egg(&mut self.egg, points, &mut self.diagnostics);
        }
    }

    /// Connect pass: same traversal order; wire group nesting and resolve
    /// every face's surface binding.
    fn connect_egg(&mut self) {
        self.connect_layers();
        for gi in 0..self.polygons.len() {
            let polygons = &mut self.polygons[gi];
            let points = &self.points[polygons.points_index()];
            polygons.connect_egg(
                &mut self.egg,
                points,
                &mut self.surfaces,
                &mut self.diagnostics,
            );
        }
    }

    /// Resolve declared parent numbers to group nesting. A parent chain
    /// that loops is cut where it closes and raises the sticky fatal flag.
    fn connect_layers(&mut self) {
        for number in 0..self.layers.len() {
            let Some(layer) = self.layers[number].as_ref() else {
                continue;
            };
            let Some(parent_number) = layer.parent() else {
                continue;
            };
            let Some(child_group) = layer.group() else {
                continue;
            };

            if self.parent_chain_cycles(number) {
                self.diagnostics.warn(format!(
                    "Cyclic parentage involving layer {number}; left at top level."
                ));
                if self.fatal.is_none() {
                    self.fatal = Some(Error::CyclicLayerParent(number as u32));
                }
                continue;
            }

            let parent_group = self
                .layers
                .get(parent_number as usize)
                .and_then(|slot| slot.as_ref())
                .and_then(LwoLayer::group);
            match parent_group {
                Some(parent_group) => self.egg.set_group_parent(child_group, parent_group),
                None => self.diagnostics.warn(format!(
                    "Layer {number} references nonexistent parent layer {parent_number}."
                )),
            }
        }
    }

    /// Walk the parent chain upward from `number`; true if it returns to
    /// `number`. The walk is bounded by the index size, so a loop further
    /// up the chain terminates without being charged to this layer.
    fn parent_chain_cycles(&self, number: usize) -> bool {
        let mut current = number;
        for _ in 0..=self.layers.len() {
            let Some(layer) = self.layers.get(current).and_then(|slot| slot.as_ref()) else {
                return false;
            };
            let Some(parent) = layer.parent() else {
                return false;
            };
            if parent as usize == number {
                return true;
            }
            current = parent as usize;
        }
        false
    }

    /// Grow the sparse layer index to hold an entry at `number`.
    fn slot_layer(&mut self, number: usize) {
        if self.layers.len() <= number {
            self.layers.resize_with(number + 1, || None);
        }
    }

    /// The generic layer adopts geometry appearing before any layer chunk.
    /// Created at most once; reused for every subsequent orphan.
    fn ensure_generic_layer(&mut self) {
        if self.generic_layer.is_none() {
            debug!("geometry before any layer chunk; creating the generic layer");
            self.generic_layer = Some(LwoLayer::generic());
        }
    }

    /// Layer wrapper stored at the given number, if any.
    pub fn layer(&self, number: u32) -> Option<&LwoLayer<'a>> {
        self.layers.get(number as usize).and_then(|slot| slot.as_ref())
    }

    /// The generic layer, if orphaned geometry forced one.
    pub fn generic_layer(&self) -> Option<&LwoLayer<'a>> {
        self.generic_layer.as_ref()
    }

    /// Number of slots in the sparse layer index, occupied or not.
    pub fn num_layer_slots(&self) -> usize {
        self.layers.len()
    }

    /// Collected points wrappers, in collection order.
    pub fn points(&self) -> &[LwoPoints<'a>] {
        &self.points
    }

    /// Collected polygons wrappers, in collection order.
    pub fn polygons(&self) -> &[LwoPolygons<'a>] {
        &self.polygons
    }

    /// Surface wrapper registered under the given name, if any.
    pub fn surface(&self, name: &str) -> Option<&LwoSurface<'a>> {
        self.surfaces.get(name)
    }

    /// The output graph built so far.
    pub fn egg_data(&self) -> &EggData {
        &self.egg
    }

    /// Consume the converter and take the output graph.
    pub fn into_egg(self) -> EggData {
        self.egg
    }

    /// Recorded warning lines, in emission order.
    pub fn diagnostics(&self) -> &[String] {
        self.diagnostics.lines()
    }

    /// The sticky fatal error, if one was raised.
    pub fn fatal_error(&self) -> Option<&Error> {
        self.fatal.as_ref()
    }
}
