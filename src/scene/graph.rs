use std::collections::BTreeMap;

use crate::level::ElementKey;
use crate::style::ResultLayer;

use super::view::ScenePoint;

/// The rendering phases a scene item participates in, as a small bitset:
/// `Fill` (area interior), `Casing` (wide outline drawn under the
/// stroke), `Stroke` (the line itself), `Label` (text/icon).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseSet(u8);

impl PhaseSet {
    pub const FILL: PhaseSet = PhaseSet(1 << 0);
    pub const CASING: PhaseSet = PhaseSet(1 << 1);
    pub const STROKE: PhaseSet = PhaseSet(1 << 2);
    pub const LABEL: PhaseSet = PhaseSet(1 << 3);
    pub const NONE: PhaseSet = PhaseSet(0);

    pub fn contains(self, phase: PhaseSet) -> bool {
        self.0 & phase.0 == phase.0
    }

    pub fn union(self, other: PhaseSet) -> PhaseSet {
        PhaseSet(self.0 | other.0)
    }
}

impl std::ops::BitOr for PhaseSet {
    type Output = PhaseSet;
    fn bitor(self, rhs: PhaseSet) -> PhaseSet {
        self.union(rhs)
    }
}

/// The geometry a scene item carries, already projected into scene
/// space. Produced by [`super::controller`] from an element's OSM
/// geometry (a node's point, a way's node chain, an area's outer/inner
/// rings).
///
/// A closed way is a single-ring `Polygon`. A multipolygon relation is
/// always `MultiPolygon`: its stitched outer path (per
/// [`crate::osm::Element::outer_path`]) is split back into its
/// constituent closed loops rather than flattened into one ring, since a
/// concatenated stitched path would otherwise draw/hit-test a bogus edge
/// between the end of one loop and the start of the next.
#[derive(Clone, Debug)]
pub enum Geometry {
    Point(ScenePoint),
    Line(Vec<ScenePoint>),
    Polygon { outer: Vec<ScenePoint>, inner: Vec<Vec<ScenePoint>> },
    MultiPolygon { outer: Vec<Vec<ScenePoint>>, inner: Vec<Vec<ScenePoint>> },
}

/// One drawable item: the element it came from, the resolved style for
/// its layer, its projected geometry, and the rendering phases it
/// participates in.
#[derive(Clone, Debug)]
pub struct SceneGraphItem {
    pub element_key: ElementKey,
    pub layer: Option<String>,
    pub z_index: f64,
    pub phases: PhaseSet,
    pub geometry: Geometry,
    pub style: ResultLayer,
}

/// The assembled, z-ordered scene for one floor. Items are kept sorted
/// ascending by `(layer, z_index)` (ties broken by insertion order, i.e.
/// the order the style evaluator produced them in): layers sort by name
/// with the unnamed (`None`) layer first, matching [`SceneGraph::layer`]'s
/// iteration order, so `.items()` is the per-layer order concatenated
/// layer-by-layer rather than z alone interleaving layers. A renderer or
/// hit-tester can walk the vector once, back-to-front, and see the same
/// order `render_scene` would produce by walking layers individually.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    items: Vec<SceneGraphItem>,
    by_layer: BTreeMap<Option<String>, Vec<usize>>,
}

fn sort_key(item: &SceneGraphItem) -> (&Option<String>, f64) {
    (&item.layer, item.z_index)
}

fn sort_by_layer_then_z(items: &mut [SceneGraphItem]) {
    items.sort_by(|a, b| {
        sort_key(a)
            .0
            .cmp(sort_key(b).0)
            .then_with(|| sort_key(a).1.partial_cmp(&sort_key(b).1).unwrap_or(std::cmp::Ordering::Equal))
    });
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item` and re-sorts by `(layer, z_index)`. Scenes are built
    /// once per floor change, not per frame, so an O(n log n) sort on
    /// every push is not on the render hot path; see [`SceneGraph::build`]
    /// for the bulk entry point that sorts once.
    pub fn push(&mut self, item: SceneGraphItem) {
        self.items.push(item);
    }

    /// Builds a graph from a batch of items, sorting once by `(layer, z_index)`.
    pub fn build(mut items: Vec<SceneGraphItem>) -> Self {
        sort_by_layer_then_z(&mut items);
        let mut by_layer: BTreeMap<Option<String>, Vec<usize>> = BTreeMap::new();
        for (idx, item) in items.iter().enumerate() {
            by_layer.entry(item.layer.clone()).or_default().push(idx);
        }
        Self { items, by_layer }
    }

    pub fn finish_sort(&mut self) {
        sort_by_layer_then_z(&mut self.items);
        self.by_layer.clear();
        for (idx, item) in self.items.iter().enumerate() {
            self.by_layer.entry(item.layer.clone()).or_default().push(idx);
        }
    }

    /// Items ordered by layer then back-to-front z within each layer —
    /// the same order [`SceneGraph::layer`] would produce for every layer
    /// concatenated in layer-name order. Safe to feed directly to
    /// [`crate::hit::hit_test`], whose topmost-wins tie-break assumes
    /// ascending `(layer, z)` order.
    pub fn items(&self) -> &[SceneGraphItem] {
        &self.items
    }

    /// Items belonging to one named layer, in z order.
    pub fn layer(&self, layer: &Option<String>) -> impl Iterator<Item = &SceneGraphItem> {
        self.by_layer
            .get(layer)
            .into_iter()
            .flat_map(|idxs| idxs.iter().map(|&i| &self.items[i]))
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &Option<String>> {
        self.by_layer.keys()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
