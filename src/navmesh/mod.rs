//! The navmesh builder: consumes the same evaluator the render path
//! uses, but against a dedicated filter style sheet, to emit a triangle
//! soup and off-mesh connections for a downstream solid-voxel navmesh
//! generator.

pub mod debug;
pub mod extrude;
pub mod links;
pub mod stroke;
pub mod transform;
pub mod triangulate;
pub mod worker;

pub use links::{LinkDirection, NavMeshArea, OffMeshLink};
pub use stroke::NavVertex;
pub use transform::{NavMeshTransform, HEIGHT_PER_LEVEL};
pub use worker::{spawn_solve, NavMeshGeometry, SolidVoxelNavmeshBackend};

use std::collections::HashMap;

use crate::level::{parse_level_list, ElementKey, MapLevel};
use crate::osm::{BBox, DataSet, Element, ElementId, ElementType, MapData, MemberRole, TagLookup};
use crate::scene::overlay::OverlaySource;
use crate::style::{evaluate, object_type_of, CompiledStyle, MapCSSResult, ObjectType, Property, ResultLayer, Value};

use extrude::{extrude_wall, WallNode};
use links::elevator_links;
use stroke::stroke_to_strip;
use triangulate::triangulate_polygon;

/// Sentinel recorded for a node observed at conflicting levels while
/// building the node-level index.
pub const AMBIGUOUS_LEVEL: i32 = i32::MIN;

/// Zoom level the navmesh builder evaluates its filter style at.
///
/// Navmesh geometry is not zoom-dependent, but [`evaluate`]'s signature
/// carries one regardless; a filter style sheet that never writes a
/// `zoom` condition is unaffected by the choice. Fixed rather than
/// configurable since this builder has no notion of "current zoom".
const NAVMESH_ZOOM: u32 = 0;

/// Builds triangle-soup + off-mesh-connection buffers for every full
/// floor level in a [`MapData`], ready to hand to
/// [`spawn_solve`]/[`SolidVoxelNavmeshBackend`].
pub struct NavmeshBuilder<'a> {
    map_data: &'a MapData,
    filter_style: &'a CompiledStyle,
    overlay: &'a dyn OverlaySource,
    transform: NavMeshTransform,
}

impl<'a> NavmeshBuilder<'a> {
    pub fn new(map_data: &'a MapData, filter_style: &'a CompiledStyle, overlay: &'a dyn OverlaySource) -> Self {
        let transform = NavMeshTransform::centered_on(&map_data.bbox.unwrap_or(BBox::point(crate::osm::GeoCoord::from_degrees(0.0, 0.0))));
        Self { map_data, filter_style, overlay, transform }
    }

    /// Runs the full main-thread half of navmesh building: level index,
    /// per-floor per-element filter evaluation, geometry emission, link
    /// emission. The returned buffers are ready for [`spawn_solve`].
    ///
    /// Floors are independent of one another until their buffers are
    /// merged, so with the `parallel` feature enabled each floor's
    /// triangulation/stroking work runs on a `rayon` thread and results
    /// are merged in floor order afterwards; this is additive
    /// parallelism inside the synchronous main-thread half, not the
    /// worker task that later owns the merged buffers.
    pub fn build(&self) -> NavMeshGeometry {
        let node_levels = self.build_node_level_index();
        let floors = self.map_data.levels.full_levels();

        let per_floor = self.build_per_floor(&floors, &node_levels);
        let mut geometry = NavMeshGeometry::default();
        for floor_geometry in per_floor {
            merge_geometry(&mut geometry, floor_geometry);
        }
        geometry
    }

    #[cfg(feature = "parallel")]
    fn build_per_floor(&self, floors: &[MapLevel], node_levels: &HashMap<ElementId, i32>) -> Vec<NavMeshGeometry> {
        use rayon::prelude::*;
        floors.par_iter().map(|&floor| self.build_floor(floor, node_levels)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn build_per_floor(&self, floors: &[MapLevel], node_levels: &HashMap<ElementId, i32>) -> Vec<NavMeshGeometry> {
        floors.iter().map(|&floor| self.build_floor(floor, node_levels)).collect()
    }

    fn build_floor(&self, floor: MapLevel, node_levels: &HashMap<ElementId, i32>) -> NavMeshGeometry {
        let ds = &self.map_data.data_set;
        let floor_height = self.transform.height(floor.human_floor());
        let mut geometry = NavMeshGeometry::default();
        let mut result = MapCSSResult::new();

        let mut keys: Vec<ElementKey> = self.map_data.levels.keys_on_level(floor).to_vec();
        keys.extend_from_slice(self.map_data.levels.all_floor_keys());
        keys.extend(self.overlay.extra_elements(floor));

        for key in keys {
            if self.overlay.hidden_ids().contains(&key.1) {
                continue;
            }
            let Some(element) = resolve(key, ds) else {
                log::debug!("navmesh: skipping {key:?} on floor {floor:?}, element not found in data set");
                continue;
            };

            result.clear();
            evaluate(self.filter_style, &element, ds, NAVMESH_ZOOM, floor, &mut result);

            for layer in &result.layers {
                match &layer.layer {
                    None => self.emit_geometry(&element, ds, layer, floor, floor_height, node_levels, &mut geometry),
                    Some(_) => self.emit_link(&element, ds, layer, node_levels, &mut geometry),
                }
            }
        }

        geometry
    }

    /// Step 1: for every way with a single-valued `level` tag on a full
    /// level, records each referenced node's level; a node seen under
    /// conflicting levels is marked [`AMBIGUOUS_LEVEL`].
    fn build_node_level_index(&self) -> HashMap<ElementId, i32> {
        let ds = &self.map_data.data_set;
        let mut index: HashMap<ElementId, i32> = HashMap::new();

        for way in ds.ways() {
            let element = Element::Way(way);
            let Some(level_str) = element.tag_value(&ds.tag_table, TagLookup::Literal("level")) else {
                continue;
            };
            let levels = parse_level_list(level_str);
            if levels.len() != 1 {
                continue; // single-valued only
            }
            let level = levels[0];
            if !level.is_full_level() {
                continue;
            }
            let human_floor = (level.human_floor()) as i32;
            for &node_id in &way.node_ids {
                index
                    .entry(node_id)
                    .and_modify(|existing| {
                        if *existing != human_floor {
                            *existing = AMBIGUOUS_LEVEL;
                        }
                    })
                    .or_insert(human_floor);
            }
        }

        index
    }

    fn emit_geometry(
        &self,
        element: &Element<'_>,
        ds: &DataSet,
        layer: &ResultLayer,
        floor: MapLevel,
        floor_height: f32,
        node_levels: &HashMap<ElementId, i32>,
        geometry: &mut NavMeshGeometry,
    ) {
        let object_type = object_type_of(element, ds, self.filter_style.area_key, self.filter_style.type_key);

        if let Some(fill_opacity) = layer.get(Property::FillOpacity).and_then(Value::as_number) {
            if fill_opacity > 0.0 && object_type == ObjectType::Area {
                self.emit_area(element, ds, floor_height, geometry);
            }
        }

        if let Some(width) = layer.get(Property::Width).and_then(Value::as_number) {
            if width > 0.0 && object_type == ObjectType::Line {
                self.emit_line_stroke(element, ds, width as f32, floor_height, node_levels, geometry);
            }
        }

        // The filter style's null-layer "extrude" rule reuses the
        // casing-width property to carry the wall's story height; this
        // is a dedicated filter style, not the render style, so the
        // property can be repurposed without colliding with §4.F.
        if let Some(story_height) = layer.get(Property::CasingWidth).and_then(Value::as_number) {
            if story_height > 0.0 {
                self.emit_wall(element, ds, floor_height, story_height as f32, geometry);
            }
        }
    }

    fn emit_area(&self, element: &Element<'_>, ds: &DataSet, floor_height: f32, geometry: &mut NavMeshGeometry) {
        let (outer, inner) = element_rings(element, ds);
        if outer.len() < 3 {
            return;
        }
        let outer_xz: Vec<(f64, f64)> = outer.iter().map(|c| to_f64_xz(&self.transform, *c)).collect();
        let inner_xz: Vec<Vec<(f64, f64)>> = inner
            .iter()
            .map(|ring| ring.iter().map(|c| to_f64_xz(&self.transform, *c)).collect())
            .collect();

        let (verts2d, tris) = triangulate_polygon(&outer_xz, &inner_xz);
        let base = geometry.vertices.len() as u32;
        geometry
            .vertices
            .extend(verts2d.into_iter().map(|(x, z)| NavVertex { x: x as f32, y: floor_height, z: z as f32 }));
        geometry.areas.extend(vec![NavMeshArea::Walkable; tris.len()]);
        geometry
            .triangles
            .extend(tris.into_iter().map(|t| [base + t[0] as u32, base + t[1] as u32, base + t[2] as u32]));
    }

    fn emit_line_stroke(
        &self,
        element: &Element<'_>,
        ds: &DataSet,
        width: f32,
        floor_height: f32,
        node_levels: &HashMap<ElementId, i32>,
        geometry: &mut NavMeshGeometry,
    ) {
        let Element::Way(way) = element else { return };
        let coords: Vec<_> = way.node_ids.iter().filter_map(|id| ds.node(*id)).map(|n| n.coord).collect();
        if coords.len() < 2 {
            return;
        }

        let (start_height, end_height) = if way.node_ids.len() == 2 {
            match (node_levels.get(&way.node_ids[0]), node_levels.get(&way.node_ids[1])) {
                (Some(&a), Some(&b)) if a != AMBIGUOUS_LEVEL && b != AMBIGUOUS_LEVEL && a != b => {
                    (self.transform.height(a as f64), self.transform.height(b as f64))
                }
                _ => (floor_height, floor_height),
            }
        } else {
            (floor_height, floor_height)
        };

        let (verts, tris) = stroke_to_strip(&self.transform, &coords, width, start_height, end_height);
        let base = geometry.vertices.len() as u32;
        geometry.vertices.extend(verts);
        geometry.areas.extend(vec![NavMeshArea::Walkable; tris.len()]);
        geometry
            .triangles
            .extend(tris.into_iter().map(|t| [base + t[0] as u32, base + t[1] as u32, base + t[2] as u32]));
    }

    fn emit_wall(&self, element: &Element<'_>, ds: &DataSet, floor_height: f32, story_height: f32, geometry: &mut NavMeshGeometry) {
        let Element::Way(way) = element else { return };
        let nodes: Vec<WallNode> = way
            .node_ids
            .iter()
            .filter_map(|id| ds.node(*id))
            .map(|n| WallNode {
                coord: n.coord,
                is_door: Element::Node(n).tag_value(&ds.tag_table, TagLookup::Literal("door")).is_some(),
            })
            .collect();
        if nodes.len() < 2 {
            return;
        }

        let (verts, tris) = extrude_wall(&self.transform, &nodes, floor_height, story_height);
        let base = geometry.vertices.len() as u32;
        geometry.vertices.extend(verts);
        geometry.areas.extend(vec![NavMeshArea::Walkable; tris.len()]);
        geometry
            .triangles
            .extend(tris.into_iter().map(|t| [base + t[0] as u32, base + t[1] as u32, base + t[2] as u32]));
    }

    fn emit_link(&self, element: &Element<'_>, ds: &DataSet, layer: &ResultLayer, node_levels: &HashMap<ElementId, i32>, geometry: &mut NavMeshGeometry) {
        if let Element::Way(way) = element {
            if way.node_ids.len() == 2 {
                self.emit_escalator_link(element, way.node_ids[0], way.node_ids[1], ds, layer, node_levels, geometry);
                return;
            }
        }
        self.emit_elevator_links(element, ds, geometry);
    }

    fn emit_escalator_link(
        &self,
        element: &Element<'_>,
        a_id: ElementId,
        b_id: ElementId,
        ds: &DataSet,
        layer: &ResultLayer,
        node_levels: &HashMap<ElementId, i32>,
        geometry: &mut NavMeshGeometry,
    ) {
        let (Some(&a_level), Some(&b_level)) = (node_levels.get(&a_id), node_levels.get(&b_id)) else { return };
        if a_level == AMBIGUOUS_LEVEL || b_level == AMBIGUOUS_LEVEL || a_level == b_level {
            return;
        }
        let (Some(a_node), Some(b_node)) = (ds.node(a_id), ds.node(b_id)) else { return };
        let Some(source_id) = element.id() else { return };

        let mut link = links::escalator_link(
            &self.transform,
            a_node.coord,
            MapLevel(a_level * 10),
            b_node.coord,
            MapLevel(b_level * 10),
            None,
            source_id as u32,
        );
        link.direction = direction_from_layer(layer.layer.as_deref());
        // Backward is normalized to forward by swapping endpoints.
        if link.direction == LinkDirection::Backward {
            std::mem::swap(&mut link.from, &mut link.to);
            std::mem::swap(&mut link.from_level, &mut link.to_level);
            link.direction = LinkDirection::Forward;
        }
        geometry.links.push(link);
    }

    fn emit_elevator_links(&self, element: &Element<'_>, ds: &DataSet, geometry: &mut NavMeshGeometry) {
        let Some(level_str) = element.tag_value(&ds.tag_table, TagLookup::Literal("level")) else { return };
        let levels = parse_level_list(level_str);
        if levels.len() < 2 {
            return;
        }
        let Some(centroid) = element.center(ds) else { return };
        let Some(source_id) = element.id() else { return };
        geometry.links.extend(elevator_links(&self.transform, centroid, &levels, source_id as u32));
    }
}

/// Appends `floor_geometry`'s vertices/triangles/areas/links onto
/// `into`, rebasing triangle indices by `into`'s current vertex count so
/// floor buffers built independently (sequentially or via `rayon`)
/// merge into one contiguous triangle soup. `areas` stays index-aligned
/// with `triangles` since both are extended in the same order.
fn merge_geometry(into: &mut NavMeshGeometry, floor_geometry: NavMeshGeometry) {
    let base = into.vertices.len() as u32;
    into.vertices.extend(floor_geometry.vertices);
    into.triangles.extend(floor_geometry.triangles.into_iter().map(|t| [t[0] + base, t[1] + base, t[2] + base]));
    into.areas.extend(floor_geometry.areas);
    into.links.extend(floor_geometry.links);
}

fn direction_from_layer(name: Option<&str>) -> LinkDirection {
    match name {
        Some("link_forward") => LinkDirection::Forward,
        Some("link_backward") => LinkDirection::Backward,
        _ => LinkDirection::Bidirectional,
    }
}

fn to_f64_xz(transform: &NavMeshTransform, coord: crate::osm::GeoCoord) -> (f64, f64) {
    let (x, z) = transform.geo_to_xz(coord);
    (x as f64, z as f64)
}

fn element_rings(element: &Element<'_>, ds: &DataSet) -> (Vec<crate::osm::GeoCoord>, Vec<Vec<crate::osm::GeoCoord>>) {
    let outer_ids = element.outer_path(ds);
    let outer = outer_ids.iter().filter_map(|id| ds.node(*id)).map(|n| n.coord).collect();

    let mut inner = Vec::new();
    if let Element::Relation(relation) = element {
        for member in &relation.members {
            if member.element_type == ElementType::Way && member.role == MemberRole::Inner {
                if let Some(way) = ds.way(member.id) {
                    inner.push(way.node_ids.iter().filter_map(|id| ds.node(*id)).map(|n| n.coord).collect());
                }
            }
        }
    }
    (outer, inner)
}

fn resolve<'a>(key: ElementKey, ds: &'a DataSet) -> Option<Element<'a>> {
    match key.0 {
        ElementType::Node => ds.node(key.1).map(Element::Node),
        ElementType::Way => ds.way(key.1).map(Element::Way),
        ElementType::Relation => ds.relation(key.1).map(Element::Relation),
    }
}
