use crate::level::{ElementKey, MapLevel};
use crate::osm::{DataSet, Element, ElementType, MapData};
use crate::style::{evaluate, CompiledStyle, MapCSSResult, Property};

use super::graph::{Geometry, PhaseSet, SceneGraph, SceneGraphItem};
use super::overlay::OverlaySource;
use super::view::{ScenePoint, View};

/// Builds the scene graph for one floor: resolves which elements are
/// visible on `floor` (those tagged with it, plus every element with
/// neither `level` nor `repeat_on`, plus whatever `overlay` injects for
/// this floor, minus whatever it hides), evaluates the style against
/// each, and produces a [`SceneGraphItem`] for every element that
/// resolved at least one renderable phase.
///
/// Elements a style evaluates to an empty `ResultLayer` set (no matching
/// rule) are dropped, not emitted as empty items.
pub fn build_scene(map_data: &MapData, style: &CompiledStyle, floor: MapLevel, zoom: u32, view: &View, overlay: &dyn OverlaySource) -> SceneGraph {
    let data_set = &map_data.data_set;
    let hidden = overlay.hidden_ids();
    let mut items = Vec::new();
    let mut result = MapCSSResult::new();

    let mut visit = |element: Element<'_>| {
        let (Some(id), Some(element_type)) = (element.id(), element.element_type()) else {
            return;
        };
        if hidden.contains(&id) {
            return;
        }
        result.clear();
        evaluate(style, &element, data_set, zoom, floor, &mut result);
        for layer in &result.layers {
            if let Some(item) = build_item(ElementKey(element_type, id), layer, &element, data_set, view) {
                items.push(item);
            }
        }
    };

    for key in map_data.levels.keys_on_level(floor) {
        if let Some(element) = resolve(*key, data_set) {
            visit(element);
        }
    }
    for key in map_data.levels.all_floor_keys() {
        if let Some(element) = resolve(*key, data_set) {
            visit(element);
        }
    }
    for key in overlay.extra_elements(floor) {
        if let Some(element) = resolve(key, data_set) {
            visit(element);
        }
    }

    SceneGraph::build(items)
}

fn build_item(
    key: ElementKey,
    layer: &crate::style::ResultLayer,
    element: &Element<'_>,
    data_set: &DataSet,
    view: &View,
) -> Option<SceneGraphItem> {
    let phases = phases_of(layer);
    if phases == PhaseSet::NONE {
        return None;
    }
    let geometry = geometry_of(element, data_set, view)?;
    let z_index = layer.get(Property::ZIndex).and_then(|v| v.as_number()).unwrap_or(0.0);

    Some(SceneGraphItem {
        element_key: key,
        layer: layer.layer.clone(),
        z_index,
        phases,
        geometry,
        style: layer.clone(),
    })
}

fn phases_of(layer: &crate::style::ResultLayer) -> PhaseSet {
    let mut phases = PhaseSet::NONE;
    if layer.get(Property::FillColor).is_some() || layer.get(Property::Color).is_some() {
        phases = phases | PhaseSet::FILL;
    }
    if layer.get(Property::CasingColor).is_some() {
        phases = phases | PhaseSet::CASING;
    }
    if layer.get(Property::Width).is_some() {
        phases = phases | PhaseSet::STROKE;
    }
    if layer.get(Property::IconImage).is_some() || layer.get(Property::Text).is_some() {
        phases = phases | PhaseSet::LABEL;
    }
    phases
}

fn geometry_of(element: &Element<'_>, data_set: &DataSet, view: &View) -> Option<Geometry> {
    match element {
        Element::Null => None,
        Element::Node(n) => Some(Geometry::Point(view.project(n.coord))),
        Element::Way(w) => {
            let points: Vec<ScenePoint> = w
                .node_ids
                .iter()
                .filter_map(|id| data_set.node(*id))
                .map(|n| view.project(n.coord))
                .collect();
            if points.len() < 2 {
                return None;
            }
            if w.is_closed() {
                Some(Geometry::Polygon { outer: points, inner: vec![] })
            } else {
                Some(Geometry::Line(points))
            }
        }
        Element::Relation(r) => {
            let outer_ids = element.outer_path(data_set);
            if outer_ids.len() < 4 {
                return None;
            }
            let outer: Vec<Vec<ScenePoint>> = split_closed_loops(&outer_ids)
                .into_iter()
                .map(|loop_ids| loop_ids.iter().filter_map(|id| data_set.node(*id)).map(|n| view.project(n.coord)).collect::<Vec<_>>())
                .filter(|ring: &Vec<ScenePoint>| ring.len() >= 4)
                .collect();
            if outer.is_empty() {
                return None;
            }
            let inner: Vec<Vec<ScenePoint>> = r
                .members
                .iter()
                .filter(|m| m.element_type == ElementType::Way && m.role == crate::osm::MemberRole::Inner)
                .filter_map(|m| data_set.way(m.id))
                .map(|way| way.node_ids.iter().filter_map(|id| data_set.node(*id)).map(|n| view.project(n.coord)).collect())
                .collect();
            Some(Geometry::MultiPolygon { outer, inner })
        }
    }
}

/// Splits a stitched outer path (per [`Element::outer_path`], which
/// concatenates each closed loop back-to-back with the loop's own
/// repeated start/end node) back into its constituent loops: `[n1, n2,
/// n3, n1, n4, n5, n6, n4]` becomes `[[n1,n2,n3,n1], [n4,n5,n6,n4]]`. A
/// stitch that ran out of matching ways and never closed is kept as a
/// final best-effort ring rather than dropped.
fn split_closed_loops(ids: &[crate::osm::ElementId]) -> Vec<Vec<crate::osm::ElementId>> {
    let mut loops = Vec::new();
    let mut start = 0;
    while start < ids.len() {
        let loop_start_id = ids[start];
        match ids[start + 1..].iter().position(|&id| id == loop_start_id) {
            Some(offset) => {
                let end = start + 1 + offset;
                loops.push(ids[start..=end].to_vec());
                start = end + 1;
            }
            None => {
                loops.push(ids[start..].to_vec());
                break;
            }
        }
    }
    loops
}

fn resolve<'a>(key: ElementKey, data_set: &'a DataSet) -> Option<Element<'a>> {
    match key.0 {
        ElementType::Node => data_set.node(key.1).map(Element::Node),
        ElementType::Way => data_set.way(key.1).map(Element::Way),
        ElementType::Relation => data_set.relation(key.1).map(Element::Relation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::element::{GeoCoord, Node};
    use crate::osm::{DataSet, TagKeyTable, TagSet};
    use crate::style::compile::{RawCondition, RawSelector, Rule, Style};
    use crate::style::declaration::{Declaration, Value};
    use crate::style::selector::{ObjectType, ZoomRange};

    #[test]
    fn elements_with_no_matching_rule_are_dropped() {
        let mut table = TagKeyTable::new();
        let tags = TagSet::build(&mut table, [("amenity".to_string(), "cafe".to_string())]);
        let node = Node { id: 1, coord: GeoCoord::from_degrees(0.0, 0.0), tags };

        let style = Style {
            rules: vec![Rule {
                selector: RawSelector::Basic {
                    object_type: ObjectType::Node,
                    zoom: ZoomRange::unbounded(),
                    conditions: vec![RawCondition::Exists("entrance".into())],
                    class_filter: vec![],
                },
                layer: None,
                declarations: vec![Declaration::new(Property::IconImage, Value::Str("door".into()))],
            }],
            canvas_rules: vec![],
        };
        let compiled = style.compile(&mut table).unwrap();
        let data_set = DataSet::from_parts(vec![node], vec![], vec![], table);
        let map_data = MapData::new(data_set, None, None);
        let view = View::new(GeoCoord::from_degrees(0.0, 0.0), 18.0, 0.0, 512.0, 512.0);

        let overlay = super::super::overlay::NoOverlay::default();
        let graph = build_scene(&map_data, &compiled, MapLevel(0), 18, &view, &overlay);
        assert!(graph.is_empty());
    }

    #[test]
    fn split_closed_loops_recovers_each_stitched_ring() {
        // [n1,n2,n3,n1, n4,n5,n6,n4], per spec concrete scenario 2.
        let ids = vec![1, 2, 3, 1, 4, 5, 6, 4];
        let loops = split_closed_loops(&ids);
        assert_eq!(loops, vec![vec![1, 2, 3, 1], vec![4, 5, 6, 4]]);
    }

    #[test]
    fn multipolygon_relation_produces_one_ring_per_outer_loop() {
        use crate::osm::element::{Member, MemberRole, Relation, Way};

        let mut table = TagKeyTable::new();
        let nodes = vec![
            Node { id: 1, coord: GeoCoord::from_degrees(0.0, 0.0), tags: TagSet::build(&mut table, []) },
            Node { id: 2, coord: GeoCoord::from_degrees(0.0, 1.0), tags: TagSet::build(&mut table, []) },
            Node { id: 3, coord: GeoCoord::from_degrees(1.0, 1.0), tags: TagSet::build(&mut table, []) },
            Node { id: 4, coord: GeoCoord::from_degrees(2.0, 2.0), tags: TagSet::build(&mut table, []) },
            Node { id: 5, coord: GeoCoord::from_degrees(2.0, 3.0), tags: TagSet::build(&mut table, []) },
            Node { id: 6, coord: GeoCoord::from_degrees(3.0, 3.0), tags: TagSet::build(&mut table, []) },
        ];
        let way_a = Way { id: 10, node_ids: vec![1, 2, 3, 1], tags: TagSet::build(&mut table, []), bbox: None };
        let way_b = Way { id: 11, node_ids: vec![4, 5, 6, 4], tags: TagSet::build(&mut table, []), bbox: None };
        // Member order deliberately reversed (B before A).
        let relation = Relation {
            id: 100,
            members: vec![
                Member { id: 11, element_type: ElementType::Way, role: MemberRole::Outer },
                Member { id: 10, element_type: ElementType::Way, role: MemberRole::Outer },
            ],
            tags: TagSet::build(&mut table, [("type".into(), "multipolygon".into())]),
            bbox: None,
        };
        let data_set = DataSet::from_parts(nodes, vec![way_a, way_b], vec![relation], table);
        let view = View::new(GeoCoord::from_degrees(1.5, 1.5), 14.0, 0.0, 800.0, 600.0);

        let element = Element::Relation(data_set.relation(100).unwrap());
        let geometry = geometry_of(&element, &data_set, &view).expect("two closed loops make a MultiPolygon");
        match geometry {
            Geometry::MultiPolygon { outer, inner } => {
                assert_eq!(outer.len(), 2, "each stitched loop becomes its own ring, not one flattened ring");
                assert!(outer.iter().all(|ring| ring.len() == 4));
                assert!(inner.is_empty());
            }
            other => panic!("expected MultiPolygon, got {other:?}"),
        }
    }
}
