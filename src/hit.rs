//! The hit detector: maps a screen point to the best semantic
//! scene-graph item.

use crate::level::ElementKey;
use crate::scene::graph::{Geometry, SceneGraphItem};
use crate::scene::view::{ScenePoint, View};
use crate::style::{Property, Value};

/// The outcome of a successful [`hit_test`]: the element hit plus the
/// scene-graph item it came from (so a caller can read its resolved
/// style without a second lookup).
#[derive(Clone, Debug)]
pub struct HitResult {
    pub element_key: ElementKey,
    pub item: SceneGraphItem,
}

/// Resolves `screen_point` to the semantically best scene-graph item.
///
/// 1. Gathers every item whose bounding box contains the scene-mapped
///    point and whose geometry actually contains it (polygon point-in-
///    polygon, polyline distance-to-segment, point/label screen-space
///    rect test against a `hit_radius_px` tolerance).
/// 2. A single candidate is returned outright.
/// 3. Otherwise the topmost candidate (last in z order) with fill alpha
///    ≥ 0.5 wins; failing that, the candidate with the smallest
///    bounding-box area wins — small nested rooms surface over the
///    building they sit in.
pub fn hit_test(items: &[SceneGraphItem], view: &View, screen_point: crate::scene::view::ScreenPoint, hit_radius_px: f64) -> Option<HitResult> {
    let scene_point = view.map_screen_to_scene(screen_point);
    let hit_radius_scene = view.map_screen_distance_to_scene_distance(hit_radius_px);

    let candidates: Vec<&SceneGraphItem> = items
        .iter()
        .filter(|item| geometry_contains(&item.geometry, scene_point, hit_radius_scene, item))
        .collect();

    if candidates.is_empty() {
        return None;
    }
    if candidates.len() == 1 {
        return Some(to_result(candidates[0]));
    }

    // Candidates preserve the scene graph's z-ascending order, so the
    // last opaque-enough one is topmost.
    if let Some(opaque) = candidates.iter().rev().find(|item| fill_alpha(item) >= 0.5) {
        return Some(to_result(opaque));
    }

    candidates
        .iter()
        .min_by(|a, b| bbox_area(a).partial_cmp(&bbox_area(b)).unwrap_or(std::cmp::Ordering::Equal))
        .map(|item| to_result(item))
}

fn to_result(item: &SceneGraphItem) -> HitResult {
    HitResult {
        element_key: item.element_key,
        item: item.clone(),
    }
}

fn fill_alpha(item: &SceneGraphItem) -> f64 {
    item.style
        .get(Property::FillOpacity)
        .and_then(Value::as_number)
        .or_else(|| item.style.get(Property::Opacity).and_then(Value::as_number))
        .unwrap_or(1.0)
}

fn stroke_tolerance(item: &SceneGraphItem, fallback: f64) -> f64 {
    let stroke_width = item.style.get(Property::Width).and_then(Value::as_number).unwrap_or(0.0);
    let casing_width = item.style.get(Property::CasingWidth).and_then(Value::as_number).unwrap_or(0.0);
    if stroke_width + casing_width > 0.0 {
        stroke_width + casing_width
    } else {
        fallback
    }
}

fn geometry_contains(geometry: &Geometry, point: ScenePoint, tolerance: f64, item: &SceneGraphItem) -> bool {
    match geometry {
        Geometry::Point(p) => distance(*p, point) <= tolerance,
        Geometry::Line(points) => polyline_distance(points, point) <= stroke_tolerance(item, tolerance),
        Geometry::Polygon { outer, inner } => {
            point_in_polygon(outer, point) && !inner.iter().any(|ring| point_in_polygon(ring, point))
        }
        Geometry::MultiPolygon { outer, inner } => point_in_rings(outer.iter().chain(inner.iter()), point),
    }
}

/// Even-odd point-in-path test over every ring of a multipolygon at
/// once (outer loops and inner holes alike): a point is inside iff the
/// total crossing count summed across all rings is odd. This is the
/// same rule [`point_in_polygon`] applies to one ring, generalized so a
/// multipolygon's disjoint outer loops and their holes never need to be
/// paired up by the caller.
fn point_in_rings<'a>(rings: impl Iterator<Item = &'a Vec<ScenePoint>>, p: ScenePoint) -> bool {
    let total: u32 = rings.map(|ring| ring_crossings(ring, p)).sum();
    total % 2 == 1
}

fn distance(a: ScenePoint, b: ScenePoint) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

fn polyline_distance(points: &[ScenePoint], p: ScenePoint) -> f64 {
    points
        .windows(2)
        .map(|seg| distance_to_segment(seg[0], seg[1], p))
        .fold(f64::INFINITY, f64::min)
}

fn distance_to_segment(a: ScenePoint, b: ScenePoint, p: ScenePoint) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return distance(a, p);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    let proj = ScenePoint { x: a.x + t * dx, y: a.y + t * dy };
    distance(proj, p)
}

/// Odd-even point-in-polygon test (ray casting along +x).
fn point_in_polygon(ring: &[ScenePoint], p: ScenePoint) -> bool {
    ring_crossings(ring, p) % 2 == 1
}

/// Counts how many edges of `ring` a +x ray from `p` crosses, the
/// building block both [`point_in_polygon`] (one ring) and
/// [`point_in_rings`] (every ring of a multipolygon, summed) use.
fn ring_crossings(ring: &[ScenePoint], p: ScenePoint) -> u32 {
    if ring.len() < 3 {
        return 0;
    }
    let mut crossings = 0;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].x, ring[i].y);
        let (xj, yj) = (ring[j].x, ring[j].y);
        let crosses = (yi > p.y) != (yj > p.y);
        if crosses {
            let x_at_y = xi + (p.y - yi) * (xj - xi) / (yj - yi);
            if p.x < x_at_y {
                crossings += 1;
            }
        }
        j = i;
    }
    crossings
}

fn bbox_area(item: &SceneGraphItem) -> f64 {
    let (min, max) = bounds(&item.geometry);
    ((max.x - min.x).max(0.0)) * ((max.y - min.y).max(0.0))
}

fn bounds(geometry: &Geometry) -> (ScenePoint, ScenePoint) {
    let mut min = ScenePoint { x: f64::INFINITY, y: f64::INFINITY };
    let mut max = ScenePoint { x: f64::NEG_INFINITY, y: f64::NEG_INFINITY };
    let mut extend = |p: ScenePoint| {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    };
    match geometry {
        Geometry::Point(p) => extend(*p),
        Geometry::Line(points) => points.iter().for_each(|p| extend(*p)),
        Geometry::Polygon { outer, .. } => outer.iter().for_each(|p| extend(*p)),
        Geometry::MultiPolygon { outer, inner } => {
            outer.iter().flatten().for_each(|p| extend(*p));
            inner.iter().flatten().for_each(|p| extend(*p));
        }
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::{ElementType, GeoCoord};
    use crate::scene::graph::{PhaseSet, SceneGraph};
    use crate::style::ResultLayer;

    fn square_item(key: i64, half_extent: f64, fill_opacity: f64, z: f64) -> SceneGraphItem {
        layered_square_item(key, half_extent, fill_opacity, z, None)
    }

    fn layered_square_item(key: i64, half_extent: f64, fill_opacity: f64, z: f64, layer: Option<&str>) -> SceneGraphItem {
        let mut style = ResultLayer::default();
        style.set(Property::FillOpacity, Value::Number(fill_opacity));
        SceneGraphItem {
            element_key: ElementKey(ElementType::Way, key),
            layer: layer.map(str::to_string),
            z_index: z,
            phases: PhaseSet::FILL,
            geometry: Geometry::Polygon {
                outer: vec![
                    ScenePoint { x: -half_extent, y: -half_extent },
                    ScenePoint { x: half_extent, y: -half_extent },
                    ScenePoint { x: half_extent, y: half_extent },
                    ScenePoint { x: -half_extent, y: half_extent },
                ],
                inner: vec![],
            },
            style,
        }
    }

    #[test]
    fn single_candidate_returned_directly() {
        let view = View::new(GeoCoord::from_degrees(0.0, 0.0), 19.0, 0.0, 200.0, 200.0);
        let items = vec![square_item(1, 10.0, 1.0, 0.0)];
        let hit = hit_test(&items, &view, crate::scene::view::ScreenPoint { x: 100.0, y: 100.0 }, 2.0).unwrap();
        assert_eq!(hit.element_key, ElementKey(ElementType::Way, 1));
    }

    #[test]
    fn overlapping_polygons_prefer_higher_opacity() {
        let view = View::new(GeoCoord::from_degrees(0.0, 0.0), 19.0, 0.0, 200.0, 200.0);
        let items = vec![square_item(1, 10.0, 0.3, 0.0), square_item(2, 10.0, 0.9, 1.0)];
        let hit = hit_test(&items, &view, crate::scene::view::ScreenPoint { x: 100.0, y: 100.0 }, 2.0).unwrap();
        assert_eq!(hit.element_key, ElementKey(ElementType::Way, 2));
    }

    #[test]
    fn equal_low_opacity_prefers_smaller_bbox() {
        let view = View::new(GeoCoord::from_degrees(0.0, 0.0), 19.0, 0.0, 200.0, 200.0);
        let items = vec![square_item(1, 10.0, 0.3, 0.0), square_item(2, 3.0, 0.3, 1.0)];
        let hit = hit_test(&items, &view, crate::scene::view::ScreenPoint { x: 100.0, y: 100.0 }, 2.0).unwrap();
        assert_eq!(hit.element_key, ElementKey(ElementType::Way, 2));
    }

    #[test]
    fn empty_scene_returns_no_element() {
        let view = View::new(GeoCoord::from_degrees(0.0, 0.0), 19.0, 0.0, 200.0, 200.0);
        assert!(hit_test(&[], &view, crate::scene::view::ScreenPoint { x: 100.0, y: 100.0 }, 2.0).is_none());
    }

    #[test]
    fn hit_test_on_a_scene_graphs_items_respects_layer_then_z_order() {
        // Two overlapping opaque squares in different named layers. A flat
        // z-only sort would interleave them by z_index alone; hit_test's
        // last-opaque-wins rule must instead see them grouped by layer, as
        // `graph.items()` now produces, matching how `render_scene` walks
        // layer ranges.
        let graph = SceneGraph::build(vec![
            layered_square_item(1, 10.0, 1.0, 5.0, Some("a_layer")),
            layered_square_item(2, 10.0, 1.0, 0.0, Some("z_layer")),
        ]);
        let view = View::new(GeoCoord::from_degrees(0.0, 0.0), 19.0, 0.0, 200.0, 200.0);
        let hit = hit_test(graph.items(), &view, crate::scene::view::ScreenPoint { x: 100.0, y: 100.0 }, 2.0).unwrap();
        // "z_layer" sorts after "a_layer", so it is last in (layer, z) order
        // and wins the topmost-opaque tie-break despite its lower z_index.
        assert_eq!(hit.element_key, ElementKey(ElementType::Way, 2));
    }

    #[test]
    fn multipolygon_rings_are_tested_independently_not_flattened() {
        let ring_a = vec![
            ScenePoint { x: -10.0, y: -5.0 },
            ScenePoint { x: -2.0, y: -5.0 },
            ScenePoint { x: -2.0, y: 5.0 },
            ScenePoint { x: -10.0, y: 5.0 },
        ];
        let ring_b = vec![
            ScenePoint { x: 2.0, y: -5.0 },
            ScenePoint { x: 10.0, y: -5.0 },
            ScenePoint { x: 10.0, y: 5.0 },
            ScenePoint { x: 2.0, y: 5.0 },
        ];
        let geometry = Geometry::MultiPolygon { outer: vec![ring_a, ring_b], inner: vec![] };
        let dummy = square_item(99, 1.0, 1.0, 0.0);

        assert!(geometry_contains(&geometry, ScenePoint { x: -6.0, y: 0.0 }, 0.0, &dummy));
        assert!(geometry_contains(&geometry, ScenePoint { x: 6.0, y: 0.0 }, 0.0, &dummy));
        // A flattened single ring would draw a bogus edge connecting
        // ring A's end to ring B's start and could report this gap
        // point as inside; two independent rings must not.
        assert!(!geometry_contains(&geometry, ScenePoint { x: 0.0, y: 0.0 }, 0.0, &dummy));
    }
}
