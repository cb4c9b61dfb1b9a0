use std::collections::HashMap;

use crate::level::ElementKey;
use crate::scene::graph::{Geometry, PhaseSet, SceneGraph, SceneGraphItem};
use crate::scene::view::{ScenePoint, View};
use crate::style::{MapCSSResult, Property, Value};

use super::canvas::{BackgroundConfig, IconConfig, PathConfig, PolygonConfig, RenderBackend, TextConfig};

/// Memoized label bounding boxes, keyed by the element the label belongs
/// to. [`render_scene`] is otherwise pure; this cache is the one thing it
/// mutates: the renderer stays pure otherwise, touching only the label
/// bbox cache.
#[derive(Default)]
pub struct LabelBBoxCache {
    boxes: HashMap<ElementKey, (ScenePoint, ScenePoint)>,
}

impl LabelBBoxCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: ElementKey) -> Option<(ScenePoint, ScenePoint)> {
        self.boxes.get(&key).copied()
    }
}

/// Walks `graph`'s layer ranges in ascending order; within each range,
/// collects items whose bounding box intersects the viewport, then
/// iterates `[Fill, Casing, Stroke, Label]` dispatching each collected
/// item's config to `backend`. `canvas` supplies the background fill
/// from canvas rule evaluation.
pub fn render_scene(graph: &SceneGraph, view: &View, canvas: &MapCSSResult, backend: &mut dyn RenderBackend, label_cache: &mut LabelBBoxCache) {
    let background = canvas
        .layers
        .first()
        .and_then(|l| l.get(Property::FillColor))
        .and_then(Value::as_color)
        .cloned()
        .unwrap_or_else(|| "#ffffff".parse().expect("valid fallback color"));
    backend.draw_background(BackgroundConfig { fill: background });

    let viewport = visible_scene_rect(view);

    for layer_name in graph.layer_names() {
        let visible: Vec<&SceneGraphItem> = graph
            .layer(layer_name)
            .filter(|item| intersects(&bbox(&item.geometry), &viewport))
            .collect();

        for item in visible.iter().filter(|i| i.phases.contains(PhaseSet::FILL)) {
            draw_fill(item, view, backend);
        }
        for item in visible.iter().filter(|i| i.phases.contains(PhaseSet::CASING)) {
            draw_casing(item, view, backend);
        }
        for item in visible.iter().filter(|i| i.phases.contains(PhaseSet::STROKE)) {
            draw_stroke(item, view, backend);
        }
        for item in visible.iter().filter(|i| i.phases.contains(PhaseSet::LABEL)) {
            draw_label(item, view, backend, label_cache);
        }
    }
}

fn bbox(geometry: &Geometry) -> (ScenePoint, ScenePoint) {
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

fn visible_scene_rect(view: &View) -> (ScenePoint, ScenePoint) {
    let corners = [
        view.map_screen_to_scene(crate::scene::view::ScreenPoint { x: 0.0, y: 0.0 }),
        view.map_screen_to_scene(crate::scene::view::ScreenPoint { x: view.screen_width, y: 0.0 }),
        view.map_screen_to_scene(crate::scene::view::ScreenPoint { x: 0.0, y: view.screen_height }),
        view.map_screen_to_scene(crate::scene::view::ScreenPoint { x: view.screen_width, y: view.screen_height }),
    ];
    let mut min = ScenePoint { x: f64::INFINITY, y: f64::INFINITY };
    let mut max = ScenePoint { x: f64::NEG_INFINITY, y: f64::NEG_INFINITY };
    for p in corners {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min, max)
}

fn intersects(a: &(ScenePoint, ScenePoint), b: &(ScenePoint, ScenePoint)) -> bool {
    a.0.x <= b.1.x && a.1.x >= b.0.x && a.0.y <= b.1.y && a.1.y >= b.0.y
}

fn project_points(points: &[ScenePoint], view: &View) -> Vec<crate::scene::view::ScreenPoint> {
    points.iter().map(|p| view.map_scene_to_screen(*p)).collect()
}

fn draw_fill(item: &SceneGraphItem, view: &View, backend: &mut dyn RenderBackend) {
    let (outer, rest): (&[ScenePoint], Vec<&Vec<ScenePoint>>) = match &item.geometry {
        Geometry::Polygon { outer, inner } => (outer, inner.iter().collect()),
        Geometry::MultiPolygon { outer, inner } => {
            let Some((first, remaining_outer)) = outer.split_first() else { return };
            (first, remaining_outer.iter().chain(inner.iter()).collect())
        }
        _ => return,
    };
    let fill = item.style.get(Property::FillColor).and_then(Value::as_color).cloned();
    if fill.is_none() {
        return;
    }
    let opacity = item.style.get(Property::FillOpacity).and_then(Value::as_number).unwrap_or(1.0);
    backend.draw_polygon(PolygonConfig {
        outer: project_points(outer, view),
        inner: rest.iter().map(|r| project_points(r, view)).collect(),
        fill,
        stroke: None,
        stroke_width: 0.0,
        opacity,
    });
}

fn draw_casing(item: &SceneGraphItem, view: &View, backend: &mut dyn RenderBackend) {
    let Some(casing_color) = item.style.get(Property::CasingColor).and_then(Value::as_color).cloned() else { return };
    let casing_width = item.style.get(Property::CasingWidth).and_then(Value::as_number).unwrap_or(0.0);
    let opacity = item.style.get(Property::Opacity).and_then(Value::as_number).unwrap_or(1.0);
    match &item.geometry {
        Geometry::Line(points) => backend.draw_path(PathConfig {
            points: project_points(points, view),
            stroke: casing_color,
            stroke_width: casing_width,
            dashes: None,
            opacity,
        }),
        Geometry::Polygon { outer, .. } => backend.draw_path(PathConfig {
            points: project_points(outer, view),
            stroke: casing_color,
            stroke_width: casing_width,
            dashes: None,
            opacity,
        }),
        Geometry::MultiPolygon { outer, .. } => {
            for ring in outer {
                backend.draw_path(PathConfig {
                    points: project_points(ring, view),
                    stroke: casing_color.clone(),
                    stroke_width: casing_width,
                    dashes: None,
                    opacity,
                });
            }
        }
        Geometry::Point(_) => {}
    }
}

fn draw_stroke(item: &SceneGraphItem, view: &View, backend: &mut dyn RenderBackend) {
    let stroke_color = item
        .style
        .get(Property::Color)
        .and_then(Value::as_color)
        .cloned()
        .unwrap_or_else(|| "#000000".parse().expect("valid fallback color"));
    let width = item.style.get(Property::Width).and_then(Value::as_number).unwrap_or(1.0);
    let opacity = item.style.get(Property::Opacity).and_then(Value::as_number).unwrap_or(1.0);
    let dashes = item.style.get(Property::DashesPattern).and_then(Value::as_str).map(parse_dash_list);

    match &item.geometry {
        Geometry::Line(points) => backend.draw_path(PathConfig {
            points: project_points(points, view),
            stroke: stroke_color,
            stroke_width: width,
            dashes,
            opacity,
        }),
        Geometry::Polygon { outer, .. } => backend.draw_path(PathConfig {
            points: project_points(outer, view),
            stroke: stroke_color,
            stroke_width: width,
            dashes,
            opacity,
        }),
        Geometry::MultiPolygon { outer, .. } => {
            for ring in outer {
                backend.draw_path(PathConfig {
                    points: project_points(ring, view),
                    stroke: stroke_color.clone(),
                    stroke_width: width,
                    dashes: dashes.clone(),
                    opacity,
                });
            }
        }
        Geometry::Point(_) => {}
    }
}

fn draw_label(item: &SceneGraphItem, view: &View, backend: &mut dyn RenderBackend, label_cache: &mut LabelBBoxCache) {
    let position = match &item.geometry {
        Geometry::Point(p) => *p,
        Geometry::Line(points) => midpoint(points),
        Geometry::Polygon { outer, .. } => centroid(outer),
        Geometry::MultiPolygon { outer, .. } => outer.first().map(|ring| centroid(ring)).unwrap_or(ScenePoint { x: 0.0, y: 0.0 }),
    };
    let screen_position = view.map_scene_to_screen(position);

    if let Some(icon) = item.style.get(Property::IconImage).and_then(Value::as_str) {
        let width = item.style.get(Property::IconWidth).and_then(Value::as_number).unwrap_or(16.0);
        let height = item.style.get(Property::IconHeight).and_then(Value::as_number).unwrap_or(16.0);
        let opacity = item.style.get(Property::Opacity).and_then(Value::as_number).unwrap_or(1.0);
        backend.draw_icon(IconConfig {
            position: screen_position,
            image: icon.to_string(),
            width,
            height,
            opacity,
        });
    }

    if let Some(text) = item.style.get(Property::Text).and_then(Value::as_str) {
        let font_size = item.style.get(Property::FontSize).and_then(Value::as_number).unwrap_or(12.0);
        let font_family = item
            .style
            .get(Property::FontFamily)
            .and_then(Value::as_str)
            .unwrap_or("sans-serif")
            .to_string();
        let color = item
            .style
            .get(Property::FontColor)
            .and_then(Value::as_color)
            .cloned()
            .unwrap_or_else(|| "#000000".parse().expect("valid fallback color"));
        let opacity = item.style.get(Property::Opacity).and_then(Value::as_number).unwrap_or(1.0);
        backend.draw_text(TextConfig {
            text: text.to_string(),
            position: screen_position,
            font_size,
            font_family,
            color,
            opacity,
        });

        let half_width = text.len() as f64 * font_size * 0.3;
        let scene_bbox = (
            ScenePoint { x: position.x - half_width, y: position.y - font_size },
            ScenePoint { x: position.x + half_width, y: position.y + font_size },
        );
        label_cache.boxes.insert(item.element_key, scene_bbox);
    }
}

fn midpoint(points: &[ScenePoint]) -> ScenePoint {
    if points.is_empty() {
        return ScenePoint { x: 0.0, y: 0.0 };
    }
    points[points.len() / 2]
}

fn centroid(ring: &[ScenePoint]) -> ScenePoint {
    if ring.is_empty() {
        return ScenePoint { x: 0.0, y: 0.0 };
    }
    let (mut sx, mut sy) = (0.0, 0.0);
    for p in ring {
        sx += p.x;
        sy += p.y;
    }
    ScenePoint { x: sx / ring.len() as f64, y: sy / ring.len() as f64 }
}

fn parse_dash_list(s: &str) -> Vec<f64> {
    s.split(',').filter_map(|p| p.trim().parse::<f64>().ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::ElementType;
    use crate::style::ResultLayer;

    struct RecordingBackend {
        polygons: usize,
        background_drawn: bool,
    }

    impl RenderBackend for RecordingBackend {
        fn draw_background(&mut self, _config: BackgroundConfig) {
            self.background_drawn = true;
        }
        fn draw_polygon(&mut self, _config: PolygonConfig) {
            self.polygons += 1;
        }
        fn draw_path(&mut self, _config: PathConfig) {}
        fn draw_icon(&mut self, _config: IconConfig) {}
        fn draw_text(&mut self, _config: TextConfig) {}
    }

    #[test]
    fn fill_phase_is_skipped_without_a_fill_color() {
        let mut style = ResultLayer::default();
        style.set(Property::Color, Value::color("#000000").unwrap());
        let item = SceneGraphItem {
            element_key: ElementKey(ElementType::Way, 1),
            layer: None,
            z_index: 0.0,
            phases: PhaseSet::FILL,
            geometry: Geometry::Polygon {
                outer: vec![
                    ScenePoint { x: 0.0, y: 0.0 },
                    ScenePoint { x: 1.0, y: 0.0 },
                    ScenePoint { x: 1.0, y: 1.0 },
                ],
                inner: vec![],
            },
            style,
        };
        let view = View::new(crate::osm::GeoCoord::from_degrees(0.0, 0.0), 19.0, 0.0, 400.0, 400.0);
        let graph = SceneGraph::build(vec![item]);
        let mut backend = RecordingBackend { polygons: 0, background_drawn: false };
        let mut cache = LabelBBoxCache::new();
        render_scene(&graph, &view, &MapCSSResult::new(), &mut backend, &mut cache);
        assert!(backend.background_drawn);
        assert_eq!(backend.polygons, 0);
    }
}
