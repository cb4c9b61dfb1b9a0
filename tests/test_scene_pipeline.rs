use std::error::Error;

use kosmindoor::osm::element::{GeoCoord, Node, Way};
use kosmindoor::osm::{DataSet, TagKeyTable, TagSet};
use kosmindoor::prelude::*;
use kosmindoor::style::selector::{ObjectType, ZoomRange};
use kosmindoor::style::{Declaration, Property, RawCondition, RawSelector, Rule, Value};

/// A square room: a closed way tagged `indoor=room` on level 0.
fn single_room_data_set() -> (DataSet, i64) {
    let mut table = TagKeyTable::new();
    let nodes = vec![
        Node { id: 1, coord: GeoCoord::from_degrees(52.5000, 13.4000), tags: TagSet::build(&mut table, []) },
        Node { id: 2, coord: GeoCoord::from_degrees(52.5001, 13.4000), tags: TagSet::build(&mut table, []) },
        Node { id: 3, coord: GeoCoord::from_degrees(52.5001, 13.4001), tags: TagSet::build(&mut table, []) },
        Node { id: 4, coord: GeoCoord::from_degrees(52.5000, 13.4001), tags: TagSet::build(&mut table, []) },
    ];
    let ways = vec![Way {
        id: 10,
        node_ids: vec![1, 2, 3, 4, 1],
        tags: TagSet::build(&mut table, [("indoor".to_string(), "room".to_string()), ("level".to_string(), "0".to_string())]),
        bbox: None,
    }];
    (DataSet::from_parts(nodes, ways, vec![], table), 10)
}

fn red_room_style() -> Style {
    Style {
        rules: vec![Rule {
            selector: RawSelector::Basic {
                object_type: ObjectType::Area,
                zoom: ZoomRange::unbounded(),
                conditions: vec![RawCondition::Exists("indoor".into())],
                class_filter: vec![],
            },
            layer: None,
            declarations: vec![Declaration::new(Property::FillColor, Value::color("#ff0000").unwrap())],
        }],
        canvas_rules: vec![],
    }
}

/// One closed way tagged `indoor=room` on level 0, styled
/// `fill-color: #f00`, evaluated on floor 0, yields exactly one result
/// layer with `FillColor = #ff0000` and one Polygon scene item.
#[test]
fn indoor_room_produces_one_red_polygon() -> Result<(), Box<dyn Error>> {
    let (data_set, way_id) = single_room_data_set();
    let mut data_set = data_set;
    let compiled = red_room_style().compile(&mut data_set.tag_table)?;
    let map_data = MapData::new(data_set, None, None);

    let element = kosmindoor::osm::Element::Way(map_data.data_set.way(way_id).unwrap());
    let mut result = MapCSSResult::new();
    evaluate(&compiled, &element, &map_data.data_set, 18, MapLevel(0), &mut result);
    assert_eq!(result.layers.len(), 1);
    assert_eq!(
        result.layers[0].get(Property::FillColor).and_then(Value::as_color).map(|c| c.to_rgba8()),
        Some([255, 0, 0, 255])
    );

    let view = View::new(GeoCoord::from_degrees(52.50005, 13.40005), 19.0, 0.0, 800.0, 600.0);
    let overlay = NoOverlay::default();
    let graph = build_scene(&map_data, &compiled, MapLevel(0), 18, &view, &overlay);
    let items: Vec<_> = graph.layer(&None).collect();
    assert_eq!(items.len(), 1);
    assert!(matches!(items[0].geometry, kosmindoor::scene::Geometry::Polygon { .. }));

    Ok(())
}

/// A style that never matches must still produce a usable (empty) scene
/// and render only the background, never panicking downstream.
#[test]
fn unmatched_elements_render_background_only() -> Result<(), Box<dyn Error>> {
    let (data_set, _) = single_room_data_set();
    let mut data_set = data_set;
    let style = Style {
        rules: vec![Rule {
            selector: RawSelector::Basic {
                object_type: ObjectType::Area,
                zoom: ZoomRange::unbounded(),
                conditions: vec![RawCondition::Exists("shop".into())],
                class_filter: vec![],
            },
            layer: None,
            declarations: vec![Declaration::new(Property::FillColor, Value::color("#00ff00").unwrap())],
        }],
        canvas_rules: vec![],
    };
    let compiled = style.compile(&mut data_set.tag_table)?;
    let map_data = MapData::new(data_set, None, None);
    let view = View::new(GeoCoord::from_degrees(52.50005, 13.40005), 19.0, 0.0, 800.0, 600.0);
    let overlay = NoOverlay::default();
    let graph = build_scene(&map_data, &compiled, MapLevel(0), 18, &view, &overlay);
    assert!(graph.is_empty());

    let mut svg = String::new();
    let mut backend = SvgBackend::new(&mut svg);
    let mut cache = LabelBBoxCache::new();
    render_scene(&graph, &view, &MapCSSResult::new(), &mut backend, &mut cache);
    assert!(svg.contains("background"));

    Ok(())
}
