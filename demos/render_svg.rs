//! Builds a tiny two-room floor, styles it with a hand-written MapCSS
//! evaluation model, and writes the resulting scene as SVG — the
//! end-to-end path a host application drives: `DataSet` -> `MapData` ->
//! compiled `Style` -> `SceneGraph` -> `RenderBackend`.

use kosmindoor::osm::element::{GeoCoord, Node, Way};
use kosmindoor::osm::{DataSet, TagKeyTable, TagSet};
use kosmindoor::prelude::*;
use kosmindoor::style::selector::{ObjectType, ZoomRange};
use kosmindoor::style::{Declaration, Property, RawCondition, RawSelector, Rule, Value};

fn two_room_floor() -> DataSet {
    let mut table = TagKeyTable::new();
    let nodes = vec![
        Node { id: 1, coord: GeoCoord::from_degrees(52.5000, 13.4000), tags: TagSet::build(&mut table, []) },
        Node { id: 2, coord: GeoCoord::from_degrees(52.5002, 13.4000), tags: TagSet::build(&mut table, []) },
        Node { id: 3, coord: GeoCoord::from_degrees(52.5002, 13.4002), tags: TagSet::build(&mut table, []) },
        Node { id: 4, coord: GeoCoord::from_degrees(52.5000, 13.4002), tags: TagSet::build(&mut table, []) },
        Node { id: 5, coord: GeoCoord::from_degrees(52.5002, 13.4002), tags: TagSet::build(&mut table, []) },
        Node { id: 6, coord: GeoCoord::from_degrees(52.5004, 13.4002), tags: TagSet::build(&mut table, []) },
        Node { id: 7, coord: GeoCoord::from_degrees(52.5004, 13.4004), tags: TagSet::build(&mut table, []) },
        Node { id: 8, coord: GeoCoord::from_degrees(52.5002, 13.4004), tags: TagSet::build(&mut table, []) },
    ];
    let ways = vec![
        Way {
            id: 10,
            node_ids: vec![1, 2, 3, 4, 1],
            tags: TagSet::build(&mut table, [("indoor".into(), "room".into()), ("name".into(), "Lobby".into()), ("level".into(), "0".into())]),
            bbox: None,
        },
        Way {
            id: 11,
            node_ids: vec![5, 6, 7, 8, 5],
            tags: TagSet::build(&mut table, [("indoor".into(), "room".into()), ("name".into(), "Office".into()), ("level".into(), "0".into())]),
            bbox: None,
        },
    ];
    DataSet::from_parts(nodes, ways, vec![], table)
}

fn room_style() -> Style {
    Style {
        rules: vec![
            Rule {
                selector: RawSelector::Basic {
                    object_type: ObjectType::Area,
                    zoom: ZoomRange::unbounded(),
                    conditions: vec![RawCondition::Exists("indoor".into())],
                    class_filter: vec![],
                },
                layer: None,
                declarations: vec![
                    Declaration::new(Property::FillColor, Value::color("#e8e4da").unwrap()),
                    Declaration::new(Property::CasingColor, Value::color("#9a9286").unwrap()),
                    Declaration::new(Property::CasingWidth, Value::Number(1.5)),
                ],
            },
            Rule {
                selector: RawSelector::Basic {
                    object_type: ObjectType::Area,
                    zoom: ZoomRange::unbounded(),
                    conditions: vec![RawCondition::Exists("name".into())],
                    class_filter: vec![],
                },
                layer: None,
                declarations: vec![Declaration::new(Property::Text, Value::Str("Room".into()))],
            },
        ],
        canvas_rules: vec![Vec::from([Declaration::new(Property::FillColor, Value::color("#ffffff").unwrap())])],
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut data_set = two_room_floor();
    let compiled = room_style().compile(&mut data_set.tag_table)?;
    let map_data = MapData::new(data_set, Some("Europe/Berlin".to_string()), None);

    let view = View::new(GeoCoord::from_degrees(52.5002, 13.4002), 20.0, 0.0, 640.0, 480.0);
    let overlay = NoOverlay::default();
    let graph = build_scene(&map_data, &compiled, MapLevel(0), 20, &view, &overlay);

    let mut canvas_result = MapCSSResult::new();
    evaluate_canvas(&compiled, &mut canvas_result);

    let mut svg = String::new();
    let mut backend = SvgBackend::new(&mut svg);
    let mut label_cache = LabelBBoxCache::new();
    render_scene(&graph, &view, &canvas_result, &mut backend, &mut label_cache);

    std::fs::write("demos/render_svg.svg", &svg)?;
    println!("wrote {} scene items to demos/render_svg.svg", graph.len());
    Ok(())
}
