//! Benchmarks the MapCSS evaluator's hot path: one `evaluate` call per
//! element, reusing a single `MapCSSResult` buffer the way the scene
//! controller and navmesh builder do.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kosmindoor::level::MapLevel;
use kosmindoor::osm::element::{GeoCoord, Node};
use kosmindoor::osm::{DataSet, TagKeyTable, TagSet};
use kosmindoor::style::{evaluate, Declaration, MapCSSResult, Property, RawCondition, RawSelector, Rule, Style, Value, ZoomRange};
use kosmindoor::style::selector::ObjectType;

fn room_data_set(count: usize) -> DataSet {
    let mut table = TagKeyTable::new();
    let nodes: Vec<Node> = (0..count)
        .map(|i| {
            let tags = TagSet::build(
                &mut table,
                [("indoor".to_string(), "room".to_string()), ("level".to_string(), "0".to_string())],
            );
            Node {
                id: i as i64,
                coord: GeoCoord::from_degrees(52.5 + i as f64 * 1e-5, 13.4),
                tags,
            }
        })
        .collect();
    DataSet::from_parts(nodes, vec![], vec![], table)
}

fn room_style() -> Style {
    Style {
        rules: vec![Rule {
            selector: RawSelector::Basic {
                object_type: ObjectType::Node,
                zoom: ZoomRange::unbounded(),
                conditions: vec![RawCondition::Exists("indoor".into())],
                class_filter: vec![],
            },
            layer: None,
            declarations: vec![Declaration::new(Property::FillColor, Value::color("#ffcc00").unwrap())],
        }],
        canvas_rules: vec![],
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let mut data_set = room_data_set(2_000);
    let style = room_style().compile(&mut data_set.tag_table).expect("style compiles");
    let mut result = MapCSSResult::new();

    c.bench_function("evaluate_2000_nodes", |b| {
        b.iter(|| {
            for node in data_set.nodes() {
                let element = kosmindoor::osm::Element::Node(node);
                result.clear();
                evaluate(&style, &element, &data_set, black_box(18), MapLevel(0), &mut result);
                black_box(&result);
            }
        })
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
