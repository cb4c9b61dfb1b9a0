use std::collections::BTreeSet;

use ahash::AHashMap;

use crate::level::MapLevel;
use crate::osm::{DataSet, Element, TagLookup};

use super::compile::CompiledStyle;
use super::declaration::{Declaration, Property, Value};
use super::selector::{MatchState, ObjectType};

/// One rendering layer's resolved property set after evaluation.
/// Declarations apply last-write-wins within a layer: a later matching
/// rule overwrites a property an earlier rule set, it does not merge
/// with it.
#[derive(Clone, Debug, Default)]
pub struct ResultLayer {
    pub layer: Option<String>,
    values: AHashMap<Property, Value>,
}

impl ResultLayer {
    pub fn get(&self, property: Property) -> Option<&Value> {
        self.values.get(&property)
    }

    /// Sets a property directly, bypassing rule matching. Used by callers
    /// that build a [`ResultLayer`] by hand (tests, the navmesh builder's
    /// synthetic link layers).
    pub fn set(&mut self, property: Property, value: Value) {
        self.values.insert(property, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Property, &Value)> {
        self.values.iter()
    }
}

/// A reusable evaluation result buffer. Callers evaluate many elements
/// against the same style in a tight loop (once per element per floor);
/// [`MapCSSResult::clear`] lets a single allocation be reused across
/// calls instead of building a fresh `Vec`/`BTreeSet` each time.
#[derive(Clone, Debug, Default)]
pub struct MapCSSResult {
    pub layers: Vec<ResultLayer>,
    pub classes: BTreeSet<String>,
}

impl MapCSSResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.layers.clear();
        self.classes.clear();
    }

    fn layer_mut(&mut self, layer: &Option<String>) -> &mut ResultLayer {
        if let Some(idx) = self.layers.iter().position(|l| &l.layer == layer) {
            return &mut self.layers[idx];
        }
        self.layers.push(ResultLayer { layer: layer.clone(), values: AHashMap::default() });
        self.layers.last_mut().expect("just pushed")
    }
}

/// Determines the [`ObjectType`] a selector sees for `element`: a way is
/// `Area` or `Line` per the `area=yes/no` tag when present, else per the
/// closedness test (closed → `Area`, open → `Line`); a relation tagged
/// `type=multipolygon` is `Area`; nodes/other relations keep their own
/// kind.
///
/// `area_key`/`type_key` are the tag keys [`super::compile::Style::compile`]
/// pre-resolves, so this never falls back to a literal linear scan on the
/// evaluation hot path.
pub fn object_type_of(element: &Element<'_>, data_set: &DataSet, area_key: crate::osm::TagKey, type_key: crate::osm::TagKey) -> ObjectType {
    match element {
        Element::Null => ObjectType::Any,
        Element::Node(_) => ObjectType::Node,
        Element::Way(w) => match element.tag_value(&data_set.tag_table, TagLookup::Interned(area_key)) {
            Some("yes") => ObjectType::Area,
            Some("no") => ObjectType::Line,
            _ => {
                if w.is_closed() {
                    ObjectType::Area
                } else {
                    ObjectType::Line
                }
            }
        },
        Element::Relation(_) => {
            let is_multipolygon = element
                .tag_value(&data_set.tag_table, TagLookup::Interned(type_key))
                .map(|v| v == "multipolygon")
                .unwrap_or(false);
            if is_multipolygon {
                ObjectType::Area
            } else {
                ObjectType::Relation
            }
        }
    }
}

/// Evaluates every rule of `style` against `element` at `(zoom, floor)`,
/// in rule order, writing resolved layer/property state into `result`.
///
/// Classes are write-then-test: a `set .name` declaration makes `.name`
/// visible to every rule evaluated *after* it within this same call, not
/// to rules before it. Callers must call [`MapCSSResult::clear`]
/// themselves between elements; `evaluate` never clears on entry so a
/// caller can pre-seed classes (e.g. `.initial` from a previous pass)
/// before calling it.
pub fn evaluate(style: &CompiledStyle, element: &Element<'_>, data_set: &DataSet, zoom: u32, floor: MapLevel, result: &mut MapCSSResult) {
    let object_type = object_type_of(element, data_set, style.area_key, style.type_key);

    for rule in &style.rules {
        let matched = {
            let state = MatchState {
                element,
                data_set,
                zoom,
                floor,
                object_type,
                classes: &result.classes,
            };
            rule.selector.matches(&state)
        };
        if !matched {
            continue;
        }
        apply_declarations(&rule.declarations, &rule.layer, result);
    }
}

/// The single-rule-body form `evaluateCanvas` uses: canvas rules have no
/// selector (they always match) and no layer (there is exactly one
/// implicit canvas layer).
pub fn evaluate_canvas(style: &CompiledStyle, result: &mut MapCSSResult) {
    for declarations in &style.canvas_rules {
        apply_declarations(declarations, &None, result);
    }
}

fn apply_declarations(declarations: &[Declaration], layer: &Option<String>, result: &mut MapCSSResult) {
    for decl in declarations {
        if decl.property == Property::SetClass {
            if let Some(name) = &decl.set_class {
                result.classes.insert(name.clone());
            }
            continue;
        }
        result.layer_mut(layer).values.insert(decl.property, decl.value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::element::{GeoCoord, Node};
    use crate::osm::{DataSet, TagKeyTable, TagSet};
    use crate::style::compile::{RawCondition, RawSelector, Rule, Style};
    use crate::style::selector::ZoomRange;

    fn style_with_set_class_then_dependent_rule() -> Style {
        Style {
            rules: vec![
                Rule {
                    selector: RawSelector::Basic {
                        object_type: ObjectType::Node,
                        zoom: ZoomRange::unbounded(),
                        conditions: vec![RawCondition::Exists("entrance".into())],
                        class_filter: vec![],
                    },
                    layer: None,
                    declarations: vec![Declaration::set_class("entrance")],
                },
                Rule {
                    selector: RawSelector::Basic {
                        object_type: ObjectType::Node,
                        zoom: ZoomRange::unbounded(),
                        conditions: vec![],
                        class_filter: vec![super::super::selector::ClassRequirement::Set("entrance".into())],
                    },
                    layer: None,
                    declarations: vec![Declaration::new(Property::IconImage, Value::Str("door".into()))],
                },
            ],
            canvas_rules: vec![],
        }
    }

    #[test]
    fn write_then_test_class_within_one_evaluation() {
        let mut table = TagKeyTable::new();
        let tags = TagSet::build(&mut table, [("entrance".to_string(), "yes".to_string())]);
        let node = Node { id: 1, coord: GeoCoord::from_degrees(0.0, 0.0), tags };

        let style = style_with_set_class_then_dependent_rule();
        let compiled = style.compile(&mut table).unwrap();
        let ds = DataSet::from_parts(vec![node], vec![], vec![], table);

        let element = Element::Node(ds.node(1).unwrap());
        let mut result = MapCSSResult::new();
        evaluate(&compiled, &element, &ds, 17, MapLevel(0), &mut result);

        assert!(result.classes.contains("entrance"));
        let layer = &result.layers[0];
        assert_eq!(layer.get(Property::IconImage).and_then(Value::as_str), Some("door"));
    }
}
