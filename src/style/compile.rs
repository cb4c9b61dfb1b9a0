use crate::error::{MapError, MapResult};
use crate::osm::TagKeyTable;

use super::condition::{Condition, NumericOp};
use super::declaration::Declaration;
use super::selector::{ClassRequirement, ObjectType, Selector, ZoomRange};

/// The uncompiled (string-keyed) form of [`Condition`]. A style is
/// authored against raw tag key names; [`Style::compile`] interns every
/// key it references against a [`TagKeyTable`] exactly once.
#[derive(Clone, Debug)]
pub enum RawCondition {
    Exists(String),
    Eq(String, String),
    NotEq(String, String),
    Numeric(String, NumericOp, f64),
    Matches(String, String),
}

impl RawCondition {
    fn compile(&self, table: &mut TagKeyTable) -> Condition {
        match self {
            RawCondition::Exists(key) => Condition::Exists(table.intern(key)),
            RawCondition::Eq(key, value) => Condition::Eq(table.intern(key), value.clone()),
            RawCondition::NotEq(key, value) => Condition::NotEq(table.intern(key), value.clone()),
            RawCondition::Numeric(key, op, rhs) => Condition::Numeric(table.intern(key), *op, *rhs),
            RawCondition::Matches(key, needle) => Condition::Matches(table.intern(key), needle.clone()),
        }
    }
}

/// The uncompiled form of [`Selector`], authored with raw condition keys.
#[derive(Clone, Debug)]
pub enum RawSelector {
    Basic {
        object_type: ObjectType,
        zoom: ZoomRange,
        conditions: Vec<RawCondition>,
        class_filter: Vec<ClassRequirement>,
    },
    Chained(Vec<RawSelector>),
    Union(Vec<RawSelector>),
}

impl RawSelector {
    fn compile(&self, table: &mut TagKeyTable) -> Selector {
        match self {
            RawSelector::Basic { object_type, zoom, conditions, class_filter } => Selector::Basic {
                object_type: *object_type,
                zoom: *zoom,
                conditions: conditions.iter().map(|c| c.compile(table)).collect(),
                class_filter: class_filter.clone(),
            },
            RawSelector::Chained(chain) => Selector::Chained(chain.iter().map(|s| s.compile(table)).collect()),
            RawSelector::Union(options) => Selector::Union(options.iter().map(|s| s.compile(table)).collect()),
        }
    }
}

/// One MapCSS rule: `selector { declarations }`, optionally scoped to a
/// named layer (`way[layer=1]::layer_name { ... }`).
#[derive(Clone, Debug)]
pub struct Rule {
    pub selector: RawSelector,
    pub layer: Option<String>,
    pub declarations: Vec<Declaration>,
}

/// A whole stylesheet in its uncompiled, string-keyed form. Building one
/// of these from MapCSS source text is out of scope for this crate;
/// callers construct it directly or via whatever parser they bring.
#[derive(Clone, Debug, Default)]
pub struct Style {
    pub rules: Vec<Rule>,
    pub canvas_rules: Vec<Vec<Declaration>>,
}

/// A compiled rule: conditions resolved to interned [`Condition`]s.
#[derive(Clone, Debug)]
pub struct CompiledRule {
    pub selector: Selector,
    pub layer: Option<String>,
    pub declarations: Vec<Declaration>,
}

/// The output of [`Style::compile`]: every rule's tag keys interned
/// against one [`TagKeyTable`]. Evaluating against a data set built from
/// a different table is a programming error the evaluator cannot detect
/// (see [`MapError::StyleNotCompiled`] for the precondition this
/// prevents: evaluating before compiling at all).
///
/// `area_key`/`type_key` are the `area` and `type` tag keys pre-resolved
/// once here, as object-type disambiguation (`area=yes/no`, relation
/// `type=multipolygon`) needs on every [`super::eval::object_type_of`]
/// call.
#[derive(Clone, Debug)]
pub struct CompiledStyle {
    pub rules: Vec<CompiledRule>,
    pub canvas_rules: Vec<Vec<Declaration>>,
    pub area_key: crate::osm::TagKey,
    pub type_key: crate::osm::TagKey,
}

impl Style {
    /// Interns every condition key this style references against `table`,
    /// pre-resolves the `area`/`type` tag keys object-type disambiguation
    /// needs, and returns the compiled form ready for
    /// [`super::eval::evaluate`].
    pub fn compile(&self, table: &mut TagKeyTable) -> MapResult<CompiledStyle> {
        if self.rules.is_empty() && self.canvas_rules.is_empty() {
            return Err(MapError::ParseError("style has no rules to compile".into()));
        }
        let rules = self
            .rules
            .iter()
            .map(|r| CompiledRule {
                selector: r.selector.compile(table),
                layer: r.layer.clone(),
                declarations: r.declarations.clone(),
            })
            .collect();
        Ok(CompiledStyle {
            rules,
            canvas_rules: self.canvas_rules.clone(),
            area_key: table.intern("area"),
            type_key: table.intern("type"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::declaration::{Property, Value};

    #[test]
    fn compile_interns_condition_keys_and_preserves_rule_order() {
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
        let mut table = TagKeyTable::new();
        let compiled = style.compile(&mut table).unwrap();
        assert_eq!(compiled.rules.len(), 1);
        assert!(table.lookup("entrance").is_some());
        assert_eq!(compiled.area_key, table.intern("area"));
        assert_eq!(compiled.type_key, table.intern("type"));
    }

    #[test]
    fn compiling_an_empty_style_is_an_error() {
        let style = Style::default();
        let mut table = TagKeyTable::new();
        assert!(style.compile(&mut table).is_err());
    }
}
