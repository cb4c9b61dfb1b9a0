use crate::level::MapLevel;
use crate::osm::{DataSet, Element};
use super::condition::Condition;

/// The object type a [`Selector::Basic`] matches against. `Area` matches
/// a closed way or multipolygon relation; `Line` matches a non-closed
/// way. `Any` matches every geometry-bearing element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectType {
    Node,
    Way,
    Relation,
    Area,
    Line,
    Canvas,
    Any,
}

/// An inclusive zoom-level range. `None` on either bound means
/// unbounded.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZoomRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl ZoomRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, zoom: u32) -> bool {
        self.min.is_none_or(|min| zoom >= min) && self.max.is_none_or(|max| zoom <= max)
    }
}

/// Whether a selector requires a class to be set or explicitly unset.
/// Classes are write-then-test within a single evaluation pass, in rule
/// order: a class filter tests the state accumulated by *earlier* rules
/// in this same evaluation, not later ones.
#[derive(Clone, Debug)]
pub enum ClassRequirement {
    Set(String),
    Unset(String),
}

/// One selector. `Basic` is the atomic case; `Chained` models MapCSS
/// descendant/parent selector sequences (simplified here — see
/// DESIGN.md — to "every sub-selector matches the same evaluation
/// state", since this crate does not model element hierarchy beyond the
/// single `(element, zoom, floor)` state the grammar feeds in); `Union`
/// is plain disjunction.
#[derive(Clone, Debug)]
pub enum Selector {
    Basic {
        object_type: ObjectType,
        zoom: ZoomRange,
        conditions: Vec<Condition>,
        class_filter: Vec<ClassRequirement>,
    },
    Chained(Vec<Selector>),
    Union(Vec<Selector>),
}

/// The live state a selector is matched against: the element itself, the
/// current zoom/floor, the object type inferred from its geometry, and
/// the classes set by earlier rules in this evaluation.
pub struct MatchState<'a, 'b> {
    pub element: &'b Element<'a>,
    pub data_set: &'a DataSet,
    pub zoom: u32,
    pub floor: MapLevel,
    pub object_type: ObjectType,
    pub classes: &'b std::collections::BTreeSet<String>,
}

impl Selector {
    pub fn matches(&self, state: &MatchState<'_, '_>) -> bool {
        match self {
            Selector::Basic { object_type, zoom, conditions, class_filter } => {
                object_type_matches(*object_type, state.object_type)
                    && zoom.contains(state.zoom)
                    && conditions.iter().all(|c| c.eval(state.element, state.data_set))
                    && class_filter.iter().all(|req| match req {
                        ClassRequirement::Set(name) => state.classes.contains(name),
                        ClassRequirement::Unset(name) => !state.classes.contains(name),
                    })
            }
            Selector::Chained(chain) => chain.iter().all(|s| s.matches(state)),
            Selector::Union(options) => options.iter().any(|s| s.matches(state)),
        }
    }
}

fn object_type_matches(selector_type: ObjectType, actual: ObjectType) -> bool {
    match selector_type {
        ObjectType::Any => actual != ObjectType::Canvas,
        // `object_type_of` never classifies a real way as plain `Way`; it
        // always resolves it further to `Area` (closed) or `Line` (open).
        // A `way { ... }` selector must still match either.
        ObjectType::Way => matches!(actual, ObjectType::Way | ObjectType::Area | ObjectType::Line),
        other => other == actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_range_bounds() {
        let r = ZoomRange { min: Some(14), max: Some(18) };
        assert!(!r.contains(13));
        assert!(r.contains(14));
        assert!(r.contains(18));
        assert!(!r.contains(19));
        assert!(ZoomRange::unbounded().contains(0));
    }

    #[test]
    fn any_object_type_excludes_canvas() {
        assert!(object_type_matches(ObjectType::Any, ObjectType::Way));
        assert!(!object_type_matches(ObjectType::Any, ObjectType::Canvas));
        assert!(object_type_matches(ObjectType::Way, ObjectType::Way));
        assert!(!object_type_matches(ObjectType::Way, ObjectType::Node));
    }

    #[test]
    fn way_selector_matches_area_and_line_resolved_types() {
        // `object_type_of` never emits a bare `Way`; it always resolves a
        // real way to `Area` (closed) or `Line` (open), so a `way { }`
        // selector must match both.
        assert!(object_type_matches(ObjectType::Way, ObjectType::Area));
        assert!(object_type_matches(ObjectType::Way, ObjectType::Line));
        assert!(!object_type_matches(ObjectType::Way, ObjectType::Relation));
    }
}
