use crate::osm::{DataSet, Element, TagKey, TagLookup};

/// A compiled boolean predicate over an element's tags.
///
/// The MapCSS text grammar that produces these is out of scope for this
/// crate; this is the evaluation model it must feed. Keys
/// are interned [`TagKey`]s, resolved once during [`crate::style::Style::compile`].
#[derive(Clone, Debug)]
pub enum Condition {
    Exists(TagKey),
    Eq(TagKey, String),
    NotEq(TagKey, String),
    /// Numeric comparison: `key <op> number`, e.g. `width >= 3`.
    Numeric(TagKey, NumericOp, f64),
    /// A simple `*` (case-insensitive substring) regex predicate. Full
    /// regex compilation belongs to the (out of scope) parser; by the
    /// time a condition reaches the evaluator it is just this closure's
    /// input.
    Matches(TagKey, String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumericOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Condition {
    pub fn eval(&self, element: &Element<'_>, data_set: &DataSet) -> bool {
        match self {
            Condition::Exists(key) => element.tag_value(&data_set.tag_table, TagLookup::Interned(*key)).is_some(),
            Condition::Eq(key, expected) => {
                element.tag_value(&data_set.tag_table, TagLookup::Interned(*key)) == Some(expected.as_str())
            }
            Condition::NotEq(key, expected) => {
                element.tag_value(&data_set.tag_table, TagLookup::Interned(*key)) != Some(expected.as_str())
            }
            Condition::Numeric(key, op, rhs) => {
                match element
                    .tag_value(&data_set.tag_table, TagLookup::Interned(*key))
                    .and_then(|v| v.parse::<f64>().ok())
                {
                    Some(lhs) => match op {
                        NumericOp::Lt => lhs < *rhs,
                        NumericOp::Le => lhs <= *rhs,
                        NumericOp::Gt => lhs > *rhs,
                        NumericOp::Ge => lhs >= *rhs,
                    },
                    None => false,
                }
            }
            Condition::Matches(key, needle) => element
                .tag_value(&data_set.tag_table, TagLookup::Interned(*key))
                .is_some_and(|v| v.to_lowercase().contains(&needle.to_lowercase())),
        }
    }
}
