//! The MapCSS evaluation model: compiled conditions and selectors,
//! declarations, and the `evaluate`/`evaluateCanvas` entry points that
//! turn a style plus an element into resolved layer state.
//!
//! Parsing MapCSS source text into the types below is out of scope for
//! this crate; it is the compiled representation a parser (or a caller
//! constructing styles directly, as the tests here do) must produce.

pub mod canvas;
pub mod compile;
pub mod condition;
pub mod declaration;
pub mod eval;
pub mod selector;

pub use compile::{CompiledRule, CompiledStyle, RawCondition, RawSelector, Rule, Style};
pub use condition::{Condition, NumericOp};
pub use declaration::{Declaration, Property, Value};
pub use eval::{evaluate, evaluate_canvas, object_type_of, MapCSSResult, ResultLayer};
pub use selector::{ClassRequirement, MatchState, ObjectType, Selector, ZoomRange};
