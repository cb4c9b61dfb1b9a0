use super::compile::CompiledStyle;
use super::eval::{evaluate_canvas, MapCSSResult};

/// The resolved background/canvas appearance for one render pass:
/// background color, default font, and whatever other canvas-scoped
/// properties the style's canvas rules set. There is exactly one canvas
/// result per render, independent of zoom or floor.
pub fn resolve_canvas(style: &CompiledStyle) -> MapCSSResult {
    let mut result = MapCSSResult::new();
    evaluate_canvas(style, &mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::TagKeyTable;
    use crate::style::declaration::{Declaration, Property, Value};

    #[test]
    fn canvas_rules_populate_the_implicit_canvas_layer() {
        let mut table = TagKeyTable::new();
        let style = CompiledStyle {
            rules: vec![],
            canvas_rules: vec![vec![Declaration::new(Property::FillColor, Value::color("#ffffff").unwrap())]],
            area_key: table.intern("area"),
            type_key: table.intern("type"),
        };
        let result = resolve_canvas(&style);
        assert_eq!(result.layers.len(), 1);
        assert!(result.layers[0].get(Property::FillColor).is_some());
    }
}
