use csscolorparser::Color;

use crate::scene::ScreenPoint;

/// Config for a filled/stroked polygon area (an MapCSS `area` selector's
/// Fill + Casing + Stroke phases combined into one draw call).
pub struct PolygonConfig {
    pub outer: Vec<ScreenPoint>,
    pub inner: Vec<Vec<ScreenPoint>>,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
}

/// Config for an open polyline (a `line`/`way` selector's Casing +
/// Stroke phases).
pub struct PathConfig {
    pub points: Vec<ScreenPoint>,
    pub stroke: Color,
    pub stroke_width: f64,
    pub dashes: Option<Vec<f64>>,
    pub opacity: f64,
}

/// Config for a point icon (the `icon-image` declaration's Label
/// phase).
pub struct IconConfig {
    pub position: ScreenPoint,
    pub image: String,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
}

/// Config for a text label.
pub struct TextConfig {
    pub text: String,
    pub position: ScreenPoint,
    pub font_size: f64,
    pub font_family: String,
    pub color: Color,
    pub opacity: f64,
}

/// Config for the canvas background fill, applied once per render before
/// any scene item.
pub struct BackgroundConfig {
    pub fill: Color,
}

/// Abstract backend for rendering a scene graph. Implementations could
/// be an SVG string writer or a rasterizer.
pub trait RenderBackend {
    fn draw_background(&mut self, config: BackgroundConfig);
    fn draw_polygon(&mut self, config: PolygonConfig);
    fn draw_path(&mut self, config: PathConfig);
    fn draw_icon(&mut self, config: IconConfig);
    fn draw_text(&mut self, config: TextConfig);
}
