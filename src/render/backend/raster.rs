//! `raster` feature: a `tiny-skia`-backed [`RenderBackend`] for
//! screenshot-style output. This crate needs no glyph rasterizer of its
//! own since text metrics are the host toolkit's concern; icon/text draw
//! calls are no-ops here.

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::super::canvas::{BackgroundConfig, IconConfig, PathConfig, PolygonConfig, RenderBackend, TextConfig};

/// Rasterizes a scene into an owned RGBA8 [`Pixmap`].
pub struct RasterBackend {
    pub pixmap: Pixmap,
}

impl RasterBackend {
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self { pixmap: Pixmap::new(width, height)? })
    }
}

fn paint_for(color: &csscolorparser::Color, opacity: f64) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, ((a as f64) * opacity).round() as u8);
    paint.anti_alias = true;
    paint
}

impl RenderBackend for RasterBackend {
    fn draw_background(&mut self, config: BackgroundConfig) {
        let [r, g, b, a] = config.fill.to_rgba8();
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    fn draw_polygon(&mut self, config: PolygonConfig) {
        if config.outer.len() < 3 {
            return;
        }
        let mut pb = PathBuilder::new();
        add_ring(&mut pb, &config.outer);
        for ring in &config.inner {
            add_ring(&mut pb, ring);
        }
        let Some(path) = pb.finish() else { return };

        if let Some(fill) = &config.fill {
            let paint = paint_for(fill, config.opacity);
            self.pixmap.fill_path(&path, &paint, FillRule::EvenOdd, Transform::identity(), None);
        }
        if let Some(stroke_color) = &config.stroke {
            let paint = paint_for(stroke_color, config.opacity);
            let stroke = Stroke { width: config.stroke_width as f32, ..Default::default() };
            self.pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    fn draw_path(&mut self, config: PathConfig) {
        if config.points.len() < 2 {
            return;
        }
        let mut pb = PathBuilder::new();
        add_open(&mut pb, &config.points);
        let Some(path) = pb.finish() else { return };
        let paint = paint_for(&config.stroke, config.opacity);
        let mut stroke = Stroke { width: config.stroke_width as f32, ..Default::default() };
        if let Some(dashes) = &config.dashes {
            let pattern: Vec<f32> = dashes.iter().map(|d| *d as f32).collect();
            stroke.dash = tiny_skia::StrokeDash::new(pattern, 0.0);
        }
        self.pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn draw_icon(&mut self, _config: IconConfig) {
        // Icon rasterization needs an image decoder this crate does not
        // own; hosts compose icons themselves. Geometry-only backends
        // (this one) skip it.
    }

    fn draw_text(&mut self, _config: TextConfig) {
        // Same rationale as draw_icon: glyph shaping/rasterization is
        // the host toolkit's job, not this crate's.
    }
}

fn add_ring(pb: &mut PathBuilder, points: &[crate::scene::ScreenPoint]) {
    add_open(pb, points);
    pb.close();
}

fn add_open(pb: &mut PathBuilder, points: &[crate::scene::ScreenPoint]) {
    for (i, p) in points.iter().enumerate() {
        if i == 0 {
            pb.move_to(p.x as f32, p.y as f32);
        } else {
            pb.line_to(p.x as f32, p.y as f32);
        }
    }
}
