use std::fmt::Write;

use csscolorparser::Color;
use html_escape::encode_text;

use super::super::canvas::{BackgroundConfig, IconConfig, PathConfig, PolygonConfig, RenderBackend, TextConfig};

/// Renders a color as `#rrggbbaa` via its resolved RGBA8 channels,
/// matching how [`crate::style::Value::color`] stores colors parsed
/// once at compile time rather than re-parsing a string on the hot path.
fn hex(color: &Color) -> String {
    let [r, g, b, a] = color.to_rgba8();
    format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
}

/// Writes a scene as SVG XML directly into a caller-owned `String`
/// buffer, so the caller controls allocation and sink lifetime. Useful
/// as the reference backend for golden-file tests and debug dumps.
pub struct SvgBackend<'a> {
    buffer: &'a mut String,
}

impl<'a> SvgBackend<'a> {
    pub fn new(buffer: &'a mut String) -> Self {
        Self { buffer }
    }
}

impl<'a> RenderBackend for SvgBackend<'a> {
    fn draw_background(&mut self, config: BackgroundConfig) {
        let _ = writeln!(self.buffer, r#"<rect class="background" width="100%" height="100%" fill="{}" />"#, hex(&config.fill));
    }

    fn draw_polygon(&mut self, config: PolygonConfig) {
        if config.outer.is_empty() {
            return;
        }
        let mut d = String::new();
        write_ring(&mut d, &config.outer);
        for ring in &config.inner {
            write_ring(&mut d, ring);
        }
        let fill = config.fill.as_ref().map(hex).unwrap_or_else(|| "none".to_string());
        let stroke = config.stroke.as_ref().map(hex).unwrap_or_else(|| "none".to_string());
        let _ = writeln!(
            self.buffer,
            r#"<path d="{d}" fill="{fill}" fill-rule="evenodd" stroke="{stroke}" stroke-width="{:.3}" opacity="{:.3}" />"#,
            config.stroke_width, config.opacity
        );
    }

    fn draw_path(&mut self, config: PathConfig) {
        if config.points.len() < 2 {
            return;
        }
        let mut d = String::new();
        write_open_path(&mut d, &config.points);
        let dash_attr = config
            .dashes
            .map(|d| format!(r#" stroke-dasharray="{}""#, d.iter().map(|n| format!("{n:.2}")).collect::<Vec<_>>().join(",")))
            .unwrap_or_default();
        let _ = writeln!(
            self.buffer,
            r#"<path d="{d}" fill="none" stroke="{}" stroke-width="{:.3}" opacity="{:.3}"{dash_attr} />"#,
            hex(&config.stroke),
            config.stroke_width,
            config.opacity
        );
    }

    fn draw_icon(&mut self, config: IconConfig) {
        let _ = writeln!(
            self.buffer,
            r#"<image href="{}" x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" opacity="{:.3}" />"#,
            encode_text(&config.image),
            config.position.x - config.width / 2.0,
            config.position.y - config.height / 2.0,
            config.width,
            config.height,
            config.opacity
        );
    }

    fn draw_text(&mut self, config: TextConfig) {
        let _ = writeln!(
            self.buffer,
            r#"<text x="{:.3}" y="{:.3}" font-size="{:.1}" font-family="{}" fill="{}" opacity="{:.3}" text-anchor="middle">{}</text>"#,
            config.position.x,
            config.position.y,
            config.font_size,
            encode_text(&config.font_family),
            hex(&config.color),
            config.opacity,
            encode_text(&config.text)
        );
    }
}

fn write_ring(d: &mut String, ring: &[crate::scene::ScreenPoint]) {
    write_open_path(d, ring);
    let _ = write!(d, " Z");
}

fn write_open_path(d: &mut String, points: &[crate::scene::ScreenPoint]) {
    for (i, p) in points.iter().enumerate() {
        if i == 0 {
            let _ = write!(d, "M {:.3} {:.3}", p.x, p.y);
        } else {
            let _ = write!(d, " L {:.3} {:.3}", p.x, p.y);
        }
    }
}
