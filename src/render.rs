//! The painter renderer: phase-ordered draw of a scene graph onto an
//! abstract 2D canvas.

pub mod backend;
pub mod canvas;
pub mod renderer;

pub use canvas::{BackgroundConfig, IconConfig, PathConfig, PolygonConfig, RenderBackend, TextConfig};
pub use renderer::{render_scene, LabelBBoxCache};

pub use backend::svg::SvgBackend;
#[cfg(feature = "raster")]
pub use backend::raster::RasterBackend;
