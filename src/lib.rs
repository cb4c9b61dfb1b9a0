//! kosmindoor renders and routes on indoor maps derived from OpenStreetMap
//! data. Given raw OSM nodes/ways/relations plus a compiled MapCSS style,
//! it produces a per-floor 2D scene graph for display, supports
//! hit-testing and panning/zooming/level changes, and builds a 3D
//! navigation mesh stitched across floor levels through elevator, stair,
//! and escalator connections.
//!
//! This crate covers the style-driven scene assembly and
//! navmesh-construction pipeline: the [`style`] evaluator, the [`scene`]
//! controller, the [`hit`] detector, and the [`navmesh`] builder, all
//! sharing the same compiled-style evaluation model over the [`osm`] data
//! model. OSM wire-format readers, the UI toolkit shell, and the
//! solid-voxel mesh generator itself are out of scope; they are modeled
//! as traits ([`navmesh::SolidVoxelNavmeshBackend`],
//! [`scene::overlay::OverlaySource`]) a host application implements.

pub mod config;
pub mod error;
pub mod hit;
pub mod level;
pub mod navmesh;
pub mod osm;
pub mod render;
pub mod scene;
pub mod style;
pub mod ui;

pub mod prelude {
    pub use crate::config::{NavmeshSolverConfig, PartitionType, StyleSelection, WellKnownStyle};
    pub use crate::error::{MapError, MapResult};
    pub use crate::hit::{hit_test, HitResult};
    pub use crate::level::{parse_level_list, ElementKey, LevelMap, MapLevel};
    pub use crate::navmesh::{NavMeshGeometry, NavMeshTransform, NavmeshBuilder, SolidVoxelNavmeshBackend};
    pub use crate::osm::{DataSet, Element, MapData};
    #[cfg(feature = "raster")]
    pub use crate::render::RasterBackend;
    pub use crate::render::{render_scene, LabelBBoxCache, RenderBackend, SvgBackend};
    pub use crate::scene::overlay::{NoOverlay, OverlaySource, StaticOverlay};
    pub use crate::scene::{build_scene, ScenePoint, ScreenPoint, SceneGraph, View};
    pub use crate::style::{evaluate, evaluate_canvas, CompiledStyle, MapCSSResult, Style};
    pub use crate::ui::{available_levels, level_change_choices, LevelChangeChoice};
}
