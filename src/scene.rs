//! The scene graph: per-floor element resolution and style evaluation
//! ([`controller`]), the z-ordered result ([`graph`]), the
//! screen/scene coordinate mapping ([`view`]), and the overlay
//! injection point ([`overlay`]).

pub mod controller;
pub mod graph;
pub mod overlay;
pub mod view;

pub use controller::build_scene;
pub use graph::{Geometry, PhaseSet, SceneGraph, SceneGraphItem};
pub use overlay::{NoOverlay, OverlaySource, StaticOverlay};
pub use view::{ScenePoint, ScreenPoint, View};
