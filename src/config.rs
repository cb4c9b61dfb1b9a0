//! Configuration recognized at the core boundary: style selection and
//! the navmesh solver constants. Both are `serde`-deserializable so a
//! host application can load them from a config file with `serde_json`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One of the styles this crate ships a name for. `Default` resolves to
/// `BreezeLight`/`BreezeDark` based on the host palette's luminance (see
/// [`WellKnownStyle::resolve_default`]), never by reaching into a UI
/// toolkit itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WellKnownStyle {
    BreezeLight,
    BreezeDark,
    Diagnostic,
    Default,
}

impl WellKnownStyle {
    /// Resolves `Default` against a caller-supplied background sample
    /// `(r, g, b)` in `0..=255`, using the standard relative-luminance
    /// weighting. Any other variant is returned unchanged.
    pub fn resolve_default(self, host_background: (u8, u8, u8)) -> WellKnownStyle {
        if self != WellKnownStyle::Default {
            return self;
        }
        let (r, g, b) = host_background;
        let luminance = 0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64;
        if luminance >= 128.0 {
            WellKnownStyle::BreezeLight
        } else {
            WellKnownStyle::BreezeDark
        }
    }
}

/// Selects a style sheet: a well-known name, or a path to a MapCSS file
/// a caller-supplied parser will load.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleSelection {
    Named(WellKnownStyle),
    Path(PathBuf),
}

/// Partition algorithm the downstream voxel/contour stage uses to turn
/// walkable regions into polygons. Named to match
/// `oxidized_navigation`'s `NavMeshSettings::partition_type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartitionType {
    Watershed,
    Monotone,
    Layers,
}

/// Navmesh solver constants passed through to the downstream
/// voxel/contour/poly/detail-mesh/detour pipeline via
/// [`crate::navmesh::SolidVoxelNavmeshBackend`]. Field list and defaults
/// mirror `oxidized_navigation`'s `NavMeshSettings`, the closest
/// real-world analog in the retrieval pack for this solver's knob set.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct NavmeshSolverConfig {
    pub cell_size: f32,
    pub cell_height: f32,
    pub agent_height: f32,
    pub agent_radius: f32,
    pub agent_max_climb: f32,
    pub agent_max_slope_deg: f32,
    pub region_min_area: f32,
    pub region_merge_area: f32,
    pub max_edge_length: f32,
    pub max_simplification_error: f32,
    pub detail_sample_distance: f32,
    pub detail_sample_max_error: f32,
    pub partition_type: PartitionType,
}

impl Default for NavmeshSolverConfig {
    fn default() -> Self {
        Self {
            cell_size: 0.25,
            cell_height: 0.2,
            agent_height: 1.8,
            agent_radius: 0.3,
            agent_max_climb: 0.6,
            agent_max_slope_deg: 45.0,
            region_min_area: 2.0,
            region_merge_area: 4.0,
            max_edge_length: 12.0,
            max_simplification_error: 1.3,
            detail_sample_distance: 6.0,
            detail_sample_max_error: 1.0,
            partition_type: PartitionType::Watershed,
        }
    }
}
