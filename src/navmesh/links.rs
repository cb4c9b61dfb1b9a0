//! Off-mesh connections: links that join navmesh islands across floors
//! without a walkable surface between them — elevators (area centroids
//! linked across every pair of consecutive levels they serve) and
//! escalators (2-node ways linked with a direction derived from their
//! `conveying` tag).

use super::stroke::NavVertex;
use super::transform::NavMeshTransform;
use crate::level::MapLevel;
use crate::osm::GeoCoord;

/// Direction an escalator link may be traversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkDirection {
    Forward,
    Backward,
    Bidirectional,
}

impl LinkDirection {
    /// Derives a direction from an OSM `conveying` tag value
    /// (`yes`/`forward`/`backward`/`reversible`).
    pub fn from_conveying_tag(value: Option<&str>) -> Self {
        match value {
            Some("forward") => LinkDirection::Forward,
            Some("backward") => LinkDirection::Backward,
            _ => LinkDirection::Bidirectional,
        }
    }

    /// The `.gset` `dir` column: 1 when the connection may be traversed
    /// both ways, 0 otherwise. By the time a link reaches this point
    /// `Backward` has already been normalized to `Forward` by swapping
    /// endpoints, so only `Forward`/`Bidirectional` are ever encoded.
    pub fn as_gset_code(self) -> u8 {
        match self {
            LinkDirection::Bidirectional => 1,
            LinkDirection::Forward | LinkDirection::Backward => 0,
        }
    }
}

/// The downstream solver's per-triangle/per-link area classification.
/// Triangle-soup geometry area resolution from MapCSS is hard-coded to
/// `Walkable` (see the open design decision in `DESIGN.md`); off-mesh
/// links always carry the area matching the connection kind that
/// produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavMeshArea {
    Walkable,
    Elevator,
    Escalator,
}

impl NavMeshArea {
    /// The integer area id written to the `.gset`/debug formats.
    pub fn as_index(self) -> u8 {
        match self {
            NavMeshArea::Walkable => 0,
            NavMeshArea::Elevator => 1,
            NavMeshArea::Escalator => 2,
        }
    }
}

/// Default off-mesh connection radius in meters, matching
/// `NavmeshSolverConfig::default().agent_radius`: a connection this wide
/// clears the same character the solved navmesh is built for.
pub const DEFAULT_LINK_RADIUS: f32 = 0.3;

/// Default off-mesh connection flags: a single "walkable" bit, the same
/// convention Recast/Detour's `DT_POLYFLAGS_WALK` uses for polygons.
pub const DEFAULT_LINK_FLAGS: u16 = 1;

/// An off-mesh connection between two points, each tagged with the
/// level it sits on, plus the area it belongs to, the radius it clears,
/// traversal flags, the direction it may be traversed, and the id of
/// the OSM element (elevator node/way or escalator way) it was built
/// from, so a downstream consumer can trace a connection back to its
/// source.
#[derive(Clone, Copy, Debug)]
pub struct OffMeshLink {
    pub from: NavVertex,
    pub from_level: MapLevel,
    pub to: NavVertex,
    pub to_level: MapLevel,
    pub radius: f32,
    pub flags: u16,
    pub area: NavMeshArea,
    pub direction: LinkDirection,
    pub user_id: u32,
}

/// Builds one bidirectional off-mesh link per consecutive pair of
/// levels an elevator serves, each endpoint placed at the elevator
/// shaft's centroid on that level: an elevator serving levels 0, 1, 2
/// produces links 0↔1 and 1↔2, not every pair. Every link carries
/// `area = Elevator` and `user_id = source_id` (the elevator element's
/// own id).
pub fn elevator_links(
    transform: &NavMeshTransform,
    shaft_centroid: GeoCoord,
    levels: &[MapLevel],
    source_id: u32,
) -> Vec<OffMeshLink> {
    let mut sorted = levels.to_vec();
    sorted.sort();
    sorted.dedup();

    let (x, z) = transform.geo_to_xz(shaft_centroid);
    let mut links = Vec::new();
    for pair in sorted.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        links.push(OffMeshLink {
            from: NavVertex { x, y: transform.height(lower.human_floor()), z },
            from_level: lower,
            to: NavVertex { x, y: transform.height(upper.human_floor()), z },
            to_level: upper,
            radius: DEFAULT_LINK_RADIUS,
            flags: DEFAULT_LINK_FLAGS,
            area: NavMeshArea::Elevator,
            direction: LinkDirection::Bidirectional,
            user_id: source_id,
        });
    }
    links
}

/// Builds a single off-mesh link for an escalator way, modeled as a
/// 2-node way spanning exactly two levels (its first node's level and
/// its last node's level). Carries `area = Escalator` and
/// `user_id = source_id` (the escalator way's own id).
pub fn escalator_link(
    transform: &NavMeshTransform,
    bottom: GeoCoord,
    bottom_level: MapLevel,
    top: GeoCoord,
    top_level: MapLevel,
    conveying: Option<&str>,
    source_id: u32,
) -> OffMeshLink {
    let (bx, bz) = transform.geo_to_xz(bottom);
    let (tx, tz) = transform.geo_to_xz(top);
    OffMeshLink {
        from: NavVertex { x: bx, y: transform.height(bottom_level.human_floor()), z: bz },
        from_level: bottom_level,
        to: NavVertex { x: tx, y: transform.height(top_level.human_floor()), z: tz },
        to_level: top_level,
        radius: DEFAULT_LINK_RADIUS,
        flags: DEFAULT_LINK_FLAGS,
        area: NavMeshArea::Escalator,
        direction: LinkDirection::from_conveying_tag(conveying),
        user_id: source_id,
    }
}
