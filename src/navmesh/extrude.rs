//! Wall extrusion: turns a wall way's node chain into vertical quads
//! from floor height to floor height + story height, skipping any
//! segment incident to a `door=*`-tagged node so door openings stay
//! passable.

use super::stroke::NavVertex;
use super::transform::NavMeshTransform;
use crate::osm::GeoCoord;

/// One wall node: its coordinate and whether it carries a `door=*` tag.
#[derive(Clone, Copy, Debug)]
pub struct WallNode {
    pub coord: GeoCoord,
    pub is_door: bool,
}

/// Extrudes `nodes` into vertical quads (two triangles each) from
/// `floor_height` to `floor_height + story_height`, one quad per
/// consecutive node pair, omitting any pair where either node is a door.
pub fn extrude_wall(
    transform: &NavMeshTransform,
    nodes: &[WallNode],
    floor_height: f32,
    story_height: f32,
) -> (Vec<NavVertex>, Vec<[usize; 3]>) {
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();

    for pair in nodes.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.is_door || b.is_door {
            continue;
        }
        let (ax, az) = transform.geo_to_xz(a.coord);
        let (bx, bz) = transform.geo_to_xz(b.coord);

        let base = vertices.len();
        vertices.push(NavVertex { x: ax, y: floor_height, z: az });
        vertices.push(NavVertex { x: bx, y: floor_height, z: bz });
        vertices.push(NavVertex { x: bx, y: floor_height + story_height, z: bz });
        vertices.push(NavVertex { x: ax, y: floor_height + story_height, z: az });

        triangles.push([base, base + 1, base + 2]);
        triangles.push([base, base + 2, base + 3]);
    }

    (vertices, triangles)
}
