//! Debug artifact writers for the triangle-soup navmesh geometry. Free
//! functions over `impl std::io::Write`, matching
//! [`crate::render::SvgBackend`]'s caller-owns-the-sink pattern rather
//! than taking a file path.

use std::io::{self, Write};

use crate::config::NavmeshSolverConfig;
use crate::osm::BBox;

use super::stroke::NavVertex;
use super::worker::NavMeshGeometry;

/// Writes `geometry` as a Wavefront `.obj` mesh: one `v` line per
/// vertex, one `f` line per triangle (1-indexed, as `.obj` requires).
pub fn write_obj<W: Write>(geometry: &NavMeshGeometry, mut out: W) -> io::Result<()> {
    writeln!(out, "# navmesh triangle soup")?;
    for v in &geometry.vertices {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for tri in &geometry.triangles {
        writeln!(out, "f {} {} {}", tri[0] + 1, tri[1] + 1, tri[2] + 1)?;
    }
    Ok(())
}

/// Writes `geometry`'s off-mesh links as the `.gset` format from §6: a
/// single header line (`filename`, the solver parameters that produced
/// this navmesh, then `bbox`'s corners), followed by one `c` line per
/// off-mesh connection: `c x1 y1 z1 x2 y2 z2 radius dir area flags`.
pub fn write_gset<W: Write>(
    geometry: &NavMeshGeometry,
    filename: &str,
    config: &NavmeshSolverConfig,
    bbox: BBox,
    mut out: W,
) -> io::Result<()> {
    writeln!(
        out,
        "{} {} {} {} {} {} {} {} {} {} {}",
        filename,
        config.cell_size,
        config.cell_height,
        config.agent_height,
        config.agent_radius,
        config.agent_max_climb,
        config.agent_max_slope_deg,
        bbox.min.lat(),
        bbox.min.lon(),
        bbox.max.lat(),
        bbox.max.lon(),
    )?;
    for link in &geometry.links {
        writeln!(
            out,
            "c {} {} {} {} {} {} {} {} {} {}",
            link.from.x,
            link.from.y,
            link.from.z,
            link.to.x,
            link.to.y,
            link.to.z,
            link.radius,
            link.direction.as_gset_code(),
            link.area.as_index(),
            link.flags,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::MapLevel;
    use crate::navmesh::links::{LinkDirection, NavMeshArea, OffMeshLink};
    use crate::osm::GeoCoord;

    fn sample_geometry() -> NavMeshGeometry {
        NavMeshGeometry {
            vertices: vec![
                NavVertex { x: 0.0, y: 0.0, z: 0.0 },
                NavVertex { x: 1.0, y: 0.0, z: 0.0 },
                NavVertex { x: 0.0, y: 0.0, z: 1.0 },
            ],
            triangles: vec![[0, 1, 2]],
            areas: vec![NavMeshArea::Walkable],
            links: vec![OffMeshLink {
                from: NavVertex { x: 0.0, y: 0.0, z: 0.0 },
                from_level: MapLevel(0),
                to: NavVertex { x: 0.0, y: 3.5, z: 0.0 },
                to_level: MapLevel(10),
                radius: 0.3,
                flags: 1,
                area: NavMeshArea::Elevator,
                direction: LinkDirection::Bidirectional,
                user_id: 99,
            }],
        }
    }

    #[test]
    fn obj_writer_emits_one_v_line_per_vertex_and_one_f_line_per_triangle() {
        let mut buf = Vec::new();
        write_obj(&sample_geometry(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 1);
        assert!(text.contains("f 1 2 3"));
    }

    #[test]
    fn gset_writer_emits_a_header_line_then_one_c_line_per_link() {
        let bbox = BBox { min: GeoCoord::from_degrees(52.5, 13.4), max: GeoCoord::from_degrees(52.501, 13.401) };
        let mut buf = Vec::new();
        write_gset(&sample_geometry(), "floor0.gset", &NavmeshSolverConfig::default(), bbox, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("floor0.gset "));
        assert!(lines[1].starts_with("c "));
        // radius, dir (bidirectional -> 1), area (Elevator -> 1), flags.
        assert_eq!(lines[1], "c 0 0 0 0 3.5 0 0.3 1 1 1");
    }
}
