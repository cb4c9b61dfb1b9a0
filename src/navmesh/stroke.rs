//! Converts a walkable way (corridor centerline, stairs, ramp) into a
//! triangle strip of a given width, interpolating the Y coordinate
//! linearly along the line so stair/ramp segments slope between floors:
//! a 2-node way tagged highway=steps between two levels becomes a
//! sloped strip, not two disconnected flat strips.

use super::transform::NavMeshTransform;
use crate::osm::GeoCoord;

/// A single navmesh vertex in the local metric XZ plane plus height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Builds a triangle strip `width` meters wide centered on `centerline`,
/// with each vertex's Y linearly interpolated between `start_height` (at
/// the first node) and `end_height` (at the last node). Flat ways simply
/// pass the same height for both ends.
pub fn stroke_to_strip(
    transform: &NavMeshTransform,
    centerline: &[GeoCoord],
    width: f32,
    start_height: f32,
    end_height: f32,
) -> (Vec<NavVertex>, Vec<[usize; 3]>) {
    if centerline.len() < 2 {
        return (Vec::new(), Vec::new());
    }

    let half = width / 2.0;
    let total_len: f64 = centerline
        .windows(2)
        .map(|pair| {
            let (ax, az) = transform.geo_to_xz(pair[0]);
            let (bx, bz) = transform.geo_to_xz(pair[1]);
            (((bx - ax) as f64).powi(2) + ((bz - az) as f64).powi(2)).sqrt()
        })
        .sum();

    let mut vertices = Vec::with_capacity(centerline.len() * 2);
    let mut triangles = Vec::with_capacity((centerline.len() - 1) * 2);
    let mut traveled = 0.0_f64;

    for i in 0..centerline.len() {
        let (x, z) = transform.geo_to_xz(centerline[i]);
        let t = if total_len > 0.0 { (traveled / total_len) as f32 } else { 0.0 };
        let y = start_height + (end_height - start_height) * t;

        let (nx, nz) = segment_normal(centerline, transform, i);
        vertices.push(NavVertex { x: x + nx * half, y, z: z + nz * half });
        vertices.push(NavVertex { x: x - nx * half, y, z: z - nz * half });

        if i + 1 < centerline.len() {
            let (ax, az) = transform.geo_to_xz(centerline[i]);
            let (bx, bz) = transform.geo_to_xz(centerline[i + 1]);
            traveled += (((bx - ax) as f64).powi(2) + ((bz - az) as f64).powi(2)).sqrt();

            let left0 = i * 2;
            let right0 = i * 2 + 1;
            let left1 = (i + 1) * 2;
            let right1 = (i + 1) * 2 + 1;
            triangles.push([left0, right0, left1]);
            triangles.push([right0, right1, left1]);
        }
    }

    (vertices, triangles)
}

/// Unit normal of the centerline at vertex `i`, averaged from the
/// incoming and outgoing segment directions at interior vertices so the
/// strip doesn't pinch at bends.
fn segment_normal(centerline: &[GeoCoord], transform: &NavMeshTransform, i: usize) -> (f32, f32) {
    let prev = if i > 0 { i - 1 } else { i };
    let next = if i + 1 < centerline.len() { i + 1 } else { i };
    let (ax, az) = transform.geo_to_xz(centerline[prev]);
    let (bx, bz) = transform.geo_to_xz(centerline[next]);
    let (dx, dz) = (bx - ax, bz - az);
    let len = (dx * dx + dz * dz).sqrt();
    if len < f32::EPSILON {
        return (0.0, 0.0);
    }
    (-dz / len, dx / len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::BBox;

    fn transform() -> NavMeshTransform {
        let bbox = BBox {
            min: GeoCoord::from_degrees(52.5, 13.4),
            max: GeoCoord::from_degrees(52.501, 13.401),
        };
        NavMeshTransform::centered_on(&bbox)
    }

    #[test]
    fn flat_way_keeps_constant_height() {
        let t = transform();
        let line = [GeoCoord::from_degrees(52.5002, 13.4002), GeoCoord::from_degrees(52.5004, 13.4004)];
        let (verts, tris) = stroke_to_strip(&t, &line, 1.5, 3.5, 3.5);
        assert_eq!(verts.len(), 4);
        assert_eq!(tris.len(), 2);
        assert!(verts.iter().all(|v| (v.y - 3.5).abs() < 1e-6));
    }

    #[test]
    fn sloped_stairs_interpolate_height_between_ends() {
        let t = transform();
        let line = [GeoCoord::from_degrees(52.5002, 13.4002), GeoCoord::from_degrees(52.5006, 13.4006)];
        let (verts, _) = stroke_to_strip(&t, &line, 1.2, 0.0, 3.5);
        let ys: Vec<f32> = verts.iter().map(|v| v.y).collect();
        assert!(ys[0].abs() < 1e-6);
        assert!((ys[2] - 3.5).abs() < 1e-6);
    }

    #[test]
    fn single_node_line_produces_no_geometry() {
        let t = transform();
        let line = [GeoCoord::from_degrees(52.5002, 13.4002)];
        let (verts, tris) = stroke_to_strip(&t, &line, 1.0, 0.0, 0.0);
        assert!(verts.is_empty());
        assert!(tris.is_empty());
    }
}
