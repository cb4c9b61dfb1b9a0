//! Even-odd polygon triangulation over a stitched outer/inner ring set.
//! Plain functions over `&[(f64, f64)]` slices returning owned `Vec`s,
//! no allocator threading.

/// A 2D point used only for triangulation input/output, kept distinct
/// from [`crate::scene::view::ScenePoint`] since the navmesh builder
/// works in the separate local XZ metric plane.
pub type Point2 = (f64, f64);

/// Triangulates a simple polygon (outer ring plus zero or more hole
/// rings, all closed — first point equals last) via ear clipping,
/// holes merged into the outer boundary by bridging each hole to the
/// nearest outer vertex. Returns a flat list of `(a, b, c)` index
/// triples into the combined vertex list this function also returns.
pub fn triangulate_polygon(outer: &[Point2], holes: &[Vec<Point2>]) -> (Vec<Point2>, Vec<[usize; 3]>) {
    let mut ring = open_ring(outer);
    if ring.len() < 3 {
        return (ring, Vec::new());
    }
    if !is_ccw(&ring) {
        ring.reverse();
    }

    for hole in holes {
        let mut hole_ring = open_ring(hole);
        if hole_ring.len() < 3 {
            continue;
        }
        if is_ccw(&hole_ring) {
            hole_ring.reverse();
        }
        bridge_hole(&mut ring, &hole_ring);
    }

    let triangles = ear_clip(&ring);
    (ring, triangles)
}

fn open_ring(ring: &[Point2]) -> Vec<Point2> {
    if ring.len() >= 2 && ring.first() == ring.last() {
        ring[..ring.len() - 1].to_vec()
    } else {
        ring.to_vec()
    }
}

fn signed_area(ring: &[Point2]) -> f64 {
    let mut area = 0.0;
    for i in 0..ring.len() {
        let (x0, y0) = ring[i];
        let (x1, y1) = ring[(i + 1) % ring.len()];
        area += x0 * y1 - x1 * y0;
    }
    area / 2.0
}

fn is_ccw(ring: &[Point2]) -> bool {
    signed_area(ring) > 0.0
}

/// Splices `hole` into `ring` by connecting the hole's vertex closest to
/// some outer vertex with a zero-width bridge (the standard
/// hole-to-outer-boundary technique so a single-ring ear clipper can
/// triangulate a polygon with holes).
fn bridge_hole(ring: &mut Vec<Point2>, hole: &[Point2]) {
    let mut best = (0usize, 0usize, f64::INFINITY);
    for (oi, &(ox, oy)) in ring.iter().enumerate() {
        for (hi, &(hx, hy)) in hole.iter().enumerate() {
            let d = (ox - hx).powi(2) + (oy - hy).powi(2);
            if d < best.2 {
                best = (oi, hi, d);
            }
        }
    }
    let (outer_idx, hole_idx, _) = best;

    let mut bridged = Vec::with_capacity(ring.len() + hole.len() + 2);
    bridged.extend_from_slice(&ring[..=outer_idx]);
    bridged.extend(hole[hole_idx..].iter().copied());
    bridged.extend(hole[..=hole_idx].iter().copied());
    bridged.extend_from_slice(&ring[outer_idx..]);
    *ring = bridged;
}

fn ear_clip(ring: &[Point2]) -> Vec<[usize; 3]> {
    let mut indices: Vec<usize> = (0..ring.len()).collect();
    let mut triangles = Vec::new();

    // Bridged rings can revisit a vertex; work on a copy of positions
    // indexed by the original ring so triangle indices refer back to it.
    let mut guard = 0;
    while indices.len() > 3 && guard < ring.len() * ring.len() + 16 {
        guard += 1;
        let n = indices.len();
        let mut clipped = false;
        for i in 0..n {
            let prev = indices[(i + n - 1) % n];
            let curr = indices[i];
            let next = indices[(i + 1) % n];
            if is_ear(ring, &indices, prev, curr, next) {
                triangles.push([prev, curr, next]);
                indices.remove(i);
                clipped = true;
                break;
            }
        }
        if !clipped {
            break; // degenerate input; stop rather than loop forever
        }
    }
    if indices.len() == 3 {
        triangles.push([indices[0], indices[1], indices[2]]);
    }
    triangles
}

fn is_ear(ring: &[Point2], indices: &[usize], prev: usize, curr: usize, next: usize) -> bool {
    let (a, b, c) = (ring[prev], ring[curr], ring[next]);
    if cross(a, b, c) <= 0.0 {
        return false; // reflex vertex, can't be an ear
    }
    for &idx in indices {
        if idx == prev || idx == curr || idx == next {
            continue;
        }
        if point_in_triangle(ring[idx], a, b, c) {
            return false;
        }
    }
    true
}

fn cross(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

fn point_in_triangle(p: Point2, a: Point2, b: Point2, c: Point2) -> bool {
    let d1 = cross(p, a, b);
    let d2 = cross(p, b, c);
    let d3 = cross(p, c, a);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangulates_a_square_into_two_triangles() {
        let square = vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)];
        let (verts, tris) = triangulate_polygon(&square, &[]);
        assert_eq!(verts.len(), 4);
        assert_eq!(tris.len(), 2);
    }

    #[test]
    fn degenerate_polygon_yields_no_triangles() {
        let line = vec![(0.0, 0.0), (1.0, 0.0)];
        let (_, tris) = triangulate_polygon(&line, &[]);
        assert!(tris.is_empty());
    }

    #[test]
    fn polygon_with_hole_triangulates_around_it() {
        let outer = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)];
        let hole = vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0), (4.0, 4.0)];
        let (_, tris) = triangulate_polygon(&outer, &[hole]);
        assert!(!tris.is_empty());
    }
}
