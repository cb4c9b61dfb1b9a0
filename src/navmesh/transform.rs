use crate::osm::{BBox, GeoCoord};

/// Meters per degree of latitude at indoor-map scale — see
/// [`crate::scene::view::View`] for the same constant used by the 2D
/// scene projection; the navmesh builder needs an independent,
/// metric-XZ-plane variant of the same idea.
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Height, in meters, of one full story. Used to map a [`crate::level::MapLevel`]
/// into the navmesh's Y axis.
pub const HEIGHT_PER_LEVEL: f64 = 3.5;

/// An affine mapping from geographic coordinates to a local metric XZ
/// plane centered on the map's bounding box, plus the separate
/// level-to-height mapping for Y. Injective inside the map bounding box:
/// distinct geographic points map to distinct (x, z) pairs since the
/// underlying longitude/latitude scaling factors are positive constants.
#[derive(Clone, Copy, Debug)]
pub struct NavMeshTransform {
    origin: GeoCoord,
    meters_per_degree_lon: f64,
}

impl NavMeshTransform {
    pub fn centered_on(bbox: &BBox) -> Self {
        let origin = GeoCoord {
            lat_e7: (bbox.min.lat_e7 as i64 + bbox.max.lat_e7 as i64).div_euclid(2) as i32,
            lon_e7: (bbox.min.lon_e7 as i64 + bbox.max.lon_e7 as i64).div_euclid(2) as i32,
        };
        Self {
            origin,
            meters_per_degree_lon: METERS_PER_DEGREE_LAT * origin.lat().to_radians().cos(),
        }
    }

    /// Maps a geographic coordinate to `(x, z)` on the local metric
    /// plane; Y is supplied separately via [`NavMeshTransform::height`].
    pub fn geo_to_xz(&self, coord: GeoCoord) -> (f32, f32) {
        let x = (coord.lon() - self.origin.lon()) * self.meters_per_degree_lon;
        let z = (coord.lat() - self.origin.lat()) * METERS_PER_DEGREE_LAT;
        (x as f32, z as f32)
    }

    /// Maps a [`crate::level::MapLevel`]'s human floor number to a Y
    /// height in meters: `floor_level × height_per_level`.
    pub fn height(&self, human_floor: f64) -> f32 {
        (human_floor * HEIGHT_PER_LEVEL) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_to_xz_is_injective_inside_the_bbox() {
        let bbox = BBox {
            min: GeoCoord::from_degrees(52.5, 13.4),
            max: GeoCoord::from_degrees(52.51, 13.41),
        };
        let transform = NavMeshTransform::centered_on(&bbox);
        let a = transform.geo_to_xz(GeoCoord::from_degrees(52.502, 13.403));
        let b = transform.geo_to_xz(GeoCoord::from_degrees(52.503, 13.403));
        let c = transform.geo_to_xz(GeoCoord::from_degrees(52.502, 13.404));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn height_scales_with_level() {
        let bbox = BBox { min: GeoCoord::from_degrees(0.0, 0.0), max: GeoCoord::from_degrees(0.0, 0.0) };
        let transform = NavMeshTransform::centered_on(&bbox);
        assert_eq!(transform.height(0.0), 0.0);
        assert_eq!(transform.height(1.0), HEIGHT_PER_LEVEL as f32);
        assert_eq!(transform.height(-1.0), -HEIGHT_PER_LEVEL as f32);
    }
}
