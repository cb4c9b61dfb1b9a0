use crate::osm::GeoCoord;

/// Meters per degree of latitude, constant enough for indoor-map scale
/// spans (a few hundred meters) that curvature is negligible.
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;
/// Web Mercator ground resolution at zoom 0, meters per pixel at the
/// equator; halves with every zoom level increment.
const METERS_PER_PIXEL_AT_ZOOM_0: f64 = 156_543.034_0;

/// The affine mapping between screen pixels and the scene's local planar
/// coordinate system (meters from `origin`, X east, Y south to match
/// screen space, rotated by `rotation_rad`).
///
/// `origin` is also the projection's latitude reference: longitude
/// degrees are scaled by `cos(origin.lat)` so the mapping stays locally
/// accurate without a full spherical/ellipsoidal projection, which this
/// crate does not need at indoor-map scale.
#[derive(Clone, Copy, Debug)]
pub struct View {
    origin: GeoCoord,
    meters_per_degree_lon: f64,
    pixels_per_meter: f64,
    rotation_rad: f64,
    pub screen_width: f64,
    pub screen_height: f64,
}

/// A point in scene space: meters from the view's origin, X east, Y
/// south.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePoint {
    pub x: f64,
    pub y: f64,
}

/// A point in screen space: pixels, X right, Y down, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl View {
    pub fn new(origin: GeoCoord, zoom: f64, rotation_rad: f64, screen_width: f64, screen_height: f64) -> Self {
        let meters_per_pixel = METERS_PER_PIXEL_AT_ZOOM_0 * origin.lat().to_radians().cos() / 2f64.powf(zoom);
        Self {
            origin,
            meters_per_degree_lon: METERS_PER_DEGREE_LAT * origin.lat().to_radians().cos(),
            pixels_per_meter: 1.0 / meters_per_pixel,
            rotation_rad,
            screen_width,
            screen_height,
        }
    }

    /// Projects a geographic coordinate into scene space.
    pub fn project(&self, coord: GeoCoord) -> ScenePoint {
        ScenePoint {
            x: (coord.lon() - self.origin.lon()) * self.meters_per_degree_lon,
            y: -(coord.lat() - self.origin.lat()) * METERS_PER_DEGREE_LAT,
        }
    }

    /// Converts a scene-space point into screen pixels.
    pub fn map_scene_to_screen(&self, p: ScenePoint) -> ScreenPoint {
        let (sin, cos) = self.rotation_rad.sin_cos();
        let rx = p.x * cos - p.y * sin;
        let ry = p.x * sin + p.y * cos;
        ScreenPoint {
            x: rx * self.pixels_per_meter + self.screen_width / 2.0,
            y: ry * self.pixels_per_meter + self.screen_height / 2.0,
        }
    }

    /// Converts a screen pixel point back into scene space, the inverse
    /// of [`View::map_scene_to_screen`].
    pub fn map_screen_to_scene(&self, p: ScreenPoint) -> ScenePoint {
        let rx = (p.x - self.screen_width / 2.0) / self.pixels_per_meter;
        let ry = (p.y - self.screen_height / 2.0) / self.pixels_per_meter;
        let (sin, cos) = (-self.rotation_rad).sin_cos();
        ScenePoint {
            x: rx * cos - ry * sin,
            y: rx * sin + ry * cos,
        }
    }

    /// Converts a scalar screen-pixel distance (e.g. a hit-test radius)
    /// into the equivalent scene-space distance. Rotation does not affect
    /// a scalar magnitude, only the scale does.
    pub fn map_screen_distance_to_scene_distance(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_meter
    }

    /// Converts a real-world distance in meters into scene-space units.
    /// Scene space is already metric at the view's origin latitude, so
    /// this is the identity away from projection drift; it exists so
    /// callers never have to know that fact.
    pub fn map_meters_to_scene(&self, meters: f64) -> f64 {
        meters
    }
}
