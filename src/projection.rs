//! Map projections from geographic coordinates to planar points.
//!
//! Hit testing works in the plane of the active map, never on raw latitude/longitude.
//! Hosts either use [`Viewport`] or hand in their map's own conversion as a closure.

use std::f64::consts::PI;

use crate::Coordinate;

/// Latitude limit of the square Web Mercator world.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Default tile size in points for [`Viewport`].
pub const TILE_SIZE: f64 = 256.0;

/// A point in the projected plane (x grows east, y grows south).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Conversion from geographic coordinates to the map's plane.
pub trait MapProjection: Send + Sync {
    fn project(&self, coordinate: Coordinate) -> PlanarPoint;
}

impl<F> MapProjection for F
where
    F: Fn(Coordinate) -> PlanarPoint + Send + Sync,
{
    fn project(&self, coordinate: Coordinate) -> PlanarPoint {
        self(coordinate)
    }
}

/// Spherical Mercator onto a square world `world_size` units wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator {
    world_size: f64,
}

impl WebMercator {
    pub fn new(world_size: f64) -> Self {
        Self { world_size }
    }

    /// World of size 1.0: x and y in [0, 1].
    pub fn unit() -> Self {
        Self::new(1.0)
    }
}

impl MapProjection for WebMercator {
    fn project(&self, coordinate: Coordinate) -> PlanarPoint {
        let lat = coordinate
            .latitude
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
            .to_radians();
        let sin = lat.sin();
        let x = (coordinate.longitude + 180.0) / 360.0;
        let y = 0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI);
        PlanarPoint::new(x * self.world_size, y * self.world_size)
    }
}

/// Screen projection of a Mercator map centered on `center` at a fractional `zoom`.
///
/// Zoom 0 shows the whole world in one tile; every zoom level doubles the scale.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Viewport {
    pub center: Coordinate,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(center: Coordinate, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    fn world(&self) -> WebMercator {
        WebMercator::new(TILE_SIZE * 2f64.powf(self.zoom))
    }
}

impl MapProjection for Viewport {
    fn project(&self, coordinate: Coordinate) -> PlanarPoint {
        let world = self.world();
        let p = world.project(coordinate);
        let c = world.project(self.center);
        PlanarPoint::new(
            p.x - c.x + self.width / 2.0,
            p.y - c.y + self.height / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_mercator_origin_and_corners() {
        let m = WebMercator::unit();
        let origin = m.project(Coordinate::new(0.0, 0.0));
        assert!(approx_eq(origin.x, 0.5) && approx_eq(origin.y, 0.5));

        let nw = m.project(Coordinate::new(MAX_MERCATOR_LATITUDE, -180.0));
        assert!(approx_eq(nw.x, 0.0));
        assert!(nw.y.abs() < 1e-6);
    }

    #[test]
    fn test_mercator_clamps_poles() {
        let p = WebMercator::unit().project(Coordinate::new(90.0, 0.0));
        assert!(p.is_finite());
    }

    #[test]
    fn test_mercator_north_is_up() {
        let m = WebMercator::unit();
        let south = m.project(Coordinate::new(51.0, 0.0));
        let north = m.project(Coordinate::new(52.0, 0.0));
        assert!(north.y < south.y);
    }

    #[test]
    fn test_viewport_centers_map() {
        let center = Coordinate::new(51.5074, -0.1278);
        let viewport = Viewport::new(center, 14.0, 390.0, 844.0);
        let p = viewport.project(center);
        assert!(approx_eq(p.x, 195.0));
        assert!(approx_eq(p.y, 422.0));

        let east = viewport.project(Coordinate::new(51.5074, -0.1200));
        assert!(east.x > p.x);
    }

    #[test]
    fn test_closure_projection() {
        let flat = |c: Coordinate| PlanarPoint::new(c.longitude * 10.0, -c.latitude * 10.0);
        let p = flat.project(Coordinate::new(1.0, 2.0));
        assert_eq!(p, PlanarPoint::new(20.0, -10.0));
    }
}
