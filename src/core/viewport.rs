use crate::core::constants::TILE_SIZE;
use crate::core::geo::{LatLng, Point, EARTH_RADIUS};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(LatLng::clamp_lat(center.lat), center.lng);
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level
    /// (Web Mercator, EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let z = zoom.unwrap_or(self.zoom);
        let world = TILE_SIZE as f64 * 2_f64.powf(z);
        let mercator = lat_lng.to_mercator();
        let circumference = 2.0 * PI * EARTH_RADIUS;

        Point::new(
            (mercator.x + PI * EARTH_RADIUS) / circumference * world,
            (-mercator.y + PI * EARTH_RADIUS) / circumference * world,
        )
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom level
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let z = zoom.unwrap_or(self.zoom);
        let world = TILE_SIZE as f64 * 2_f64.powf(z);
        let circumference = 2.0 * PI * EARTH_RADIUS;

        let x = (pixel.x / world) * circumference - PI * EARTH_RADIUS;
        let y = PI * EARTH_RADIUS - (pixel.y / world) * circumference;
        LatLng::from_mercator(Point::new(x, y))
    }

    /// Converts a geographical coordinate to container pixel coordinates,
    /// with (0, 0) at the top-left corner of the viewport
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let half = Point::new(self.size.x / 2.0, self.size.y / 2.0);
        self.project(lat_lng, None)
            .subtract(&self.project(&self.center, None))
            .add(&half)
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let half = Point::new(self.size.x / 2.0, self.size.y / 2.0);
        let world = pixel
            .subtract(&half)
            .add(&self.project(&self.center, None));
        self.unproject(&world, None)
    }

    /// Pans the viewport by the given pixel offset. Content follows the
    /// pointer, so a positive `delta.x` moves the center west.
    pub fn pan(&mut self, delta: Point) {
        let center_world = self.project(&self.center, None);
        let new_center = self.unproject(&center_world.subtract(&delta), None);
        self.set_center(new_center);
    }

    /// Zooms the viewport to a specific level, keeping `focus_point` fixed on
    /// screen when given
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);

        // No-op if zoom does not change significantly
        if (new_zoom - self.zoom).abs() < 0.001 {
            return;
        }

        match focus_point {
            Some(focus) => {
                let focus_lat_lng = self.pixel_to_lat_lng(&focus);
                self.zoom = new_zoom;
                let drift = self.lat_lng_to_pixel(&focus_lat_lng).subtract(&focus);
                self.pan(drift.multiply(-1.0));
            }
            None => self.zoom = new_zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(LatLng::new(35.0, 139.0), 15.0, Point::new(800.0, 600.0))
    }

    #[test]
    fn test_center_projects_to_middle() {
        let vp = viewport();
        let pixel = vp.lat_lng_to_pixel(&vp.center);
        assert!((pixel.x - 400.0).abs() < 1e-6);
        assert!((pixel.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_round_trip() {
        let vp = viewport();
        let target = LatLng::new(35.002, 139.003);
        let back = vp.pixel_to_lat_lng(&vp.lat_lng_to_pixel(&target));
        assert!((back.lat - target.lat).abs() < 1e-9);
        assert!((back.lng - target.lng).abs() < 1e-9);
    }

    #[test]
    fn test_north_is_up() {
        let vp = viewport();
        let north = vp.lat_lng_to_pixel(&LatLng::new(35.005, 139.0));
        assert!(north.y < 300.0);
        assert!((north.x - 400.0).abs() < 1e-6);
    }

    #[test]
    fn test_pan_moves_content_with_pointer() {
        let mut vp = viewport();
        let post = LatLng::new(35.0, 139.0);
        let before = vp.lat_lng_to_pixel(&post);
        vp.pan(Point::new(50.0, -20.0));
        let after = vp.lat_lng_to_pixel(&post);
        assert!((after.x - before.x - 50.0).abs() < 1e-6);
        assert!((after.y - before.y + 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_to_keeps_focus_fixed() {
        let mut vp = viewport();
        let focus = Point::new(600.0, 100.0);
        let under_focus = vp.pixel_to_lat_lng(&focus);
        vp.zoom_to(16.0, Some(focus));
        assert_eq!(vp.zoom, 16.0);
        let pixel = vp.lat_lng_to_pixel(&under_focus);
        assert!((pixel.x - focus.x).abs() < 1e-6);
        assert!((pixel.y - focus.y).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_clamped_to_limits() {
        let mut vp = viewport();
        vp.set_zoom(20.0);
        assert_eq!(vp.zoom, 18.0);
        vp.set_zoom(-1.0);
        assert_eq!(vp.zoom, 0.0);
    }
}
