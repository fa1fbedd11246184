//! Web Mercator view state and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lat/lon) and the
//! map's layer and container pixel spaces, following the spherical
//! Mercator (EPSG:3857) tiling scheme used by slippy maps.

use super::LayerProjection;
use geo_types::{Coord, Rect};
use glam::DVec2;
use std::f64::consts::PI;

/// Tile edge length in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the spherical Mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

const EARTH_RADIUS: f64 = 6_378_137.0;

/// Snapshot of a map view.
///
/// Layer points are measured from the pixel origin, which is fixed when the
/// view is reset and does not move while panning. Panning only shifts the
/// map pane, so container points are layer points plus the pane offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Current zoom level (fractional zoom is allowed)
    pub zoom: f64,
    /// Viewport size in pixels
    pub size: DVec2,
    /// Projected pixel of the layer origin at the current zoom
    pub pixel_origin: DVec2,
    /// Offset of the map pane relative to the viewport
    pub pane_pos: DVec2,
}

impl Default for ViewState {
    fn default() -> Self {
        // Continental US, roughly state-level zoom
        Self::new(Coord { x: -98.0, y: 39.0 }, 4.0, DVec2::new(800.0, 600.0))
    }
}

impl ViewState {
    /// Creates a freshly reset view centered on `center`.
    pub fn new(center: Coord<f64>, zoom: f64, size: DVec2) -> Self {
        let pixel_origin = (project(center, zoom) - size / 2.0).round();
        Self {
            zoom,
            size,
            pixel_origin,
            pane_pos: DVec2::ZERO,
        }
    }

    /// Geographic center of the viewport.
    pub fn center(&self) -> Coord<f64> {
        self.container_point_to_lat_lng(self.size / 2.0)
    }

    /// Converts a layer point back to geographic coordinates.
    pub fn layer_point_to_lat_lng(&self, point: DVec2) -> Coord<f64> {
        unproject(point + self.pixel_origin, self.zoom)
    }

    pub fn layer_point_to_container_point(&self, point: DVec2) -> DVec2 {
        point + self.pane_pos
    }

    pub fn container_point_to_layer_point(&self, point: DVec2) -> DVec2 {
        point - self.pane_pos
    }

    /// Converts geographic coordinates to a viewport pixel.
    pub fn lat_lng_to_container_point(&self, coord: Coord<f64>) -> DVec2 {
        self.layer_point_to_container_point(self.lat_lng_to_layer_point(coord))
    }

    pub fn container_point_to_lat_lng(&self, point: DVec2) -> Coord<f64> {
        self.layer_point_to_lat_lng(self.container_point_to_layer_point(point))
    }

    /// Visible area in layer pixels as (top-left, bottom-right).
    pub fn pixel_bounds(&self) -> (DVec2, DVec2) {
        let top_left = self.container_point_to_layer_point(DVec2::ZERO);
        (top_left, top_left + self.size)
    }

    /// Returns the visible geographic bounds.
    pub fn visible_bounds(&self) -> Rect<f64> {
        let (top_left, bottom_right) = self.pixel_bounds();
        Rect::new(
            self.layer_point_to_lat_lng(top_left),
            self.layer_point_to_lat_lng(bottom_right),
        )
    }

    /// Checks if a coordinate lies within the visible bounds.
    pub fn is_visible(&self, coord: Coord<f64>) -> bool {
        let bounds = self.visible_bounds();
        coord.x >= bounds.min().x
            && coord.x <= bounds.max().x
            && coord.y >= bounds.min().y
            && coord.y <= bounds.max().y
    }
}

impl LayerProjection for ViewState {
    fn lat_lng_to_layer_point(&self, coord: Coord<f64>) -> DVec2 {
        project(coord, self.zoom).round() - self.pixel_origin
    }
}

/// Projects a coordinate to absolute pixel space at `zoom`.
pub(crate) fn project(coord: Coord<f64>, zoom: f64) -> DVec2 {
    let lat = coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let sin = lat.sin();
    let x = EARTH_RADIUS * coord.x.to_radians();
    let y = EARTH_RADIUS * ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;

    let scale = TILE_SIZE * 2.0_f64.powf(zoom);
    let k = 0.5 / (PI * EARTH_RADIUS);
    DVec2::new(scale * (k * x + 0.5), scale * (-k * y + 0.5))
}

/// Inverse of [`project`].
pub(crate) fn unproject(point: DVec2, zoom: f64) -> Coord<f64> {
    let scale = TILE_SIZE * 2.0_f64.powf(zoom);
    let k = 0.5 / (PI * EARTH_RADIUS);
    let x = (point.x / scale - 0.5) / k;
    let y = (point.y / scale - 0.5) / -k;

    Coord {
        x: (x / EARTH_RADIUS).to_degrees(),
        y: (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees(),
    }
}
