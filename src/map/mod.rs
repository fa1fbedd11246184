//! Map view abstractions.
//!
//! The overlay only needs three things from a map: a way to turn a
//! geographic coordinate into a layer pixel, a pane to insert its surface
//! into, and a notification when the view is reset. [`MapView`] captures
//! that seam; [`SlippyMap`] is a Web Mercator implementation of it.

mod slippy;
mod view;

pub use slippy::SlippyMap;
pub use view::{ViewState, MAX_LATITUDE, TILE_SIZE};

use crate::scene::Pane;
use geo_types::Coord;
use glam::DVec2;

/// Converts geographic coordinates (x = longitude, y = latitude) to layer
/// pixel coordinates for a particular view.
pub trait LayerProjection {
    fn lat_lng_to_layer_point(&self, coord: Coord<f64>) -> DVec2;
}

impl<F> LayerProjection for F
where
    F: Fn(Coord<f64>) -> DVec2,
{
    fn lat_lng_to_layer_point(&self, coord: Coord<f64>) -> DVec2 {
        self(coord)
    }
}

/// Identifies a registered view listener so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Callback invoked after the view has been reset. It receives the
/// projection of the new view.
pub type ViewListener = Box<dyn FnMut(&dyn LayerProjection)>;

/// An interactive map that overlays can attach to.
///
/// Implementations are single-threaded and use interior mutability, so all
/// methods take `&self`.
pub trait MapView: LayerProjection {
    /// The pane that hosts overlay surfaces. It moves with the map.
    fn overlay_pane(&self) -> Pane;

    /// Registers a listener for view resets (zoom or recentre).
    fn on_view_reset(&self, listener: ViewListener) -> ListenerId;

    /// Removes a listener. Returns `false` if it was not registered.
    fn off_view_reset(&self, id: ListenerId) -> bool;
}
