//! Region overlay: GeoJSON features drawn as SVG paths over a map.
//!
//! A [`RegionOverlay`] inserts one SVG surface into the map's overlay pane
//! and binds one path element to each feature. Whenever the map resets its
//! view, the overlay recomputes the pixel bounds of the collection, resizes
//! and moves the surface to span them, shifts the inner group so absolute
//! layer coordinates land inside the surface, and redraws every path.

use crate::config::OverlayOptions;
use crate::geo::{GeoPath, PixelBounds};
use crate::map::{LayerProjection, ListenerId, MapView};
use crate::scene::{
    write_surface, ClassList, PathElement, Pane, SurfaceRef, SvgGroup, SvgSurface,
};
use geojson::Feature;
use glam::DVec2;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// State shared between the overlay handle and its view listener.
struct OverlayState {
    surface: SurfaceRef,
    features: Vec<Feature>,
    path: GeoPath,
    bounds: Option<PixelBounds>,
}

impl OverlayState {
    fn reposition<P: LayerProjection + ?Sized>(&mut self, projection: &P) {
        self.bounds = self.path.bounds(&self.features, projection);

        // An empty collection keeps a zero-size surface at the layer origin
        let (top_left, size) = match self.bounds {
            Some(bounds) => (bounds.top_left(), bounds.size()),
            None => (DVec2::ZERO, DVec2::ZERO),
        };

        let mut surface = self.surface.borrow_mut();
        surface.set_frame(top_left, size);
        surface.group.translate = -top_left;

        for element in surface.group.paths.iter_mut() {
            element.d = self
                .features
                .get(element.feature)
                .and_then(|feature| self.path.path_data(feature, projection));
        }

        log::debug!(
            "RegionOverlay: repositioned {} regions to {}x{} at ({}, {})",
            surface.group.paths.len(),
            size.x,
            size.y,
            top_left.x,
            top_left.y
        );
    }
}

/// A live overlay of region features on a map.
pub struct RegionOverlay {
    state: Rc<RefCell<OverlayState>>,
    surface: SurfaceRef,
    pane: Pane,
    listener: ListenerId,
}

impl RegionOverlay {
    /// Draws `features` over `map`, applying the space-separated `class`
    /// tokens to every region path when given.
    pub fn new<M>(map: &M, features: Vec<Feature>, class: Option<&str>) -> Self
    where
        M: MapView + ?Sized,
    {
        Self::with_options(map, features, &OverlayOptions::with_class(class))
    }

    /// Draws `features` over `map` using the given options.
    pub fn with_options<M>(map: &M, features: Vec<Feature>, options: &OverlayOptions) -> Self
    where
        M: MapView + ?Sized,
    {
        let class = options.class.as_deref().and_then(ClassList::parse);
        let group = SvgGroup {
            paths: (0..features.len())
                .map(|index| PathElement {
                    class: class.clone(),
                    ..PathElement::new(index)
                })
                .collect(),
            ..SvgGroup::new(
                options.group_class.as_deref().and_then(ClassList::parse),
                options.group_id.clone(),
            )
        };

        let pane = map.overlay_pane();
        let surface = pane.append(SvgSurface::new(group));

        let state = Rc::new(RefCell::new(OverlayState {
            surface: surface.clone(),
            features,
            path: options.geo_path(),
            bounds: None,
        }));

        let listener_state = Rc::clone(&state);
        let listener = map.on_view_reset(Box::new(move |projection: &dyn LayerProjection| {
            listener_state.borrow_mut().reposition(projection);
        }));

        log::debug!(
            "RegionOverlay: created {} region paths",
            state.borrow().features.len()
        );
        state.borrow_mut().reposition(map);

        Self {
            state,
            surface,
            pane,
            listener,
        }
    }

    /// Recomputes surface bounds and path data for `projection`.
    ///
    /// The map calls this on every view reset; calling it again for the same
    /// view yields the same result.
    pub fn reposition<P: LayerProjection + ?Sized>(&self, projection: &P) {
        self.state.borrow_mut().reposition(projection);
    }

    /// Number of region paths (equal to the number of features).
    pub fn len(&self) -> usize {
        self.surface.borrow().group.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pixel bounds from the last reposition; `None` when nothing is drawn.
    pub fn bounds(&self) -> Option<PixelBounds> {
        self.state.borrow().bounds
    }

    /// The features bound to this overlay, in path order.
    ///
    /// The guard must be dropped before the map's view changes; a view reset
    /// while it is held panics on the overlay's mutable borrow.
    pub fn features(&self) -> Ref<'_, [Feature]> {
        Ref::map(self.state.borrow(), |state| state.features.as_slice())
    }

    /// Read access to the drawing surface.
    ///
    /// The guard must be dropped before the map's view changes; clone the
    /// surface to keep a snapshot across a reset.
    pub fn surface(&self) -> Ref<'_, SvgSurface> {
        self.surface.borrow()
    }

    /// Serializes the drawing surface as SVG.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        write_surface(&mut out, &self.surface.borrow());
        out
    }

    /// Detaches the overlay: stops listening for view resets and removes the
    /// surface from the pane.
    pub fn remove<M>(self, map: &M)
    where
        M: MapView + ?Sized,
    {
        if !map.off_view_reset(self.listener) {
            log::warn!("RegionOverlay: view listener was already removed");
        }
        self.pane.remove(&self.surface);
        log::debug!("RegionOverlay: removed {} region paths", self.len());
    }
}
