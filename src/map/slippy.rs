//! A minimal slippy map that drives overlays.
//!
//! Holds the current [`ViewState`], the overlay pane, and the list of
//! view-reset listeners. Zooming or recentering resets the pixel origin and
//! notifies listeners; panning only moves the pane.

use super::{LayerProjection, ListenerId, MapView, ViewListener, ViewState};
use crate::scene::Pane;
use geo_types::Coord;
use glam::DVec2;
use std::cell::{Cell, RefCell};

/// Listeners taken out for a view reset, and those unsubscribed meanwhile.
struct Dispatch {
    ids: Vec<ListenerId>,
    removed: Vec<ListenerId>,
}

/// Single-threaded Web Mercator map.
pub struct SlippyMap {
    view: Cell<ViewState>,
    overlay_pane: Pane,
    listeners: RefCell<Vec<(ListenerId, ViewListener)>>,
    dispatch: RefCell<Option<Dispatch>>,
    next_listener: Cell<u64>,
    min_zoom: f64,
    max_zoom: f64,
}

impl SlippyMap {
    /// Smallest zoom accepted by default.
    pub const DEFAULT_MIN_ZOOM: f64 = 0.0;
    /// Largest zoom accepted by default.
    pub const DEFAULT_MAX_ZOOM: f64 = 18.0;

    /// Creates a map showing `center` at `zoom` in a viewport of `size` pixels.
    pub fn new(center: Coord<f64>, zoom: f64, size: DVec2) -> Self {
        let zoom = zoom.clamp(Self::DEFAULT_MIN_ZOOM, Self::DEFAULT_MAX_ZOOM);
        Self {
            view: Cell::new(ViewState::new(center, zoom, size)),
            overlay_pane: Pane::new(),
            listeners: RefCell::new(Vec::new()),
            dispatch: RefCell::new(None),
            next_listener: Cell::new(0),
            min_zoom: Self::DEFAULT_MIN_ZOOM,
            max_zoom: Self::DEFAULT_MAX_ZOOM,
        }
    }

    /// Restricts the zoom range. The current view is re-clamped.
    ///
    /// Non-finite bounds are ignored and the previous range is kept.
    pub fn with_zoom_range(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        if !min_zoom.is_finite() || !max_zoom.is_finite() {
            log::warn!(
                "SlippyMap: ignoring non-finite zoom range {}..{}",
                min_zoom,
                max_zoom
            );
            return self;
        }
        self.min_zoom = min_zoom.min(max_zoom);
        self.max_zoom = max_zoom.max(min_zoom);
        let view = self.view.get();
        let clamped = view.zoom.clamp(self.min_zoom, self.max_zoom);
        if clamped != view.zoom {
            self.view.set(ViewState::new(view.center(), clamped, view.size));
        }
        self
    }

    /// Returns a copy of the current view.
    pub fn view(&self) -> ViewState {
        self.view.get()
    }

    pub fn zoom(&self) -> f64 {
        self.view.get().zoom
    }

    pub fn center(&self) -> Coord<f64> {
        self.view.get().center()
    }

    /// Recenters and zooms the map, then fires a view reset.
    pub fn set_view(&self, center: Coord<f64>, zoom: f64) {
        let zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        let size = self.view.get().size;
        self.view.set(ViewState::new(center, zoom, size));
        log::debug!(
            "SlippyMap: view reset to ({:.5}, {:.5}) at zoom {}",
            center.y,
            center.x,
            zoom
        );
        self.fire_view_reset();
    }

    /// Changes zoom while keeping the current center.
    pub fn set_zoom(&self, zoom: f64) {
        self.set_view(self.center(), zoom);
    }

    pub fn zoom_in(&self, delta: f64) {
        self.set_zoom(self.zoom() + delta);
    }

    pub fn zoom_out(&self, delta: f64) {
        self.set_zoom(self.zoom() - delta);
    }

    /// Pans the map by `offset` pixels. Layer points are unchanged, so no
    /// view reset is fired; overlay surfaces move with the pane.
    pub fn pan_by(&self, offset: DVec2) {
        let mut view = self.view.get();
        view.pane_pos -= offset;
        self.view.set(view);
    }

    /// Resizes the viewport, keeping the center, and fires a view reset.
    pub fn resize(&self, size: DVec2) {
        let view = self.view.get();
        self.view.set(ViewState::new(view.center(), view.zoom, size));
        self.fire_view_reset();
    }

    /// Number of registered view-reset listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn fire_view_reset(&self) {
        let view = self.view.get();
        let projection: &dyn LayerProjection = &view;

        // Listeners registered while dispatching are appended afterwards and
        // only see the next reset. Listeners removed while dispatching are
        // skipped and dropped.
        let mut active = std::mem::take(&mut *self.listeners.borrow_mut());
        let outer = self.dispatch.replace(Some(Dispatch {
            ids: active.iter().map(|(id, _)| *id).collect(),
            removed: Vec::new(),
        }));
        log::debug!("SlippyMap: notifying {} view listeners", active.len());
        for (id, listener) in active.iter_mut() {
            if self.removed_during_dispatch(*id) {
                continue;
            }
            listener(projection);
        }

        let removed = self
            .dispatch
            .replace(outer)
            .map(|dispatch| dispatch.removed)
            .unwrap_or_default();
        active.retain(|(id, _)| !removed.contains(id));

        let mut listeners = self.listeners.borrow_mut();
        active.append(&mut listeners);
        *listeners = active;
    }

    fn removed_during_dispatch(&self, id: ListenerId) -> bool {
        self.dispatch
            .borrow()
            .as_ref()
            .is_some_and(|dispatch| dispatch.removed.contains(&id))
    }
}

impl LayerProjection for SlippyMap {
    fn lat_lng_to_layer_point(&self, coord: Coord<f64>) -> DVec2 {
        self.view.get().lat_lng_to_layer_point(coord)
    }
}

impl MapView for SlippyMap {
    fn overlay_pane(&self) -> Pane {
        self.overlay_pane.clone()
    }

    fn on_view_reset(&self, listener: ViewListener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn off_view_reset(&self, id: ListenerId) -> bool {
        {
            let mut listeners = self.listeners.borrow_mut();
            let before = listeners.len();
            listeners.retain(|(existing, _)| *existing != id);
            if listeners.len() != before {
                return true;
            }
        }

        // The listener may be out for dispatch right now
        match self.dispatch.borrow_mut().as_mut() {
            Some(dispatch) if dispatch.ids.contains(&id) && !dispatch.removed.contains(&id) => {
                dispatch.removed.push(id);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn counting_listener(map: &SlippyMap) -> (ListenerId, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        let id = map.on_view_reset(Box::new(move |_: &dyn LayerProjection| {
            seen.set(seen.get() + 1)
        }));
        (id, count)
    }

    #[test]
    fn test_set_view_notifies_listeners() {
        let map = SlippyMap::new(Coord { x: 0.0, y: 0.0 }, 3.0, DVec2::new(512.0, 512.0));
        let (_, count) = counting_listener(&map);

        map.set_zoom(4.0);
        map.set_view(Coord { x: 5.0, y: 5.0 }, 4.0);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_pan_does_not_notify() {
        let map = SlippyMap::new(Coord { x: 0.0, y: 0.0 }, 3.0, DVec2::new(512.0, 512.0));
        let (_, count) = counting_listener(&map);
        let coord = Coord { x: 12.0, y: -7.0 };
        let before = map.lat_lng_to_layer_point(coord);

        map.pan_by(DVec2::new(40.0, -25.0));

        assert_eq!(count.get(), 0);
        assert_eq!(map.lat_lng_to_layer_point(coord), before);
        assert_eq!(map.view().pane_pos, DVec2::new(-40.0, 25.0));
    }

    #[test]
    fn test_off_view_reset() {
        let map = SlippyMap::new(Coord { x: 0.0, y: 0.0 }, 3.0, DVec2::new(512.0, 512.0));
        let (id, count) = counting_listener(&map);

        assert!(map.off_view_reset(id));
        assert!(!map.off_view_reset(id));
        map.set_zoom(5.0);
        assert_eq!(count.get(), 0);
        assert_eq!(map.listener_count(), 0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let map = SlippyMap::new(Coord { x: 0.0, y: 0.0 }, 3.0, DVec2::new(256.0, 256.0))
            .with_zoom_range(2.0, 6.0);
        map.set_zoom(9.0);
        assert_eq!(map.zoom(), 6.0);
        map.zoom_out(10.0);
        assert_eq!(map.zoom(), 2.0);
    }

    #[test]
    fn test_off_view_reset_during_dispatch() {
        let map = Rc::new(SlippyMap::new(
            Coord { x: 0.0, y: 0.0 },
            3.0,
            DVec2::new(512.0, 512.0),
        ));
        let target = Rc::new(Cell::new(None));
        let removed = Rc::new(Cell::new(false));

        let handle = Rc::downgrade(&map);
        let victim = target.clone();
        let result = removed.clone();
        map.on_view_reset(Box::new(move |_: &dyn LayerProjection| {
            if let (Some(map), Some(id)) = (handle.upgrade(), victim.take()) {
                result.set(map.off_view_reset(id));
            }
        }));
        let (id, count) = counting_listener(&map);
        target.set(Some(id));

        map.set_zoom(4.0);
        assert!(removed.get());
        assert_eq!(count.get(), 0);
        assert_eq!(map.listener_count(), 1);

        map.set_zoom(5.0);
        assert_eq!(count.get(), 0);
        assert!(!map.off_view_reset(id));
    }

    #[test]
    fn test_non_finite_zoom_range_is_ignored() {
        let map = SlippyMap::new(Coord { x: 0.0, y: 0.0 }, 3.0, DVec2::new(256.0, 256.0))
            .with_zoom_range(f64::NAN, f64::NAN);
        map.set_zoom(30.0);
        assert_eq!(map.zoom(), SlippyMap::DEFAULT_MAX_ZOOM);
        map.set_zoom(-2.0);
        assert_eq!(map.zoom(), SlippyMap::DEFAULT_MIN_ZOOM);
    }

    #[test]
    fn test_listener_sees_new_view() {
        let map = SlippyMap::new(Coord { x: 0.0, y: 0.0 }, 1.0, DVec2::new(512.0, 512.0));
        let seen = Rc::new(Cell::new(DVec2::ZERO));
        let sink = seen.clone();
        map.on_view_reset(Box::new(move |projection: &dyn LayerProjection| {
            sink.set(projection.lat_lng_to_layer_point(Coord { x: 0.0, y: 0.0 }));
        }));

        map.set_view(Coord { x: 0.0, y: 0.0 }, 2.0);
        assert_eq!(seen.get(), DVec2::new(256.0, 256.0));
    }
}
