//! The overlay pane: an ordered stack of drawing surfaces.

use super::SvgSurface;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Shared handle to a surface inside a pane.
pub type SurfaceRef = Rc<RefCell<SvgSurface>>;

/// Cloneable handle to a map's overlay pane.
///
/// Clones share the same surfaces, so an overlay can hold the pane it was
/// inserted into while the map keeps its own handle.
#[derive(Debug, Clone, Default)]
pub struct Pane {
    surfaces: Rc<RefCell<Vec<SurfaceRef>>>,
}

impl Pane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a surface on top of the existing ones and returns its handle.
    pub fn append(&self, surface: SvgSurface) -> SurfaceRef {
        let surface = Rc::new(RefCell::new(surface));
        self.surfaces.borrow_mut().push(surface.clone());
        surface
    }

    /// Detaches a surface. Returns `false` if it was not in this pane.
    pub fn remove(&self, surface: &SurfaceRef) -> bool {
        let mut surfaces = self.surfaces.borrow_mut();
        let before = surfaces.len();
        surfaces.retain(|s| !Rc::ptr_eq(s, surface));
        surfaces.len() != before
    }

    pub fn contains(&self, surface: &SurfaceRef) -> bool {
        self.surfaces.borrow().iter().any(|s| Rc::ptr_eq(s, surface))
    }

    pub fn len(&self) -> usize {
        self.surfaces.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.borrow().is_empty()
    }

    /// Surfaces in paint order (bottom first).
    pub fn surfaces(&self) -> Ref<'_, Vec<SurfaceRef>> {
        self.surfaces.borrow()
    }
}
