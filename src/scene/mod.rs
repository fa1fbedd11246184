//! SVG scene graph for map overlays.
//!
//! A map exposes an overlay [`Pane`]; overlays append an [`SvgSurface`]
//! holding one [`SvgGroup`] of [`PathElement`]s. The scene can be
//! serialized to SVG text for snapshots or for handing off to a browser.

mod document;
mod element;
mod pane;

pub use document::{escape_attr, render_document, write_surface};
pub use element::{ClassList, PathElement, SvgGroup, SvgSurface};
pub use pane::{Pane, SurfaceRef};
