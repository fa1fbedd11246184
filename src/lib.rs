#![warn(clippy::all)]

//! Map Regions - GeoJSON region overlays for slippy maps.
//!
//! Draws a collection of GeoJSON features as SVG paths inside a surface
//! layered over an interactive map, and keeps that surface aligned with the
//! base map every time the view is reset.
//!
//! ```no_run
//! use geo_types::Coord;
//! use glam::DVec2;
//! use map_regions::{parse_regions, RegionOverlay, SlippyMap};
//!
//! # fn main() -> map_regions::Result<()> {
//! let map = SlippyMap::new(Coord { x: -93.6, y: 41.6 }, 7.0, DVec2::new(800.0, 600.0));
//! let regions = parse_regions(&std::fs::read_to_string("counties.geojson")?)?;
//! let overlay = RegionOverlay::new(&map, regions, Some("county outline"));
//!
//! map.set_zoom(8.0); // the overlay repositions itself
//! println!("{}", overlay.to_svg());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod geo;
pub mod map;
pub mod overlay;
pub mod scene;

pub use config::{OverlayOptions, RenderConfig, ViewConfig};
pub use error::{Error, Result};
pub use geo::{load_regions, parse_regions, GeoPath, PixelBounds};
pub use map::{LayerProjection, ListenerId, MapView, SlippyMap, ViewState};
pub use overlay::RegionOverlay;
pub use scene::{render_document, Pane};
