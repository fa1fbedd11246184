//! Geographic geometry handling for map overlays.
//!
//! This module streams GeoJSON geometry through a projection to produce SVG
//! path data and pixel bounds, and reads region features from GeoJSON text.

mod path;
mod regions;
mod stream;

pub use path::{GeoPath, PixelBounds};
pub use regions::{load_regions, parse_regions, region_label};
pub use stream::{stream_feature, stream_geometry, GeoStream, TransformStream};
