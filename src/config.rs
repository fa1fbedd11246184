//! Overlay options and render configuration.
//!
//! Both structs are serde-backed so they can be read from a JSON file; every
//! field has a default, so partial files are accepted.

use crate::error::{Error, Result};
use crate::geo::GeoPath;
use geo_types::Coord;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Styling and precision options for a region overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    /// Space-separated classes applied to every region path
    pub class: Option<String>,
    /// Class of the group wrapping the paths
    pub group_class: Option<String>,
    /// Id of the group wrapping the paths
    pub group_id: Option<String>,
    /// Radius of circles drawn for point features
    pub point_radius: f64,
    /// Decimal places kept in path data (`null` for full precision)
    pub digits: Option<u32>,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            class: None,
            group_class: Some("leaflet-zoom-hide".to_string()),
            group_id: Some("mapgroup".to_string()),
            point_radius: GeoPath::DEFAULT_POINT_RADIUS,
            digits: Some(GeoPath::DEFAULT_DIGITS),
        }
    }
}

impl OverlayOptions {
    /// Default options with the given region classes.
    pub fn with_class(class: Option<&str>) -> Self {
        Self {
            class: class.map(str::to_string),
            ..Default::default()
        }
    }

    /// Builds the path generator these options describe.
    pub fn geo_path(&self) -> GeoPath {
        GeoPath::new()
            .with_point_radius(self.point_radius)
            .with_digits(self.digits)
    }
}

/// Initial map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
    /// Viewport width in pixels
    pub width: f64,
    /// Viewport height in pixels
    pub height: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            // Center of continental US
            center_lat: 39.0,
            center_lon: -98.0,
            zoom: 4.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl ViewConfig {
    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: self.center_lon,
            y: self.center_lat,
        }
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Checks that the view describes a drawable viewport.
    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(Error::InvalidView(format!(
                "viewport must have a positive size, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.zoom.is_finite() {
            return Err(Error::InvalidView(format!("zoom must be finite, got {}", self.zoom)));
        }
        if !(-90.0..=90.0).contains(&self.center_lat) || !(-180.0..=180.0).contains(&self.center_lon)
        {
            return Err(Error::InvalidView(format!(
                "center ({}, {}) is out of range",
                self.center_lat, self.center_lon
            )));
        }
        Ok(())
    }
}

/// Configuration for rendering a region file over a map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// GeoJSON file holding the regions
    pub regions: PathBuf,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub overlay: OverlayOptions,
    /// Where to write the SVG snapshot (stdout when absent)
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl RenderConfig {
    /// Loads and validates a JSON config file. A relative `regions` path is
    /// resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let mut config = Self::from_json(&json)?;
        if config.regions.is_relative() {
            if let Some(dir) = path.parent() {
                config.regions = dir.join(&config.regions);
            }
        }
        log::info!("Loaded render config from {:?}", path);
        Ok(config)
    }

    /// Parses and validates a JSON config string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.view.validate()?;
        Ok(config)
    }
}
