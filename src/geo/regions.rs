//! Reading region features from GeoJSON text.

use crate::error::Result;
use geojson::{Feature, GeoJson};
use std::fs;
use std::path::Path;

/// Parses GeoJSON into a list of region features.
///
/// A FeatureCollection yields its features in order, a single Feature
/// yields itself, and a bare Geometry is wrapped into a feature.
pub fn parse_regions(geojson_str: &str) -> Result<Vec<Feature>> {
    let geojson: GeoJson = geojson_str.parse()?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => vec![Feature::from(g)],
    };

    let missing = features.iter().filter(|f| f.geometry.is_none()).count();
    if missing > 0 {
        log::warn!("{} of {} regions have no geometry", missing, features.len());
    }

    Ok(features)
}

/// Reads and parses a GeoJSON file.
pub fn load_regions(path: &Path) -> Result<Vec<Feature>> {
    let text = fs::read_to_string(path)?;
    let features = parse_regions(&text)?;
    log::info!("Loaded {} regions from {:?}", features.len(), path);
    Ok(features)
}

/// Returns a display name for a feature from its `name` or `NAME` property.
pub fn region_label(feature: &Feature) -> Option<&str> {
    feature
        .properties
        .as_ref()
        .and_then(|p| p.get("name").or_else(|| p.get("NAME")))
        .and_then(|v| v.as_str())
}
