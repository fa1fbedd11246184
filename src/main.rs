#![warn(clippy::all)]

//! Command line front end for rendering region overlays.
//!
//! Reads a JSON render config, draws its GeoJSON regions over a slippy map
//! view, and writes an SVG snapshot of the viewport or the pixel bounds.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glam::DVec2;
use map_regions::geo::region_label;
use map_regions::{
    load_regions, render_document, MapView, PixelBounds, RegionOverlay, RenderConfig, SlippyMap,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the regions over the configured view as an SVG snapshot
    Render {
        #[arg(short, long, value_name = "FILE", default_value = "map-regions.json")]
        config: PathBuf,
        /// Zoom to this level after drawing
        #[arg(long)]
        zoom: Option<f64>,
        /// Space-separated classes for every region path
        #[arg(long)]
        class: Option<String>,
        /// Pan the map by DX,DY pixels after drawing
        #[arg(long, value_name = "DX,DY", value_parser = parse_offset, allow_hyphen_values = true)]
        pan: Option<DVec2>,
        /// Output file (overrides the config; stdout when neither is set)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print the pixel bounds of the regions as JSON
    Bounds {
        #[arg(short, long, value_name = "FILE", default_value = "map-regions.json")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            config,
            zoom,
            class,
            pan,
            output,
        } => {
            let mut render_config = load_config(&config)?;
            if class.is_some() {
                render_config.overlay.class = class;
            }
            if output.is_some() {
                render_config.output = output;
            }
            render(&render_config, zoom, pan)
        }
        Commands::Bounds { config } => {
            let render_config = load_config(&config)?;
            print_bounds(&render_config)
        }
    }
}

fn load_config(path: &Path) -> Result<RenderConfig> {
    RenderConfig::load(path).with_context(|| format!("Failed to load config file: {:?}", path))
}

fn open_map(config: &RenderConfig) -> SlippyMap {
    SlippyMap::new(config.view.center(), config.view.zoom, config.view.size())
}

fn render(config: &RenderConfig, zoom: Option<f64>, pan: Option<DVec2>) -> Result<()> {
    let regions = load_regions(&config.regions)
        .with_context(|| format!("Failed to load regions: {:?}", config.regions))?;

    let map = open_map(config);
    let overlay = RegionOverlay::with_options(&map, regions, &config.overlay);
    log::info!("Drew {} regions at zoom {}", overlay.len(), map.zoom());

    if let Some(zoom) = zoom {
        map.set_zoom(zoom);
        log::info!("Zoomed to {}", map.zoom());
    }
    if let Some(offset) = pan {
        map.pan_by(offset);
    }

    let document = render_document(&map.view(), &map.overlay_pane());
    match &config.output {
        Some(path) => {
            fs::write(path, document)
                .with_context(|| format!("Failed to write SVG: {:?}", path))?;
            log::info!("Wrote {:?}", path);
        }
        None => print!("{}", document),
    }

    Ok(())
}

fn print_bounds(config: &RenderConfig) -> Result<()> {
    let regions = load_regions(&config.regions)
        .with_context(|| format!("Failed to load regions: {:?}", config.regions))?;

    let map = open_map(config);
    let path = config.overlay.geo_path();

    let per_region: Vec<_> = regions
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            json!({
                "index": index,
                "name": region_label(feature),
                "bounds": bounds_json(path.bounds(std::iter::once(feature), &map)),
            })
        })
        .collect();

    let report = json!({
        "zoom": map.zoom(),
        "bounds": bounds_json(path.bounds(&regions, &map)),
        "regions": per_region,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn bounds_json(bounds: Option<PixelBounds>) -> serde_json::Value {
    match bounds {
        Some(b) => json!({
            "left": b.min.x,
            "top": b.min.y,
            "width": b.width(),
            "height": b.height(),
        }),
        None => serde_json::Value::Null,
    }
}

fn parse_offset(s: &str) -> Result<DVec2, String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got '{}'", s))?;
    let dx: f64 = dx.trim().parse().map_err(|e| format!("invalid DX: {}", e))?;
    let dy: f64 = dy.trim().parse().map_err(|e| format!("invalid DY: {}", e))?;
    Ok(DVec2::new(dx, dy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("10,-4.5"), Ok(DVec2::new(10.0, -4.5)));
        assert_eq!(parse_offset(" 1 , 2 "), Ok(DVec2::new(1.0, 2.0)));
        assert!(parse_offset("10").is_err());
        assert!(parse_offset("a,b").is_err());
    }

    #[test]
    fn test_bounds_json() {
        assert_eq!(bounds_json(None), serde_json::Value::Null);
        let bounds = PixelBounds {
            min: DVec2::new(1.0, 2.0),
            max: DVec2::new(4.0, 6.0),
        };
        assert_eq!(
            bounds_json(Some(bounds)),
            json!({"left": 1.0, "top": 2.0, "width": 3.0, "height": 4.0})
        );
    }
}
