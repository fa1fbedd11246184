//! Error types for loading regions and render configuration.
//!
//! The overlay itself never fails: bad geometry renders as empty paths.
//! Only the edges that touch files and parsers return errors.

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading regions or configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse GeoJSON: {0}")]
    GeoJson(#[from] Box<geojson::Error>),

    #[error("Failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid view: {0}")]
    InvalidView(String),
}

impl From<geojson::Error> for Error {
    fn from(e: geojson::Error) -> Self {
        Error::GeoJson(Box::new(e))
    }
}
