//! Error types for the icon renderer

use std::path::PathBuf;

use thiserror::Error;

use crate::rendering::paint::Bounds;

/// Result type alias for rendering operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering or writing icons
#[derive(Error, Debug)]
pub enum Error {
    /// A required backend (PNG encoder, decoder) was compiled out
    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A computed shape does not fit on the canvas
    #[error("Shape '{shape}' at {bounds} falls outside the {size}x{size} canvas")]
    OutOfBounds {
        shape: String,
        bounds: Bounds,
        size: u32,
    },

    /// Failed to encode or decode a PNG
    #[error("PNG codec error: {0}")]
    EncodeError(String),

    /// Failed to load or parse a font
    #[error("Font error: {0}")]
    FontError(String),

    /// Filesystem failure while writing output
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Unsupported(e) => Error::DependencyUnavailable(e.to_string()),
            other => Error::EncodeError(other.to_string()),
        }
    }
}
