//! Error types for hover-media processing.

use std::path::PathBuf;

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while processing a stylesheet.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The stylesheet could not be parsed.
    #[error(transparent)]
    Stylesheet(#[from] hover_media_core::Error),

    /// A rule mentioning `:hover` has a selector that could not be parsed.
    #[error(transparent)]
    Selector(#[from] hover_media_selector::Error),

    /// File I/O error.
    #[error("Failed to read stylesheet '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
