//! Error types for the concepts-ink library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for archive decoding.
///
/// Only fatal, whole-archive problems live here. A single drawable with a
/// malformed geometry field is skipped during extraction and never surfaces
/// as an `Error` (see [`crate::stroke::StrokeExtractor::skipped`]).
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Top-level structure is not a keyed archive ($objects/$top missing or wrong shape)
    #[error("Invalid keyed archive: {0}")]
    InvalidArchive(String),

    /// $top has no `root` reference
    #[error("Missing root reference in $top")]
    MissingRoot,

    /// Object reference points outside the object table
    #[error("Object reference {index} out of bounds (count: {count})")]
    RefOutOfBounds { index: usize, count: usize },

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// Property-list container parse error
    #[error("Plist error: {0}")]
    Plist(#[from] plist::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid archive error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArchive(msg.into())
    }
}

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, Error>;
