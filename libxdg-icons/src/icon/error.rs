//! Error types for the icon system.

use std::path::PathBuf;

use libxdg_basedir::BaseDirError;

/// Errors that can occur in the icon system.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    /// The index.theme descriptor could not be opened or read.
    #[error("Failed to read index.theme at {path}: {source}")]
    IndexRead {
        /// Path of the descriptor.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Walking an icons directory failed.
    #[error("Failed to generate theme map from {path}: {source}")]
    Walk {
        /// Directory being visited.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The cache file could not be inspected or read.
    #[error("Failed to read theme map cache {path}: {source}")]
    CacheRead {
        /// Cache file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The cache file could not be written.
    #[error("Failed to write theme map cache {path}: {source}")]
    CacheWrite {
        /// Cache file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The cache file holds something that is not a theme map.
    #[error("Failed to decode theme map cache {path}: {source}")]
    CacheDecode {
        /// Cache file path.
        path: PathBuf,
        /// Underlying decode error.
        source: serde_json::Error,
    },

    /// The theme map could not be serialized.
    #[error("Failed to encode theme map: {0}")]
    CacheEncode(#[source] serde_json::Error),

    /// Icon not found anywhere in the fallback chain.
    #[error("Icon '{0}' not found")]
    IconNotFound(String),

    /// Base directories could not be determined.
    #[error(transparent)]
    BaseDir(#[from] BaseDirError),
}

impl IconError {
    /// Whether this is the ordinary "not found" outcome rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::IconNotFound(_))
    }
}
