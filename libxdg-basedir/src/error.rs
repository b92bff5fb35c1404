//! Error types for base directory resolution.

/// Errors that can occur while resolving XDG base directories.
#[derive(Debug, thiserror::Error)]
pub enum BaseDirError {
    /// The environment does not allow base directories to be determined
    /// (typically no home directory).
    #[error("Failed to determine XDG base directories: {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
}
