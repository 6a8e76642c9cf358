//! Error types for the scout command line.

use scout_search::SearchError;

/// Top-level error type for the command line.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    /// Configuration file could not be parsed or written.
    #[error("config error: {0}")]
    Config(String),

    /// Invalid command-line usage.
    #[error("{0}")]
    Usage(String),

    /// Failure inside the search library.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ScoutError>;
