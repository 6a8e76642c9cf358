//! Error types for the scout-search crate.
//!
//! Only failures that end an operation live here. Expected, recoverable
//! outcomes (a failed fetch attempt, a rejected record, an unmatched
//! snippet) are plain values returned by the component that produced them.

/// Errors that terminate a search operation.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// No engine is registered under the requested name.
    #[error("engine <{0}> does not exist")]
    UnknownEngine(String),

    /// A caller-supplied argument is out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Reading or writing the on-disk cache failed.
    #[error("cache error: {0}")]
    Cache(#[from] std::io::Error),
}

/// Convenience type alias for scout-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_engine() {
        let err = SearchError::UnknownEngine("altavista".into());
        assert_eq!(err.to_string(), "engine <altavista> does not exist");
    }

    #[test]
    fn display_invalid_input() {
        let err = SearchError::InvalidInput("topk must be at least 1".into());
        assert_eq!(err.to_string(), "invalid input: topk must be at least 1");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("max_attempts must be > 0".into());
        assert_eq!(err.to_string(), "config error: max_attempts must be > 0");
    }

    #[test]
    fn display_http() {
        let err = SearchError::Http("invalid proxy".into());
        assert_eq!(err.to_string(), "HTTP error: invalid proxy");
    }

    #[test]
    fn io_error_converts_to_cache() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SearchError = io.into();
        assert!(err.to_string().starts_with("cache error:"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
