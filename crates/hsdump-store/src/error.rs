use thiserror::Error;

/// Errors from domain sources and hierarchical sinks.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested domain or object does not exist in the source.
    #[error("not found: {0}")]
    NotFound(String),

    /// A computed target path escapes or resolves to the configured root.
    /// Never silently corrected.
    #[error("'{0}' is not a valid target path")]
    PathSanitization(String),

    /// The domain has no root group, so it has no database prefix to
    /// enumerate.
    #[error("domain has no root group")]
    MissingRoot,

    /// I/O error from the local filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A `.domain.json` document failed to encode or decode.
    #[error("domain document error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The S3 API reported a failure other than not-found.
    #[error("S3 operation failed: {0}")]
    S3(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
