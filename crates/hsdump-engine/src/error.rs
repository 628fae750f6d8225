use hsdump_store::StoreError;
use thiserror::Error;

/// Errors surfaced while processing a replication run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A collaborator failed while a specific domain was being processed.
    /// The underlying [`StoreError`] keeps its distinguishing detail.
    #[error("domain '{domain}': {source}")]
    Domain {
        domain: String,
        #[source]
        source: StoreError,
    },

    /// A collaborator failed outside any per-domain context.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
