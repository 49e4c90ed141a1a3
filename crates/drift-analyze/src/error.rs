/// Errors from dedup analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// Block store operation failed (including missing blocks, which
    /// signal a broken or incomplete DAG reference).
    #[error("store error: {0}")]
    Store(#[from] drift_store::StoreError),

    /// A stored manifest could not be loaded.
    #[error("manifest error: {0}")]
    Manifest(#[from] drift_manifest::ManifestError),

    /// A structural node could not be decoded.
    #[error("dag error: {0}")]
    Dag(#[from] drift_dag::DagError),
}

/// Result alias for analysis operations.
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;
