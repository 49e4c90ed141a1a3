/// Errors from DAG assembly and reconstruction.
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    /// Block store operation failed (including missing referenced blocks,
    /// which signal a broken or incomplete DAG).
    #[error("store error: {0}")]
    Store(#[from] drift_store::StoreError),

    /// The chunk source failed mid-stream.
    #[error("chunk source error: {0}")]
    Chunk(#[from] drift_chunk::ChunkError),

    /// A structural node could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for DAG results.
pub type DagResult<T> = Result<T, DagError>;
