use drift_types::BlockId;

/// Errors from block store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested block was not found.
    #[error("block not found: {0}")]
    NotFound(BlockId),

    /// Content hash mismatch on read (data corruption).
    #[error("hash mismatch for {expected:?}: stored bytes hash to {computed:?}")]
    HashMismatch {
        expected: BlockId,
        computed: BlockId,
    },

    /// The filename of a stored block is not a valid identifier.
    #[error("invalid block key {name:?}: {source}")]
    InvalidKey {
        name: String,
        source: drift_types::TypeError,
    },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
