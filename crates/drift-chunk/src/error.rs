use thiserror::Error;

/// Errors from chunking operations.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// Chunker parameters are invalid.
    #[error("invalid chunker config: {message}")]
    InvalidConfig { message: &'static str },

    /// The input stream failed mid-read. No further chunks are emitted.
    #[error("stream read error: {0}")]
    Io(#[from] std::io::Error),
}
