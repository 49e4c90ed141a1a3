use bytes::Bytes;

/// A contiguous byte range of an input stream.
///
/// Chunks are transient: they exist between the chunker that produced them
/// and the DAG builder that wraps them into blocks. The payload is shared
/// [`Bytes`], so passing chunks around does not copy stream data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// Offset of the first byte within the original stream.
    pub offset: u64,
    /// The chunk's bytes.
    pub data: Bytes,
}

impl Chunk {
    /// Create a chunk at the given stream offset.
    pub fn new(offset: u64, data: impl Into<Bytes>) -> Self {
        Self {
            offset,
            data: data.into(),
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` for a zero-length chunk.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
