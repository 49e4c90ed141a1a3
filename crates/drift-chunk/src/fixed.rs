use crate::cut::Chunker;
use crate::error::ChunkError;

/// Default fixed chunk length: 2,048,000 bytes.
pub const DEFAULT_TARGET_LEN: usize = 2_048_000;

/// Positional chunker: boundaries at every multiple of a target length.
///
/// The final chunk of a stream may be shorter and is always flushed.
/// Boundary placement ignores content entirely, which makes this chunker
/// the baseline the content-defined variant is measured against: inserting
/// or deleting a single byte shifts every later boundary, so nearly all
/// chunk identifiers after the edit point change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedChunker {
    target_len: usize,
}

impl FixedChunker {
    /// Create a chunker with the given target length.
    pub fn new(target_len: usize) -> Result<Self, ChunkError> {
        if target_len == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "target length must be non-zero",
            });
        }
        Ok(Self { target_len })
    }

    /// The configured target length.
    pub fn target_len(&self) -> usize {
        self.target_len
    }
}

impl Default for FixedChunker {
    fn default() -> Self {
        Self {
            target_len: DEFAULT_TARGET_LEN,
        }
    }
}

impl Chunker for FixedChunker {
    fn next_cut(&self, data: &[u8], eof: bool) -> Option<usize> {
        if data.len() >= self.target_len {
            Some(self.target_len)
        } else if eof && !data.is_empty() {
            Some(data.len())
        } else {
            None
        }
    }

    fn max_len(&self) -> usize {
        self.target_len
    }
}
