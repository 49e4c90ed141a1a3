use bytes::Bytes;

use crate::chunk::Chunk;

/// Boundary policy for splitting a stream into chunks.
///
/// `next_cut` inspects the unconsumed front of the stream and returns the
/// length of the next chunk, or `None` if more bytes are needed to decide.
///
/// # Contract
///
/// - `data` is a growing prefix view of the unconsumed stream: successive
///   calls see the same bytes plus possibly more appended.
/// - Whenever `data.len() >= max_len()` or `eof` is set, a cut is returned
///   for non-empty `data`. Empty `data` never cuts.
/// - The returned boundary is a pure function of the stream contents, never
///   of the sizes in which the stream was buffered. Callers may therefore
///   feed bytes in any granularity and get identical chunk sequences.
/// - At end of stream the final remainder is always cut, even if shorter
///   than a normal chunk: no byte is silently dropped.
pub trait Chunker: Send + Sync {
    /// Decide the length of the next chunk at the front of `data`.
    fn next_cut(&self, data: &[u8], eof: bool) -> Option<usize>;

    /// Upper bound on chunk length. Callers buffer at most this many bytes
    /// before a cut is guaranteed.
    fn max_len(&self) -> usize;
}

impl<C: Chunker + ?Sized> Chunker for &C {
    fn next_cut(&self, data: &[u8], eof: bool) -> Option<usize> {
        (**self).next_cut(data, eof)
    }

    fn max_len(&self) -> usize {
        (**self).max_len()
    }
}

/// Split an in-memory slice into its full chunk sequence.
///
/// Convenience for callers that already hold the whole input; streams should
/// use [`ChunkIter`](crate::ChunkIter) instead.
pub fn split_slice<C: Chunker>(chunker: &C, data: &[u8]) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut offset = 0usize;
    while offset < data.len() {
        let rest = &data[offset..];
        let cut = chunker
            .next_cut(rest, true)
            .expect("eof cut is guaranteed for non-empty data");
        chunks.push(Chunk::new(
            offset as u64,
            Bytes::copy_from_slice(&rest[..cut]),
        ));
        offset += cut;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::FixedChunker;

    #[test]
    fn split_slice_covers_input_exactly() {
        let chunker = FixedChunker::new(4).unwrap();
        let chunks = split_slice(&chunker, b"abcdefghij");

        let lens: Vec<usize> = chunks.iter().map(Chunk::len).collect();
        assert_eq!(lens, vec![4, 4, 2]);

        let mut rebuilt = Vec::new();
        for c in &chunks {
            assert_eq!(c.offset as usize, rebuilt.len());
            rebuilt.extend_from_slice(&c.data);
        }
        assert_eq!(rebuilt, b"abcdefghij");
    }

    #[test]
    fn split_slice_empty_input_yields_no_chunks() {
        let chunker = FixedChunker::new(4).unwrap();
        assert!(split_slice(&chunker, b"").is_empty());
    }
}
