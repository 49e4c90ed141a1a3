use std::io::Read;

use bytes::{Bytes, BytesMut};

use crate::chunk::Chunk;
use crate::cut::Chunker;
use crate::error::ChunkError;

/// How much to pull from the reader per refill.
const READ_LEN: usize = 64 * 1024;

/// Pull-based chunk iterator over a [`Read`] source.
///
/// Produces a lazy, finite, non-restartable sequence of chunks in stream
/// order. The iterator buffers at most one maximum-length chunk plus one
/// read, so memory stays bounded for arbitrarily large streams; the next
/// chunk is only produced when asked, which is what gives upstream stages
/// backpressure.
///
/// A read error is yielded once as `Err` and ends the sequence: no further
/// chunks are emitted after a failed source.
pub struct ChunkIter<R, C> {
    reader: R,
    chunker: C,
    buf: BytesMut,
    offset: u64,
    eof: bool,
    failed: bool,
}

impl<R: Read, C: Chunker> ChunkIter<R, C> {
    /// Create an iterator over `reader` with the given boundary policy.
    pub fn new(reader: R, chunker: C) -> Self {
        Self {
            reader,
            chunker,
            buf: BytesMut::new(),
            offset: 0,
            eof: false,
            failed: false,
        }
    }

    fn refill(&mut self) -> Result<(), ChunkError> {
        let mut scratch = [0u8; READ_LEN];
        loop {
            match self.reader.read(&mut scratch) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.buf.extend_from_slice(&scratch[..n]);
                    return Ok(());
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ChunkError::Io(e)),
            }
        }
    }

    fn take(&mut self, cut: usize) -> Chunk {
        let data: Bytes = self.buf.split_to(cut).freeze();
        let chunk = Chunk {
            offset: self.offset,
            data,
        };
        self.offset += cut as u64;
        chunk
    }
}

impl<R: Read, C: Chunker> Iterator for ChunkIter<R, C> {
    type Item = Result<Chunk, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            // Cut only once the buffer holds a full window (or the stream
            // ended): the policy then sees every byte a boundary decision
            // may depend on, keeping boundaries independent of read sizes.
            if self.eof || self.buf.len() >= self.chunker.max_len() {
                if let Some(cut) = self.chunker.next_cut(&self.buf, self.eof) {
                    return Some(Ok(self.take(cut)));
                }
                if self.eof {
                    return None;
                }
            }
            if let Err(e) = self.refill() {
                self.failed = true;
                return Some(Err(e));
            }
        }
    }
}
