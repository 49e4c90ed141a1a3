use bytes::Bytes;
use drift_chunk::{Chunk, ChunkError};
use drift_store::{Block, BlockStore};
use drift_types::{BlockId, Codec};
use tracing::debug;

use crate::error::DagResult;
use crate::node::{FileNode, NodeLink};

/// The result of assembling one stream: a single designated root.
///
/// The root is the builder's sole output; callers never infer it from
/// iteration order or from the last block written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DagRoot {
    /// Identifier of the stream's root block.
    pub id: BlockId,
    /// Total payload bytes of the stream.
    pub size: u64,
    /// Number of blocks written for this stream (leaves plus parent node).
    pub blocks: u64,
}

/// Assembles a chunk sequence into stored blocks and one root identifier.
///
/// Each pushed chunk becomes a `Raw` leaf block, written immediately, with
/// a link recorded in stream order. `finish` then decides the root:
///
/// - zero chunks: one empty `Raw` leaf is stored and becomes the root, so
///   an empty stream has a well-defined identifier;
/// - one chunk: that leaf's id is the root, no wrapper node;
/// - otherwise: a [`FileNode`] linking all leaves in order is stored as a
///   `Node` block and its id is the root.
pub struct DagBuilder<'a, S: BlockStore + ?Sized> {
    store: &'a S,
    links: Vec<NodeLink>,
}

impl<'a, S: BlockStore + ?Sized> DagBuilder<'a, S> {
    /// Create a builder writing into `store`.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            links: Vec::new(),
        }
    }

    /// Wrap a chunk as a leaf block, store it, and record its link.
    pub fn push(&mut self, chunk: &Chunk) -> DagResult<()> {
        let block = Block::new(Codec::Raw, chunk.data.clone());
        let size = block.len();
        let id = self.store.put(&block)?;
        self.links.push(NodeLink::new(size, id));
        Ok(())
    }

    /// Number of leaves pushed so far.
    pub fn leaves(&self) -> usize {
        self.links.len()
    }

    /// Finish the stream and return its designated root.
    pub fn finish(self) -> DagResult<DagRoot> {
        let root = match self.links.len() {
            0 => {
                let empty = Block::new(Codec::Raw, Bytes::new());
                let id = self.store.put(&empty)?;
                DagRoot {
                    id,
                    size: 0,
                    blocks: 1,
                }
            }
            1 => DagRoot {
                id: self.links[0].id,
                size: self.links[0].size,
                blocks: 1,
            },
            n => {
                let node = FileNode::new(self.links);
                let size = node.total_size();
                let id = self.store.put(&node.to_block()?)?;
                DagRoot {
                    id,
                    size,
                    blocks: n as u64 + 1,
                }
            }
        };
        debug!(root = %root.id, size = root.size, blocks = root.blocks, "assembled stream");
        Ok(root)
    }

    /// Drain a chunk sequence and return the root in one call.
    pub fn build<I>(store: &'a S, chunks: I) -> DagResult<DagRoot>
    where
        I: IntoIterator<Item = Result<Chunk, ChunkError>>,
    {
        let mut builder = Self::new(store);
        for chunk in chunks {
            builder.push(&chunk?)?;
        }
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use drift_chunk::{ChunkIter, FixedChunker};
    use drift_store::MemoryBlockStore;

    use super::*;
    use crate::restore::restore;

    fn build_fixed(store: &MemoryBlockStore, data: &[u8], target: usize) -> DagRoot {
        let chunker = FixedChunker::new(target).unwrap();
        DagBuilder::build(store, ChunkIter::new(Cursor::new(data.to_vec()), chunker)).unwrap()
    }

    #[test]
    fn empty_stream_has_a_root() {
        let store = MemoryBlockStore::new();
        let root = build_fixed(&store, b"", 8);

        assert_eq!(root.size, 0);
        assert_eq!(root.blocks, 1);
        assert_eq!(root.id, BlockId::new(Codec::Raw, b""));
        assert_eq!(restore(&store, &root.id).unwrap(), b"");
    }

    #[test]
    fn single_chunk_root_is_the_leaf() {
        let store = MemoryBlockStore::new();
        let root = build_fixed(&store, b"small", 8);

        assert_eq!(root.id, BlockId::new(Codec::Raw, b"small"));
        assert_eq!(root.id.codec(), Codec::Raw);
        assert_eq!(root.size, 5);
        assert_eq!(root.blocks, 1);
        // Only the leaf itself was stored.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn multi_chunk_root_is_a_node() {
        let store = MemoryBlockStore::new();
        let root = build_fixed(&store, b"abcdefghij", 4);

        assert_eq!(root.id.codec(), Codec::Node);
        assert_eq!(root.size, 10);
        assert_eq!(root.blocks, 4); // three leaves + parent
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn root_round_trips_to_original_bytes() {
        let store = MemoryBlockStore::new();
        for data in [&b""[..], b"x", b"exactly8", b"a longer stream spanning chunks"] {
            let root = build_fixed(&store, data, 8);
            assert_eq!(restore(&store, &root.id).unwrap(), data);
        }
    }

    #[test]
    fn identical_streams_share_every_block() {
        let store = MemoryBlockStore::new();
        let a = build_fixed(&store, b"same bytes, same blocks!", 8);
        let before = store.len();
        let b = build_fixed(&store, b"same bytes, same blocks!", 8);

        assert_eq!(a.id, b.id);
        assert_eq!(store.len(), before, "re-ingesting wrote nothing new");
    }

    #[test]
    fn chunk_source_error_propagates() {
        let store = MemoryBlockStore::new();
        let chunks = vec![
            Ok(Chunk::new(0, Bytes::from_static(b"ok"))),
            Err(ChunkError::Io(std::io::Error::other("stream died"))),
        ];
        let err = DagBuilder::build(&store, chunks).unwrap_err();
        assert!(matches!(err, crate::DagError::Chunk(_)));
    }
}
