use bytes::Bytes;
use drift_types::BlockId;

use crate::block::Block;
use crate::error::StoreResult;

/// Content-addressed block store.
///
/// All implementations must satisfy these invariants:
/// - Blocks are immutable once written. Content-addressing guarantees this:
///   the same bytes under the same codec always produce the same id.
/// - `put` is idempotent: writing a block whose id already exists is a no-op.
///   Divergent content under one key cannot occur while the identifier
///   contract holds, so nothing is ever overwritten.
/// - Concurrent reads are always safe; writes need no cross-key locking.
/// - The store never interprets block contents.
/// - All I/O errors are propagated, never silently ignored.
pub trait BlockStore: Send + Sync {
    /// Write a block and return its identifier.
    fn put(&self, block: &Block) -> StoreResult<BlockId>;

    /// Read the raw bytes for an identifier.
    ///
    /// Fails with [`StoreError::NotFound`](crate::StoreError::NotFound) if
    /// the block is absent.
    fn get(&self, id: &BlockId) -> StoreResult<Bytes>;

    /// Check whether a block exists in the store.
    fn exists(&self, id: &BlockId) -> StoreResult<bool>;

    /// Read multiple blocks in a batch.
    ///
    /// Default implementation calls `get()` for each id. Backends may
    /// override for better performance.
    fn get_batch(&self, ids: &[BlockId]) -> StoreResult<Vec<Bytes>> {
        ids.iter().map(|id| self.get(id)).collect()
    }

    /// Write multiple blocks in a batch and return their ids.
    fn put_batch(&self, blocks: &[Block]) -> StoreResult<Vec<BlockId>> {
        blocks.iter().map(|b| self.put(b)).collect()
    }
}
