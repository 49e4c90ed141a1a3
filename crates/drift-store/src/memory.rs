use std::collections::HashMap;
use std::sync::RwLock;

use bytes::Bytes;
use drift_types::BlockId;

use crate::block::Block;
use crate::error::{StoreError, StoreResult};
use crate::traits::BlockStore;

/// In-memory, HashMap-based block store.
///
/// Intended for tests and embedding. All blocks are held in memory behind a
/// `RwLock` for safe concurrent access; payloads are shared `Bytes`, so
/// reads are cheap.
pub struct MemoryBlockStore {
    blocks: RwLock<HashMap<BlockId, Bytes>>,
}

impl MemoryBlockStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blocks: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blocks currently stored.
    pub fn len(&self) -> usize {
        self.blocks.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blocks.
    pub fn total_bytes(&self) -> u64 {
        self.blocks
            .read()
            .expect("lock poisoned")
            .values()
            .map(|data| data.len() as u64)
            .sum()
    }

    /// Return a sorted list of all block ids in the store.
    pub fn all_ids(&self) -> Vec<BlockId> {
        let map = self.blocks.read().expect("lock poisoned");
        let mut ids: Vec<BlockId> = map.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl Default for MemoryBlockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockStore for MemoryBlockStore {
    fn put(&self, block: &Block) -> StoreResult<BlockId> {
        let id = *block.id();
        let mut map = self.blocks.write().expect("lock poisoned");
        // Idempotent: if already present, skip (content-addressing guarantees
        // the same id always maps to the same bytes).
        map.entry(id).or_insert_with(|| block.data().clone());
        Ok(id)
    }

    fn get(&self, id: &BlockId) -> StoreResult<Bytes> {
        let map = self.blocks.read().expect("lock poisoned");
        map.get(id).cloned().ok_or(StoreError::NotFound(*id))
    }

    fn exists(&self, id: &BlockId) -> StoreResult<bool> {
        let map = self.blocks.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }
}

impl std::fmt::Debug for MemoryBlockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBlockStore")
            .field("block_count", &self.len())
            .finish()
    }
}
