//! Content-addressed block storage for drift.
//!
//! This crate implements a hash-keyed block store analogous to git's
//! `.git/objects/` directory. Every piece of data drift persists -- chunk
//! leaves, structural nodes, manifests -- is stored as an immutable block
//! identified by its [`BlockId`](drift_types::BlockId).
//!
//! # Storage Backends
//!
//! All backends implement the [`BlockStore`] trait:
//!
//! - [`MemoryBlockStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlockStore`] -- one file per block, filename = canonical id string
//!
//! # Design Rules
//!
//! 1. Blocks are immutable once written (content-addressing guarantees this).
//! 2. Writes are idempotent: putting an existing block is a no-op.
//! 3. Concurrent reads are always safe (blocks are immutable); no cross-key
//!    locking is needed because writes are keyed independently per content.
//! 4. The store never interprets block contents -- it is a pure key-value store.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod block;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use block::Block;
pub use error::{StoreError, StoreResult};
pub use fs::FsBlockStore;
pub use memory::MemoryBlockStore;
pub use traits::BlockStore;
