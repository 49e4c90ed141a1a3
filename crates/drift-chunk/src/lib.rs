//! Stream chunking for drift.
//!
//! Splits a byte stream into an ordered sequence of [`Chunk`]s whose
//! concatenation equals the input exactly. Two boundary policies implement
//! the same [`Chunker`] trait:
//!
//! - [`FixedChunker`] -- purely positional boundaries at multiples of a
//!   target length. An insertion or deletion shifts every later boundary.
//! - [`GearChunker`] -- content-defined boundaries from a Rabin-style
//!   rolling fingerprint, so an interior edit invalidates only the chunk(s)
//!   around it.
//!
//! Boundary decisions are a pure function of the stream bytes, independent
//! of how the stream is buffered: reading one byte at a time or one
//! megabyte at a time yields identical chunks. [`ChunkIter`] drives a
//! [`std::io::Read`] source lazily under this contract, buffering at most
//! one maximum-length chunk.

pub mod chunk;
pub mod cut;
pub mod error;
pub mod fixed;
pub mod gear;
pub mod iter;

pub use chunk::Chunk;
pub use cut::{split_slice, Chunker};
pub use error::ChunkError;
pub use fixed::{FixedChunker, DEFAULT_TARGET_LEN};
pub use gear::{GearChunker, DEFAULT_AVG_LEN, DEFAULT_MAX_LEN, DEFAULT_MIN_LEN};
pub use iter::ChunkIter;
