//! Foundation types for drift.
//!
//! This crate provides the content-addressed identifier used throughout the
//! drift system. Every other drift crate depends on `drift-types`.
//!
//! # Key Types
//!
//! - [`BlockId`] — Content-addressed identifier (codec tag + BLAKE3 multihash)
//! - [`Codec`] — Content-type tag distinguishing raw leaves from structured nodes

pub mod block_id;
pub mod error;

pub use block_id::{BlockId, Codec};
pub use error::TypeError;
