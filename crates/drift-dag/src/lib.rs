//! Block DAG assembly for drift.
//!
//! Wraps a chunk sequence into content-addressed leaf blocks plus one
//! structural parent node, producing a single root identifier per stream.
//! The root round-trips: resolving it against the store and concatenating
//! leaves in link order reproduces the original input exactly.

pub mod builder;
pub mod error;
pub mod node;
pub mod restore;

pub use builder::{DagBuilder, DagRoot};
pub use error::{DagError, DagResult};
pub use node::{FileNode, NodeLink};
pub use restore::{link_set, restore};
