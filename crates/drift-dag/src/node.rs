use drift_store::Block;
use drift_types::{BlockId, Codec};
use serde::{Deserialize, Serialize};

use crate::error::{DagError, DagResult};

/// An ordered reference from a structural node to a child block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLink {
    /// Byte length of the referenced block's payload.
    pub size: u64,
    /// Content-addressed identifier of the referenced block.
    pub id: BlockId,
}

impl NodeLink {
    /// Create a link.
    pub fn new(size: u64, id: BlockId) -> Self {
        Self { size, id }
    }
}

/// Structural node: an ordered list of links to child blocks.
///
/// Link order is stream order and is never re-sorted: concatenating, in
/// link order, the bytes reachable from this node's leaves reproduces
/// exactly the input the node represents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub links: Vec<NodeLink>,
}

impl FileNode {
    /// Create a node over the given links, preserving their order.
    pub fn new(links: Vec<NodeLink>) -> Self {
        Self { links }
    }

    /// Sum of the linked payload sizes.
    pub fn total_size(&self) -> u64 {
        self.links.iter().map(|l| l.size).sum()
    }

    /// Number of links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the node has no links.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Serialize into a `Node` block for storage.
    pub fn to_block(&self) -> DagResult<Block> {
        let data =
            serde_json::to_vec(self).map_err(|e| DagError::Serialization(e.to_string()))?;
        Ok(Block::new(Codec::Node, data))
    }

    /// Decode from stored node bytes.
    pub fn from_bytes(data: &[u8]) -> DagResult<Self> {
        serde_json::from_slice(data).map_err(|e| DagError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(byte: u8, size: u64) -> NodeLink {
        NodeLink::new(size, BlockId::from_parts(Codec::Raw, [byte; 32]))
    }

    #[test]
    fn link_order_is_preserved() {
        let node = FileNode::new(vec![link(3, 10), link(1, 20), link(2, 30)]);
        let sizes: Vec<u64> = node.links.iter().map(|l| l.size).collect();
        assert_eq!(sizes, vec![10, 20, 30]);
        assert_eq!(node.total_size(), 60);
    }

    #[test]
    fn block_roundtrip() {
        let node = FileNode::new(vec![link(1, 5), link(2, 7)]);
        let block = node.to_block().unwrap();
        assert_eq!(block.id().codec(), Codec::Node);

        let decoded = FileNode::from_bytes(block.data()).unwrap();
        assert_eq!(node, decoded);
    }

    #[test]
    fn identical_nodes_identical_blocks() {
        let a = FileNode::new(vec![link(1, 5)]).to_block().unwrap();
        let b = FileNode::new(vec![link(1, 5)]).to_block().unwrap();
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn malformed_bytes_fail_to_decode() {
        let err = FileNode::from_bytes(b"not a node").unwrap_err();
        assert!(matches!(err, DagError::Serialization(_)));
    }
}
