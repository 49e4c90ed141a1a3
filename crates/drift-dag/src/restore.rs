use drift_store::BlockStore;
use drift_types::{BlockId, Codec};

use crate::error::DagResult;
use crate::node::{FileNode, NodeLink};

/// Reconstruct the original byte stream a root represents.
///
/// Resolves every referenced block from the store and concatenates leaves
/// in link order; nested structural nodes are followed recursively. A
/// missing reference surfaces as a store `NotFound` error (a broken DAG).
pub fn restore<S: BlockStore + ?Sized>(store: &S, root: &BlockId) -> DagResult<Vec<u8>> {
    let mut out = Vec::new();
    restore_into(store, root, &mut out)?;
    Ok(out)
}

fn restore_into<S: BlockStore + ?Sized>(
    store: &S,
    id: &BlockId,
    out: &mut Vec<u8>,
) -> DagResult<()> {
    let data = store.get(id)?;
    match id.codec() {
        Codec::Raw => out.extend_from_slice(&data),
        Codec::Node => {
            let node = FileNode::from_bytes(&data)?;
            for link in &node.links {
                restore_into(store, &link.id, out)?;
            }
        }
    }
    Ok(())
}

/// Resolve a root's direct link set: the identifiers of its immediate
/// children, in order.
///
/// A `Node` root yields its recorded links. A `Raw` root is its own single
/// leaf, so it yields one self-link; this keeps single-chunk streams
/// comparable in dedup accounting instead of appearing empty.
pub fn link_set<S: BlockStore + ?Sized>(store: &S, root: &BlockId) -> DagResult<Vec<NodeLink>> {
    let data = store.get(root)?;
    match root.codec() {
        Codec::Raw => Ok(vec![NodeLink::new(data.len() as u64, *root)]),
        Codec::Node => Ok(FileNode::from_bytes(&data)?.links),
    }
}
