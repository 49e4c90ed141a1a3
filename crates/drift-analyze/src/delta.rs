use std::collections::HashSet;

use drift_dag::NodeLink;
use drift_types::BlockId;

/// Links present in `newer` whose identifiers are absent from `older`.
///
/// Set semantics over identifiers, order-preserving on first occurrence:
/// a chunk that repeats within `newer` is stored once and counted once.
/// `new_links(a, a)` is empty; `new_links(b, &[])` is `b`'s id set.
pub fn new_links(newer: &[NodeLink], older: &[NodeLink]) -> Vec<NodeLink> {
    let older_ids: HashSet<BlockId> = older.iter().map(|l| l.id).collect();
    let mut seen: HashSet<BlockId> = HashSet::new();
    newer
        .iter()
        .filter(|l| !older_ids.contains(&l.id) && seen.insert(l.id))
        .copied()
        .collect()
}
