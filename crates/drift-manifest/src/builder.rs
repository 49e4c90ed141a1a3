use std::collections::HashMap;

use drift_store::{Block, BlockStore};
use drift_types::{BlockId, Codec};

use crate::error::{ManifestError, ManifestResult};
use crate::manifest::{DedupDist, DedupManifest, DedupVersion, PackageManifest, Strategy};

/// Derive a dedup manifest from an immutable base manifest.
///
/// A pure pass: for each version in base order, the download reference is
/// replaced by that strategy's `{root, size}` result, or left unset when
/// the version has no result (failed ingestion). The base is never
/// mutated, so two strategies can derive from the same base without
/// sharing state.
pub fn build_dedup_manifest(
    base: &PackageManifest,
    strategy: Strategy,
    results: &HashMap<String, DedupDist>,
) -> DedupManifest {
    DedupManifest {
        name: base.name.clone(),
        strategy,
        versions: base
            .versions
            .iter()
            .map(|entry| DedupVersion {
                version: entry.version.clone(),
                dist: results.get(&entry.version).copied(),
            })
            .collect(),
    }
}

/// Serialize a dedup manifest and store it as a `Node` block.
///
/// The returned identifier is the run's externally reported result.
pub fn store_manifest<S: BlockStore + ?Sized>(
    store: &S,
    manifest: &DedupManifest,
) -> ManifestResult<BlockId> {
    let data =
        serde_json::to_vec(manifest).map_err(|e| ManifestError::Serialization(e.to_string()))?;
    Ok(store.put(&Block::new(Codec::Node, data))?)
}

/// Load a stored dedup manifest back from the store.
pub fn load_manifest<S: BlockStore + ?Sized>(
    store: &S,
    id: &BlockId,
) -> ManifestResult<DedupManifest> {
    let data = store.get(id)?;
    serde_json::from_slice(&data).map_err(|e| ManifestError::Serialization(e.to_string()))
}
