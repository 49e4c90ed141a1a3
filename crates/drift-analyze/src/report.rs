use std::collections::HashSet;

use drift_dag::{link_set, FileNode};
use drift_manifest::{load_manifest, Strategy};
use drift_store::BlockStore;
use drift_types::{BlockId, Codec};
use tracing::debug;

use crate::delta::new_links;
use crate::error::AnalyzeResult;

/// Blocks and bytes one version transition added over its predecessor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionDelta {
    pub version: String,
    /// Blocks present in this version's link set but not the predecessor's.
    pub new_blocks: usize,
    /// Their summed payload bytes, read back from the store.
    pub new_bytes: u64,
    /// The version's full stream length, for scale.
    pub stream_size: u64,
}

/// Aggregated dedup accounting for one stored manifest.
#[derive(Clone, Debug)]
pub struct StrategyReport {
    pub strategy: Strategy,
    pub manifest: BlockId,
    /// Unique blocks reachable from the manifest root (manifest document,
    /// version roots, structural nodes, leaves).
    pub total_blocks: u64,
    /// Their summed stored bytes: the corpus's actual footprint.
    pub total_bytes: u64,
    /// Per-transition deltas, in manifest order. The first ingested
    /// version has no predecessor and contributes no delta.
    pub deltas: Vec<VersionDelta>,
    /// Mean new blocks per version transition.
    pub mean_new_blocks: f64,
    /// Mean new bytes per version transition.
    pub mean_new_bytes: f64,
}

/// Side-by-side comparison of two ingestion runs over the same corpus.
#[derive(Clone, Debug)]
pub struct Comparison {
    pub fixed: StrategyReport,
    pub gear: StrategyReport,
}

/// Analyze one stored dedup manifest.
///
/// Resolves each ingested version's shallow link set, diffs adjacent
/// versions only (never across a gap), and walks the whole reachable
/// graph once for footprint totals. Versions whose ingestion failed are
/// skipped in both the delta series and the totals.
pub fn analyze_manifest<S: BlockStore + ?Sized>(
    store: &S,
    manifest_id: &BlockId,
) -> AnalyzeResult<StrategyReport> {
    let manifest = load_manifest(store, manifest_id)?;

    // Footprint: every unique reachable block, starting with the manifest
    // document itself.
    let mut seen: HashSet<BlockId> = HashSet::new();
    let mut total_blocks = 0u64;
    let mut total_bytes = 0u64;
    let mut pending: Vec<BlockId> = vec![*manifest_id];
    pending.extend(manifest.ingested().map(|(_, dist)| dist.root));
    while let Some(id) = pending.pop() {
        if !seen.insert(id) {
            continue;
        }
        let data = store.get(&id)?;
        total_blocks += 1;
        total_bytes += data.len() as u64;
        if id.codec() == Codec::Node && id != *manifest_id {
            pending.extend(FileNode::from_bytes(&data)?.links.iter().map(|l| l.id));
        }
    }

    // Delta series over adjacent ingested versions.
    let mut deltas = Vec::new();
    let mut previous: Option<Vec<drift_dag::NodeLink>> = None;
    for (version, dist) in manifest.ingested() {
        let links = link_set(store, &dist.root)?;
        if let Some(prev) = &previous {
            let added = new_links(&links, prev);
            let mut new_bytes = 0u64;
            for link in &added {
                new_bytes += store.get(&link.id)?.len() as u64;
            }
            debug!(
                version,
                new_blocks = added.len(),
                new_bytes,
                stream_size = dist.size,
                "version delta"
            );
            deltas.push(VersionDelta {
                version: version.to_string(),
                new_blocks: added.len(),
                new_bytes,
                stream_size: dist.size,
            });
        }
        previous = Some(links);
    }

    let transitions = deltas.len() as f64;
    let (mean_new_blocks, mean_new_bytes) = if deltas.is_empty() {
        (0.0, 0.0)
    } else {
        (
            deltas.iter().map(|d| d.new_blocks as f64).sum::<f64>() / transitions,
            deltas.iter().map(|d| d.new_bytes as f64).sum::<f64>() / transitions,
        )
    };

    Ok(StrategyReport {
        strategy: manifest.strategy,
        manifest: *manifest_id,
        total_blocks,
        total_bytes,
        deltas,
        mean_new_blocks,
        mean_new_bytes,
    })
}

/// Analyze both strategies' manifests for a side-by-side comparison.
pub fn compare<S: BlockStore + ?Sized>(
    store: &S,
    fixed_manifest: &BlockId,
    gear_manifest: &BlockId,
) -> AnalyzeResult<Comparison> {
    Ok(Comparison {
        fixed: analyze_manifest(store, fixed_manifest)?,
        gear: analyze_manifest(store, gear_manifest)?,
    })
}
