use std::collections::HashMap;

use bytes::BytesMut;
use drift_chunk::{Chunk, Chunker, FixedChunker, GearChunker};
use drift_dag::{DagBuilder, DagResult, DagRoot};
use drift_manifest::{
    build_dedup_manifest, store_manifest, DedupDist, Dist, RegistryProvider, Strategy,
};
use drift_store::BlockStore;
use drift_types::BlockId;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use crate::error::{IngestError, IngestResult};

/// Chunking parameters for one ingestion run.
#[derive(Clone, Copy, Debug)]
pub struct IngestConfig {
    pub fixed: FixedChunker,
    pub gear: GearChunker,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            fixed: FixedChunker::default(),
            gear: GearChunker::default(),
        }
    }
}

/// The result of ingesting one package.
#[derive(Clone, Debug)]
pub struct IngestOutcome {
    pub package: String,
    /// Root of the stored fixed-strategy manifest.
    pub fixed_manifest: BlockId,
    /// Root of the stored gear-strategy manifest.
    pub gear_manifest: BlockId,
    /// Versions whose ingestion failed (entries left unset in both manifests).
    pub failed_versions: Vec<String>,
}

/// One chunking strategy's view of an incoming stream.
///
/// Buffers at most one maximum-length window; every completed chunk is
/// pushed straight into the lane's [`DagBuilder`], so store writes are the
/// only place bytes accumulate.
struct Lane<'a, C, S: BlockStore + ?Sized> {
    chunker: C,
    buf: BytesMut,
    builder: DagBuilder<'a, S>,
    offset: u64,
}

impl<'a, C: Chunker, S: BlockStore + ?Sized> Lane<'a, C, S> {
    fn new(chunker: C, store: &'a S) -> Self {
        Self {
            chunker,
            buf: BytesMut::new(),
            builder: DagBuilder::new(store),
            offset: 0,
        }
    }

    fn feed(&mut self, bytes: &[u8]) -> DagResult<()> {
        self.buf.extend_from_slice(bytes);
        while self.buf.len() >= self.chunker.max_len() {
            let cut = self
                .chunker
                .next_cut(&self.buf, false)
                .expect("saturated window always cuts");
            self.emit(cut)?;
        }
        Ok(())
    }

    fn emit(&mut self, cut: usize) -> DagResult<()> {
        let chunk = Chunk::new(self.offset, self.buf.split_to(cut).freeze());
        self.offset += chunk.len() as u64;
        self.builder.push(&chunk)
    }

    fn finish(mut self) -> DagResult<DagRoot> {
        while !self.buf.is_empty() {
            let cut = self
                .chunker
                .next_cut(&self.buf, true)
                .expect("eof cut guaranteed for non-empty data");
            self.emit(cut)?;
        }
        self.builder.finish()
    }
}

/// Ingests packages: one fetch per version feeds both strategy lanes.
pub struct Ingestor<'a, S: BlockStore + ?Sized, R: RegistryProvider + ?Sized> {
    store: &'a S,
    registry: &'a R,
    config: IngestConfig,
}

impl<'a, S: BlockStore + ?Sized, R: RegistryProvider + ?Sized> Ingestor<'a, S, R> {
    /// Create an ingestor over explicit store and registry handles.
    pub fn new(store: &'a S, registry: &'a R, config: IngestConfig) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    /// Ingest every version of a package, in manifest order.
    ///
    /// Produces one derived manifest per strategy from the same immutable
    /// base. A version whose fetch or stream fails is abandoned: its
    /// entries stay unset, already-written blocks remain valid, and the
    /// run continues with the next version.
    pub async fn ingest(&self, package: &str) -> IngestResult<IngestOutcome> {
        let base = self.registry.manifest(package).await?;
        info!(package, versions = base.len(), "ingesting package");

        let mut fixed_results: HashMap<String, DedupDist> = HashMap::new();
        let mut gear_results: HashMap<String, DedupDist> = HashMap::new();
        let mut failed_versions = Vec::new();

        for entry in &base.versions {
            info!(version = %entry.version, url = %entry.dist.url, "ingesting version");
            match self.ingest_version(&entry.dist).await {
                Ok((fixed, gear)) => {
                    fixed_results.insert(entry.version.clone(), fixed);
                    gear_results.insert(entry.version.clone(), gear);
                }
                Err(e) if e.is_per_version() => {
                    warn!(version = %entry.version, error = %e, "version abandoned, continuing");
                    failed_versions.push(entry.version.clone());
                }
                Err(e) => return Err(e),
            }
        }

        let fixed = build_dedup_manifest(&base, Strategy::Fixed, &fixed_results);
        let gear = build_dedup_manifest(&base, Strategy::Gear, &gear_results);
        let fixed_manifest = store_manifest(self.store, &fixed)?;
        let gear_manifest = store_manifest(self.store, &gear)?;

        info!(package, %fixed_manifest, %gear_manifest, "ingestion complete");
        Ok(IngestOutcome {
            package: package.to_string(),
            fixed_manifest,
            gear_manifest,
            failed_versions,
        })
    }

    /// Fetch one version's stream once and drive both lanes over it.
    async fn ingest_version(&self, dist: &Dist) -> IngestResult<(DedupDist, DedupDist)> {
        let stream = self.registry.fetch(&dist.url).await?;
        let mut reader = stream.reader;

        let mut fixed_lane = Lane::new(self.config.fixed, self.store);
        let mut gear_lane = Lane::new(self.config.gear, self.store);

        let mut scratch = BytesMut::with_capacity(64 * 1024);
        loop {
            let n = reader
                .read_buf(&mut scratch)
                .await
                .map_err(|source| IngestError::Stream {
                    url: dist.url.clone(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            fixed_lane.feed(&scratch)?;
            gear_lane.feed(&scratch)?;
            scratch.clear();
        }

        let fixed_root = fixed_lane.finish()?;
        let gear_root = gear_lane.finish()?;

        if let Some(declared) = stream.declared_len {
            if declared != fixed_root.size {
                debug!(
                    url = %dist.url,
                    declared,
                    actual = fixed_root.size,
                    "declared length differs from stream length"
                );
            }
        }

        Ok((
            DedupDist {
                root: fixed_root.id,
                size: fixed_root.size,
            },
            DedupDist {
                root: gear_root.id,
                size: gear_root.size,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use drift_dag::restore;
    use drift_manifest::{
        load_manifest, PackageManifest, RegistryError, RegistryResult, StaticRegistry,
        VersionEntry, VersionStream,
    };
    use drift_store::MemoryBlockStore;

    use super::*;

    fn small_config() -> IngestConfig {
        IngestConfig {
            fixed: FixedChunker::new(1024).unwrap(),
            gear: GearChunker::new(256, 1024, 4096).unwrap(),
        }
    }

    fn synthetic(len: usize, salt: u32) -> Vec<u8> {
        (0..len as u32)
            .map(|i| ((i ^ salt).wrapping_mul(2654435761) >> 24) as u8)
            .collect()
    }

    fn registry_with(bodies: &[(&str, Vec<u8>)]) -> StaticRegistry {
        let mut registry = StaticRegistry::new();
        registry.insert_manifest(PackageManifest {
            name: "demo".into(),
            versions: bodies
                .iter()
                .map(|(version, _)| VersionEntry {
                    version: (*version).into(),
                    dist: Dist {
                        url: format!("demo-{version}.bin"),
                        declared_size: None,
                    },
                })
                .collect(),
        });
        for (version, body) in bodies {
            registry.insert_body(format!("demo-{version}.bin"), body.clone());
        }
        registry
    }

    #[tokio::test]
    async fn both_manifests_restore_every_version() {
        let store = MemoryBlockStore::new();
        let bodies = vec![
            ("1.0.0", synthetic(10_000, 1)),
            ("1.1.0", synthetic(20_000, 2)),
            ("2.0.0", synthetic(5_000, 3)),
        ];
        let registry = registry_with(&bodies);

        let outcome = Ingestor::new(&store, &registry, small_config())
            .ingest("demo")
            .await
            .unwrap();
        assert!(outcome.failed_versions.is_empty());

        for manifest_id in [outcome.fixed_manifest, outcome.gear_manifest] {
            let manifest = load_manifest(&store, &manifest_id).unwrap();
            assert_eq!(manifest.versions.len(), 3);
            for ((version, body), entry) in bodies.iter().zip(&manifest.versions) {
                assert_eq!(&entry.version, version);
                let dist = entry.dist.expect("ingested");
                assert_eq!(dist.size, body.len() as u64);
                assert_eq!(restore(&store, &dist.root).unwrap(), *body);
            }
        }
    }

    #[tokio::test]
    async fn strategies_produce_distinct_manifests() {
        let store = MemoryBlockStore::new();
        let registry = registry_with(&[("1.0.0", synthetic(50_000, 7))]);

        let outcome = Ingestor::new(&store, &registry, small_config())
            .ingest("demo")
            .await
            .unwrap();
        assert_ne!(outcome.fixed_manifest, outcome.gear_manifest);

        let fixed = load_manifest(&store, &outcome.fixed_manifest).unwrap();
        let gear = load_manifest(&store, &outcome.gear_manifest).unwrap();
        assert_eq!(fixed.strategy, Strategy::Fixed);
        assert_eq!(gear.strategy, Strategy::Gear);
    }

    #[tokio::test]
    async fn failed_fetch_is_contained_to_its_version() {
        let store = MemoryBlockStore::new();
        let mut registry = registry_with(&[
            ("1.0.0", synthetic(4_000, 1)),
            ("1.1.0", Vec::new()),
            ("2.0.0", synthetic(4_000, 3)),
        ]);
        // Make the middle version unfetchable.
        registry.insert_manifest(PackageManifest {
            name: "demo".into(),
            versions: vec![
                VersionEntry {
                    version: "1.0.0".into(),
                    dist: Dist {
                        url: "demo-1.0.0.bin".into(),
                        declared_size: None,
                    },
                },
                VersionEntry {
                    version: "1.1.0".into(),
                    dist: Dist {
                        url: "missing.bin".into(),
                        declared_size: None,
                    },
                },
                VersionEntry {
                    version: "2.0.0".into(),
                    dist: Dist {
                        url: "demo-2.0.0.bin".into(),
                        declared_size: None,
                    },
                },
            ],
        });

        let outcome = Ingestor::new(&store, &registry, small_config())
            .ingest("demo")
            .await
            .unwrap();
        assert_eq!(outcome.failed_versions, vec!["1.1.0".to_string()]);

        let manifest = load_manifest(&store, &outcome.gear_manifest).unwrap();
        assert!(manifest.versions[0].dist.is_some());
        assert!(manifest.versions[1].dist.is_none(), "failed entry left unset");
        assert!(manifest.versions[2].dist.is_some(), "later versions still ingested");
    }

    /// Provider whose stream dies mid-body.
    struct DyingRegistry {
        inner: StaticRegistry,
    }

    struct DyingReader {
        prefix: Vec<u8>,
        pos: usize,
    }

    impl tokio::io::AsyncRead for DyingReader {
        fn poll_read(
            mut self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            if self.pos < self.prefix.len() {
                let n = buf.remaining().min(self.prefix.len() - self.pos);
                let start = self.pos;
                buf.put_slice(&self.prefix[start..start + n]);
                self.pos += n;
                std::task::Poll::Ready(Ok(()))
            } else {
                std::task::Poll::Ready(Err(std::io::Error::other("connection reset")))
            }
        }
    }

    #[async_trait]
    impl RegistryProvider for DyingRegistry {
        async fn manifest(&self, name: &str) -> RegistryResult<PackageManifest> {
            self.inner.manifest(name).await
        }

        async fn fetch(&self, url: &str) -> RegistryResult<VersionStream> {
            if url == "demo-1.0.0.bin" {
                Ok(VersionStream {
                    reader: Box::new(DyingReader {
                        prefix: synthetic(2_000, 9),
                        pos: 0,
                    }),
                    declared_len: None,
                })
            } else {
                self.inner.fetch(url).await
            }
        }
    }

    #[tokio::test]
    async fn mid_stream_failure_is_contained_and_blocks_stay_valid() {
        let store = MemoryBlockStore::new();
        let registry = DyingRegistry {
            inner: registry_with(&[
                ("1.0.0", Vec::new()), // body replaced by the dying reader
                ("1.1.0", synthetic(4_000, 2)),
            ]),
        };

        let outcome = Ingestor::new(&store, &registry, small_config())
            .ingest("demo")
            .await
            .unwrap();
        assert_eq!(outcome.failed_versions, vec!["1.0.0".to_string()]);

        // Blocks written before the failure are intact and content-valid.
        for id in store.all_ids() {
            let data = store.get(&id).unwrap();
            assert_eq!(drift_types::BlockId::new(id.codec(), &data), id);
        }

        let manifest = load_manifest(&store, &outcome.fixed_manifest).unwrap();
        assert!(manifest.versions[0].dist.is_none());
        let dist = manifest.versions[1].dist.expect("second version ingested");
        assert_eq!(restore(&store, &dist.root).unwrap(), synthetic(4_000, 2));
    }

    #[tokio::test]
    async fn empty_body_gets_a_well_defined_root() {
        let store = MemoryBlockStore::new();
        let registry = registry_with(&[("1.0.0", Vec::new())]);

        let outcome = Ingestor::new(&store, &registry, small_config())
            .ingest("demo")
            .await
            .unwrap();
        let manifest = load_manifest(&store, &outcome.gear_manifest).unwrap();
        let dist = manifest.versions[0].dist.unwrap();
        assert_eq!(dist.size, 0);
        assert_eq!(restore(&store, &dist.root).unwrap(), Vec::<u8>::new());
    }

    #[tokio::test]
    async fn identical_bodies_share_roots_and_blocks() {
        let store = MemoryBlockStore::new();
        let body = synthetic(8_000, 5);
        let registry = registry_with(&[("1.0.0", body.clone()), ("1.0.1", body)]);

        let outcome = Ingestor::new(&store, &registry, small_config())
            .ingest("demo")
            .await
            .unwrap();
        let manifest = load_manifest(&store, &outcome.fixed_manifest).unwrap();
        let first = manifest.versions[0].dist.unwrap();
        let second = manifest.versions[1].dist.unwrap();
        assert_eq!(first.root, second.root, "identical content, identical root");
    }

    #[tokio::test]
    async fn unknown_package_aborts_the_run() {
        let store = MemoryBlockStore::new();
        let registry = StaticRegistry::new();
        let err = Ingestor::new(&store, &registry, small_config())
            .ingest("ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Registry(RegistryError::NotFound(_))));
    }
}
